//! The decoded value of a resistor and its text renderings

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::{ColorCode, Tolerance};

/// Final output of a decode call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResistorReading {
    /// Nominal resistance in ohms, never negative
    pub resistance_ohms: f64,
    pub tolerance: Tolerance,
    /// Number of bands the value was decoded from (3-6)
    pub band_count: u8,
    /// Temperature coefficient in ppm/K, six-band parts only
    pub tempco_ppm: Option<u16>,
    /// Band colors in reading order
    pub bands: Vec<ColorCode>,
    /// Lowest band classification confidence (0.0-1.0)
    pub confidence: f32,
}

impl ResistorReading {
    /// SI-prefixed rendering with one truncated decimal, e.g. "4.7 kΩ ±5%"
    pub fn compact(&self) -> String {
        format!("{} {}", format_compact_ohms(self.resistance_ohms), self.tolerance)
    }

    /// Relative difference between two readings' resistances
    pub fn relative_difference(&self, other: &ResistorReading) -> f64 {
        let larger = self.resistance_ohms.max(other.resistance_ohms);
        if larger <= 0.0 {
            return 0.0;
        }
        (self.resistance_ohms - other.resistance_ohms).abs() / larger
    }
}

impl fmt::Display for ResistorReading {
    /// Canonical rendering, e.g. "4700 Ω ±5%"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Ω {}", format_ohms(self.resistance_ohms), self.tolerance)
    }
}

/// Plain number of ohms without trailing zeros: "4700", "4.7", "0.22"
pub fn format_ohms(value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() < 1e-6 * rounded.abs().max(1.0) {
        return format!("{:.0}", rounded);
    }
    let text = format!("{:.3}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Ohms with an SI prefix, truncated to one decimal: "470 Ω", "4.7 kΩ", "10 MΩ"
pub fn format_compact_ohms(value: f64) -> String {
    const PREFIXES: [(f64, &str); 3] = [(1e9, "G"), (1e6, "M"), (1e3, "k")];

    for (unit, prefix) in PREFIXES {
        if value >= unit {
            let tenths = (value / unit * 10.0 + 1e-6).floor();
            let text = if tenths % 10.0 == 0.0 {
                format!("{:.0}", tenths / 10.0)
            } else {
                format!("{:.1}", tenths / 10.0)
            };
            return format!("{} {}Ω", text, prefix);
        }
    }

    format!("{} Ω", format_ohms(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(resistance_ohms: f64, tolerance: Tolerance) -> ResistorReading {
        ResistorReading {
            resistance_ohms,
            tolerance,
            band_count: 4,
            tempco_ppm: None,
            bands: Vec::new(),
            confidence: 1.0,
        }
    }

    #[test]
    fn test_canonical_display() {
        assert_eq!(reading(4700.0, Tolerance::Five).to_string(), "4700 Ω ±5%");
        assert_eq!(reading(4.7, Tolerance::Ten).to_string(), "4.7 Ω ±10%");
        assert_eq!(reading(0.22, Tolerance::Unknown).to_string(), "0.22 Ω ±?%");
    }

    #[test]
    fn test_compact_display() {
        assert_eq!(reading(470.0, Tolerance::Five).compact(), "470 Ω ±5%");
        assert_eq!(reading(4700.0, Tolerance::Five).compact(), "4.7 kΩ ±5%");
        assert_eq!(reading(47000.0, Tolerance::Five).compact(), "47 kΩ ±5%");
        assert_eq!(reading(1_500_000.0, Tolerance::One).compact(), "1.5 MΩ ±1%");
        assert_eq!(reading(10_000_000.0, Tolerance::Twenty).compact(), "10 MΩ ±20%");
        assert_eq!(reading(2_200_000_000.0, Tolerance::Two).compact(), "2.2 GΩ ±2%");
    }

    #[test]
    fn test_compact_truncates_second_decimal() {
        assert_eq!(format_compact_ohms(4990.0), "4.9 kΩ");
        assert_eq!(format_compact_ohms(1020.0), "1 kΩ");
    }

    #[test]
    fn test_relative_difference() {
        let a = reading(1000.0, Tolerance::Five);
        let b = reading(1005.0, Tolerance::Five);
        assert!(a.relative_difference(&b) < 0.01);
        assert!((a.relative_difference(&reading(22.0, Tolerance::One)) - 0.978).abs() < 1e-9);
        assert_eq!(reading(0.0, Tolerance::Five).relative_difference(&reading(0.0, Tolerance::Five)), 0.0);
    }

    #[test]
    fn test_serializes_to_json() {
        let json = serde_json::to_string(&reading(1000.0, Tolerance::Five)).unwrap();
        assert!(json.contains("\"resistance_ohms\":1000.0"));
        assert!(json.contains("\"tolerance\":\"Five\""));
    }
}
