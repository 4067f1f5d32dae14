//! IEC 60063 preferred number series

use serde::{Deserialize, Serialize};

use crate::constants::series::{E12, E24, E96};

/// Preferred series a value belongs to, ordered from least to most common
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PreferredSeries {
    E96,
    E24,
    E12,
}

impl PreferredSeries {
    /// Most common series containing the significand, if any
    ///
    /// The significand is normalized to three digits first, so 47, 470 and
    /// 4.7 Ω written as 47 all land on the E12 entry 470.
    pub fn of_significand(significand: u32) -> Option<Self> {
        let normalized = normalize(significand)?;

        let in_two_digit = |table: &[u16]| normalized % 10 == 0 && table.contains(&(normalized / 10));
        if in_two_digit(&E12) {
            Some(PreferredSeries::E12)
        } else if in_two_digit(&E24) {
            Some(PreferredSeries::E24)
        } else if E96.contains(&normalized) {
            Some(PreferredSeries::E96)
        } else {
            None
        }
    }
}

/// Scale a significand into 100..=999, dropping trailing zeros beyond three digits
fn normalize(significand: u32) -> Option<u16> {
    if significand == 0 {
        return None;
    }
    let mut value = significand;
    while value >= 1000 {
        if value % 10 != 0 {
            return None;
        }
        value /= 10;
    }
    while value < 100 {
        value *= 10;
    }
    u16::try_from(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_membership() {
        assert_eq!(PreferredSeries::of_significand(47), Some(PreferredSeries::E12));
        assert_eq!(PreferredSeries::of_significand(10), Some(PreferredSeries::E12));
        assert_eq!(PreferredSeries::of_significand(1), Some(PreferredSeries::E12));
        assert_eq!(PreferredSeries::of_significand(51), Some(PreferredSeries::E24));
        assert_eq!(PreferredSeries::of_significand(499), Some(PreferredSeries::E96));
        assert_eq!(PreferredSeries::of_significand(560), Some(PreferredSeries::E12));
        assert_eq!(PreferredSeries::of_significand(21), Some(PreferredSeries::E96));
        assert_eq!(PreferredSeries::of_significand(23), None);
        assert_eq!(PreferredSeries::of_significand(0), None);
    }

    #[test]
    fn test_e12_outranks_e24_outranks_e96() {
        assert!(PreferredSeries::E12 > PreferredSeries::E24);
        assert!(PreferredSeries::E24 > PreferredSeries::E96);
        assert!(Some(PreferredSeries::E96) > None);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(5), Some(500));
        assert_eq!(normalize(1000), Some(100));
        assert_eq!(normalize(1001), None);
    }
}
