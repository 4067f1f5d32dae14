//! The resistor color code (IEC 60062)
//!
//! One compile-time table row per color. Rows are listed in canonical order,
//! which is also the tie-break order for classification.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tolerance printed on a resistor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tolerance {
    One,
    Two,
    Five,
    Ten,
    Twenty,
    /// A tolerance band was read but it marks a precision grade outside the standard set
    Unknown,
}

impl Tolerance {
    /// Tolerance in percent, `None` when unknown
    pub fn percent(&self) -> Option<u8> {
        match self {
            Tolerance::One => Some(1),
            Tolerance::Two => Some(2),
            Tolerance::Five => Some(5),
            Tolerance::Ten => Some(10),
            Tolerance::Twenty => Some(20),
            Tolerance::Unknown => None,
        }
    }

    pub fn from_percent(percent: u8) -> Option<Self> {
        match percent {
            1 => Some(Tolerance::One),
            2 => Some(Tolerance::Two),
            5 => Some(Tolerance::Five),
            10 => Some(Tolerance::Ten),
            20 => Some(Tolerance::Twenty),
            _ => None,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Tolerance::Unknown)
    }
}

impl fmt::Display for Tolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.percent() {
            Some(percent) => write!(f, "±{}%", percent),
            None => write!(f, "±?%"),
        }
    }
}

/// A resistor band color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorCode {
    Black,
    Brown,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Violet,
    Gray,
    White,
    Gold,
    Silver,
    /// Missing fourth band on a three-band part
    None,
}

/// One row of the color code table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorSpec {
    pub code: ColorCode,
    pub name: &'static str,
    pub digit: Option<u8>,
    pub multiplier_exponent: Option<i8>,
    pub tolerance: Option<Tolerance>,
    /// Precision grade in percent (0.05-0.5) for colors outside the standard tolerance set
    pub precision_percent: Option<f32>,
    /// Temperature coefficient in ppm/K (sixth band)
    pub tempco_ppm: Option<u16>,
    /// Typical appearance in a photograph
    pub reference_rgb: Option<[u8; 3]>,
}

pub const COLOR_TABLE: [ColorSpec; 13] = [
    ColorSpec {
        code: ColorCode::Black,
        name: "black",
        digit: Some(0),
        multiplier_exponent: Some(0),
        tolerance: None,
        precision_percent: None,
        tempco_ppm: Some(250),
        reference_rgb: Some([20, 20, 20]),
    },
    ColorSpec {
        code: ColorCode::Brown,
        name: "brown",
        digit: Some(1),
        multiplier_exponent: Some(1),
        tolerance: Some(Tolerance::One),
        precision_percent: None,
        tempco_ppm: Some(100),
        reference_rgb: Some([120, 63, 30]),
    },
    ColorSpec {
        code: ColorCode::Red,
        name: "red",
        digit: Some(2),
        multiplier_exponent: Some(2),
        tolerance: Some(Tolerance::Two),
        precision_percent: None,
        tempco_ppm: Some(50),
        reference_rgb: Some([200, 30, 30]),
    },
    ColorSpec {
        code: ColorCode::Orange,
        name: "orange",
        digit: Some(3),
        multiplier_exponent: Some(3),
        tolerance: None,
        precision_percent: None,
        tempco_ppm: Some(15),
        reference_rgb: Some([240, 120, 20]),
    },
    ColorSpec {
        code: ColorCode::Yellow,
        name: "yellow",
        digit: Some(4),
        multiplier_exponent: Some(4),
        tolerance: None,
        precision_percent: None,
        tempco_ppm: Some(25),
        reference_rgb: Some([240, 210, 30]),
    },
    ColorSpec {
        code: ColorCode::Green,
        name: "green",
        digit: Some(5),
        multiplier_exponent: Some(5),
        tolerance: None,
        precision_percent: Some(0.5),
        tempco_ppm: Some(20),
        reference_rgb: Some([30, 140, 60]),
    },
    ColorSpec {
        code: ColorCode::Blue,
        name: "blue",
        digit: Some(6),
        multiplier_exponent: Some(6),
        tolerance: None,
        precision_percent: Some(0.25),
        tempco_ppm: Some(10),
        reference_rgb: Some([30, 70, 190]),
    },
    ColorSpec {
        code: ColorCode::Violet,
        name: "violet",
        digit: Some(7),
        multiplier_exponent: Some(7),
        tolerance: None,
        precision_percent: Some(0.1),
        tempco_ppm: Some(5),
        reference_rgb: Some([130, 50, 160]),
    },
    ColorSpec {
        code: ColorCode::Gray,
        name: "gray",
        digit: Some(8),
        multiplier_exponent: Some(8),
        tolerance: None,
        precision_percent: Some(0.05),
        tempco_ppm: Some(1),
        reference_rgb: Some([128, 128, 128]),
    },
    ColorSpec {
        code: ColorCode::White,
        name: "white",
        digit: Some(9),
        multiplier_exponent: Some(9),
        tolerance: None,
        precision_percent: None,
        tempco_ppm: None,
        reference_rgb: Some([245, 245, 245]),
    },
    ColorSpec {
        code: ColorCode::Gold,
        name: "gold",
        digit: None,
        multiplier_exponent: Some(-1),
        tolerance: Some(Tolerance::Five),
        precision_percent: None,
        tempco_ppm: None,
        reference_rgb: Some([200, 160, 60]),
    },
    ColorSpec {
        code: ColorCode::Silver,
        name: "silver",
        digit: None,
        multiplier_exponent: Some(-2),
        tolerance: Some(Tolerance::Ten),
        precision_percent: None,
        tempco_ppm: None,
        reference_rgb: Some([190, 190, 195]),
    },
    ColorSpec {
        code: ColorCode::None,
        name: "none",
        digit: None,
        multiplier_exponent: None,
        tolerance: Some(Tolerance::Twenty),
        precision_percent: None,
        tempco_ppm: None,
        reference_rgb: None,
    },
];

impl ColorCode {
    /// All codes in canonical order
    pub const ALL: [ColorCode; 13] = [
        ColorCode::Black,
        ColorCode::Brown,
        ColorCode::Red,
        ColorCode::Orange,
        ColorCode::Yellow,
        ColorCode::Green,
        ColorCode::Blue,
        ColorCode::Violet,
        ColorCode::Gray,
        ColorCode::White,
        ColorCode::Gold,
        ColorCode::Silver,
        ColorCode::None,
    ];

    pub fn spec(&self) -> &'static ColorSpec {
        &COLOR_TABLE[*self as usize]
    }

    pub fn name(&self) -> &'static str {
        self.spec().name
    }

    pub fn digit(&self) -> Option<u8> {
        self.spec().digit
    }

    pub fn multiplier_exponent(&self) -> Option<i8> {
        self.spec().multiplier_exponent
    }

    /// Standard tolerance (±1, 2, 5, 10 or 20 %) marked by this color
    pub fn tolerance(&self) -> Option<Tolerance> {
        self.spec().tolerance
    }

    /// Tolerance reported when this color sits in the tolerance position
    pub fn tolerance_marking(&self) -> Option<Tolerance> {
        let spec = self.spec();
        spec.tolerance
            .or_else(|| spec.precision_percent.map(|_| Tolerance::Unknown))
    }

    pub fn tempco_ppm(&self) -> Option<u16> {
        self.spec().tempco_ppm
    }

    pub fn reference_rgb(&self) -> Option<[u8; 3]> {
        self.spec().reference_rgb
    }

    /// Look up a code by digit value (0-9)
    pub fn from_digit(digit: u8) -> Option<ColorCode> {
        ColorCode::ALL
            .into_iter()
            .find(|code| code.digit() == Some(digit))
    }

    pub fn from_multiplier_exponent(exponent: i8) -> Option<ColorCode> {
        ColorCode::ALL
            .into_iter()
            .find(|code| code.multiplier_exponent() == Some(exponent))
    }

    /// Color marking a standard tolerance; ±20 % has no physical band
    pub fn for_tolerance(tolerance: Tolerance) -> Option<ColorCode> {
        ColorCode::ALL
            .into_iter()
            .filter(|code| *code != ColorCode::None)
            .find(|code| code.tolerance() == Some(tolerance))
    }

    pub fn for_tempco(ppm: u16) -> Option<ColorCode> {
        ColorCode::ALL
            .into_iter()
            .find(|code| code.tempco_ppm() == Some(ppm))
    }

    pub fn from_name(name: &str) -> Option<ColorCode> {
        let lower = name.trim().to_ascii_lowercase();
        let lower = match lower.as_str() {
            "grey" => "gray",
            "purple" => "violet",
            other => other,
        };
        ColorCode::ALL.into_iter().find(|code| code.name() == lower)
    }
}

impl fmt::Display for ColorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_rows_match_enum_order() {
        for (index, code) in ColorCode::ALL.iter().enumerate() {
            assert_eq!(COLOR_TABLE[index].code, *code);
            assert_eq!(*code as usize, index);
        }
    }

    #[test]
    fn test_digits_are_canonical() {
        for digit in 0..10u8 {
            let code = ColorCode::from_digit(digit).unwrap();
            assert_eq!(code as u8, digit);
            assert_eq!(code.multiplier_exponent(), Some(digit as i8));
        }
        assert_eq!(ColorCode::Gold.digit(), None);
        assert_eq!(ColorCode::Silver.multiplier_exponent(), Some(-2));
        assert_eq!(ColorCode::None.multiplier_exponent(), None);
    }

    #[test]
    fn test_standard_tolerances() {
        assert_eq!(ColorCode::Brown.tolerance(), Some(Tolerance::One));
        assert_eq!(ColorCode::Red.tolerance(), Some(Tolerance::Two));
        assert_eq!(ColorCode::Gold.tolerance(), Some(Tolerance::Five));
        assert_eq!(ColorCode::Silver.tolerance(), Some(Tolerance::Ten));
        assert_eq!(ColorCode::None.tolerance(), Some(Tolerance::Twenty));
        assert_eq!(ColorCode::Green.tolerance(), None);
        assert_eq!(ColorCode::Green.tolerance_marking(), Some(Tolerance::Unknown));
        assert_eq!(ColorCode::Orange.tolerance_marking(), None);
    }

    #[test]
    fn test_reverse_lookups() {
        assert_eq!(ColorCode::for_tolerance(Tolerance::Five), Some(ColorCode::Gold));
        assert_eq!(ColorCode::for_tolerance(Tolerance::Twenty), None);
        assert_eq!(ColorCode::for_tempco(50), Some(ColorCode::Red));
        assert_eq!(ColorCode::from_multiplier_exponent(-1), Some(ColorCode::Gold));
        assert_eq!(ColorCode::from_name("Grey"), Some(ColorCode::Gray));
        assert_eq!(ColorCode::from_name("purple"), Some(ColorCode::Violet));
        assert_eq!(ColorCode::from_name("pink"), None);
    }

    #[test]
    fn test_tolerance_display() {
        assert_eq!(Tolerance::Five.to_string(), "±5%");
        assert_eq!(Tolerance::Unknown.to_string(), "±?%");
        assert_eq!(Tolerance::from_percent(10), Some(Tolerance::Ten));
        assert_eq!(Tolerance::from_percent(3), None);
    }

    #[test]
    fn test_only_none_lacks_reference_color() {
        for code in ColorCode::ALL {
            assert_eq!(code.reference_rgb().is_none(), code == ColorCode::None);
        }
    }
}
