//! Value to band colors, the inverse of the decoder

use serde::{Deserialize, Serialize};

use crate::color::{ColorCode, Tolerance};
use crate::decode::decoder::scale;
use crate::error::{ReaderError, Result};

/// Physical band layout of a resistor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandLayout {
    /// Two digits and a multiplier, ±20 %
    Three,
    Four,
    Five,
    Six { tempco_ppm: u16 },
}

impl BandLayout {
    pub fn band_count(&self) -> usize {
        match self {
            BandLayout::Three => 3,
            BandLayout::Four => 4,
            BandLayout::Five => 5,
            BandLayout::Six { .. } => 6,
        }
    }

    fn significant_digits(&self) -> u32 {
        match self {
            BandLayout::Three | BandLayout::Four => 2,
            BandLayout::Five | BandLayout::Six { .. } => 3,
        }
    }
}

/// Band colors for a resistance, tolerance and layout
///
/// # Errors
///
/// Returns `ReaderError::InvalidParameter` when the value needs more
/// significant digits than the layout has, falls outside the multiplier
/// range, or when the tolerance has no band in this layout.
pub fn encode(resistance_ohms: f64, tolerance: Tolerance, layout: BandLayout) -> Result<Vec<ColorCode>> {
    if !resistance_ohms.is_finite() || resistance_ohms <= 0.0 {
        return Err(ReaderError::invalid_parameter("resistance_ohms", resistance_ohms));
    }

    let digits = layout.significant_digits();
    let (significand, exponent) = split_value(resistance_ohms, digits)
        .ok_or_else(|| ReaderError::invalid_parameter("resistance_ohms", resistance_ohms))?;

    let mut bands: Vec<ColorCode> = (0..digits)
        .rev()
        .map(|place| (significand / 10u32.pow(place) % 10) as u8)
        .filter_map(ColorCode::from_digit)
        .collect();

    bands.push(
        ColorCode::from_multiplier_exponent(exponent)
            .ok_or_else(|| ReaderError::invalid_parameter("resistance_ohms", resistance_ohms))?,
    );

    match layout {
        BandLayout::Three => {
            if tolerance != Tolerance::Twenty {
                return Err(ReaderError::invalid_parameter("tolerance", tolerance));
            }
        }
        _ => bands.push(
            ColorCode::for_tolerance(tolerance)
                .ok_or_else(|| ReaderError::invalid_parameter("tolerance", tolerance))?,
        ),
    }

    if let BandLayout::Six { tempco_ppm } = layout {
        bands.push(
            ColorCode::for_tempco(tempco_ppm)
                .ok_or_else(|| ReaderError::invalid_parameter("tempco_ppm", tempco_ppm))?,
        );
    }

    Ok(bands)
}

/// Find `(significand, exponent)` with exactly `digits` significant digits
fn split_value(resistance_ohms: f64, digits: u32) -> Option<(u32, i8)> {
    let low = 10u32.pow(digits - 1);
    let high = 10u32.pow(digits);

    (-2i8..=9).find_map(|exponent| {
        let significand = resistance_ohms / scale(1, exponent);
        let rounded = significand.round();
        let exact = (significand - rounded).abs() <= 1e-6 * rounded.max(1.0);
        let in_range = rounded >= low as f64 && rounded < high as f64;
        (exact && in_range).then_some((rounded as u32, exponent))
    })
}
