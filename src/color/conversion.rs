//! Color space conversion utilities
//!
//! Provides the conversions the pipeline needs:
//! - 8-bit RGB to Lab (D65) for perceptual distances
//! - RGB to HSV for the brightness background model
//! - Lab back to sRGB and hex for reports
//! - ΔE76 color difference

use palette::{FromColor, Hsv, IntoColor, Lab, Srgb};

use crate::{ReaderError, Result};

/// Stateless color converter
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorConverter;

impl ColorConverter {
    pub fn new() -> Self {
        Self
    }

    /// Convert RGB (0-255) to Lab color space
    ///
    /// # Arguments
    ///
    /// * `r`, `g`, `b` - RGB values in range [0, 255]
    ///
    /// # Returns
    ///
    /// Lab color in D65 illuminant
    pub fn rgb_to_lab(&self, r: u8, g: u8, b: u8) -> Lab {
        self.srgb_to_lab(Srgb::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
        ))
    }

    /// Convert an sRGB color with components in [0, 1] to Lab
    pub fn srgb_to_lab(&self, srgb: Srgb) -> Lab {
        Lab::from_color(srgb)
    }

    /// Convert RGB (0-255) to HSV with saturation and value in [0, 1]
    pub fn rgb_to_hsv(&self, r: u8, g: u8, b: u8) -> Hsv {
        Hsv::from_color(Srgb::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
        ))
    }

    /// Convert Lab to sRGB, clamped to the valid gamut
    pub fn lab_to_srgb(&self, lab: Lab) -> Srgb {
        let srgb: Srgb = lab.into_color();
        Srgb::new(
            srgb.red.clamp(0.0, 1.0),
            srgb.green.clamp(0.0, 1.0),
            srgb.blue.clamp(0.0, 1.0),
        )
    }

    /// Convert sRGB to hexadecimal color string (e.g. "#FF0000")
    pub fn srgb_to_hex(&self, srgb: Srgb) -> String {
        let r = (srgb.red * 255.0).round() as u8;
        let g = (srgb.green * 255.0).round() as u8;
        let b = (srgb.blue * 255.0).round() as u8;
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    }

    pub fn lab_to_hex(&self, lab: Lab) -> String {
        self.srgb_to_hex(self.lab_to_srgb(lab))
    }

    /// Parse hexadecimal color string ("#FF0000" or "FF0000") to 8-bit RGB
    pub fn hex_to_rgb(&self, hex: &str) -> Result<[u8; 3]> {
        let digits = hex.trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ReaderError::invalid_parameter("hex color", hex));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| ReaderError::invalid_parameter("hex color", hex))
        };

        Ok([channel(0..2)?, channel(2..4)?, channel(4..6)?])
    }

    /// Compute Delta E (color difference) between two Lab colors
    ///
    /// Uses simple Euclidean distance (ΔE76)
    pub fn delta_e(&self, lab1: Lab, lab2: Lab) -> f32 {
        let dl = lab1.l - lab2.l;
        let da = lab1.a - lab2.a;
        let db = lab1.b - lab2.b;
        (dl * dl + da * da + db * db).sqrt()
    }
}
