//! Nearest-reference classification of band colors
//!
//! Each band's representative color is matched to the closest reference
//! color by ΔE76. Ties keep the earlier code in canonical table order, and
//! every band gets a code: a poor match is reported through its confidence,
//! never by leaving the band unclassified.

use palette::Lab;

use crate::color::{ColorCode, ColorConverter};
use crate::config::{ClassificationConfig, ReferenceColor};
use crate::constants::classification::CONFIDENCE_SCALE_DELTA_E;
use crate::detection::Band;

/// Outcome of classifying one color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub code: ColorCode,
    /// ΔE76 to the matched reference color
    pub distance: f32,
    /// 1.0 for an exact match, 0.5 at ten ΔE units
    pub confidence: f32,
}

/// A detected band together with its classification
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedBand {
    pub band: Band,
    pub code: ColorCode,
    pub distance: f32,
    pub confidence: f32,
}

/// Band classifier over a fixed reference table
#[derive(Debug, Clone)]
pub struct BandClassifier {
    converter: ColorConverter,
    references: Vec<(ColorCode, Lab)>,
}

impl Default for BandClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl BandClassifier {
    /// Create a classifier using the built-in reference colors
    pub fn new() -> Self {
        Self::with_overrides(&[])
    }

    pub fn from_config(config: &ClassificationConfig) -> Self {
        Self::with_overrides(&config.reference_colors)
    }

    /// Create a classifier with some reference colors replaced
    pub fn with_overrides(overrides: &[ReferenceColor]) -> Self {
        let converter = ColorConverter::new();
        let references = ColorCode::ALL
            .into_iter()
            .filter_map(|code| {
                let rgb = overrides
                    .iter()
                    .rev()
                    .find(|reference| reference.code == code)
                    .map(|reference| reference.rgb)
                    .or_else(|| code.reference_rgb())?;
                Some((code, converter.rgb_to_lab(rgb[0], rgb[1], rgb[2])))
            })
            .collect();

        Self {
            converter,
            references,
        }
    }

    /// Classify a Lab color against the reference table
    pub fn classify(&self, color: Lab) -> Classification {
        let mut best_code = ColorCode::Black;
        let mut best_distance = f32::INFINITY;

        for (code, reference) in &self.references {
            let distance = self.converter.delta_e(color, *reference);
            if distance < best_distance {
                best_code = *code;
                best_distance = distance;
            }
        }

        Classification {
            code: best_code,
            distance: best_distance,
            confidence: confidence_for(best_distance),
        }
    }

    pub fn classify_rgb(&self, r: u8, g: u8, b: u8) -> Classification {
        self.classify(self.converter.rgb_to_lab(r, g, b))
    }

    /// Classify each band by its representative color, keeping band order
    pub fn classify_bands(&self, bands: Vec<Band>) -> Vec<ClassifiedBand> {
        bands
            .into_iter()
            .map(|band| {
                let Classification {
                    code,
                    distance,
                    confidence,
                } = self.classify(band.color);
                ClassifiedBand {
                    band,
                    code,
                    distance,
                    confidence,
                }
            })
            .collect()
    }

    /// Reference colors in table order
    pub fn references(&self) -> &[(ColorCode, Lab)] {
        &self.references
    }
}

fn confidence_for(distance: f32) -> f32 {
    if distance.is_finite() {
        1.0 / (1.0 + distance / CONFIDENCE_SCALE_DELTA_E)
    } else {
        0.0
    }
}
