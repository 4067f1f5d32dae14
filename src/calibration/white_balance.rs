//! White balance estimation and correction
//!
//! Estimates per-channel gains that neutralize the scene illuminant, either
//! from the whole image (gray world) or from the paper the resistor lies on.

use image::RgbImage;
use tracing::debug;

use crate::config::WhiteBalanceMode;
use crate::detection::sampler::border_median;
use crate::error::{ReaderError, Result};

/// Largest gain applied to a single channel
const MAX_GAIN: f32 = 4.0;

/// Per-channel multipliers for red, green and blue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelGains(pub [f32; 3]);

impl ChannelGains {
    pub const IDENTITY: ChannelGains = ChannelGains([1.0, 1.0, 1.0]);

    /// Gains that map `reference` to a neutral gray of the same mean level
    fn neutralizing(reference: [f32; 3]) -> Self {
        let gray = reference.iter().sum::<f32>() / 3.0;
        if gray <= 0.0 {
            return Self::IDENTITY;
        }
        ChannelGains(reference.map(|channel| {
            if channel <= 0.0 {
                MAX_GAIN
            } else {
                (gray / channel).min(MAX_GAIN)
            }
        }))
    }
}

/// White balance estimator
#[derive(Debug, Clone, Copy)]
pub struct WhiteBalanceEstimator {
    mode: WhiteBalanceMode,
}

impl WhiteBalanceEstimator {
    pub fn new(mode: WhiteBalanceMode) -> Self {
        Self { mode }
    }

    /// Estimate gains with the configured method
    pub fn estimate(&self, image: &RgbImage) -> Result<ChannelGains> {
        match self.mode {
            WhiteBalanceMode::Off => Ok(ChannelGains::IDENTITY),
            WhiteBalanceMode::GrayWorld => self.estimate_gray_world(image),
            WhiteBalanceMode::Paper => self.estimate_from_paper(image),
        }
    }

    /// Assume the average color of the scene is neutral gray
    pub fn estimate_gray_world(&self, image: &RgbImage) -> Result<ChannelGains> {
        ensure_not_empty(image)?;

        let mut sums = [0u64; 3];
        for pixel in image.pixels() {
            for (sum, value) in sums.iter_mut().zip(pixel.0) {
                *sum += value as u64;
            }
        }
        let count = image.width() as f32 * image.height() as f32;
        Ok(ChannelGains::neutralizing(sums.map(|sum| sum as f32 / count)))
    }

    /// Assume the image border is white or gray paper
    pub fn estimate_from_paper(&self, image: &RgbImage) -> Result<ChannelGains> {
        ensure_not_empty(image)?;
        Ok(ChannelGains::neutralizing(
            border_median(image).map(|value| value as f32),
        ))
    }

    /// Apply gains in place, clamping to the 8-bit range
    pub fn apply_correction(&self, image: &mut RgbImage, gains: ChannelGains) {
        if gains == ChannelGains::IDENTITY {
            return;
        }

        let tables = gains.0.map(|gain| {
            let mut table = [0u8; 256];
            for (value, entry) in table.iter_mut().enumerate() {
                *entry = (value as f32 * gain).round().clamp(0.0, 255.0) as u8;
            }
            table
        });

        for pixel in image.pixels_mut() {
            for (channel, table) in pixel.0.iter_mut().zip(&tables) {
                *channel = table[*channel as usize];
            }
        }
    }

    /// Estimate and apply in one step
    pub fn correct(&self, image: &mut RgbImage) -> Result<ChannelGains> {
        let gains = self.estimate(image)?;
        self.apply_correction(image, gains);
        debug!(mode = ?self.mode, gains = ?gains.0, "Applied white balance");
        Ok(gains)
    }
}

impl Default for WhiteBalanceEstimator {
    fn default() -> Self {
        Self::new(WhiteBalanceMode::GrayWorld)
    }
}

fn ensure_not_empty(image: &RgbImage) -> Result<()> {
    if image.width() == 0 || image.height() == 0 {
        return Err(ReaderError::invalid_parameter(
            "image",
            format!("{}x{}", image.width(), image.height()),
        ));
    }
    Ok(())
}
