//! Image preparation before sampling
//!
//! Large photographs are downscaled, then white balance and exposure are
//! optionally normalized so reference colors stay comparable across lighting.

pub mod exposure;
pub mod white_balance;

use std::borrow::Cow;

use image::imageops::{self, FilterType};
use image::RgbImage;
use tracing::debug;

use crate::config::{DownscaleConfig, PreprocessingConfig, WhiteBalanceMode};
use crate::error::Result;

pub use exposure::{ExposureAdjustment, ExposureNormalizer};
pub use white_balance::{ChannelGains, WhiteBalanceEstimator};

/// Runs the configured preprocessing steps in order
#[derive(Debug, Clone)]
pub struct Preprocessor {
    config: PreprocessingConfig,
    white_balance: WhiteBalanceEstimator,
    exposure: ExposureNormalizer,
}

impl Preprocessor {
    pub fn new(config: PreprocessingConfig) -> Self {
        Self {
            white_balance: WhiteBalanceEstimator::new(config.white_balance),
            exposure: ExposureNormalizer::new(config.exposure.clone()),
            config,
        }
    }

    /// Prepare an image, borrowing it unchanged when no step applies
    ///
    /// Empty images pass through untouched; the sampler reports them.
    pub fn prepare<'a>(&self, image: &'a RgbImage) -> Result<Cow<'a, RgbImage>> {
        if image.width() == 0 || image.height() == 0 {
            return Ok(Cow::Borrowed(image));
        }

        let mut prepared = match downscale(image, &self.config.downscale) {
            Some(resized) => Cow::Owned(resized),
            None => Cow::Borrowed(image),
        };

        if self.config.white_balance != WhiteBalanceMode::Off {
            self.white_balance.correct(prepared.to_mut())?;
        }

        if self.config.exposure.enabled {
            self.exposure.normalize(prepared.to_mut());
        }

        Ok(prepared)
    }
}

/// Resize to about `target_pixels` when the image exceeds `max_pixels`
pub fn downscale(image: &RgbImage, config: &DownscaleConfig) -> Option<RgbImage> {
    let (width, height) = image.dimensions();
    let pixels = width as u64 * height as u64;
    if !config.enabled || pixels <= config.max_pixels as u64 {
        return None;
    }

    let factor = (config.target_pixels as f64 / pixels as f64).sqrt();
    let new_width = ((width as f64 * factor).round() as u32).max(1);
    let new_height = ((height as f64 * factor).round() as u32).max(1);

    debug!(width, height, new_width, new_height, "Downscaling image");
    Some(imageops::resize(image, new_width, new_height, FilterType::Triangle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_small_images_are_borrowed() {
        let image = RgbImage::from_pixel(40, 20, Rgb([120, 60, 30]));
        let prepared = Preprocessor::new(PreprocessingConfig::default())
            .prepare(&image)
            .unwrap();
        assert!(matches!(prepared, Cow::Borrowed(_)));
    }

    #[test]
    fn test_empty_image_skips_every_step() {
        let mut config = PreprocessingConfig {
            white_balance: WhiteBalanceMode::Paper,
            ..PreprocessingConfig::default()
        };
        config.exposure.enabled = true;

        let image = RgbImage::new(0, 0);
        let prepared = Preprocessor::new(config).prepare(&image).unwrap();
        assert!(matches!(prepared, Cow::Borrowed(_)));
    }

    #[test]
    fn test_downscale_keeps_aspect_ratio() {
        let config = DownscaleConfig {
            enabled: true,
            max_pixels: 1000,
            target_pixels: 500,
        };
        let image = RgbImage::from_pixel(100, 50, Rgb([10, 20, 30]));
        let resized = downscale(&image, &config).unwrap();
        assert_eq!(resized.dimensions(), (32, 16));
        assert_eq!(resized.get_pixel(5, 5).0, [10, 20, 30]);

        let disabled = DownscaleConfig { enabled: false, ..config };
        assert!(downscale(&image, &disabled).is_none());
    }

    #[test]
    fn test_steps_run_when_enabled() {
        let mut config = PreprocessingConfig::default();
        config.white_balance = WhiteBalanceMode::GrayWorld;
        config.exposure.enabled = true;
        config.exposure.contrast = 0.0;

        let image = RgbImage::from_pixel(10, 10, Rgb([200, 100, 100]));
        let prepared = Preprocessor::new(config).prepare(&image).unwrap();
        assert!(matches!(prepared, Cow::Owned(_)));
        let [r, g, b] = prepared.get_pixel(0, 0).0;
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert!((150..=180).contains(&r));
    }
}
