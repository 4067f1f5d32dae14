//! Brightness and contrast normalization
//!
//! Brightness moves one level at a time until the mean of all channel values
//! falls inside the target window; a linear contrast stretch around the
//! midpoint follows.

use image::RgbImage;
use tracing::debug;

use crate::config::ExposureConfig;
use crate::constants::exposure::MAX_SHIFT_STEPS;

/// What the normalizer did to an image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExposureAdjustment {
    /// Net brightness shift in levels
    pub shift: i32,
    pub mean_before: f32,
    pub mean_after: f32,
}

/// Brightness/contrast normalizer
#[derive(Debug, Clone)]
pub struct ExposureNormalizer {
    config: ExposureConfig,
}

impl ExposureNormalizer {
    pub fn new(config: ExposureConfig) -> Self {
        Self { config }
    }

    /// Normalize exposure in place
    pub fn normalize(&self, image: &mut RgbImage) -> ExposureAdjustment {
        let histogram = histogram(image);
        let mean_before = shifted_mean(&histogram, 0);
        let shift = self.find_shift(&histogram);

        let gain = self.config.contrast / 127.0 + 1.0;
        let mut table = [0u8; 256];
        for (value, entry) in table.iter_mut().enumerate() {
            let shifted = (value as i32 + shift).clamp(0, 255) as f32;
            *entry = (shifted * gain - self.config.contrast)
                .round()
                .clamp(0.0, 255.0) as u8;
        }

        for pixel in image.pixels_mut() {
            for channel in pixel.0.iter_mut() {
                *channel = table[*channel as usize];
            }
        }

        let mean_after = shifted_mean(&histogram_of_table(&histogram, &table), 0);
        debug!(shift, mean_before, mean_after, "Normalized exposure");

        ExposureAdjustment {
            shift,
            mean_before,
            mean_after,
        }
    }

    /// Smallest shift that brings the mean into the brightness window
    fn find_shift(&self, histogram: &[u64; 256]) -> i32 {
        let (low, high) = (self.config.brightness_low, self.config.brightness_high);
        let mean = shifted_mean(histogram, 0);
        let step = if mean < low {
            1
        } else if mean > high {
            -1
        } else {
            return 0;
        };

        let mut shift = 0;
        for _ in 0..MAX_SHIFT_STEPS {
            shift += step;
            let mean = shifted_mean(histogram, shift);
            if (low..=high).contains(&mean) {
                break;
            }
        }
        shift
    }
}

/// Histogram over all channel values
fn histogram(image: &RgbImage) -> [u64; 256] {
    let mut counts = [0u64; 256];
    for value in image.as_raw() {
        counts[*value as usize] += 1;
    }
    counts
}

fn histogram_of_table(histogram: &[u64; 256], table: &[u8; 256]) -> [u64; 256] {
    let mut counts = [0u64; 256];
    for (value, count) in histogram.iter().enumerate() {
        counts[table[value] as usize] += count;
    }
    counts
}

/// Mean channel value after shifting every value by `shift` with clamping
fn shifted_mean(histogram: &[u64; 256], shift: i32) -> f32 {
    let total: u64 = histogram.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let sum: u64 = histogram
        .iter()
        .enumerate()
        .map(|(value, count)| (value as i32 + shift).clamp(0, 255) as u64 * count)
        .sum();
    sum as f32 / total as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn normalizer(contrast: f32) -> ExposureNormalizer {
        ExposureNormalizer::new(ExposureConfig {
            enabled: true,
            contrast,
            ..ExposureConfig::default()
        })
    }

    #[test]
    fn test_dark_image_is_brightened_to_window() {
        let mut image = RgbImage::from_pixel(8, 8, Rgb([100, 100, 100]));
        let adjustment = normalizer(0.0).normalize(&mut image);
        assert_eq!(adjustment.shift, 50);
        assert_eq!(adjustment.mean_before, 100.0);
        assert_eq!(image.get_pixel(0, 0).0, [150, 150, 150]);
    }

    #[test]
    fn test_bright_image_is_darkened_to_window() {
        let mut image = RgbImage::from_pixel(8, 8, Rgb([230, 200, 200]));
        let adjustment = normalizer(0.0).normalize(&mut image);
        assert_eq!(adjustment.shift, -30);
        assert!((adjustment.mean_after - 180.0).abs() < 1e-3);
    }

    #[test]
    fn test_image_in_window_is_not_shifted() {
        let mut image = RgbImage::from_pixel(8, 8, Rgb([160, 160, 160]));
        let adjustment = normalizer(0.0).normalize(&mut image);
        assert_eq!(adjustment.shift, 0);
        assert_eq!(image.get_pixel(0, 0).0, [160, 160, 160]);
    }

    #[test]
    fn test_contrast_stretch() {
        let mut image = RgbImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgb([127, 127, 127])
            } else {
                Rgb([190, 190, 190])
            }
        });
        // Mean 158.5 is already inside the window
        normalizer(75.0).normalize(&mut image);
        // 127 × (75/127 + 1) − 75 = 127
        assert_eq!(image.get_pixel(0, 0).0, [127, 127, 127]);
        assert_eq!(image.get_pixel(1, 0).0, [227, 227, 227]);
    }

    #[test]
    fn test_saturated_image_stops_after_step_limit() {
        let mut image = RgbImage::from_pixel(4, 4, Rgb([0, 0, 0]));
        let config = ExposureConfig {
            enabled: true,
            brightness_low: 300.0,
            brightness_high: 400.0,
            contrast: 0.0,
        };
        let adjustment = ExposureNormalizer::new(config).normalize(&mut image);
        assert_eq!(adjustment.shift, MAX_SHIFT_STEPS as i32);
        assert_eq!(image.get_pixel(0, 0).0, [255, 255, 255]);
    }
}
