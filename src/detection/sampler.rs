//! Color sampling along the resistor body
//!
//! The crop is cut into thin slices perpendicular to the body axis. Each
//! slice contributes one averaged color, taken from the foreground pixels in
//! its central core. Slices that are mostly background (paper, lead wires,
//! the gap beyond the body ends) are rejected.

use image::RgbImage;
use palette::{Lab, Srgb};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::ColorConverter;
use crate::config::{AxisSelection, BackgroundModel, SamplingConfig};
use crate::error::{ReaderError, Result};

/// Direction of the resistor body in the image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanAxis {
    /// Body runs left to right; slices are columns
    Horizontal,
    /// Body runs top to bottom; slices are rows
    Vertical,
}

impl ScanAxis {
    /// Resolve a configured axis against the image size
    pub fn resolve(selection: AxisSelection, width: u32, height: u32) -> Self {
        match selection {
            AxisSelection::Horizontal => ScanAxis::Horizontal,
            AxisSelection::Vertical => ScanAxis::Vertical,
            AxisSelection::Auto if height > width => ScanAxis::Vertical,
            AxisSelection::Auto => ScanAxis::Horizontal,
        }
    }

    /// (length along the axis, extent across it)
    fn extents(&self, image: &RgbImage) -> (u32, u32) {
        match self {
            ScanAxis::Horizontal => (image.width(), image.height()),
            ScanAxis::Vertical => (image.height(), image.width()),
        }
    }

    fn pixel(&self, image: &RgbImage, along: u32, across: u32) -> [u8; 3] {
        match self {
            ScanAxis::Horizontal => image.get_pixel(along, across).0,
            ScanAxis::Vertical => image.get_pixel(across, along).0,
        }
    }
}

/// One accepted slice
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampledPoint {
    /// Pixel index of the slice along the scan axis
    pub position: u32,
    /// Mean color of the slice's foreground pixels
    pub color: Srgb,
    pub lab: Lab,
    /// Foreground share of the slice core
    pub coverage: f32,
}

/// Sampler output for one image
#[derive(Debug, Clone)]
pub struct Scan {
    pub axis: ScanAxis,
    /// Image extent along the axis, in pixels
    pub length: u32,
    pub slice_step: u32,
    /// Median border color
    pub background: Srgb,
    /// Accepted slices in axis order
    pub points: Vec<SampledPoint>,
    /// Number of slices rejected as background
    pub rejected: usize,
}

impl Scan {
    /// Pixel span `[start, end)` covered by accepted slices
    pub fn body_span(&self) -> Option<(u32, u32)> {
        let first = self.points.first()?;
        let last = self.points.last()?;
        Some((first.position, last.position + self.slice_step))
    }
}

enum BackgroundTest {
    Delta { lab: Lab, delta_e: f32 },
    Bright { min_value: f32, max_saturation: f32 },
}

/// Color sampler
#[derive(Debug, Clone)]
pub struct ColorSampler {
    config: SamplingConfig,
    converter: ColorConverter,
}

impl ColorSampler {
    pub fn new(config: SamplingConfig) -> Self {
        Self {
            config,
            converter: ColorConverter::new(),
        }
    }

    /// Sample colors along the resistor body
    ///
    /// # Errors
    ///
    /// Returns `ReaderError::EmptyScan` when fewer than `min_valid_slices`
    /// slices contain enough foreground to be resistor body.
    pub fn sample(&self, image: &RgbImage) -> Result<Scan> {
        let axis = ScanAxis::resolve(self.config.axis, image.width(), image.height());
        let (length, across) = axis.extents(image);
        let minimum = self.config.min_valid_slices;

        if length == 0 || across == 0 {
            return Err(ReaderError::EmptyScan { valid: 0, minimum });
        }

        let background = border_median(image);
        let test = match self.config.background {
            BackgroundModel::BorderMedian { delta_e } => BackgroundTest::Delta {
                lab: self.converter.rgb_to_lab(background[0], background[1], background[2]),
                delta_e,
            },
            BackgroundModel::Brightness { min_value, max_saturation } => BackgroundTest::Bright {
                min_value,
                max_saturation,
            },
        };

        let (core_start, core_end) = core_range(across, self.config.core_fraction);
        let core_len = (core_end - core_start) as f32;
        let step = self.config.slice_step.max(1);

        let mut points = Vec::new();
        let mut rejected = 0;

        for along in (0..length).step_by(step as usize) {
            let mut sum = [0u64; 3];
            let mut count = 0u32;

            for offset in core_start..core_end {
                let rgb = axis.pixel(image, along, offset);
                if self.is_background(&test, rgb) {
                    continue;
                }
                for (total, value) in sum.iter_mut().zip(rgb) {
                    *total += value as u64;
                }
                count += 1;
            }

            let coverage = count as f32 / core_len;
            if count == 0 || coverage < self.config.min_coverage {
                rejected += 1;
                continue;
            }

            let mean = sum.map(|total| total as f32 / count as f32 / 255.0);
            let color = Srgb::new(mean[0], mean[1], mean[2]);
            points.push(SampledPoint {
                position: along,
                color,
                lab: self.converter.srgb_to_lab(color),
                coverage,
            });
        }

        debug!(
            ?axis,
            length,
            valid = points.len(),
            rejected,
            background = %self.converter.srgb_to_hex(rgb_to_srgb(background)),
            "Sampled resistor body"
        );

        if points.len() < minimum {
            return Err(ReaderError::EmptyScan {
                valid: points.len(),
                minimum,
            });
        }

        Ok(Scan {
            axis,
            length,
            slice_step: step,
            background: rgb_to_srgb(background),
            points,
            rejected,
        })
    }

    fn is_background(&self, test: &BackgroundTest, rgb: [u8; 3]) -> bool {
        match test {
            BackgroundTest::Delta { lab, delta_e } => {
                let pixel = self.converter.rgb_to_lab(rgb[0], rgb[1], rgb[2]);
                self.converter.delta_e(pixel, *lab) <= *delta_e
            }
            BackgroundTest::Bright { min_value, max_saturation } => {
                let hsv = self.converter.rgb_to_hsv(rgb[0], rgb[1], rgb[2]);
                hsv.value >= *min_value && hsv.saturation <= *max_saturation
            }
        }
    }
}

fn rgb_to_srgb(rgb: [u8; 3]) -> Srgb {
    Srgb::new(
        rgb[0] as f32 / 255.0,
        rgb[1] as f32 / 255.0,
        rgb[2] as f32 / 255.0,
    )
}

/// Central `[start, end)` range of a slice, never empty
fn core_range(across: u32, core_fraction: f32) -> (u32, u32) {
    let margin = (across as f32 * (1.0 - core_fraction.clamp(0.0, 1.0)) / 2.0).round() as u32;
    let start = margin.min(across.saturating_sub(1));
    let end = across.saturating_sub(margin).max(start + 1);
    (start, end)
}

/// Per-channel median of the image border pixels
pub(crate) fn border_median(image: &RgbImage) -> [u8; 3] {
    let (width, height) = image.dimensions();
    let mut channels: [Vec<u8>; 3] = Default::default();

    let mut push = |x: u32, y: u32| {
        for (channel, value) in channels.iter_mut().zip(image.get_pixel(x, y).0) {
            channel.push(value);
        }
    };

    for x in 0..width {
        push(x, 0);
        push(x, height - 1);
    }
    for y in 0..height {
        push(0, y);
        push(width - 1, y);
    }

    channels.map(|mut values| {
        values.sort_unstable();
        values.get(values.len() / 2).copied().unwrap_or(0)
    })
}
