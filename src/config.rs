//! Configuration structures for the resistor reading pipeline.
//!
//! This module defines all tunable parameters, organized into one group per
//! pipeline stage. Every threshold has a default in [`crate::constants`].
//!
//! # Configuration Loading
//!
//! Configuration can be loaded from JSON files or constructed programmatically:
//!
//! ```no_run
//! use resistor_reader::PipelineConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = PipelineConfig::from_json_file(Path::new("reader.json"))?;
//!
//! // Or use defaults
//! let config = PipelineConfig::default();
//! # Ok::<(), resistor_reader::ReaderError>(())
//! ```
//!
//! Sections missing from a file fall back to their defaults, so a file only
//! needs to name the thresholds it changes.
//!
//! # Configuration Sections
//!
//! - [`PreprocessingConfig`]: downscaling, white balance, exposure
//! - [`SamplingConfig`]: scan axis and background rejection
//! - [`SegmentationConfig`]: band grouping and noise filtering
//! - [`ClassificationConfig`]: reference color overrides
//! - [`DecodingConfig`]: plausible value range and orientation resolution

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::ColorCode;
use crate::constants::{classification, decoding, exposure, performance, sampling, segmentation};
use crate::error::{ReaderError, Result};

/// Complete pipeline configuration for resistor reading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub preprocessing: PreprocessingConfig,
    pub sampling: SamplingConfig,
    pub segmentation: SegmentationConfig,
    pub classification: ClassificationConfig,
    pub decoding: DecodingConfig,
}

/// Image adjustments applied before sampling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessingConfig {
    /// Shrink large photographs before scanning
    pub downscale: DownscaleConfig,

    pub white_balance: WhiteBalanceMode,

    /// Brightness and contrast normalization
    pub exposure: ExposureConfig,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            downscale: DownscaleConfig::default(),
            white_balance: WhiteBalanceMode::Off,
            exposure: ExposureConfig::default(),
        }
    }
}

/// White balance correction applied before sampling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WhiteBalanceMode {
    #[default]
    Off,
    /// Scale channels so the whole image averages to gray
    GrayWorld,
    /// Scale channels so the paper around the resistor is neutral
    Paper,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownscaleConfig {
    pub enabled: bool,

    /// Images with more pixels than this are resized
    pub max_pixels: u32,

    /// Approximate pixel count after resizing
    pub target_pixels: u32,
}

impl Default for DownscaleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_pixels: performance::MAX_PROCESSING_PIXELS,
            target_pixels: performance::DOWNSCALE_TARGET_PIXELS,
        }
    }
}

/// Brightness/contrast normalization parameters.
///
/// Brightness is shifted one level at a time until the image mean falls
/// inside `[brightness_low, brightness_high]`, then contrast is stretched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExposureConfig {
    pub enabled: bool,
    pub brightness_low: f32,
    pub brightness_high: f32,
    pub contrast: f32,
}

impl Default for ExposureConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            brightness_low: exposure::BRIGHTNESS_LOW,
            brightness_high: exposure::BRIGHTNESS_HIGH,
            contrast: exposure::CONTRAST,
        }
    }
}

/// Which image direction runs along the resistor body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisSelection {
    /// Use the longer image dimension
    #[default]
    Auto,
    Horizontal,
    Vertical,
}

/// How background pixels are told apart from the resistor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum BackgroundModel {
    /// Background is the median border color; foreground differs by more than `delta_e`
    BorderMedian { delta_e: f32 },

    /// Background is bright, unsaturated paper
    Brightness { min_value: f32, max_saturation: f32 },
}

impl Default for BackgroundModel {
    fn default() -> Self {
        BackgroundModel::BorderMedian {
            delta_e: sampling::BACKGROUND_DELTA_E,
        }
    }
}

/// Color sampler parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub axis: AxisSelection,

    /// Central fraction (0.0-1.0] of each slice that is averaged
    pub core_fraction: f32,

    /// Pixels between consecutive slices
    pub slice_step: u32,

    pub background: BackgroundModel,

    /// Minimum foreground fraction (0.0-1.0] for a slice to be kept
    pub min_coverage: f32,

    /// Minimum number of kept slices
    pub min_valid_slices: usize,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            axis: AxisSelection::Auto,
            core_fraction: sampling::CORE_FRACTION,
            slice_step: sampling::SLICE_STEP,
            background: BackgroundModel::default(),
            min_coverage: sampling::MIN_COVERAGE,
            min_valid_slices: sampling::MIN_VALID_SLICES,
        }
    }
}

/// Band segmenter parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// ΔE76 under which neighboring colors are the same band
    pub merge_delta_e: f32,

    /// Consecutive dissimilar points before a boundary is committed
    pub boundary_run: usize,

    /// Minimum band width in pixels
    pub min_band_width: u32,

    /// Minimum band width relative to the scanned length
    pub min_band_width_fraction: f32,

    /// Drop the most repeated color as the resistor body
    pub remove_body: bool,

    /// Repetitions needed before a color is taken to be the body
    pub min_body_segments: usize,

    /// Percentile window (0.0-100.0) kept when aggregating band colors
    pub percentile_low: f32,
    pub percentile_high: f32,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            merge_delta_e: segmentation::MERGE_DELTA_E,
            boundary_run: segmentation::BOUNDARY_RUN,
            min_band_width: segmentation::MIN_BAND_WIDTH,
            min_band_width_fraction: segmentation::MIN_BAND_WIDTH_FRACTION,
            remove_body: true,
            min_body_segments: segmentation::MIN_BODY_SEGMENTS,
            percentile_low: segmentation::PERCENTILE_LOW,
            percentile_high: segmentation::PERCENTILE_HIGH,
        }
    }
}

/// Band classifier parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Bands below this confidence are logged as doubtful
    pub low_confidence: f32,

    /// Replacement reference colors, e.g. measured under the user's lighting
    pub reference_colors: Vec<ReferenceColor>,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            low_confidence: classification::LOW_CONFIDENCE_THRESHOLD,
            reference_colors: Vec::new(),
        }
    }
}

/// Reference sRGB color for one color code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceColor {
    pub code: ColorCode,
    pub rgb: [u8; 3],
}

/// Value decoder parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodingConfig {
    /// Plausible resistance range in ohms
    pub min_ohms: f64,
    pub max_ohms: f64,

    /// Relative difference above which tied orientations are ambiguous
    pub ambiguity_threshold: f64,

    /// Use band placement on the body to break orientation ties
    pub use_margin_hint: bool,

    /// Margin ratio that counts as a placement hint
    pub margin_hint_ratio: f32,
}

impl Default for DecodingConfig {
    fn default() -> Self {
        Self {
            min_ohms: decoding::MIN_OHMS,
            max_ohms: decoding::MAX_OHMS,
            ambiguity_threshold: decoding::AMBIGUITY_RELATIVE_DIFFERENCE,
            use_margin_hint: true,
            margin_hint_ratio: decoding::MARGIN_HINT_RATIO,
        }
    }
}

fn check(ok: bool, parameter: &str, value: impl ToString) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(ReaderError::invalid_parameter(parameter, value))
    }
}

fn unit_interval(value: f32) -> bool {
    value > 0.0 && value <= 1.0
}

impl PipelineConfig {
    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ReaderError::config(format!("Failed to read {}", path.display()), e)
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            ReaderError::config(format!("Failed to parse {}", path.display()), e)
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ReaderError::config("Failed to serialize configuration", e))?;
        std::fs::write(path, json).map_err(|e| {
            ReaderError::config(format!("Failed to write {}", path.display()), e)
        })?;
        Ok(())
    }

    /// Reject parameter combinations the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        let pre = &self.preprocessing;
        check(pre.downscale.max_pixels > 0, "preprocessing.downscale.max_pixels", pre.downscale.max_pixels)?;
        check(
            pre.downscale.target_pixels > 0 && pre.downscale.target_pixels <= pre.downscale.max_pixels,
            "preprocessing.downscale.target_pixels",
            pre.downscale.target_pixels,
        )?;
        let exp = &pre.exposure;
        check(
            (0.0..=255.0).contains(&exp.brightness_low)
                && (0.0..=255.0).contains(&exp.brightness_high)
                && exp.brightness_low < exp.brightness_high,
            "preprocessing.exposure.brightness_low",
            exp.brightness_low,
        )?;
        check(
            (0.0..127.0).contains(&exp.contrast),
            "preprocessing.exposure.contrast",
            exp.contrast,
        )?;

        let s = &self.sampling;
        check(unit_interval(s.core_fraction), "sampling.core_fraction", s.core_fraction)?;
        check(s.slice_step > 0, "sampling.slice_step", s.slice_step)?;
        check(unit_interval(s.min_coverage), "sampling.min_coverage", s.min_coverage)?;
        check(s.min_valid_slices > 0, "sampling.min_valid_slices", s.min_valid_slices)?;
        match s.background {
            BackgroundModel::BorderMedian { delta_e } => {
                check(delta_e > 0.0, "sampling.background.delta_e", delta_e)?
            }
            BackgroundModel::Brightness { min_value, max_saturation } => {
                check(unit_interval(min_value), "sampling.background.min_value", min_value)?;
                check(
                    (0.0..=1.0).contains(&max_saturation),
                    "sampling.background.max_saturation",
                    max_saturation,
                )?;
            }
        }

        let seg = &self.segmentation;
        check(seg.merge_delta_e > 0.0, "segmentation.merge_delta_e", seg.merge_delta_e)?;
        check(seg.boundary_run > 0, "segmentation.boundary_run", seg.boundary_run)?;
        check(seg.min_band_width > 0, "segmentation.min_band_width", seg.min_band_width)?;
        check(
            (0.0..1.0).contains(&seg.min_band_width_fraction),
            "segmentation.min_band_width_fraction",
            seg.min_band_width_fraction,
        )?;
        check(seg.min_body_segments >= 2, "segmentation.min_body_segments", seg.min_body_segments)?;
        check(
            seg.percentile_low >= 0.0
                && seg.percentile_high <= 100.0
                && seg.percentile_low <= seg.percentile_high,
            "segmentation.percentile_low",
            seg.percentile_low,
        )?;

        let class = &self.classification;
        check(
            (0.0..=1.0).contains(&class.low_confidence),
            "classification.low_confidence",
            class.low_confidence,
        )?;
        for reference in &class.reference_colors {
            check(
                reference.code != ColorCode::None,
                "classification.reference_colors.code",
                reference.code,
            )?;
        }

        let dec = &self.decoding;
        check(dec.min_ohms >= 0.0, "decoding.min_ohms", dec.min_ohms)?;
        check(dec.max_ohms > dec.min_ohms, "decoding.max_ohms", dec.max_ohms)?;
        check(dec.ambiguity_threshold >= 0.0, "decoding.ambiguity_threshold", dec.ambiguity_threshold)?;
        check(dec.margin_hint_ratio >= 1.0, "decoding.margin_hint_ratio", dec.margin_hint_ratio)?;

        Ok(())
    }
}
