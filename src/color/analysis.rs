//! Robust color aggregation
//!
//! Reduces the colors sampled across one band to a single representative:
//! - Outlier removal via per-channel percentile filtering
//! - Median lightness (resists glare and shadow at band edges)
//! - Mean chromaticity
//! - RMS spread around the representative

use palette::Lab;

use crate::color::ColorConverter;
use crate::constants::segmentation::{PERCENTILE_HIGH, PERCENTILE_LOW};

/// Aggregated color of a group of samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStats {
    /// Representative Lab color
    pub lab: Lab,
    /// RMS ΔE of the kept samples around `lab`
    pub spread: f32,
    /// Number of samples kept after outlier removal
    pub kept: usize,
}

/// Color aggregator implementing percentile-trimmed statistics
#[derive(Debug, Clone)]
pub struct ColorAggregator {
    converter: ColorConverter,
    percentile_low: f32,
    percentile_high: f32,
}

impl Default for ColorAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorAggregator {
    pub fn new() -> Self {
        Self::with_params(PERCENTILE_LOW, PERCENTILE_HIGH)
    }

    pub fn with_params(percentile_low: f32, percentile_high: f32) -> Self {
        Self {
            converter: ColorConverter::new(),
            percentile_low,
            percentile_high,
        }
    }

    /// Aggregate samples into one color; `None` when there are no samples
    pub fn aggregate(&self, samples: &[Lab]) -> Option<ColorStats> {
        let filtered = self.remove_outliers(samples);
        // The per-channel windows can exclude every sample; fall back to all of them.
        let kept = if filtered.is_empty() { samples.to_vec() } else { filtered };
        let lab = self.representative(&kept)?;
        let spread = self.spread(&kept, lab);

        Some(ColorStats {
            lab,
            spread,
            kept: kept.len(),
        })
    }

    /// Remove outliers using percentile filtering
    fn remove_outliers(&self, samples: &[Lab]) -> Vec<Lab> {
        if samples.is_empty() {
            return Vec::new();
        }

        let mut l_values: Vec<f32> = samples.iter().map(|p| p.l).collect();
        let mut a_values: Vec<f32> = samples.iter().map(|p| p.a).collect();
        let mut b_values: Vec<f32> = samples.iter().map(|p| p.b).collect();

        l_values.sort_by(f32::total_cmp);
        a_values.sort_by(f32::total_cmp);
        b_values.sort_by(f32::total_cmp);

        let last = samples.len() - 1;
        let low_idx = ((samples.len() as f32 * self.percentile_low / 100.0) as usize).min(last);
        let high_idx = ((samples.len() as f32 * self.percentile_high / 100.0) as usize).min(last);

        let (l_min, l_max) = (l_values[low_idx], l_values[high_idx]);
        let (a_min, a_max) = (a_values[low_idx], a_values[high_idx]);
        let (b_min, b_max) = (b_values[low_idx], b_values[high_idx]);

        samples
            .iter()
            .copied()
            .filter(|p| {
                p.l >= l_min && p.l <= l_max &&
                p.a >= a_min && p.a <= a_max &&
                p.b >= b_min && p.b <= b_max
            })
            .collect()
    }

    fn representative(&self, samples: &[Lab]) -> Option<Lab> {
        if samples.is_empty() {
            return None;
        }

        let mut l_values: Vec<f32> = samples.iter().map(|p| p.l).collect();
        l_values.sort_by(f32::total_cmp);
        let l_median = l_values[l_values.len() / 2];

        let count = samples.len() as f32;
        let a_mean = samples.iter().map(|p| p.a).sum::<f32>() / count;
        let b_mean = samples.iter().map(|p| p.b).sum::<f32>() / count;

        Some(Lab::new(l_median, a_mean, b_mean))
    }

    fn spread(&self, samples: &[Lab], representative: Lab) -> f32 {
        if samples.is_empty() {
            return 0.0;
        }

        let sum_squared: f32 = samples
            .iter()
            .map(|p| {
                let delta_e = self.converter.delta_e(*p, representative);
                delta_e * delta_e
            })
            .sum();

        (sum_squared / samples.len() as f32).sqrt()
    }
}
