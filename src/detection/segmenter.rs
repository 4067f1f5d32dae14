//! Band segmentation
//!
//! Groups consecutive sampled colors into runs, then turns runs into bands:
//! 1. Runs split only after several consecutive dissimilar samples, so a
//!    single noisy slice never opens a band. Slices blended from two colors
//!    at the boundary are left out of the new band
//! 2. Runs narrower than the minimum band width (shadows, color fringes at
//!    band edges) are dropped
//! 3. Neighbors left with matching colors across a small gap are merged
//! 4. The color repeated between the bands, the resistor body, is removed

use palette::Lab;
use tracing::debug;

use crate::color::{ColorAggregator, ColorConverter};
use crate::config::SegmentationConfig;
use crate::constants::segmentation::{MAX_BANDS, MIN_BANDS};
use crate::detection::sampler::{SampledPoint, Scan};
use crate::error::{ReaderError, Result};

/// A contiguous run of slices collapsed into one color
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    /// Ordinal position along the body, starting at 0
    pub index: usize,
    /// First slice position (inclusive)
    pub start: u32,
    /// Position after the last slice (exclusive)
    pub end: u32,
    /// Representative color
    pub color: Lab,
    /// RMS ΔE of the band's samples around `color`
    pub spread: f32,
    /// Number of sampled slices in the band
    pub samples: usize,
}

impl Band {
    pub fn width(&self) -> u32 {
        self.end - self.start
    }
}

/// A run under construction, or finished but not yet filtered
#[derive(Debug, Clone)]
struct Run {
    start: u32,
    end: u32,
    samples: Vec<Lab>,
    mean: Lab,
}

impl Run {
    fn new(point: &SampledPoint, step: u32) -> Self {
        Self {
            start: point.position,
            end: point.position + step,
            samples: vec![point.lab],
            mean: point.lab,
        }
    }

    fn push(&mut self, point: &SampledPoint, step: u32) {
        self.end = point.position + step;
        self.samples.push(point.lab);
        let count = self.samples.len() as f32;
        self.mean = Lab::new(
            self.mean.l + (point.lab.l - self.mean.l) / count,
            self.mean.a + (point.lab.a - self.mean.a) / count,
            self.mean.b + (point.lab.b - self.mean.b) / count,
        );
    }

    fn absorb(&mut self, other: Run) {
        self.end = other.end;
        self.samples.extend(other.samples);
        self.recompute_mean();
    }

    fn recompute_mean(&mut self) {
        let count = self.samples.len().max(1) as f32;
        let (l, a, b) = self.samples.iter().fold((0.0, 0.0, 0.0), |acc, lab| {
            (acc.0 + lab.l, acc.1 + lab.a, acc.2 + lab.b)
        });
        self.mean = Lab::new(l / count, a / count, b / count);
    }

    fn width(&self) -> u32 {
        self.end - self.start
    }
}

fn run_from(points: &[&SampledPoint], step: u32) -> Option<Run> {
    let (first, rest) = points.split_first()?;
    let mut run = Run::new(first, step);
    for point in rest {
        run.push(point, step);
    }
    Some(run)
}

/// Band segmenter
#[derive(Debug, Clone)]
pub struct BandSegmenter {
    config: SegmentationConfig,
    converter: ColorConverter,
    aggregator: ColorAggregator,
}

impl BandSegmenter {
    pub fn new(config: SegmentationConfig) -> Self {
        let aggregator = ColorAggregator::with_params(config.percentile_low, config.percentile_high);
        Self {
            config,
            converter: ColorConverter::new(),
            aggregator,
        }
    }

    /// Split a scan into ordered, non-overlapping bands
    ///
    /// # Errors
    ///
    /// Returns `ReaderError::InsufficientBands` unless 3 to 6 bands remain.
    pub fn segment(&self, scan: &Scan) -> Result<Vec<Band>> {
        let step = scan.slice_step.max(1);
        let min_width = self.min_band_width(scan.length);

        let runs = self.group_runs(&scan.points, step);
        let total_runs = runs.len();

        let wide: Vec<Run> = runs.into_iter().filter(|run| run.width() >= min_width).collect();
        let merged = self.merge_neighbors(wide, min_width);
        let merged_count = merged.len();
        let kept = if self.config.remove_body {
            self.remove_body(merged)
        } else {
            merged
        };

        debug!(
            runs = total_runs,
            merged = merged_count,
            bands = kept.len(),
            min_width,
            "Segmented bands"
        );

        if !(MIN_BANDS..=MAX_BANDS).contains(&kept.len()) {
            return Err(ReaderError::InsufficientBands { found: kept.len() });
        }

        let bands = kept
            .into_iter()
            .enumerate()
            .map(|(index, run)| {
                let (color, spread) = match self.aggregator.aggregate(&run.samples) {
                    Some(stats) => (stats.lab, stats.spread),
                    None => (run.mean, 0.0),
                };
                Band {
                    index,
                    start: run.start,
                    end: run.end,
                    color,
                    spread,
                    samples: run.samples.len(),
                }
            })
            .collect();

        Ok(bands)
    }

    /// Minimum band width in pixels for a scan of `length` pixels
    pub fn min_band_width(&self, length: u32) -> u32 {
        let relative = (length as f32 * self.config.min_band_width_fraction).ceil() as u32;
        self.config.min_band_width.max(relative)
    }

    fn similar(&self, a: Lab, b: Lab) -> bool {
        self.converter.delta_e(a, b) <= self.config.merge_delta_e
    }

    /// Trimmed color of a run, robust to edge slices it picked up
    fn run_color(&self, run: &Run) -> Lab {
        self.aggregator
            .aggregate(&run.samples)
            .map_or(run.mean, |stats| stats.lab)
    }

    /// Group points into runs with a hysteresis of `boundary_run` points
    fn group_runs(&self, points: &[SampledPoint], step: u32) -> Vec<Run> {
        let mut runs = Vec::new();
        let mut current: Option<Run> = None;
        let mut pending: Vec<&SampledPoint> = Vec::new();

        for point in points {
            let Some(run) = current.as_mut() else {
                current = Some(Run::new(point, step));
                continue;
            };

            let last_position = pending
                .last()
                .map(|p| p.position)
                .unwrap_or(run.end - step);

            if point.position > last_position + step {
                // Rejected slices in between: always a boundary.
                let tail = run_from(&pending, step);
                pending.clear();
                runs.extend(current.replace(Run::new(point, step)));
                runs.extend(tail);
                continue;
            }

            if self.similar(point.lab, run.mean) {
                for held in pending.drain(..) {
                    run.push(held, step);
                }
                run.push(point, step);
                continue;
            }

            pending.push(point);
            if pending.len() >= self.config.boundary_run {
                // Held slices unlike the new color are blended edges; they seed nothing.
                let seed: Vec<&SampledPoint> = pending
                    .drain(..)
                    .filter(|held| self.similar(held.lab, point.lab))
                    .collect();
                runs.extend(current.take());
                current = run_from(&seed, step);
            }
        }

        runs.extend(current);
        runs.extend(run_from(&pending, step));
        runs
    }

    /// Merge adjacent runs of the same color separated by less than a band
    fn merge_neighbors(&self, runs: Vec<Run>, max_gap: u32) -> Vec<Run> {
        let mut merged: Vec<Run> = Vec::with_capacity(runs.len());

        for run in runs {
            match merged.last_mut() {
                Some(previous)
                    if run.start.saturating_sub(previous.end) <= max_gap
                        && self.similar(self.run_color(previous), self.run_color(&run)) =>
                {
                    previous.absorb(run);
                }
                _ => merged.push(run),
            }
        }

        merged
    }

    /// Drop the most repeated color once it appears `min_body_segments` times
    fn remove_body(&self, runs: Vec<Run>) -> Vec<Run> {
        // (representative color, run indices, total width)
        let mut clusters: Vec<(Lab, Vec<usize>, u32)> = Vec::new();

        for (index, run) in runs.iter().enumerate() {
            let run_color = self.run_color(run);
            match clusters
                .iter_mut()
                .find(|(color, _, _)| self.similar(*color, run_color))
            {
                Some((_, members, width)) => {
                    members.push(index);
                    *width += run.width();
                }
                None => clusters.push((run_color, vec![index], run.width())),
            }
        }

        let body = clusters
            .iter()
            .filter(|(_, members, _)| members.len() >= self.config.min_body_segments)
            .max_by(|a, b| a.1.len().cmp(&b.1.len()).then(a.2.cmp(&b.2)));

        let Some((color, members, width)) = body else {
            return runs;
        };

        debug!(
            body = %self.converter.lab_to_hex(*color),
            segments = members.len(),
            width,
            "Removing resistor body color"
        );

        runs.into_iter()
            .enumerate()
            .filter(|(index, _)| !members.contains(index))
            .map(|(_, run)| run)
            .collect()
    }
}
