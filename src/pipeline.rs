//! The decode pipeline
//!
//! `ResistorReader` wires the stages together: load, preprocess, sample,
//! segment, classify, decode. The first failing stage ends the call.

use std::path::Path;

use image::RgbImage;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::calibration::Preprocessor;
use crate::color::{BandClassifier, ClassifiedBand, ColorCode, ColorConverter};
use crate::config::PipelineConfig;
use crate::decode::{Orientation, OrientationHint, ResistorReading, ValueDecoder};
use crate::detection::{BandSegmenter, ColorSampler, ScanAxis};
use crate::error::Result;
use crate::image_loader::load_image;
use crate::timing::StageTimings;

/// One detected band as it appears in a trace
#[derive(Debug, Clone, Serialize)]
pub struct BandSummary {
    pub index: usize,
    pub start: u32,
    pub end: u32,
    pub code: ColorCode,
    pub hex: String,
    /// ΔE76 to the matched reference color
    pub distance: f32,
    pub confidence: f32,
    /// RMS ΔE of the band's samples
    pub spread: f32,
}

/// A reading plus the intermediate results that produced it
#[derive(Debug, Clone, Serialize)]
pub struct DecodeTrace {
    pub reading: ResistorReading,
    pub orientation: Orientation,
    pub hint: OrientationHint,
    pub axis: ScanAxis,
    /// Size of the image after preprocessing
    pub width: u32,
    pub height: u32,
    pub background_hex: String,
    pub sampled_points: usize,
    pub rejected_slices: usize,
    /// Bands in scan order
    pub bands: Vec<BandSummary>,
    pub timings: StageTimings,
}

/// Reads resistor values from images
///
/// Holds only immutable configuration and lookup tables; one instance can
/// serve many threads.
#[derive(Debug, Clone)]
pub struct ResistorReader {
    config: PipelineConfig,
    preprocessor: Preprocessor,
    sampler: ColorSampler,
    segmenter: BandSegmenter,
    classifier: BandClassifier,
    decoder: ValueDecoder,
    converter: ColorConverter,
}

impl ResistorReader {
    /// Build a reader from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns `ReaderError::InvalidParameter` for out-of-range settings.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            preprocessor: Preprocessor::new(config.preprocessing.clone()),
            sampler: ColorSampler::new(config.sampling.clone()),
            segmenter: BandSegmenter::new(config.segmentation.clone()),
            classifier: BandClassifier::from_config(&config.classification),
            decoder: ValueDecoder::new(config.decoding.clone()),
            converter: ColorConverter::new(),
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Decode the resistor in an image file
    ///
    /// Every failure is wrapped in `ReaderError::InFile` with the path.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn read_file(&self, path: &Path) -> Result<ResistorReading> {
        self.read_file_traced(path).map(|trace| trace.reading)
    }

    /// Like [`read_file`](Self::read_file), keeping intermediate results
    pub fn read_file_traced(&self, path: &Path) -> Result<DecodeTrace> {
        let mut timings = StageTimings::new();
        let traced = timings
            .time("load", || load_image(path))
            .and_then(|image| self.run(&image, timings));

        traced.map_err(|e| {
            debug!(path = %path.display(), error = %e, "Decode failed");
            e.in_file(path)
        })
    }

    /// Decode the resistor in an in-memory image
    pub fn read_image(&self, image: &RgbImage) -> Result<ResistorReading> {
        self.read_image_traced(image).map(|trace| trace.reading)
    }

    pub fn read_image_traced(&self, image: &RgbImage) -> Result<DecodeTrace> {
        self.run(image, StageTimings::new())
    }

    fn run(&self, image: &RgbImage, mut timings: StageTimings) -> Result<DecodeTrace> {
        let prepared = timings.time("preprocess", || self.preprocessor.prepare(image))?;
        let scan = timings.time("sample", || self.sampler.sample(&prepared))?;
        let bands = timings.time("segment", || self.segmenter.segment(&scan))?;

        let hint = OrientationHint::from_body(
            &bands,
            scan.body_span(),
            self.config.decoding.margin_hint_ratio,
        );
        let classified = timings.time("classify", || self.classifier.classify_bands(bands));
        self.warn_low_confidence(&classified);

        let decoded = timings.time("decode", || self.decoder.decode_bands(&classified, hint))?;

        info!(
            reading = %decoded.reading,
            bands = decoded.reading.band_count,
            confidence = decoded.reading.confidence,
            orientation = ?decoded.orientation,
            elapsed_ms = timings.total_duration().as_secs_f64() * 1000.0,
            "Read resistor"
        );

        Ok(DecodeTrace {
            reading: decoded.reading,
            orientation: decoded.orientation,
            hint,
            axis: scan.axis,
            width: prepared.width(),
            height: prepared.height(),
            background_hex: self.converter.srgb_to_hex(scan.background),
            sampled_points: scan.points.len(),
            rejected_slices: scan.rejected,
            bands: classified.iter().map(|band| self.summarize(band)).collect(),
            timings,
        })
    }

    fn warn_low_confidence(&self, bands: &[ClassifiedBand]) {
        let threshold = self.config.classification.low_confidence;
        for band in bands.iter().filter(|band| band.confidence < threshold) {
            warn!(
                index = band.band.index,
                code = %band.code,
                distance = band.distance,
                confidence = band.confidence,
                "Low confidence band classification"
            );
        }
    }

    fn summarize(&self, band: &ClassifiedBand) -> BandSummary {
        BandSummary {
            index: band.band.index,
            start: band.band.start,
            end: band.band.end,
            code: band.code,
            hex: self.converter.lab_to_hex(band.band.color),
            distance: band.distance,
            confidence: band.confidence,
            spread: band.band.spread,
        }
    }
}
