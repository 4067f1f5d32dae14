//! Resistor body scanning and band detection
//!
//! This module turns pixels into bands: the sampler reads one color per
//! slice across the resistor body, the segmenter groups those colors into
//! discrete bands.

pub mod sampler;
pub mod segmenter;

pub use sampler::{ColorSampler, SampledPoint, Scan, ScanAxis};
pub use segmenter::{Band, BandSegmenter};
