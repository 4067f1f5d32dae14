//! # Resistor Reader
//!
//! Reads the nominal resistance and tolerance of a through-hole resistor
//! from a cropped photograph of its color bands.
//!
//! The decode pipeline:
//! - Loads and optionally normalizes the image (downscale, white balance, exposure)
//! - Samples one color per slice across the resistor body
//! - Groups the samples into bands and drops the body color
//! - Classifies each band to the nearest color code
//! - Resolves reading direction and applies color-code arithmetic
//!
//! ## Example
//!
//! ```rust,no_run
//! use resistor_reader::read_resistor;
//! use std::path::Path;
//!
//! let reading = read_resistor(Path::new("resistor.jpg"))?;
//! println!("{} ({})", reading, reading.compact());
//! # Ok::<(), resistor_reader::ReaderError>(())
//! ```

use std::path::Path;

pub mod calibration;
pub mod color;
pub mod config;
pub mod constants;
pub mod decode;
pub mod detection;
pub mod error;
pub mod image_loader;
pub mod logger;
pub mod pipeline;
pub mod timing;

pub use color::{BandClassifier, ColorCode, Tolerance};
pub use config::PipelineConfig;
pub use decode::{encode, BandLayout, ResistorReading, ValueDecoder};
pub use error::{ReaderError, Result};
pub use pipeline::{DecodeTrace, ResistorReader};

/// Read a resistor from an image file with the default configuration
///
/// # Errors
///
/// Returns `ReaderError::InFile` wrapping the failing stage:
/// - `Decode` if the image cannot be opened or decoded
/// - `EmptyScan` if no resistor body is found
/// - `InsufficientBands` if fewer than 3 or more than 6 bands are found
/// - `AmbiguousOrientation` if both reading directions are equally plausible
/// - `UnreadableBands` if the colors form no valid code
pub fn read_resistor(image_path: &Path) -> Result<ResistorReading> {
    ResistorReader::new(PipelineConfig::default())?.read_file(image_path)
}

/// Like [`read_resistor`], returning the intermediate results as well
pub fn read_resistor_debug(image_path: &Path) -> Result<DecodeTrace> {
    ResistorReader::new(PipelineConfig::default())?.read_file_traced(image_path)
}
