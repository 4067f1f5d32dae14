//! Color handling
//!
//! Color space conversions, the resistor color code table, robust
//! aggregation of sampled colors and nearest-reference classification.

pub mod analysis;
pub mod classifier;
pub mod code;
pub mod conversion;

pub use analysis::{ColorAggregator, ColorStats};
pub use classifier::{BandClassifier, Classification, ClassifiedBand};
pub use code::{ColorCode, ColorSpec, Tolerance, COLOR_TABLE};
pub use conversion::ColorConverter;
