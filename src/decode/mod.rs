//! From band colors to a resistance value
//!
//! The decoder applies color-code arithmetic and resolves which end of the
//! resistor is read first; the encoder goes the other way.

pub mod decoder;
pub mod encoder;
pub mod reading;
pub mod series;

pub use decoder::{DecodedReading, Orientation, OrientationHint, ValueDecoder};
pub use encoder::{encode, BandLayout};
pub use reading::{format_compact_ohms, format_ohms, ResistorReading};
pub use series::PreferredSeries;
