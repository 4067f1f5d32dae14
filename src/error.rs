//! Error types for the resistor_reader library

use std::path::PathBuf;

use thiserror::Error;

use crate::color::ColorCode;
use crate::decode::ResistorReading;

/// Result type alias for resistor_reader operations
pub type Result<T> = std::result::Result<T, ReaderError>;

/// Every way a decode call can fail
#[derive(Error, Debug)]
pub enum ReaderError {
    /// Image file could not be opened or decoded
    #[error("Failed to decode image: {message}")]
    Decode {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Too few slices of the crop look like a resistor body
    #[error("No resistor body found: {valid} valid slices (minimum {minimum})")]
    EmptyScan { valid: usize, minimum: usize },

    /// Segmentation produced a band count no resistor uses
    #[error("Found {found} color bands, expected between 3 and 6")]
    InsufficientBands { found: usize },

    /// Both reading directions are equally plausible but disagree
    #[error("Band orientation is ambiguous: {forward} or {reverse}")]
    AmbiguousOrientation {
        forward: Box<ResistorReading>,
        reverse: Box<ResistorReading>,
    },

    /// The band colors do not form a valid code in either direction
    #[error("Band colors {} do not form a valid resistor code", format_codes(.bands))]
    UnreadableBands { bands: Vec<ColorCode> },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Configuration file could not be read or written
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A stage failure while reading a specific file
    #[error("{}: {source}", .path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<ReaderError>,
    },
}

impl ReaderError {
    /// Create a decode error with context
    pub fn decode<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Decode {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error with context
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn invalid_parameter(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Attach the path of the file being read
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        Self::InFile {
            path: path.into(),
            source: Box::new(self),
        }
    }

    /// The underlying stage error, without any `InFile` wrapping
    pub fn root(&self) -> &ReaderError {
        match self {
            ReaderError::InFile { source, .. } => source.root(),
            other => other,
        }
    }

    /// Check if this error can be fixed by recapturing or confirming
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.root(),
            ReaderError::EmptyScan { .. }
                | ReaderError::InsufficientBands { .. }
                | ReaderError::AmbiguousOrientation { .. }
                | ReaderError::UnreadableBands { .. }
        )
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self.root() {
            ReaderError::Decode { .. } => {
                "Could not open the image. Please check the file format and try again.".to_string()
            }
            ReaderError::EmptyScan { .. } => {
                "No resistor found in the picture. Please crop tightly around the resistor body."
                    .to_string()
            }
            ReaderError::InsufficientBands { found } => format!(
                "Could only make out {} color bands. Please retake the photo in better light.",
                found
            ),
            ReaderError::AmbiguousOrientation { forward, reverse } => format!(
                "The resistor could be read either way: {} or {}. Please confirm which end is first.",
                forward, reverse
            ),
            ReaderError::UnreadableBands { .. } => {
                "The band colors did not make sense as a resistor code. Please retake the photo in better light."
                    .to_string()
            }
            _ => "Reading failed. Please try with a different image.".to_string(),
        }
    }
}

fn format_codes(bands: &[ColorCode]) -> String {
    bands
        .iter()
        .map(|code| code.name())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_file_wraps_and_root_unwraps() {
        let err = ReaderError::InsufficientBands { found: 2 }.in_file("photo.png");
        assert!(err.to_string().starts_with("photo.png: "));
        assert!(matches!(err.root(), ReaderError::InsufficientBands { found: 2 }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_decode_is_not_recoverable() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = ReaderError::decode("Failed to open image file", io);
        assert!(!err.is_recoverable());
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.user_message().contains("Could not open"));
    }

    #[test]
    fn test_unreadable_bands_lists_colors() {
        let err = ReaderError::UnreadableBands {
            bands: vec![ColorCode::Gold, ColorCode::Silver, ColorCode::Gold],
        };
        assert_eq!(
            err.to_string(),
            "Band colors gold-silver-gold do not form a valid resistor code"
        );
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_user_message_mentions_band_count() {
        let err = ReaderError::InsufficientBands { found: 7 };
        assert!(err.user_message().contains('7'));
    }
}
