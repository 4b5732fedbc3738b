//! Error types for codec and loader operations

use geonet_core::RecordError;
use std::path::{Path, PathBuf};

/// Result type alias for geonet operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the codecs, the measurement processor and the loader
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// File absent, unreadable or not writable
    #[error("I/O error on '{}': {message}", .path.display())]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// File present but its contents disagree with its declared layout
    #[error("Format error in '{}': {message}", .path.display())]
    Format { path: PathBuf, message: String },

    /// Loaded data fails a referential-integrity or precondition check
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        /// Station implicated by the failure, if any
        station: Option<u32>,
    },

    /// Network state could not be serialised or parsed
    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an I/O error with context
    pub fn io(path: impl AsRef<Path>, message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
            source,
        }
    }

    /// Create a format error
    pub fn format(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Format {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Create a format error from a record layout error
    pub fn record(path: impl AsRef<Path>, source: RecordError) -> Self {
        Self::format(path, source.to_string())
    }

    /// Create a validation error not tied to a station
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            station: None,
        }
    }

    /// Create a validation error implicating `station`
    pub fn station_validation(station: u32, message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            station: Some(station),
        }
    }

    /// Station index to report alongside this error
    pub fn station(&self) -> Option<u32> {
        match self {
            Self::Validation { station, .. } => *station,
            _ => None,
        }
    }
}

impl From<RecordError> for Error {
    fn from(source: RecordError) -> Self {
        Self::Format {
            path: PathBuf::new(),
            message: source.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::format("net.bst", "truncated");
        assert_eq!(err.to_string(), "Format error in 'net.bst': truncated");

        let err = Error::station_validation(7, "dangling reference");
        assert_eq!(err.station(), Some(7));
        assert_eq!(err.to_string(), "Validation error: dangling reference");

        let err: Error = RecordError::UnknownMeasurementType.into();
        assert!(err.to_string().contains("Unknown measurement type"));
        assert_eq!(err.station(), None);
    }
}
