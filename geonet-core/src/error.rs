//! Error types for record layout operations

/// Errors that can occur while decoding or validating binary records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordError {
    /// Buffer is smaller than the structure being read
    InsufficientBuffer,
    /// Preamble labels do not match the expected layout
    InvalidPreamble,
    /// Record region is shorter than the declared record count
    TruncatedRecords,
    /// Two declared counts for the same file disagree
    CountMismatch,
    /// Measurement type code outside the known set
    UnknownMeasurementType,
    /// Component byte outside the value and covariance parts
    UnknownComponent,
    /// Station constraint is not three `C`/`F` characters
    InvalidConstraint,
    /// Index out of bounds
    IndexOutOfBounds,
}

impl core::fmt::Display for RecordError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            RecordError::InsufficientBuffer => "Insufficient buffer space",
            RecordError::InvalidPreamble => "Invalid file preamble",
            RecordError::TruncatedRecords => "Record region shorter than declared count",
            RecordError::CountMismatch => "Declared record counts disagree",
            RecordError::UnknownMeasurementType => "Unknown measurement type",
            RecordError::UnknownComponent => "Unknown measurement component",
            RecordError::InvalidConstraint => "Invalid station constraint",
            RecordError::IndexOutOfBounds => "Index out of bounds",
        };
        write!(f, "{msg}")
    }
}

/// Result type for record layout operations
pub type Result<T> = core::result::Result<T, RecordError>;
