//! Binary format definitions for network files
//!
//! Pure layout definitions for the preamble, metadata block and record
//! types. No I/O operations.

pub mod association;
pub mod constants;
pub mod measurement;
pub mod metadata;
pub mod preamble;
pub mod station;

pub use association::{AmlRecord, AslRecord};
pub use measurement::{Component, MeasurementRecord, MeasurementType};
#[cfg(feature = "alloc")]
pub use metadata::BinaryMetadata;
pub use metadata::{DataKind, InputFileRecord, MetadataHeader};
pub use preamble::FilePreamble;
pub use station::StationRecord;
