//! Trait definitions shared by the record layouts and storage backends

pub mod backend;
pub mod record;

pub use backend::StorageBackend;
pub use record::BinaryRecord;
