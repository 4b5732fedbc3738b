//! Validation utilities for network file layouts
//!
//! Pure functions with no I/O dependencies: record region arithmetic,
//! fixed-width text handling and field checks.

pub mod bounds;
pub mod fields;
pub mod text;

pub use bounds::{validate_record_region, validate_window};
pub use fields::{validate_constraint, validate_label};
pub use text::{encode_fixed, read_fixed, write_fixed};
