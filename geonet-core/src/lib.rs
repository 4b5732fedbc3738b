#![no_std]

//! GeoNet Core - Binary layouts for geodetic survey network files
//!
//! This crate provides the fixed-size record layouts, the shared file
//! preamble and the validation helpers for the station, measurement,
//! associated-station (ASL) and association-measurement (AML) files.
//! It performs no I/O.

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod error;
pub mod format;
pub mod traits;
pub mod validation;

pub use error::*;
pub use format::*;
pub use traits::*;
pub use validation::*;
