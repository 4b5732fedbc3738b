//! Associated-station (ASL) and association-measurement (AML) layouts

use crate::traits::BinaryRecord;
use bytemuck::{Pod, Zeroable};

/// One ASL entry: a station's window into the AML (12 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct AslRecord {
    /// Number of measurements associated with the station
    pub count: u32,
    /// Position of the station's first entry in the AML
    pub offset: u32,
    /// Non-zero when the station is valid
    pub valid: u8,
    /// Padding for alignment
    pub _padding: [u8; 3],
}

impl AslRecord {
    /// Create an entry
    pub const fn new(count: u32, offset: u32, valid: bool) -> Self {
        Self {
            count,
            offset,
            valid: valid as u8,
            _padding: [0; 3],
        }
    }

    pub const fn is_valid(&self) -> bool {
        self.valid != 0
    }

    /// End of the AML window, exclusive
    pub const fn window_end(&self) -> u64 {
        self.offset as u64 + self.count as u64
    }
}

impl BinaryRecord for AslRecord {
    const KIND: &'static str = "associated station";
}

/// One AML entry: a measurement index (4 bytes)
///
/// Availability is derived from the referenced measurement on load and
/// is never stored.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct AmlRecord {
    pub measurement_index: u32,
}

impl BinaryRecord for AmlRecord {
    const KIND: &'static str = "association measurement";
}
