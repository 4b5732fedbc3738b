//! Station record layout (320 bytes)

use super::constants::reference::{EPOCH_WIDTH, EPSG_WIDTH};
use super::constants::station::*;
use crate::traits::BinaryRecord;
use crate::validation::text;
use bytemuck::{Pod, Zeroable};

/// One station as stored in the station file
///
/// Angles are radians, heights and separations metres.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct StationRecord {
    /// Latitude as supplied on import
    pub initial_latitude: f64,
    /// Longitude as supplied on import
    pub initial_longitude: f64,
    /// Height as supplied on import
    pub initial_height: f64,
    /// Latitude after the last adjustment
    pub current_latitude: f64,
    /// Longitude after the last adjustment
    pub current_longitude: f64,
    /// Height after the last adjustment
    pub current_height: f64,
    /// Deflection of the vertical in the meridian
    pub meridian_deflection: f64,
    /// Deflection of the vertical in the prime vertical
    pub vertical_deflection: f64,
    /// Geoid-ellipsoid separation
    pub geoid_separation: f32,
    /// Position in the source file
    pub file_order: u32,
    /// Position when sorted by name
    pub name_order: u32,
    /// Cluster the station belongs to
    pub cluster_id: u32,
    /// Coordinate type code as supplied
    pub supplied_type: u16,
    /// Reference frame of the supplied height
    pub height_reference: u16,
    /// Projection zone
    pub zone: i16,
    /// Padding for alignment
    pub _padding: u16,
    pub name: [u8; NAME_WIDTH],
    pub original_name: [u8; NAME_ORIG_WIDTH],
    pub constraint: [u8; CONSTRAINT_WIDTH],
    pub station_type: [u8; TYPE_WIDTH],
    pub description: [u8; DESCRIPTION_WIDTH],
    pub epsg: [u8; EPSG_WIDTH],
    pub epoch: [u8; EPOCH_WIDTH],
    pub plate: [u8; PLATE_WIDTH],
}

impl BinaryRecord for StationRecord {
    const KIND: &'static str = "station";
}

impl Default for StationRecord {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl StationRecord {
    /// Create a station with the given name and everything else zeroed
    pub fn new(name: &str) -> Self {
        let mut station = Self::zeroed();
        station.set_name(name);
        station
    }

    pub fn name(&self) -> &str {
        text::read_fixed(&self.name)
    }

    pub fn set_name(&mut self, name: &str) {
        text::write_fixed(&mut self.name, name);
    }

    pub fn original_name(&self) -> &str {
        text::read_fixed(&self.original_name)
    }

    pub fn set_original_name(&mut self, name: &str) {
        text::write_fixed(&mut self.original_name, name);
    }

    /// Three-character constraint, e.g. `CCF`
    pub fn constraint(&self) -> &str {
        text::read_fixed(&self.constraint)
    }

    /// Store a constraint; callers validate it first
    pub fn set_constraint(&mut self, constraint: &str) {
        text::write_fixed(&mut self.constraint, constraint);
    }

    pub fn station_type(&self) -> &str {
        text::read_fixed(&self.station_type)
    }

    pub fn set_station_type(&mut self, station_type: &str) {
        text::write_fixed(&mut self.station_type, station_type);
    }

    pub fn description(&self) -> &str {
        text::read_fixed(&self.description)
    }

    pub fn set_description(&mut self, description: &str) {
        text::write_fixed(&mut self.description, description);
    }

    pub fn epsg(&self) -> &str {
        text::read_fixed(&self.epsg)
    }

    pub fn set_epsg(&mut self, epsg: &str) {
        text::write_fixed(&mut self.epsg, epsg);
    }

    pub fn epoch(&self) -> &str {
        text::read_fixed(&self.epoch)
    }

    pub fn set_epoch(&mut self, epoch: &str) {
        text::write_fixed(&mut self.epoch, epoch);
    }

    pub fn plate(&self) -> &str {
        text::read_fixed(&self.plate)
    }

    pub fn set_plate(&mut self, plate: &str) {
        text::write_fixed(&mut self.plate, plate);
    }
}
