//! Measurement record layout (152 bytes) and measurement type codes

use super::constants::reference::{COORD_TYPE_WIDTH, EPOCH_WIDTH, EPSG_WIDTH};
use crate::traits::BinaryRecord;
use crate::validation::text;
use crate::{RecordError, Result};
use bytemuck::{Pod, Zeroable};

/// Measurement types keyed by their one-character code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MeasurementType {
    HorizontalAngle = b'A',
    GeodeticAzimuth = b'B',
    ChordDistance = b'C',
    DirectionSet = b'D',
    EllipsoidArc = b'E',
    GnssBaseline = b'G',
    OrthometricHeight = b'H',
    AstronomicLatitude = b'I',
    AstronomicLongitude = b'J',
    AstronomicAzimuth = b'K',
    LevelDifference = b'L',
    MslArc = b'M',
    GeodeticLatitude = b'P',
    GeodeticLongitude = b'Q',
    EllipsoidHeight = b'R',
    SlopeDistance = b'S',
    ZenithDistance = b'V',
    GnssBaselineCluster = b'X',
    GnssPointCluster = b'Y',
    VerticalAngle = b'Z',
}

impl MeasurementType {
    /// Number of measurement types
    pub const COUNT: usize = 20;

    /// Every type in code order
    pub const ALL: [MeasurementType; Self::COUNT] = [
        MeasurementType::HorizontalAngle,
        MeasurementType::GeodeticAzimuth,
        MeasurementType::ChordDistance,
        MeasurementType::DirectionSet,
        MeasurementType::EllipsoidArc,
        MeasurementType::GnssBaseline,
        MeasurementType::OrthometricHeight,
        MeasurementType::AstronomicLatitude,
        MeasurementType::AstronomicLongitude,
        MeasurementType::AstronomicAzimuth,
        MeasurementType::LevelDifference,
        MeasurementType::MslArc,
        MeasurementType::GeodeticLatitude,
        MeasurementType::GeodeticLongitude,
        MeasurementType::EllipsoidHeight,
        MeasurementType::SlopeDistance,
        MeasurementType::ZenithDistance,
        MeasurementType::GnssBaselineCluster,
        MeasurementType::GnssPointCluster,
        MeasurementType::VerticalAngle,
    ];

    /// Convert from a type code
    pub const fn from_code(code: u8) -> Result<Self> {
        use MeasurementType::*;
        Ok(match code.to_ascii_uppercase() {
            b'A' => HorizontalAngle,
            b'B' => GeodeticAzimuth,
            b'C' => ChordDistance,
            b'D' => DirectionSet,
            b'E' => EllipsoidArc,
            b'G' => GnssBaseline,
            b'H' => OrthometricHeight,
            b'I' => AstronomicLatitude,
            b'J' => AstronomicLongitude,
            b'K' => AstronomicAzimuth,
            b'L' => LevelDifference,
            b'M' => MslArc,
            b'P' => GeodeticLatitude,
            b'Q' => GeodeticLongitude,
            b'R' => EllipsoidHeight,
            b'S' => SlopeDistance,
            b'V' => ZenithDistance,
            b'X' => GnssBaselineCluster,
            b'Y' => GnssPointCluster,
            b'Z' => VerticalAngle,
            _ => return Err(RecordError::UnknownMeasurementType),
        })
    }

    /// The stored type code
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Position in [`MeasurementType::ALL`]
    pub const fn index(self) -> usize {
        let mut i = 0;
        while i < Self::COUNT {
            if Self::ALL[i] as u8 == self as u8 {
                return i;
            }
            i += 1;
        }
        // every variant is listed in ALL
        0
    }

    /// Number of stations a measurement of this type references
    pub const fn station_count(self) -> usize {
        use MeasurementType::*;
        match self {
            OrthometricHeight | AstronomicLatitude | AstronomicLongitude | GeodeticLatitude
            | GeodeticLongitude | EllipsoidHeight | GnssPointCluster => 1,
            HorizontalAngle => 3,
            _ => 2,
        }
    }

    /// GNSS baselines and clusters carry a full 3x3 covariance block
    pub const fn is_gnss(self) -> bool {
        matches!(
            self,
            MeasurementType::GnssBaseline
                | MeasurementType::GnssBaselineCluster
                | MeasurementType::GnssPointCluster
        )
    }

    /// Absolute positions and heights observed by terrestrial means
    pub const fn is_absolute_terrestrial(self) -> bool {
        use MeasurementType::*;
        matches!(
            self,
            OrthometricHeight
                | AstronomicLatitude
                | AstronomicLongitude
                | GeodeticLatitude
                | GeodeticLongitude
                | EllipsoidHeight
        )
    }
}

impl core::fmt::Display for MeasurementType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.code() as char)
    }
}

/// Which part of a multi-record measurement a record holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Component {
    ValueX = 0,
    ValueY = 1,
    ValueZ = 2,
    CovarianceX = 3,
    CovarianceY = 4,
    CovarianceZ = 5,
}

impl Component {
    /// Convert from the stored byte
    pub const fn from_u8(value: u8) -> Result<Self> {
        Ok(match value {
            0 => Component::ValueX,
            1 => Component::ValueY,
            2 => Component::ValueZ,
            3 => Component::CovarianceX,
            4 => Component::CovarianceY,
            5 => Component::CovarianceZ,
            _ => return Err(RecordError::UnknownComponent),
        })
    }
}

/// One measurement record as stored in the measurement file
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MeasurementRecord {
    /// Observed terms
    pub terms: [f64; 3],
    /// Scale factors matching `terms`
    pub scales: [f64; 3],
    /// Adjustment results, zero until an adjustment runs
    pub adjusted_value: f64,
    pub correction: f64,
    pub adjusted_precision: f64,
    pub residual_precision: f64,
    pub n_stat: f64,
    pub t_stat: f64,
    /// First station index
    pub station1: u32,
    /// Second station index, unused for one-station types
    pub station2: u32,
    /// Third station index, used by angles only
    pub station3: u32,
    /// Directions in a set, or baselines in a cluster
    pub vector_count1: u32,
    /// Covariances in a cluster, or targets in a direction set
    pub vector_count2: u32,
    /// Groups records adjusted together; 0 means unclustered
    pub cluster_id: u32,
    /// Position in the source file
    pub file_order: u32,
    /// [`MeasurementType`] code
    pub measurement_type: u8,
    /// Non-zero when excluded from adjustment
    pub ignore: u8,
    /// [`Component`] value
    pub component: u8,
    /// Number of referenced stations
    pub station_count: u8,
    pub epsg: [u8; EPSG_WIDTH],
    pub epoch: [u8; EPOCH_WIDTH],
    pub coord_type: [u8; COORD_TYPE_WIDTH],
}

impl BinaryRecord for MeasurementRecord {
    const KIND: &'static str = "measurement";
}

impl MeasurementRecord {
    /// Create a record of the given type referencing `stations`
    ///
    /// Stations beyond the type's arity are ignored.
    pub fn new(kind: MeasurementType, stations: &[u32]) -> Self {
        let mut record = Self::zeroed();
        record.measurement_type = kind.code();
        record.station_count = kind.station_count() as u8;
        let mut slots = [0u32; 3];
        for (slot, &station) in slots.iter_mut().zip(stations).take(kind.station_count()) {
            *slot = station;
        }
        [record.station1, record.station2, record.station3] = slots;
        record
    }

    /// Decoded measurement type
    pub fn kind(&self) -> Result<MeasurementType> {
        MeasurementType::from_code(self.measurement_type)
    }

    pub fn is_ignored(&self) -> bool {
        self.ignore != 0
    }

    pub fn set_ignored(&mut self, ignore: bool) {
        self.ignore = ignore as u8;
    }

    /// Decoded component
    pub fn component(&self) -> Result<Component> {
        Component::from_u8(self.component)
    }

    /// Whether this record opens a measurement rather than continuing one
    pub fn is_measurement_start(&self) -> bool {
        self.component == Component::ValueX as u8
    }

    /// Referenced station indices, `station_count` of them
    pub fn stations(&self) -> impl Iterator<Item = u32> {
        [self.station1, self.station2, self.station3]
            .into_iter()
            .take((self.station_count as usize).min(3))
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

    pub fn coord_type(&self) -> &str {
        text::read_fixed(&self.coord_type)
    }

    pub fn set_coord_type(&mut self, coord_type: &str) {
        text::write_fixed(&mut self.coord_type, coord_type);
    }
}

impl Default for MeasurementRecord {
    fn default() -> Self {
        Self::zeroed()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::vec::Vec;

    #[test]
    fn test_measurement_record_size() {
        assert_eq!(MeasurementRecord::SIZE, 152);
    }

    #[test]
    fn test_type_codes() {
        for (i, kind) in MeasurementType::ALL.iter().enumerate() {
            assert_eq!(MeasurementType::from_code(kind.code()), Ok(*kind));
            assert_eq!(kind.index(), i);
        }
        assert_eq!(
            MeasurementType::from_code(b'F'),
            Err(RecordError::UnknownMeasurementType)
        );
        assert_eq!(MeasurementType::from_code(b's'), Ok(MeasurementType::SlopeDistance));
    }

    #[test]
    fn test_station_arity() {
        let single: usize = MeasurementType::ALL
            .iter()
            .filter(|k| k.station_count() == 1)
            .count();
        assert_eq!(single, 7);
        assert_eq!(MeasurementType::HorizontalAngle.station_count(), 3);
        assert_eq!(MeasurementType::GnssBaseline.station_count(), 2);
        assert_eq!(MeasurementType::GnssPointCluster.station_count(), 1);
    }

    #[test]
    fn test_new_respects_arity() {
        let height = MeasurementRecord::new(MeasurementType::EllipsoidHeight, &[4, 5, 6]);
        assert_eq!(height.stations().collect::<Vec<_>>(), [4]);
        assert_eq!(height.station2, 0);

        let angle = MeasurementRecord::new(MeasurementType::HorizontalAngle, &[1, 2, 3]);
        assert_eq!(angle.stations().collect::<Vec<_>>(), [1, 2, 3]);

        let distance = MeasurementRecord::new(MeasurementType::SlopeDistance, &[7]);
        assert_eq!(distance.stations().collect::<Vec<_>>(), [7, 0]);
    }

    #[test]
    fn test_component_decoding() {
        let mut record = MeasurementRecord::new(MeasurementType::GnssBaseline, &[0, 1]);
        assert!(record.is_measurement_start());
        record.component = Component::CovarianceY as u8;
        assert!(!record.is_measurement_start());
        assert_eq!(record.component(), Ok(Component::CovarianceY));
        record.component = 42;
        assert_eq!(record.component(), Err(RecordError::UnknownComponent));
        assert!(!record.is_measurement_start());
    }
}
