//! Binary metadata block for station and measurement files
//!
//! The block follows the record count and precedes the records:
//! a fixed 64-byte header, then `input_file_count` provenance records.

use super::constants::metadata::{FILENAME_WIDTH, MAX_INPUT_FILES, MODIFIED_BY_WIDTH};
use super::constants::reference::{EPOCH_WIDTH, EPSG_WIDTH};
use crate::validation::text;
use crate::{RecordError, Result};
use bytemuck::{Pod, Zeroable};

/// Kind of data an input file contributed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum DataKind {
    /// Stations only
    Station = 0,
    /// Measurements only
    Measurement = 1,
    /// Stations and measurements
    Combined = 2,
}

impl DataKind {
    /// Convert from the stored value
    pub const fn from_u16(value: u16) -> Option<Self> {
        match value {
            0 => Some(DataKind::Station),
            1 => Some(DataKind::Measurement),
            2 => Some(DataKind::Combined),
            _ => None,
        }
    }

    /// Whether files of this kind contributed measurements
    pub const fn has_measurements(self) -> bool {
        matches!(self, DataKind::Measurement | DataKind::Combined)
    }

    /// Whether files of this kind contributed stations
    pub const fn has_stations(self) -> bool {
        matches!(self, DataKind::Station | DataKind::Combined)
    }
}

impl core::fmt::Display for DataKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DataKind::Station => write!(f, "station"),
            DataKind::Measurement => write!(f, "measurement"),
            DataKind::Combined => write!(f, "combined"),
        }
    }
}

/// Fixed metadata header (64 bytes, 8-byte aligned)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct MetadataHeader {
    /// Number of records in the file
    pub record_count: u64,
    /// Number of provenance records following the header
    pub input_file_count: u64,
    /// Records have been reduced to the reference ellipsoid
    pub reduced: u8,
    /// Records have been transformed to a new reference frame
    pub reftran: u8,
    /// Geoid separations have been applied
    pub geoid: u8,
    /// Padding for alignment
    pub _padding: [u8; 5],
    /// Name of the program that last modified the file
    pub modified_by: [u8; MODIFIED_BY_WIDTH],
    /// Reference system code
    pub epsg: [u8; EPSG_WIDTH],
    /// Reference epoch
    pub epoch: [u8; EPOCH_WIDTH],
}

impl MetadataHeader {
    /// Size of the header in bytes
    pub const SIZE: usize = core::mem::size_of::<Self>();

    /// Parse from the start of `bytes`
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let header = bytes
            .get(..Self::SIZE)
            .map(bytemuck::pod_read_unaligned::<Self>)
            .ok_or(RecordError::InsufficientBuffer)?;

        if header.input_file_count > MAX_INPUT_FILES {
            return Err(RecordError::InsufficientBuffer);
        }
        Ok(header)
    }
}

/// One input-file provenance record (280 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct InputFileRecord {
    /// Source filename
    pub filename: [u8; FILENAME_WIDTH],
    /// Reference system code of the source file
    pub epsg: [u8; EPSG_WIDTH],
    /// Epoch of the source file
    pub epoch: [u8; EPOCH_WIDTH],
    /// Source file format code
    pub file_type: u16,
    /// Stored [`DataKind`]
    pub data_kind: u16,
}

impl InputFileRecord {
    /// Size of one provenance record in bytes
    pub const SIZE: usize = core::mem::size_of::<Self>();

    /// Create a provenance record
    pub fn new(filename: &str, epsg: &str, epoch: &str, file_type: u16, kind: DataKind) -> Self {
        Self {
            filename: text::encode_fixed(filename),
            epsg: text::encode_fixed(epsg),
            epoch: text::encode_fixed(epoch),
            file_type,
            data_kind: kind as u16,
        }
    }

    /// Source filename
    pub fn filename(&self) -> &str {
        text::read_fixed(&self.filename)
    }

    /// Reference system code
    pub fn epsg(&self) -> &str {
        text::read_fixed(&self.epsg)
    }

    /// Epoch
    pub fn epoch(&self) -> &str {
        text::read_fixed(&self.epoch)
    }

    /// Decoded data kind
    pub fn data_kind(&self) -> Option<DataKind> {
        DataKind::from_u16(self.data_kind)
    }
}

/// Owned metadata block with its provenance array
#[cfg(feature = "alloc")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMetadata {
    /// Record count declared by the block
    pub record_count: u64,
    /// Reduced flag
    pub reduced: bool,
    /// Reference frame transformation flag
    pub reftran: bool,
    /// Geoid flag
    pub geoid: bool,
    /// Last modifier
    pub modified_by: alloc::string::String,
    /// Reference system code
    pub epsg: alloc::string::String,
    /// Reference epoch
    pub epoch: alloc::string::String,
    /// Provenance records, empty when none were recorded
    pub input_files: alloc::vec::Vec<InputFileRecord>,
}

#[cfg(feature = "alloc")]
impl Default for BinaryMetadata {
    fn default() -> Self {
        Self {
            record_count: 0,
            reduced: false,
            reftran: false,
            geoid: false,
            modified_by: alloc::string::String::new(),
            epsg: alloc::string::String::new(),
            epoch: alloc::string::String::new(),
            input_files: alloc::vec::Vec::new(),
        }
    }
}

#[cfg(feature = "alloc")]
impl BinaryMetadata {
    /// Encoded size of this block
    pub fn encoded_size(&self) -> usize {
        MetadataHeader::SIZE + self.input_files.len() * InputFileRecord::SIZE
    }

    /// Build the fixed header for this block
    pub fn header(&self) -> MetadataHeader {
        MetadataHeader {
            record_count: self.record_count,
            input_file_count: self.input_files.len() as u64,
            reduced: self.reduced as u8,
            reftran: self.reftran as u8,
            geoid: self.geoid as u8,
            _padding: [0; 5],
            modified_by: text::encode_fixed(&self.modified_by),
            epsg: text::encode_fixed(&self.epsg),
            epoch: text::encode_fixed(&self.epoch),
        }
    }

    /// Parse the block, returning it with the number of bytes consumed
    pub fn from_bytes(bytes: &[u8]) -> Result<(Self, usize)> {
        use alloc::string::ToString;

        let header = MetadataHeader::from_bytes(bytes)?;
        let files_len = (header.input_file_count as usize)
            .checked_mul(InputFileRecord::SIZE)
            .ok_or(RecordError::InsufficientBuffer)?;
        let files_bytes = bytes
            .get(MetadataHeader::SIZE..MetadataHeader::SIZE + files_len)
            .ok_or(RecordError::InsufficientBuffer)?;

        let input_files = files_bytes
            .chunks_exact(InputFileRecord::SIZE)
            .map(bytemuck::pod_read_unaligned::<InputFileRecord>)
            .collect();

        let metadata = Self {
            record_count: header.record_count,
            reduced: header.reduced != 0,
            reftran: header.reftran != 0,
            geoid: header.geoid != 0,
            modified_by: text::read_fixed(&header.modified_by).to_string(),
            epsg: text::read_fixed(&header.epsg).to_string(),
            epoch: text::read_fixed(&header.epoch).to_string(),
            input_files,
        };
        Ok((metadata, MetadataHeader::SIZE + files_len))
    }

    /// Convert the block to bytes
    pub fn to_bytes(&self) -> alloc::vec::Vec<u8> {
        let mut bytes = alloc::vec::Vec::with_capacity(self.encoded_size());
        bytes.extend_from_slice(bytemuck::bytes_of(&self.header()));
        bytes.extend_from_slice(bytemuck::cast_slice(&self.input_files));
        bytes
    }

    /// Provenance entries that contributed measurements
    ///
    /// Always returns a vector, empty when nothing qualifies.
    pub fn measurement_inputs(&self) -> alloc::vec::Vec<InputFileRecord> {
        self.inputs_where(DataKind::has_measurements)
    }

    /// Provenance entries that contributed stations
    pub fn station_inputs(&self) -> alloc::vec::Vec<InputFileRecord> {
        self.inputs_where(DataKind::has_stations)
    }

    fn inputs_where(&self, keep: fn(DataKind) -> bool) -> alloc::vec::Vec<InputFileRecord> {
        self.input_files
            .iter()
            .filter(|f| f.data_kind().is_some_and(keep))
            .copied()
            .collect()
    }
}
