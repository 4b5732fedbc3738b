//! Station file codec

use crate::config::CodecConfig;
use crate::error::Result;
use crate::file_io;
use geonet_core::{BinaryMetadata, StationRecord};
use std::path::Path;
use tracing::debug;

/// Reader and writer for binary station files
pub struct StationFile;

impl StationFile {
    /// Load every station and the file's metadata block
    pub fn load<P: AsRef<Path>>(path: P) -> Result<(Vec<StationRecord>, BinaryMetadata)> {
        let (stations, metadata) = file_io::load_with_metadata::<StationRecord, _>(&path)?;
        debug!(
            path = %path.as_ref().display(),
            stations = stations.len(),
            inputs = metadata.input_files.len(),
            "Loaded station file"
        );
        Ok((stations, metadata))
    }

    /// Write stations with default preamble values
    ///
    /// `None` entries are skipped. Returns the number of stations written.
    pub fn write<P: AsRef<Path>>(
        path: P,
        stations: &[Option<StationRecord>],
        metadata: &BinaryMetadata,
    ) -> Result<usize> {
        Self::write_with_config(path, stations, metadata, &CodecConfig::default())
    }

    /// Write stations with explicit preamble values
    pub fn write_with_config<P: AsRef<Path>>(
        path: P,
        stations: &[Option<StationRecord>],
        metadata: &BinaryMetadata,
        config: &CodecConfig,
    ) -> Result<usize> {
        file_io::write_with_metadata(path, stations, metadata, config)
    }
}
