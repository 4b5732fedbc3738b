//! Configuration for file writers and the network data loader

use crate::processor::AdjustmentMode;
use geonet_core::FilePreamble;
use std::path::{Path, PathBuf};

/// Preamble values stamped on every written file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    /// `VERSION` value
    pub version: String,
    /// `CREATED BY` value
    pub created_by: String,
    /// `CREATED ON` value; today's date when unset
    pub created_on: Option<String>,
}

impl CodecConfig {
    /// Set the version value
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set the creator value
    pub fn with_created_by(mut self, created_by: impl Into<String>) -> Self {
        self.created_by = created_by.into();
        self
    }

    /// Pin the creation date, e.g. for reproducible output
    pub fn with_created_on(mut self, created_on: impl Into<String>) -> Self {
        self.created_on = Some(created_on.into());
        self
    }

    /// Build the preamble for a file written now
    pub fn preamble(&self) -> FilePreamble {
        let created_on = self
            .created_on
            .clone()
            .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string());
        FilePreamble::new(&self.version, &created_on, &self.created_by)
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            created_by: env!("CARGO_PKG_NAME").to_string(),
            created_on: None,
        }
    }
}

/// Input files and adjustment settings for one load
#[derive(Debug, Clone, Default)]
pub struct LoaderConfig {
    /// Binary station file
    pub station_file: PathBuf,
    /// Binary measurement file
    pub measurement_file: PathBuf,
    /// Associated-station list
    pub asl_file: PathBuf,
    /// Association-measurement list, loaded when set
    pub aml_file: Option<PathBuf>,
    /// Adjustment mode
    pub mode: AdjustmentMode,
    /// Block membership from segmentation; one block of all stations when unset
    pub blocks: Option<Vec<Vec<u32>>>,
    /// Comma-separated `NAME,CONSTRAINT` pairs
    pub station_constraints: String,
}

impl LoaderConfig {
    /// Create a config for the three required files
    pub fn new(
        station_file: impl AsRef<Path>,
        asl_file: impl AsRef<Path>,
        measurement_file: impl AsRef<Path>,
    ) -> Self {
        Self::default()
            .with_station_file(station_file)
            .with_asl_file(asl_file)
            .with_measurement_file(measurement_file)
    }

    pub fn with_station_file(mut self, path: impl AsRef<Path>) -> Self {
        self.station_file = path.as_ref().to_path_buf();
        self
    }

    pub fn with_measurement_file(mut self, path: impl AsRef<Path>) -> Self {
        self.measurement_file = path.as_ref().to_path_buf();
        self
    }

    pub fn with_asl_file(mut self, path: impl AsRef<Path>) -> Self {
        self.asl_file = path.as_ref().to_path_buf();
        self
    }

    pub fn with_aml_file(mut self, path: impl AsRef<Path>) -> Self {
        self.aml_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the adjustment mode
    pub fn with_mode(mut self, mode: AdjustmentMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set block membership as produced by segmentation
    pub fn with_blocks(mut self, blocks: Vec<Vec<u32>>) -> Self {
        self.blocks = Some(blocks);
        self
    }

    /// Set station constraints, e.g. `"ALBY,CCC,BALD,FFC"`
    pub fn with_station_constraints(mut self, constraints: impl Into<String>) -> Self {
        self.station_constraints = constraints.into();
        self
    }
}
