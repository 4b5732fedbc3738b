//! GeoNet - Binary codecs and data loading for geodetic survey networks
//!
//! This library reads and writes the binary station, measurement,
//! associated-station (ASL) and association-measurement (AML) files of a
//! survey network, derives measurement counts and clusters, and loads a
//! complete network ready for adjustment.
//!
//! ## Architecture
//!
//! GeoNet follows a layout/implementation separation:
//!
//! - **geonet-core**: Record layouts, preamble and validation (no I/O)
//! - **geonet**: File codecs, measurement processing and the network loader
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use geonet::{AdjustmentMode, LoaderConfig, NetworkDataLoader, StationFile};
//!
//! fn example() -> geonet::Result<()> {
//!     let (stations, metadata) = StationFile::load("network.bst")?;
//!     println!("{} stations from {} inputs", stations.len(), metadata.input_files.len());
//!
//!     let config = LoaderConfig::new("network.bst", "network.asl", "network.bms")
//!         .with_mode(AdjustmentMode::Simultaneous);
//!     let data = NetworkDataLoader::new(config).try_load()?;
//!     println!("{} unknowns", data.state.unknowns_count);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Memory-mapped I/O**: Files are read through read-only maps (`mmap`)
//! - **Serde**: `NetworkState` persists to JSON for run comparison (`serde`)
//! - **Parallel aggregation**: Station tallies and blocks are built with rayon

pub use geonet_core::{
    // Record layouts
    AmlRecord, AslRecord, Component, MeasurementRecord, MeasurementType, StationRecord,
    // File framing
    BinaryMetadata, DataKind, FilePreamble, InputFileRecord,
    // Layout errors
    RecordError,
    // Validation utilities
    validate_constraint,
};

pub mod aml;
pub mod asl;
pub mod config;
pub mod error;
pub mod file_io;
pub mod loader;
pub mod measurement;
pub mod processor;
pub mod state;
pub mod station;

pub use aml::{
    create_measurement_to_station_tally, write_measurement_to_station_summary, AmlEntry, AmlFile,
    MeasurementTally,
};
pub use asl::{AslFile, AslLoad};
pub use config::{CodecConfig, LoaderConfig};
pub use error::{Error, Result};
pub use loader::{
    apply_station_constraints, remove_invalid_stations, remove_non_measurements, BlockMeta,
    LoadOutputs, LoadState, NetworkData, NetworkDataLoader,
};
pub use measurement::MeasurementFile;
pub use processor::{AdjustmentMode, MeasurementCounts, MeasurementProcessor};
pub use state::NetworkState;
pub use station::StationFile;
