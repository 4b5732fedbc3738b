//! Network data loader
//!
//! Loads the station, ASL and measurement files (and optionally the AML),
//! checks their references against each other, narrows the free station
//! set, builds per-block aggregates and runs the measurement processor
//! for the configured adjustment mode.
//!
//! The loader advances through [`LoadState`] strictly in order. Any
//! failure is reported once through the error reporter and leaves the
//! loader in `Done { success: false }`.
//!
//! ```no_run
//! use geonet::{LoaderConfig, NetworkDataLoader};
//!
//! let config = LoaderConfig::new("net.bst", "net.asl", "net.bms")
//!     .with_station_constraints("ALBY,CCC");
//! let mut loader = NetworkDataLoader::new(config);
//! loader.set_error_reporter(|message, station| eprintln!("{station}: {message}"));
//!
//! let data = loader.try_load()?;
//! println!("{} measurements", data.state.measurement_count);
//! # Ok::<(), geonet::Error>(())
//! ```

use crate::aml::{create_measurement_to_station_tally, AmlEntry, AmlFile, MeasurementTally};
use crate::asl::{AslFile, AslLoad};
use crate::config::LoaderConfig;
use crate::error::{Error, Result};
use crate::measurement::MeasurementFile;
use crate::processor::{
    is_live, AdjustmentMode, MeasurementCounts, MeasurementProcessor, NO_MEASUREMENTS,
};
use crate::state::NetworkState;
use crate::station::StationFile;
use geonet_core::{validate_constraint, AslRecord, BinaryMetadata, MeasurementRecord, StationRecord};
use hashbrown::{HashMap, HashSet};
use rayon::prelude::*;
use tracing::{debug, error, info, warn};

/// Unknowns solved per station
pub const UNKNOWNS_PER_STATION: u32 = 3;

/// Receives a failure message and the implicated station (0 when none)
pub type ErrorReporter = Box<dyn FnMut(&str, u32) + Send>;
/// Applies constraints to the loaded stations
pub type ConstraintApplier = Box<dyn FnMut(&mut [StationRecord]) + Send>;
/// Narrows the free station list using the ASL
pub type InvalidStationRemover = Box<dyn FnMut(&mut Vec<u32>, &[AslRecord]) + Send>;
/// Notified of each continuation or covariance record dropped in simultaneous mode
pub type NonMeasurementRemover = Box<dyn FnMut(u32) + Send>;
/// Receives the summed measurement and variance counts
pub type MeasurementCountUpdater = Box<dyn FnMut(u32, u32) + Send>;

/// Progress of one load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    StationsLoaded,
    AssociationsLoaded,
    MeasurementsLoaded,
    Validated,
    Done {
        success: bool,
    },
}

/// Position of a block within the adjustment sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockMeta {
    pub first: bool,
    pub last: bool,
    pub intermediate: bool,
}

impl BlockMeta {
    fn at(index: usize, count: usize) -> Self {
        let first = index == 0;
        let last = index + 1 == count;
        Self {
            first,
            last,
            intermediate: !first && !last,
        }
    }
}

/// Everything produced by a successful load
#[derive(Debug, Clone)]
pub struct NetworkData {
    pub stations: Vec<StationRecord>,
    pub station_metadata: BinaryMetadata,
    pub asl: Vec<AslRecord>,
    /// Stations free for adjustment after invalid ones were removed
    pub free_stations: Vec<u32>,
    pub measurements: Vec<MeasurementRecord>,
    pub measurement_metadata: BinaryMetadata,
    /// Present when an AML file was configured
    pub aml: Option<Vec<AmlEntry>>,
    /// Per-station tallies, present with the AML
    pub tallies: Option<Vec<MeasurementTally>>,
    pub block_meta: Vec<BlockMeta>,
    /// Parameter stations of each block
    pub parameter_stations: Vec<Vec<u32>>,
    pub state: NetworkState,
}

/// Optional destinations filled by [`NetworkDataLoader::load`]
///
/// `None` fields are skipped. Nothing is written on failure.
#[derive(Default)]
pub struct LoadOutputs<'a> {
    pub stations: Option<&'a mut Vec<StationRecord>>,
    pub station_metadata: Option<&'a mut BinaryMetadata>,
    pub asl: Option<&'a mut Vec<AslRecord>>,
    pub measurements: Option<&'a mut Vec<MeasurementRecord>>,
    pub measurement_metadata: Option<&'a mut BinaryMetadata>,
    pub aml: Option<&'a mut Vec<AmlEntry>>,
    pub state: Option<&'a mut NetworkState>,
}

impl NetworkData {
    fn fill(self, outputs: LoadOutputs<'_>) {
        if let Some(dest) = outputs.stations {
            *dest = self.stations;
        }
        if let Some(dest) = outputs.station_metadata {
            *dest = self.station_metadata;
        }
        if let Some(dest) = outputs.asl {
            *dest = self.asl;
        }
        if let Some(dest) = outputs.measurements {
            *dest = self.measurements;
        }
        if let Some(dest) = outputs.measurement_metadata {
            *dest = self.measurement_metadata;
        }
        if let (Some(dest), Some(aml)) = (outputs.aml, self.aml) {
            *dest = aml;
        }
        if let Some(dest) = outputs.state {
            *dest = self.state;
        }
    }
}

/// Stations and measurements of one block
#[derive(Debug)]
struct Block {
    isl: Vec<u32>,
    station_map: HashMap<u32, u32>,
    /// Records whose stations all lie in the block
    measurements: Vec<u32>,
}

/// Loads and validates one network
pub struct NetworkDataLoader {
    config: LoaderConfig,
    state: LoadState,
    error_reporter: Option<ErrorReporter>,
    constraint_applier: Option<ConstraintApplier>,
    invalid_station_remover: Option<InvalidStationRemover>,
    non_measurement_remover: Option<NonMeasurementRemover>,
    measurement_count_updater: Option<MeasurementCountUpdater>,
}

impl NetworkDataLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            config,
            state: LoadState::Idle,
            error_reporter: None,
            constraint_applier: None,
            invalid_station_remover: None,
            non_measurement_remover: None,
            measurement_count_updater: None,
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// State reached by the last load
    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn set_error_reporter(&mut self, f: impl FnMut(&str, u32) + Send + 'static) {
        self.error_reporter = Some(Box::new(f));
    }

    /// Replace the default `station_constraints` handling
    pub fn set_constraint_applier(
        &mut self,
        f: impl FnMut(&mut [StationRecord]) + Send + 'static,
    ) {
        self.constraint_applier = Some(Box::new(f));
    }

    /// Replace [`remove_invalid_stations`]
    pub fn set_invalid_station_remover(
        &mut self,
        f: impl FnMut(&mut Vec<u32>, &[AslRecord]) + Send + 'static,
    ) {
        self.invalid_station_remover = Some(Box::new(f));
    }

    pub fn set_non_measurement_remover(&mut self, f: impl FnMut(u32) + Send + 'static) {
        self.non_measurement_remover = Some(Box::new(f));
    }

    pub fn set_measurement_count_updater(&mut self, f: impl FnMut(u32, u32) + Send + 'static) {
        self.measurement_count_updater = Some(Box::new(f));
    }

    /// Load the network, filling the requested outputs on success
    ///
    /// Returns false after reporting the failure.
    pub fn load(&mut self, outputs: LoadOutputs<'_>) -> bool {
        match self.try_load() {
            Ok(data) => {
                data.fill(outputs);
                true
            }
            Err(_) => false,
        }
    }

    /// Load the network, returning the typed error on failure
    ///
    /// The error reporter is still invoked.
    pub fn try_load(&mut self) -> Result<NetworkData> {
        self.state = LoadState::Idle;
        match self.run() {
            Ok(data) => {
                self.state = LoadState::Done { success: true };
                Ok(data)
            }
            Err(err) => {
                self.report(&err);
                self.state = LoadState::Done { success: false };
                Err(err)
            }
        }
    }

    fn report(&mut self, err: &Error) {
        let station = err.station().unwrap_or(0);
        error!(station, %err, "Network load failed");
        if let Some(reporter) = self.error_reporter.as_mut() {
            reporter(&err.to_string(), station);
        }
    }

    fn run(&mut self) -> Result<NetworkData> {
        let (mut stations, station_metadata) = StationFile::load(&self.config.station_file)?;
        self.state = LoadState::StationsLoaded;

        let AslLoad {
            entries: asl,
            mut free_stations,
        } = AslFile::load(&self.config.asl_file)?;
        self.state = LoadState::AssociationsLoaded;

        let (measurements, measurement_metadata) =
            MeasurementFile::load(&self.config.measurement_file)?;
        let aml = match &self.config.aml_file {
            Some(path) => Some(AmlFile::load(path, &measurements)?),
            None => None,
        };
        self.state = LoadState::MeasurementsLoaded;
        debug!(
            stations = stations.len(),
            asl = asl.len(),
            measurements = measurements.len(),
            "Loaded network files"
        );

        check_references(&stations, &asl, &measurements)?;
        let tallies = aml
            .as_ref()
            .map(|aml| create_measurement_to_station_tally(&asl, aml, &measurements))
            .transpose()?;

        let candidates = free_stations.len();
        match self.invalid_station_remover.as_mut() {
            Some(remove) => remove(&mut free_stations, &asl),
            None => remove_invalid_stations(&mut free_stations, &asl),
        }
        if free_stations.len() < candidates {
            warn!(
                removed = candidates - free_stations.len(),
                remaining = free_stations.len(),
                "Removed invalid stations"
            );
        }

        let mode = self.config.mode;
        let partitions = self.partitions(stations.len(), &free_stations)?;
        let blocks = build_blocks(&partitions, &free_stations, &measurements);

        match self.constraint_applier.as_mut() {
            Some(apply) => apply(&mut stations),
            None => apply_station_constraints(&mut stations, &self.config.station_constraints)?,
        }

        let processor = MeasurementProcessor::new(mode);
        let mut counts: Vec<MeasurementCounts> = Vec::with_capacity(blocks.len());
        for block in &blocks {
            let mut indices = block.measurements.clone();
            if mode.builds_clusters() {
                let remover = &mut self.non_measurement_remover;
                remove_non_measurements(&mut indices, &measurements, |index| {
                    if let Some(notify) = remover.as_mut() {
                        notify(index);
                    }
                });
            } else {
                indices.retain(|&i| is_live(&measurements[i as usize]));
            }
            counts.push(processor.process_block(&measurements, &indices)?);
        }

        let measurement_count: u32 = counts.iter().map(|c| c.measurement_count).sum();
        let variance_count: u32 = counts.iter().map(|c| c.variance_count).sum();
        if measurement_count == 0 && measurements.iter().any(|m| m.is_measurement_start()) {
            return Err(Error::validation(NO_MEASUREMENTS));
        }

        if let Some(update) = self.measurement_count_updater.as_mut() {
            update(measurement_count, variance_count);
        }
        self.state = LoadState::Validated;

        let state = network_state(
            &stations,
            &asl,
            &measurements,
            &free_stations,
            &blocks,
            counts,
        );
        let block_meta = (0..blocks.len())
            .map(|i| BlockMeta::at(i, blocks.len()))
            .collect();
        let parameter_stations = state.isl.clone();

        info!(
            mode = ?mode,
            blocks = blocks.len(),
            free_stations = free_stations.len(),
            measurements = state.measurement_count,
            variances = state.measurement_variance_count,
            "Network loaded"
        );

        Ok(NetworkData {
            stations,
            station_metadata,
            asl,
            free_stations,
            measurements,
            measurement_metadata,
            aml,
            tallies,
            block_meta,
            parameter_stations,
            state,
        })
    }

    /// Station partitions for the configured mode
    fn partitions(&self, station_count: usize, free_stations: &[u32]) -> Result<Vec<Vec<u32>>> {
        let all = || (0..station_count as u32).collect::<Vec<_>>();
        match self.config.mode {
            AdjustmentMode::Simultaneous => Ok(vec![free_stations.to_vec()]),
            AdjustmentMode::Phased => Ok(self.config.blocks.clone().unwrap_or_else(|| vec![all()])),
            AdjustmentMode::PhasedSingleBlock => match &self.config.blocks {
                Some(blocks) => blocks
                    .first()
                    .map(|first| vec![first.clone()])
                    .ok_or_else(|| Error::validation("no blocks supplied for a single-block adjustment")),
                None => Ok(vec![all()]),
            },
        }
    }
}

/// Keep stations that have a valid ASL entry, in ascending order
pub fn remove_invalid_stations(free_stations: &mut Vec<u32>, asl: &[AslRecord]) {
    free_stations.retain(|&s| asl.get(s as usize).is_some_and(|e| e.is_valid()));
    free_stations.sort_unstable();
}

/// Reduce a measurement list to records that open a measurement
///
/// Survivors are ordered by file order. `on_removed` sees each dropped
/// index, including indices beyond `measurements`.
pub fn remove_non_measurements(
    list: &mut Vec<u32>,
    measurements: &[MeasurementRecord],
    mut on_removed: impl FnMut(u32),
) {
    list.retain(|&index| {
        let keep = measurements
            .get(index as usize)
            .is_some_and(|m| m.is_measurement_start());
        if !keep {
            on_removed(index);
        }
        keep
    });
    list.sort_by_key(|&i| (measurements[i as usize].file_order, i));
}

/// Apply `NAME,CODE` pairs to the named stations
///
/// Codes are upper-cased before storing.
pub fn apply_station_constraints(stations: &mut [StationRecord], constraints: &str) -> Result<()> {
    let tokens: Vec<&str> = constraints
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();

    for pair in tokens.chunks(2) {
        let name = pair[0];
        let index = stations
            .iter()
            .position(|s| s.name() == name)
            .ok_or_else(|| {
                Error::validation(format!(
                    "The supplied constraint station '{name}' is not in the network"
                ))
            })?;

        let code = pair.get(1).map(|c| c.to_ascii_uppercase()).unwrap_or_default();
        validate_constraint(&code).map_err(|_| {
            Error::station_validation(
                index as u32,
                format!("Invalid station constraint: '{code}' for '{name}'"),
            )
        })?;
        stations[index].set_constraint(&code);
    }

    if !tokens.is_empty() {
        debug!(stations = tokens.len().div_ceil(2), "Applied station constraints");
    }
    Ok(())
}

fn check_references(
    stations: &[StationRecord],
    asl: &[AslRecord],
    measurements: &[MeasurementRecord],
) -> Result<()> {
    if asl.len() != stations.len() {
        return Err(Error::validation(format!(
            "associated station list has {} entries for {} stations",
            asl.len(),
            stations.len()
        )));
    }

    for (index, measurement) in measurements.iter().enumerate() {
        if let Some(station) = measurement
            .stations()
            .find(|&s| s as usize >= stations.len())
        {
            return Err(Error::station_validation(
                station,
                format!(
                    "measurement {index} references station {station}, only {} loaded",
                    stations.len()
                ),
            ));
        }
    }
    Ok(())
}

fn build_blocks(
    partitions: &[Vec<u32>],
    free_stations: &[u32],
    measurements: &[MeasurementRecord],
) -> Vec<Block> {
    let free: HashSet<u32> = free_stations.iter().copied().collect();

    partitions
        .par_iter()
        .map(|partition| {
            let mut isl = Vec::with_capacity(partition.len());
            let mut station_map = HashMap::with_capacity(partition.len());
            for &station in partition {
                if free.contains(&station) && !station_map.contains_key(&station) {
                    station_map.insert(station, isl.len() as u32);
                    isl.push(station);
                }
            }

            let measurements = measurements
                .iter()
                .enumerate()
                .filter(|(_, m)| m.stations().all(|s| station_map.contains_key(&s)))
                .map(|(i, _)| i as u32)
                .collect();

            Block {
                isl,
                station_map,
                measurements,
            }
        })
        .collect()
}

fn network_state(
    stations: &[StationRecord],
    asl: &[AslRecord],
    measurements: &[MeasurementRecord],
    free_stations: &[u32],
    blocks: &[Block],
    counts: Vec<MeasurementCounts>,
) -> NetworkState {
    let unknowns = UNKNOWNS_PER_STATION * free_stations.len() as u32;
    let measurement_count = counts.iter().map(|c| c.measurement_count).sum();

    NetworkState {
        station_count: stations.len() as u32,
        asl_count: asl.len() as u32,
        measurement_record_count: measurements.len() as u32,
        unknown_params: unknowns,
        unknowns_count: unknowns,
        measurement_params: measurement_count,
        measurement_count,
        measurement_variance_count: counts.iter().map(|c| c.variance_count).sum(),
        block_unknowns_count: blocks
            .iter()
            .map(|b| UNKNOWNS_PER_STATION * b.isl.len() as u32)
            .collect(),
        block_measurement_count: counts.iter().map(|c| c.measurement_count).collect(),
        block_measurement_variance_count: counts.iter().map(|c| c.variance_count).collect(),
        block_measurement_params: counts.iter().map(|c| c.measurement_params).collect(),
        isl: blocks.iter().map(|b| b.isl.clone()).collect(),
        cml: counts.into_iter().map(|c| c.clusters).collect(),
        block_station_maps: blocks.iter().map(|b| b.station_map.clone()).collect(),
    }
}
