//! Association-measurement list (AML) codec and station tallies
//!
//! The AML is an ordered list of measurement indices. Each station owns
//! the window `[offset, offset + count)` described by its ASL entry.
//! Availability of an entry is derived from the referenced measurement's
//! ignore flag and is never stored.

use crate::config::CodecConfig;
use crate::error::{Error, Result};
use crate::file_io;
use geonet_core::{validate_window, AmlRecord, AslRecord, MeasurementRecord, MeasurementType};
use rayon::prelude::*;
use std::io::Write;
use std::path::Path;
use tracing::{debug, warn};

/// One AML entry with its derived availability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmlEntry {
    /// Index into the measurement records
    pub measurement_index: u32,
    /// False when the referenced measurement is ignored
    pub available: bool,
}

/// Per-station measurement counts by type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MeasurementTally {
    counts: [u32; MeasurementType::COUNT],
}

impl MeasurementTally {
    /// Count one measurement of `kind`
    pub fn increment(&mut self, kind: MeasurementType) {
        self.counts[kind.index()] += 1;
    }

    /// Measurements of `kind`
    pub fn count(&self, kind: MeasurementType) -> u32 {
        self.counts[kind.index()]
    }

    /// Measurements of every kind
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Whether any GNSS measurement touches the station
    pub fn has_gnss(&self) -> bool {
        MeasurementType::ALL
            .iter()
            .any(|k| k.is_gnss() && self.count(*k) > 0)
    }

    /// Whether any absolute terrestrial measurement touches the station
    pub fn has_absolute_terrestrial(&self) -> bool {
        MeasurementType::ALL
            .iter()
            .any(|k| k.is_absolute_terrestrial() && self.count(*k) > 0)
    }
}

/// Reader and writer for AML files
pub struct AmlFile;

impl AmlFile {
    /// Write measurement indices in order
    pub fn write<P: AsRef<Path>>(path: P, indices: &[u32]) -> Result<usize> {
        Self::write_with_config(path, indices, &CodecConfig::default())
    }

    /// Write with explicit preamble values
    pub fn write_with_config<P: AsRef<Path>>(
        path: P,
        indices: &[u32],
        config: &CodecConfig,
    ) -> Result<usize> {
        let records: Vec<Option<AmlRecord>> = indices
            .iter()
            .map(|&measurement_index| Some(AmlRecord { measurement_index }))
            .collect();
        file_io::write_records(path, &records, config)
    }

    /// Load entries, deriving availability from `measurements`
    ///
    /// Fails if an entry references a measurement that does not exist.
    pub fn load<P: AsRef<Path>>(
        path: P,
        measurements: &[MeasurementRecord],
    ) -> Result<Vec<AmlEntry>> {
        let path = path.as_ref();
        let (_, records) = file_io::load_records::<AmlRecord, _>(path)?;

        let entries = records
            .iter()
            .enumerate()
            .map(|(position, record)| {
                let index = record.measurement_index;
                measurements
                    .get(index as usize)
                    .map(|m| AmlEntry {
                        measurement_index: index,
                        available: !m.is_ignored(),
                    })
                    .ok_or_else(|| {
                        Error::format(
                            path,
                            format!(
                                "entry {position} references measurement {index}, only {} loaded",
                                measurements.len()
                            ),
                        )
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            path = %path.display(),
            entries = entries.len(),
            unavailable = entries.iter().filter(|e| !e.available).count(),
            "Loaded association measurement list"
        );
        Ok(entries)
    }
}

/// Tally each station's associated measurements by type
///
/// Returns one tally per ASL entry; stations with no associations get an
/// empty tally. Unavailable entries are skipped.
pub fn create_measurement_to_station_tally(
    asl: &[AslRecord],
    aml: &[AmlEntry],
    measurements: &[MeasurementRecord],
) -> Result<Vec<MeasurementTally>> {
    asl.par_iter()
        .enumerate()
        .map(|(station, entry)| {
            validate_window(entry.offset, entry.count, aml.len()).map_err(|_| {
                Error::station_validation(
                    station as u32,
                    format!(
                        "station {station} AML window {}..{} exceeds {} entries",
                        entry.offset,
                        entry.window_end(),
                        aml.len()
                    ),
                )
            })?;

            let start = entry.offset as usize;
            let window = &aml[start..start + entry.count as usize];
            let mut tally = MeasurementTally::default();
            for association in window.iter().filter(|a| a.available) {
                let kind = measurements
                    .get(association.measurement_index as usize)
                    .filter(|m| !m.is_ignored())
                    .map(|m| m.kind());
                match kind {
                    Some(Ok(kind)) => tally.increment(kind),
                    Some(Err(e)) => {
                        return Err(Error::station_validation(station as u32, e.to_string()))
                    }
                    None => {}
                }
            }
            Ok(tally)
        })
        .collect()
}

/// Write the measurement-to-station table and redundancy warnings
///
/// One column per type present anywhere in the network, then a total.
/// Stations carrying both GNSS and absolute terrestrial measurements are
/// listed afterwards as possibly redundant.
pub fn write_measurement_to_station_summary<W: Write>(
    out: &mut W,
    tallies: &[MeasurementTally],
    station_names: &[&str],
) -> std::io::Result<()> {
    let present: Vec<MeasurementType> = MeasurementType::ALL
        .iter()
        .copied()
        .filter(|&k| tallies.iter().any(|t| t.count(k) > 0))
        .collect();

    writeln!(out, "MEASUREMENT TO STATIONS")?;
    writeln!(out)?;
    write!(out, "{:<20}", "Station")?;
    for kind in &present {
        write!(out, "{:>7}", kind.to_string())?;
    }
    writeln!(out, "{:>9}", "Total")?;
    writeln!(out, "{}", "-".repeat(20 + present.len() * 7 + 9))?;

    let name_of = |i: usize| station_names.get(i).copied().unwrap_or("?");
    for (i, tally) in tallies.iter().enumerate() {
        write!(out, "{:<20}", name_of(i))?;
        for &kind in &present {
            match tally.count(kind) {
                0 => write!(out, "{:>7}", "")?,
                n => write!(out, "{n:>7}")?,
            }
        }
        writeln!(out, "{:>9}", tally.total())?;
    }

    let redundant: Vec<usize> = tallies
        .iter()
        .enumerate()
        .filter(|(_, t)| t.has_gnss() && t.has_absolute_terrestrial())
        .map(|(i, _)| i)
        .collect();

    if !redundant.is_empty() {
        warn!(
            stations = redundant.len(),
            "Stations carry both GNSS and absolute terrestrial measurements"
        );
        writeln!(out)?;
        writeln!(
            out,
            "WARNING: {} station(s) carry both GNSS and absolute terrestrial measurements,",
            redundant.len()
        )?;
        writeln!(out, "which may be redundant:")?;
        for i in redundant {
            writeln!(out, "  {}", name_of(i))?;
        }
    }
    Ok(())
}
