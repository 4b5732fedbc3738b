//! Measurement counting and cluster construction
//!
//! A record is live when it is not ignored and opens a measurement
//! (component X). Continuation and covariance records of a multi-record
//! measurement are never counted on their own. A direction set counts
//! one measurement per target direction, or one when it has no targets.

use crate::error::{Error, Result};
use geonet_core::{MeasurementRecord, MeasurementType};
use hashbrown::HashMap;
use tracing::debug;

/// Reported when a non-empty measurement set has nothing live to adjust
pub const NO_MEASUREMENTS: &str = "No measurements were found. If measurements were successfully \
     loaded on import, ensure that all measurements have not been ignored.";

/// Variance terms per GNSS measurement (full 3x3 covariance block)
pub const GNSS_VARIANCE_TERMS: u32 = 3;

/// Adjustment mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AdjustmentMode {
    /// All stations solved in one block
    #[default]
    Simultaneous,
    /// Stations solved block by block
    Phased,
    /// Only the first block of a phased adjustment
    PhasedSingleBlock,
}

impl AdjustmentMode {
    /// Whether this mode builds cluster measurement lists
    pub const fn builds_clusters(self) -> bool {
        matches!(self, AdjustmentMode::Simultaneous)
    }
}

/// Counts derived from one set of measurements
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MeasurementCounts {
    /// Live measurements
    pub measurement_count: u32,
    /// Variance terms of the live measurements
    pub variance_count: u32,
    /// Measurement parameters; equals `measurement_count`
    pub measurement_params: u32,
    /// Cluster measurement list, simultaneous mode only
    pub clusters: Vec<Vec<u32>>,
}

/// Whether a record contributes to counts
pub fn is_live(record: &MeasurementRecord) -> bool {
    !record.is_ignored() && record.is_measurement_start()
}

/// Computes measurement counts and clusters for one adjustment mode
#[derive(Debug, Clone, Copy)]
pub struct MeasurementProcessor {
    mode: AdjustmentMode,
}

impl MeasurementProcessor {
    /// Create a processor for `mode`
    pub fn new(mode: AdjustmentMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> AdjustmentMode {
        self.mode
    }

    /// Process the first `target_count` records
    ///
    /// Fails if `target_count` exceeds the records supplied, or if it is
    /// non-zero and none of those records is live.
    pub fn process_for_mode(
        &self,
        measurements: &[MeasurementRecord],
        target_count: usize,
    ) -> Result<MeasurementCounts> {
        if target_count > measurements.len() {
            return Err(Error::validation(format!(
                "requested {target_count} measurements, only {} supplied",
                measurements.len()
            )));
        }
        let indices: Vec<u32> = (0..target_count as u32).collect();
        self.process_block(measurements, &indices)
    }

    /// Process the records at `indices`, in the order given
    ///
    /// Clusters hold indices into `measurements`. They appear in order of
    /// first occurrence and each is sorted by file order. A cluster id of
    /// zero always yields a singleton.
    pub fn process_block(
        &self,
        measurements: &[MeasurementRecord],
        indices: &[u32],
    ) -> Result<MeasurementCounts> {
        let mut counts = MeasurementCounts::default();
        let mut cluster_slots: HashMap<u32, usize> = HashMap::new();

        for &index in indices {
            let record = measurements.get(index as usize).ok_or_else(|| {
                Error::validation(format!(
                    "measurement index {index} out of range for {} records",
                    measurements.len()
                ))
            })?;
            if !is_live(record) {
                continue;
            }

            let kind = record.kind().map_err(|e| {
                Error::validation(format!("measurement {index}: {e}"))
            })?;
            let (observed, variances) = match kind {
                MeasurementType::DirectionSet => {
                    let directions = record.vector_count2.max(1);
                    (directions, directions)
                }
                kind if kind.is_gnss() => (1, GNSS_VARIANCE_TERMS),
                _ => (1, 1),
            };
            counts.measurement_count += observed;
            counts.variance_count += variances;

            if !self.mode.builds_clusters() {
                continue;
            }
            if record.cluster_id == 0 {
                counts.clusters.push(vec![index]);
                continue;
            }
            match cluster_slots.get(&record.cluster_id) {
                Some(&slot) => counts.clusters[slot].push(index),
                None => {
                    cluster_slots.insert(record.cluster_id, counts.clusters.len());
                    counts.clusters.push(vec![index]);
                }
            }
        }

        if !indices.is_empty() && counts.measurement_count == 0 {
            return Err(Error::validation(NO_MEASUREMENTS));
        }

        for cluster in &mut counts.clusters {
            cluster.sort_by_key(|&i| (measurements[i as usize].file_order, i));
        }
        counts.measurement_params = counts.measurement_count;

        debug!(
            mode = ?self.mode,
            measurements = counts.measurement_count,
            variances = counts.variance_count,
            clusters = counts.clusters.len(),
            "Processed measurements"
        );
        Ok(counts)
    }
}
