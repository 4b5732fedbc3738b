//! Snapshot of a loaded network and field-by-field comparison

use hashbrown::HashMap;
use std::fmt::{self, Display, Write};

/// Counts and per-block aggregates produced by one load
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkState {
    pub station_count: u32,
    pub asl_count: u32,
    pub measurement_record_count: u32,
    pub unknown_params: u32,
    pub unknowns_count: u32,
    pub measurement_params: u32,
    pub measurement_count: u32,
    pub measurement_variance_count: u32,

    pub block_unknowns_count: Vec<u32>,
    pub block_measurement_count: Vec<u32>,
    pub block_measurement_variance_count: Vec<u32>,
    pub block_measurement_params: Vec<u32>,
    /// Stations of each block
    pub isl: Vec<Vec<u32>>,
    /// Measurement clusters of each block
    pub cml: Vec<Vec<Vec<u32>>>,
    /// Global to block-local station index, per block
    pub block_station_maps: Vec<HashMap<u32, u32>>,
}

impl NetworkState {
    /// Number of blocks
    pub fn block_count(&self) -> usize {
        self.isl.len()
    }

    /// Serialise to pretty JSON
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write one line per differing field to `out`
    ///
    /// Returns `Ok(true)` when the states are identical. A closing line
    /// states the overall outcome.
    pub fn diff<W: Write>(&self, other: &Self, out: &mut W) -> Result<bool, fmt::Error> {
        let mut d = Differ { out, equal: true };

        d.scalar("station_count", self.station_count, other.station_count)?;
        d.scalar("asl_count", self.asl_count, other.asl_count)?;
        d.scalar(
            "measurement_record_count",
            self.measurement_record_count,
            other.measurement_record_count,
        )?;
        d.scalar("unknown_params", self.unknown_params, other.unknown_params)?;
        d.scalar("unknowns_count", self.unknowns_count, other.unknowns_count)?;
        d.scalar(
            "measurement_params",
            self.measurement_params,
            other.measurement_params,
        )?;
        d.scalar(
            "measurement_count",
            self.measurement_count,
            other.measurement_count,
        )?;
        d.scalar(
            "measurement_variance_count",
            self.measurement_variance_count,
            other.measurement_variance_count,
        )?;

        d.vector(
            "block_unknowns_count",
            &self.block_unknowns_count,
            &other.block_unknowns_count,
        )?;
        d.vector(
            "block_measurement_count",
            &self.block_measurement_count,
            &other.block_measurement_count,
        )?;
        d.vector(
            "block_measurement_variance_count",
            &self.block_measurement_variance_count,
            &other.block_measurement_variance_count,
        )?;
        d.vector(
            "block_measurement_params",
            &self.block_measurement_params,
            &other.block_measurement_params,
        )?;
        d.nested("isl", &self.isl, &other.isl)?;

        if d.size("cml", self.cml.len(), other.cml.len())? {
            for (i, (a, b)) in self.cml.iter().zip(&other.cml).enumerate() {
                d.nested(&format!("cml[{i}]"), a, b)?;
            }
        }

        if d.size(
            "block_station_maps",
            self.block_station_maps.len(),
            other.block_station_maps.len(),
        )? {
            for (i, (a, b)) in self
                .block_station_maps
                .iter()
                .zip(&other.block_station_maps)
                .enumerate()
            {
                d.map(&format!("block_station_maps[{i}]"), a, b)?;
            }
        }

        let equal = d.equal;
        if equal {
            writeln!(out, "NetworkState objects are identical")?;
        } else {
            writeln!(out, "NetworkState objects differ")?;
        }
        Ok(equal)
    }
}

struct Differ<'a, W> {
    out: &'a mut W,
    equal: bool,
}

impl<W: Write> Differ<'_, W> {
    fn scalar<T: PartialEq + Display>(&mut self, path: &str, a: T, b: T) -> fmt::Result {
        if a != b {
            self.equal = false;
            writeln!(self.out, "{path} : {a}  \u{2260}  {b}")?;
        }
        Ok(())
    }

    /// Compare lengths; true when they match and elements should be walked
    fn size(&mut self, path: &str, a: usize, b: usize) -> Result<bool, fmt::Error> {
        self.scalar(&format!("{path}.size()"), a, b)?;
        Ok(a == b)
    }

    fn vector(&mut self, path: &str, a: &[u32], b: &[u32]) -> fmt::Result {
        if self.size(path, a.len(), b.len())? {
            for (i, (x, y)) in a.iter().zip(b).enumerate() {
                self.scalar(&format!("{path}[{i}]"), x, y)?;
            }
        }
        Ok(())
    }

    fn nested(&mut self, path: &str, a: &[Vec<u32>], b: &[Vec<u32>]) -> fmt::Result {
        if self.size(path, a.len(), b.len())? {
            for (i, (x, y)) in a.iter().zip(b).enumerate() {
                self.vector(&format!("{path}[{i}]"), x, y)?;
            }
        }
        Ok(())
    }

    fn map(&mut self, path: &str, a: &HashMap<u32, u32>, b: &HashMap<u32, u32>) -> fmt::Result {
        self.size(path, a.len(), b.len())?;

        let mut keys: Vec<u32> = a.keys().chain(b.keys()).copied().collect();
        keys.sort_unstable();
        keys.dedup();

        for key in keys {
            let entry = format!("{path}{{{key}}}");
            match (a.get(&key), b.get(&key)) {
                (Some(x), Some(y)) => self.scalar(&entry, x, y)?,
                (Some(x), None) => self.scalar(&entry, x.to_string(), "(absent)".to_string())?,
                (None, Some(y)) => self.scalar(&entry, "(absent)".to_string(), y.to_string())?,
                (None, None) => {}
            }
        }
        Ok(())
    }
}
