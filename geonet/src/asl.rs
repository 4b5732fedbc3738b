//! Associated-station list (ASL) codec
//!
//! One entry per station: how many AML entries belong to it, where they
//! start, and whether the station is valid.

use crate::config::CodecConfig;
use crate::error::Result;
use crate::file_io;
use geonet_core::AslRecord;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Result of loading an ASL file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AslLoad {
    /// Entries in station order
    pub entries: Vec<AslRecord>,
    /// Station indices free for adjustment, `0..count` at load time
    pub free_stations: Vec<u32>,
}

/// Reader and writer for ASL files
pub struct AslFile;

impl AslFile {
    /// Load all entries
    ///
    /// Validity is not applied here; the loader narrows `free_stations`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<AslLoad> {
        let (_, entries) = file_io::load_records::<AslRecord, _>(&path)?;
        let free_stations = (0..entries.len() as u32).collect();

        debug!(
            path = %path.as_ref().display(),
            entries = entries.len(),
            "Loaded associated station list"
        );
        Ok(AslLoad {
            entries,
            free_stations,
        })
    }

    /// Write the `Some` entries, keeping their relative order
    ///
    /// Returns the number of entries written.
    pub fn write<P: AsRef<Path>>(path: P, entries: &[Option<AslRecord>]) -> Result<usize> {
        Self::write_with_config(path, entries, &CodecConfig::default())
    }

    /// Write with explicit preamble values
    pub fn write_with_config<P: AsRef<Path>>(
        path: P,
        entries: &[Option<AslRecord>],
        config: &CodecConfig,
    ) -> Result<usize> {
        file_io::write_records(path, entries, config)
    }

    /// Render entries as a table sorted by measurement count
    ///
    /// For inspection only. Stations with no measurements show `-` for the
    /// AML offset, invalid stations are marked with `*`.
    pub fn write_text<W: Write>(
        out: &mut W,
        entries: &[AslRecord],
        station_names: &[&str],
    ) -> std::io::Result<()> {
        let mut order: Vec<usize> = (0..entries.len()).collect();
        order.sort_by_key(|&i| entries[i].count);

        writeln!(out, "{:<20}{:>10}{:>12}", "STATION", "MSR COUNT", "AML OFFSET")?;
        writeln!(out, "{}", "-".repeat(43))?;

        for i in order {
            let entry = &entries[i];
            let name = station_names.get(i).copied().unwrap_or("?");
            let offset = if entry.count == 0 {
                "-".to_string()
            } else {
                entry.offset.to_string()
            };
            let flag = if entry.is_valid() { "" } else { " *" };
            writeln!(out, "{name:<20}{:>10}{offset:>12}{flag}", entry.count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_free_stations_identity() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("network.asl");
        let entries: Vec<_> = (0..5)
            .map(|i| Some(AslRecord::new(i, i * 2, i % 2 == 0)))
            .collect();

        AslFile::write(&path, &entries).unwrap();
        let loaded = AslFile::load(&path).unwrap();

        assert_eq!(loaded.free_stations, vec![0, 1, 2, 3, 4]);
        assert_eq!(loaded.entries.len(), 5);
        assert!(!loaded.entries[1].is_valid());
    }

    #[test]
    fn test_none_entries_dropped_in_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sparse.asl");
        let entries = [
            None,
            Some(AslRecord::new(3, 0, true)),
            None,
            Some(AslRecord::new(1, 3, false)),
        ];

        assert_eq!(AslFile::write(&path, &entries).unwrap(), 2);
        let loaded = AslFile::load(&path).unwrap();
        assert_eq!(
            loaded.entries,
            vec![AslRecord::new(3, 0, true), AslRecord::new(1, 3, false)]
        );
        assert_eq!(loaded.free_stations, vec![0, 1]);
    }

    #[test]
    fn test_missing_file_yields_no_output() {
        let dir = TempDir::new().unwrap();
        assert!(AslFile::load(dir.path().join("absent.asl")).is_err());
    }

    #[test]
    fn test_text_render_sorted_by_count() {
        let entries = [
            AslRecord::new(4, 0, true),
            AslRecord::new(0, 4, true),
            AslRecord::new(2, 4, false),
        ];
        let mut out = Vec::new();
        AslFile::write_text(&mut out, &entries, &["ALBY", "BALD", "CRAK"]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let rows: Vec<&str> = text.lines().skip(2).collect();

        assert_eq!(rows.len(), 3);
        assert!(rows[0].starts_with("BALD"));
        assert!(rows[0].trim_end().ends_with('-'));
        assert!(rows[1].starts_with("CRAK"));
        assert!(rows[1].ends_with(" *"));
        assert!(rows[2].starts_with("ALBY"));
    }
}
