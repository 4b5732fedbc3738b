//! Measurement file codec

use crate::config::CodecConfig;
use crate::error::{Error, Result};
use crate::file_io;
use geonet_core::{BinaryMetadata, MeasurementRecord};
use std::path::Path;
use tracing::debug;

/// Reader and writer for binary measurement files
pub struct MeasurementFile;

impl MeasurementFile {
    /// Load every measurement record and the file's metadata block
    ///
    /// Fails if any record carries an unknown type code or component.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<(Vec<MeasurementRecord>, BinaryMetadata)> {
        let path = path.as_ref();
        let (measurements, metadata) = file_io::load_with_metadata::<MeasurementRecord, _>(path)?;

        for (index, record) in measurements.iter().enumerate() {
            if record.kind().is_err() {
                return Err(Error::format(
                    path,
                    format!(
                        "measurement {index} has unknown type code {:#04x}",
                        record.measurement_type
                    ),
                ));
            }
            if record.component().is_err() {
                return Err(Error::format(
                    path,
                    format!(
                        "measurement {index} has unknown component {}",
                        record.component
                    ),
                ));
            }
        }

        debug!(
            path = %path.display(),
            measurements = measurements.len(),
            "Loaded measurement file"
        );
        Ok((measurements, metadata))
    }

    /// Write measurements with default preamble values
    ///
    /// `None` entries are skipped. Returns the number of records written.
    pub fn write<P: AsRef<Path>>(
        path: P,
        measurements: &[Option<MeasurementRecord>],
        metadata: &BinaryMetadata,
    ) -> Result<usize> {
        Self::write_with_config(path, measurements, metadata, &CodecConfig::default())
    }

    /// Write measurements with explicit preamble values
    pub fn write_with_config<P: AsRef<Path>>(
        path: P,
        measurements: &[Option<MeasurementRecord>],
        metadata: &BinaryMetadata,
        config: &CodecConfig,
    ) -> Result<usize> {
        file_io::write_with_metadata(path, measurements, metadata, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geonet_core::{DataKind, InputFileRecord, MeasurementType};
    use tempfile::TempDir;

    #[test]
    fn test_measurement_fields_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("network.bms");

        let mut distance = MeasurementRecord::new(MeasurementType::SlopeDistance, &[0, 1]);
        distance.terms = [1523.4471, 1.52, 1.6];
        distance.scales = [0.004, 0.0, 0.0];
        distance.file_order = 3;
        distance.set_epsg("7843");
        distance.set_epoch("01.01.2020");

        let mut height = MeasurementRecord::new(MeasurementType::OrthometricHeight, &[2]);
        height.set_ignored(true);
        height.cluster_id = 12;

        let metadata = BinaryMetadata {
            input_files: vec![InputFileRecord::new(
                "network.msr",
                "7843",
                "01.01.2020",
                1,
                DataKind::Measurement,
            )],
            ..BinaryMetadata::default()
        };

        MeasurementFile::write(&path, &[Some(distance), None, Some(height)], &metadata).unwrap();
        let (loaded, loaded_meta) = MeasurementFile::load(&path).unwrap();

        assert_eq!(loaded, vec![distance, height]);
        assert!(loaded[1].is_ignored());
        assert_eq!(loaded[0].epsg(), "7843");
        assert_eq!(loaded_meta.measurement_inputs().len(), 1);
    }

    #[test]
    fn test_unknown_type_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.bms");

        let mut record = MeasurementRecord::new(MeasurementType::LevelDifference, &[0, 1]);
        record.measurement_type = b'W';
        MeasurementFile::write(&path, &[Some(record)], &BinaryMetadata::default()).unwrap();

        let err = MeasurementFile::load(&path).err().unwrap();
        assert!(matches!(err, Error::Format { .. }));
        assert!(err.to_string().contains("measurement 0"));
    }

    #[test]
    fn test_unknown_component_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.bms");

        let distance = MeasurementRecord::new(MeasurementType::SlopeDistance, &[0, 1]);
        let mut corrupt = MeasurementRecord::new(MeasurementType::GnssBaseline, &[0, 1]);
        corrupt.component = 9;
        MeasurementFile::write(
            &path,
            &[Some(distance), Some(corrupt)],
            &BinaryMetadata::default(),
        )
        .unwrap();

        let err = MeasurementFile::load(&path).err().unwrap();
        assert!(matches!(err, Error::Format { .. }));
        assert!(err.to_string().contains("measurement 1 has unknown component 9"));
    }
}
