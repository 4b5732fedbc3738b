#![allow(dead_code)]

use geonet::{
    AmlFile, AslFile, AslRecord, BinaryMetadata, Component, DataKind, InputFileRecord,
    LoaderConfig, MeasurementFile, MeasurementRecord, MeasurementType, StationFile,
    StationRecord,
};
use std::path::PathBuf;
use tempfile::TempDir;

pub const STATION_NAMES: [&str; 4] = ["ALBY", "BALD", "CRAK", "DUNE"];

/// Files of a small network written to a temporary directory
pub struct Fixture {
    pub dir: TempDir,
    pub stations: PathBuf,
    pub asl: PathBuf,
    pub measurements: PathBuf,
    pub aml: PathBuf,
}

impl Fixture {
    pub fn config(&self) -> LoaderConfig {
        LoaderConfig::new(&self.stations, &self.asl, &self.measurements)
    }
}

fn measurement(kind: MeasurementType, stations: &[u32], file_order: u32) -> MeasurementRecord {
    let mut record = MeasurementRecord::new(kind, stations);
    record.file_order = file_order;
    record
}

/// Four stations, the last one invalid
///
/// Live measurements: 0 S, 1 G, 5 H, 6 X, 7 X, 8 D. Records 2 and 3
/// continue the G baseline and record 4 is ignored.
pub fn network_measurements() -> Vec<MeasurementRecord> {
    let gnss = measurement(MeasurementType::GnssBaseline, &[0, 2], 1);
    let mut gnss_y = gnss;
    gnss_y.component = Component::ValueY as u8;
    let mut gnss_z = gnss;
    gnss_z.component = Component::ValueZ as u8;
    let mut ignored = measurement(MeasurementType::LevelDifference, &[1, 2], 2);
    ignored.set_ignored(true);
    let mut cluster_a = measurement(MeasurementType::GnssBaselineCluster, &[0, 1], 5);
    cluster_a.cluster_id = 5;
    let mut cluster_b = measurement(MeasurementType::GnssBaselineCluster, &[1, 2], 4);
    cluster_b.cluster_id = 5;

    vec![
        measurement(MeasurementType::SlopeDistance, &[0, 1], 0),
        gnss,
        gnss_y,
        gnss_z,
        ignored,
        measurement(MeasurementType::OrthometricHeight, &[2], 3),
        cluster_a,
        cluster_b,
        measurement(MeasurementType::DirectionSet, &[2, 3], 6),
    ]
}

pub fn metadata(kind: DataKind) -> BinaryMetadata {
    BinaryMetadata {
        modified_by: "geonet-tests".to_string(),
        epsg: "7843".to_string(),
        epoch: "01.01.2020".to_string(),
        input_files: vec![InputFileRecord::new("network.xml", "7843", "01.01.2020", 1, kind)],
        ..BinaryMetadata::default()
    }
}

/// AML window of each station over `measurements`
pub fn associations(
    station_count: usize,
    measurements: &[MeasurementRecord],
    valid: impl Fn(usize) -> bool,
) -> (Vec<AslRecord>, Vec<u32>) {
    let mut asl = Vec::with_capacity(station_count);
    let mut aml = Vec::new();
    for station in 0..station_count as u32 {
        let offset = aml.len() as u32;
        aml.extend(
            measurements
                .iter()
                .enumerate()
                .filter(|(_, m)| m.stations().any(|s| s == station))
                .map(|(i, _)| i as u32),
        );
        let count = aml.len() as u32 - offset;
        asl.push(AslRecord::new(count, offset, valid(station as usize)));
    }
    (asl, aml)
}

pub fn write_network(measurements: &[MeasurementRecord]) -> Fixture {
    let dir = TempDir::new().unwrap();
    let fixture = Fixture {
        stations: dir.path().join("network.bst"),
        asl: dir.path().join("network.asl"),
        measurements: dir.path().join("network.bms"),
        aml: dir.path().join("network.aml"),
        dir,
    };

    let stations: Vec<Option<StationRecord>> = STATION_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let mut station = StationRecord::new(name);
            station.file_order = i as u32;
            station.set_constraint("FFF");
            Some(station)
        })
        .collect();
    StationFile::write(&fixture.stations, &stations, &metadata(DataKind::Station)).unwrap();

    let records: Vec<Option<MeasurementRecord>> = measurements.iter().copied().map(Some).collect();
    MeasurementFile::write(
        &fixture.measurements,
        &records,
        &metadata(DataKind::Measurement),
    )
    .unwrap();

    let (asl, aml) = associations(STATION_NAMES.len(), measurements, |s| s != 3);
    let asl: Vec<Option<AslRecord>> = asl.into_iter().map(Some).collect();
    AslFile::write(&fixture.asl, &asl).unwrap();
    AmlFile::write(&fixture.aml, &aml).unwrap();

    fixture
}
