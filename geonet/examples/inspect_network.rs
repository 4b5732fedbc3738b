//! Writes a small network, loads it and prints the inspection reports
//!
//! Run with `RUST_LOG=geonet=debug` to see the loader's progress.

use geonet::{
    write_measurement_to_station_summary, AmlFile, AslFile, AslRecord, BinaryMetadata,
    DataKind, InputFileRecord, LoaderConfig, MeasurementFile, MeasurementRecord, MeasurementType,
    NetworkDataLoader, StationFile, StationRecord,
};
use std::io::Write;
use tempfile::TempDir;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("geonet=info")))
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let names = ["ALBY", "BALD", "CRAK"];
    let measurements = vec![
        MeasurementRecord::new(MeasurementType::SlopeDistance, &[0, 1]),
        MeasurementRecord::new(MeasurementType::GnssBaseline, &[0, 2]),
        MeasurementRecord::new(MeasurementType::EllipsoidHeight, &[2]),
        MeasurementRecord::new(MeasurementType::HorizontalAngle, &[1, 0, 2]),
    ];

    let mut asl = Vec::new();
    let mut aml = Vec::new();
    for station in 0..names.len() as u32 {
        let offset = aml.len() as u32;
        for (i, m) in measurements.iter().enumerate() {
            if m.stations().any(|s| s == station) {
                aml.push(i as u32);
            }
        }
        asl.push(Some(AslRecord::new(aml.len() as u32 - offset, offset, true)));
    }

    let dir = TempDir::new()?;
    let bst = dir.path().join("demo.bst");
    let bms = dir.path().join("demo.bms");
    let asl_path = dir.path().join("demo.asl");
    let aml_path = dir.path().join("demo.aml");

    let metadata = |kind| BinaryMetadata {
        epsg: "7843".to_string(),
        input_files: vec![InputFileRecord::new("demo.xml", "7843", "01.01.2020", 1, kind)],
        ..BinaryMetadata::default()
    };
    let stations: Vec<Option<StationRecord>> =
        names.iter().map(|n| Some(StationRecord::new(n))).collect();
    let records: Vec<Option<MeasurementRecord>> = measurements.iter().copied().map(Some).collect();

    StationFile::write(&bst, &stations, &metadata(DataKind::Station))?;
    MeasurementFile::write(&bms, &records, &metadata(DataKind::Measurement))?;
    AslFile::write(&asl_path, &asl)?;
    AmlFile::write(&aml_path, &aml)?;

    let config = LoaderConfig::new(&bst, &asl_path, &bms)
        .with_aml_file(&aml_path)
        .with_station_constraints("ALBY,CCC");
    let mut loader = NetworkDataLoader::new(config);
    loader.set_error_reporter(|message, station| eprintln!("station {station}: {message}"));
    let data = loader.try_load()?;

    let mut out = std::io::stdout().lock();
    AslFile::write_text(&mut out, &data.asl, &names)?;
    writeln!(out)?;
    if let Some(tallies) = &data.tallies {
        write_measurement_to_station_summary(&mut out, tallies, &names)?;
    }
    writeln!(out)?;
    writeln!(out, "{}", data.state.to_json()?)?;

    Ok(())
}
