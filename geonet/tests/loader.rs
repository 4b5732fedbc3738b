mod common;

use geonet::processor::NO_MEASUREMENTS;
use geonet::{
    AdjustmentMode, Component, Error, LoadOutputs, LoadState, MeasurementType, NetworkDataLoader,
    NetworkState, StationRecord,
};
use std::sync::{Arc, Mutex};

type Reports = Arc<Mutex<Vec<(String, u32)>>>;

fn reporting(loader: &mut NetworkDataLoader) -> Reports {
    let reports: Reports = Arc::default();
    let sink = reports.clone();
    loader.set_error_reporter(move |message, station| {
        sink.lock().unwrap().push((message.to_string(), station));
    });
    reports
}

#[test]
fn simultaneous_load() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let fixture = common::write_network(&common::network_measurements());
    let mut loader = NetworkDataLoader::new(fixture.config().with_aml_file(&fixture.aml));

    let updates = Arc::new(Mutex::new(Vec::new()));
    let sink = updates.clone();
    loader.set_measurement_count_updater(move |count, variances| {
        sink.lock().unwrap().push((count, variances));
    });
    let removed = Arc::new(Mutex::new(Vec::new()));
    let removed_sink = removed.clone();
    loader.set_non_measurement_remover(move |index| removed_sink.lock().unwrap().push(index));

    let data = loader.try_load().unwrap();
    assert_eq!(loader.state(), LoadState::Done { success: true });

    let state = &data.state;
    assert_eq!(state.station_count, 4);
    assert_eq!(state.asl_count, 4);
    assert_eq!(state.measurement_record_count, 9);
    assert_eq!(data.free_stations, vec![0, 1, 2]);
    assert_eq!(state.unknowns_count, 9);
    assert_eq!(state.unknown_params, 9);

    // S, G, H, X, X; the direction set touches invalid DUNE
    assert_eq!(state.measurement_count, 5);
    assert_eq!(state.measurement_params, 5);
    assert_eq!(state.measurement_variance_count, 11);
    assert_eq!(*updates.lock().unwrap(), vec![(5, 11)]);
    // Y and Z records of the G baseline
    assert_eq!(*removed.lock().unwrap(), vec![2, 3]);

    assert_eq!(state.isl, vec![vec![0, 1, 2]]);
    assert_eq!(state.block_unknowns_count, vec![9]);
    assert_eq!(state.block_measurement_count, vec![5]);
    assert_eq!(state.cml, vec![vec![vec![0], vec![1], vec![5], vec![7, 6]]]);
    assert_eq!(state.block_station_maps[0].get(&2), Some(&2));
    assert_eq!(state.block_station_maps[0].len(), 3);
    for &index in state.cml[0].iter().flatten() {
        assert!(data.measurements[index as usize]
            .stations()
            .all(|s| state.block_station_maps[0].contains_key(&s)));
    }

    assert_eq!(data.block_meta.len(), 1);
    assert!(data.block_meta[0].first && data.block_meta[0].last);
    assert_eq!(data.parameter_stations, state.isl);

    let tallies = data.tallies.unwrap();
    assert_eq!(tallies.len(), 4);
    assert_eq!(tallies[0].count(MeasurementType::SlopeDistance), 1);
    assert_eq!(data.aml.map(|aml| aml.len()), Some(17));
}

#[test]
fn phased_blocks() {
    let fixture = common::write_network(&common::network_measurements());
    let config = fixture
        .config()
        .with_mode(AdjustmentMode::Phased)
        .with_blocks(vec![vec![0, 1], vec![1, 2, 3]]);
    let mut loader = NetworkDataLoader::new(config);

    let state = loader.try_load().unwrap().state;

    // station 3 is invalid, so the direction set joins no block
    assert_eq!(state.isl, vec![vec![0, 1], vec![1, 2]]);
    assert_eq!(state.block_unknowns_count, vec![6, 6]);
    assert_eq!(state.block_measurement_count, vec![2, 2]);
    assert_eq!(state.block_measurement_variance_count, vec![4, 4]);
    assert_eq!(state.measurement_count, 4);
    assert_eq!(state.unknowns_count, 9);
    assert_eq!(state.cml, vec![Vec::<Vec<u32>>::new(), Vec::new()]);
    assert_eq!(state.block_station_maps[1].get(&2), Some(&1));
    assert!(!state.block_station_maps[1].contains_key(&3));
}

#[test]
fn phased_default_partition() {
    let fixture = common::write_network(&common::network_measurements());
    let mut loader = NetworkDataLoader::new(fixture.config().with_mode(AdjustmentMode::Phased));

    let data = loader.try_load().unwrap();
    assert_eq!(data.state.isl, vec![vec![0, 1, 2]]);
    assert_eq!(data.state.measurement_count, 5);
    assert_eq!(data.state.measurement_variance_count, 11);
}

#[test]
fn simultaneous_counts_match_default_partition() {
    let fixture = common::write_network(&common::network_measurements());
    let simultaneous = NetworkDataLoader::new(fixture.config()).try_load().unwrap();
    let phased = NetworkDataLoader::new(fixture.config().with_mode(AdjustmentMode::Phased))
        .try_load()
        .unwrap();

    assert_eq!(simultaneous.state.measurement_count, phased.state.measurement_count);
    assert_eq!(
        simultaneous.state.measurement_variance_count,
        phased.state.measurement_variance_count
    );
    assert_eq!(simultaneous.state.block_station_maps, phased.state.block_station_maps);
}

#[test]
fn covariance_records_reach_remover() {
    let mut measurements = common::network_measurements();
    let mut covariance = measurements[1];
    covariance.component = Component::CovarianceX as u8;
    covariance.file_order = 7;
    measurements.push(covariance);
    let fixture = common::write_network(&measurements);

    let mut loader = NetworkDataLoader::new(fixture.config());
    let removed = Arc::new(Mutex::new(Vec::new()));
    let sink = removed.clone();
    loader.set_non_measurement_remover(move |index| sink.lock().unwrap().push(index));

    let state = loader.try_load().unwrap().state;
    assert_eq!(*removed.lock().unwrap(), vec![2, 3, 9]);
    assert!(!state.cml[0].iter().flatten().any(|&i| [2, 3, 9].contains(&i)));
    assert_eq!(state.measurement_count, 5);

    // phased modes never consult the remover
    let mut loader = NetworkDataLoader::new(fixture.config().with_mode(AdjustmentMode::Phased));
    let phased_removed = Arc::new(Mutex::new(Vec::new()));
    let sink = phased_removed.clone();
    loader.set_non_measurement_remover(move |index| sink.lock().unwrap().push(index));
    loader.try_load().unwrap();
    assert!(phased_removed.lock().unwrap().is_empty());
}

#[test]
fn phased_single_block() {
    let fixture = common::write_network(&common::network_measurements());
    let config = fixture
        .config()
        .with_mode(AdjustmentMode::PhasedSingleBlock)
        .with_blocks(vec![vec![0, 1], vec![1, 2, 3]]);

    let data = NetworkDataLoader::new(config).try_load().unwrap();
    assert_eq!(data.state.block_count(), 1);
    assert_eq!(data.state.measurement_count, 2);
    assert!(data.block_meta[0].first && data.block_meta[0].last);
}

#[test]
fn missing_file_leaves_outputs_untouched() {
    let fixture = common::write_network(&common::network_measurements());
    let config = fixture
        .config()
        .with_station_file(fixture.dir.path().join("absent.bst"));
    let mut loader = NetworkDataLoader::new(config);
    let reports = reporting(&mut loader);

    let mut stations = vec![StationRecord::new("KEEP")];
    let mut state = NetworkState {
        station_count: 42,
        ..NetworkState::default()
    };
    let ok = loader.load(LoadOutputs {
        stations: Some(&mut stations),
        state: Some(&mut state),
        ..LoadOutputs::default()
    });

    assert!(!ok);
    assert_eq!(loader.state(), LoadState::Done { success: false });
    assert_eq!(stations.len(), 1);
    assert_eq!(stations[0].name(), "KEEP");
    assert_eq!(state.station_count, 42);

    let reports = reports.lock().unwrap();
    assert_eq!(reports.len(), 1);
    assert!(reports[0].0.contains("absent.bst"));
    assert_eq!(reports[0].1, 0);
}

#[test]
fn load_fills_requested_outputs() {
    let fixture = common::write_network(&common::network_measurements());
    let mut loader = NetworkDataLoader::new(fixture.config());

    let mut measurements = Vec::new();
    let mut state = NetworkState::default();
    assert!(loader.load(LoadOutputs {
        measurements: Some(&mut measurements),
        state: Some(&mut state),
        ..LoadOutputs::default()
    }));

    assert_eq!(measurements.len(), 9);
    assert_eq!(state.measurement_count, 5);
}

#[test]
fn dangling_station_reference_reported() {
    let mut measurements = common::network_measurements();
    measurements[0].station2 = 9;
    let fixture = common::write_network(&measurements);
    let mut loader = NetworkDataLoader::new(fixture.config());
    let reports = reporting(&mut loader);

    let err = loader.try_load().err().unwrap();
    assert!(matches!(err, Error::Validation { .. }));
    assert_eq!(reports.lock().unwrap()[0].1, 9);
}

#[test]
fn asl_station_count_mismatch() {
    let fixture = common::write_network(&common::network_measurements());
    geonet::AslFile::write(&fixture.asl, &[Some(geonet::AslRecord::new(0, 0, true))]).unwrap();

    let err = NetworkDataLoader::new(fixture.config())
        .try_load()
        .err()
        .unwrap();
    assert!(err.to_string().contains("1 entries for 4 stations"));
}

#[test]
fn all_ignored_measurements_fail() {
    let mut measurements = common::network_measurements();
    for m in &mut measurements {
        m.set_ignored(true);
    }
    let fixture = common::write_network(&measurements);

    for mode in [AdjustmentMode::Simultaneous, AdjustmentMode::Phased] {
        let mut loader = NetworkDataLoader::new(fixture.config().with_mode(mode));
        let reports = reporting(&mut loader);

        assert!(!loader.load(LoadOutputs::default()));
        assert_eq!(reports.lock().unwrap()[0].0, format!("Validation error: {NO_MEASUREMENTS}"));
    }
}

#[test]
fn injected_callbacks_replace_defaults() {
    let fixture = common::write_network(&common::network_measurements());
    let mut loader = NetworkDataLoader::new(fixture.config().with_station_constraints("NOPE,CCC"));

    // keep every station, invalid or not
    loader.set_invalid_station_remover(|_free, _asl| {});
    loader.set_constraint_applier(|stations| {
        for station in stations {
            station.set_constraint("CCC");
        }
    });

    let data = loader.try_load().unwrap();
    assert_eq!(data.free_stations, vec![0, 1, 2, 3]);
    assert_eq!(data.state.unknowns_count, 12);
    assert!(data.stations.iter().all(|s| s.constraint() == "CCC"));
}

#[test]
fn station_constraints_applied() {
    let fixture = common::write_network(&common::network_measurements());
    let config = fixture.config().with_station_constraints("ALBY,ccc,CRAK,CCF");

    let data = NetworkDataLoader::new(config).try_load().unwrap();
    assert_eq!(data.stations[0].constraint(), "CCC");
    assert_eq!(data.stations[1].constraint(), "FFF");
    assert_eq!(data.stations[2].constraint(), "CCF");
}

#[test]
fn unknown_constraint_station_fails() {
    let fixture = common::write_network(&common::network_measurements());
    let mut loader =
        NetworkDataLoader::new(fixture.config().with_station_constraints("ZZZZ,CCC"));
    let reports = reporting(&mut loader);

    assert!(!loader.load(LoadOutputs::default()));
    assert!(reports.lock().unwrap()[0].0.contains("ZZZZ"));
}

#[test]
fn repeated_loads_compare_identical() {
    let fixture = common::write_network(&common::network_measurements());
    let first = NetworkDataLoader::new(fixture.config()).try_load().unwrap().state;
    let second = NetworkDataLoader::new(fixture.config()).try_load().unwrap().state;

    let mut out = String::new();
    assert!(first.diff(&second, &mut out).unwrap());

    let phased = NetworkDataLoader::new(fixture.config().with_mode(AdjustmentMode::Phased))
        .try_load()
        .unwrap()
        .state;
    out.clear();
    assert!(!first.diff(&phased, &mut out).unwrap());
    assert!(out.ends_with("NetworkState objects differ\n"));
}

#[test]
fn loader_is_send() {
    fn assert_send<T: Send>() {}
    assert_send::<NetworkDataLoader>();
}
