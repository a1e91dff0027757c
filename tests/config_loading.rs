// tests/config_loading.rs
//! Layered configuration loading feeding the simulator

use neuroalert_core::config::{ConfigError, ConfigLoader, NeuroAlertConfig};
use neuroalert_core::hal::EegSimulator;
use serial_test::serial;
use std::io::Write;
use tempfile::TempDir;

fn write_config(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

#[test]
#[serial]
fn test_loaded_config_drives_simulator() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "neuroalert.toml",
        r#"
[simulation]
prediction_cadence_ticks = 3
history_capacity = 4
seed = 11
        "#,
    );

    let config = ConfigLoader::with_paths(vec![path]).load().unwrap();
    let simulator = EegSimulator::new(config.simulation).unwrap();

    let predictions = (0..9).filter_map(|_| simulator.tick().prediction).count();
    assert_eq!(predictions, 3);
    assert_eq!(simulator.status().history_len, 4);
}

#[test]
#[serial]
fn test_environment_beats_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "neuroalert.toml", "[session]\nsample_window = 100\n");

    std::env::set_var("NEUROALERT__SESSION__SAMPLE_WINDOW", "250");
    std::env::set_var("NEUROALERT__SESSION__DEFAULT_PATIENT_ID", "ward_3");
    let result = ConfigLoader::with_paths(vec![path]).load();
    std::env::remove_var("NEUROALERT__SESSION__SAMPLE_WINDOW");
    std::env::remove_var("NEUROALERT__SESSION__DEFAULT_PATIENT_ID");

    let config = result.unwrap();
    assert_eq!(config.session.sample_window, 250);
    assert_eq!(config.session.default_patient_id, "ward_3");
}

#[test]
#[serial]
fn test_invalid_environment_value_rejected() {
    std::env::set_var("NEUROALERT__SIMULATION__NOISE_AMPLITUDE", "-1.0");
    let result = ConfigLoader::with_paths(Vec::new()).load();
    std::env::remove_var("NEUROALERT__SIMULATION__NOISE_AMPLITUDE");

    assert!(matches!(result, Err(ConfigError::Validation(_))));
}

#[test]
#[serial]
fn test_export_then_reload() {
    let dir = TempDir::new().unwrap();
    let source = write_config(&dir, "source.toml", "[simulation]\ntick_interval_ms = 50\n");
    let exported = dir.path().join("exported.toml");

    let loader = ConfigLoader::with_paths(vec![source]);
    let loaded = loader.load().unwrap();
    loader.export_config(&exported).unwrap();

    let reloaded = ConfigLoader::with_paths(vec![exported]).load().unwrap();
    assert_eq!(reloaded, loaded);
    assert_ne!(reloaded, NeuroAlertConfig::default());
}

#[test]
#[serial]
fn test_named_config_file_is_required() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("neuroalert.tmol");

    let result = ConfigLoader::from_file(&missing).load();
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));

    let present = write_config(&dir, "settings", "[simulation]\nseed = 3\n");
    let config = ConfigLoader::from_file(&present).load().unwrap();
    assert_eq!(config.simulation.seed, Some(3));
}
