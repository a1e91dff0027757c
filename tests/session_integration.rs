// tests/session_integration.rs
//! Session recording on top of a running simulator

use neuroalert_core::config::SessionConfig;
use neuroalert_core::hal::simulation::SimulationConfig;
use neuroalert_core::hal::EegSimulator;
use neuroalert_core::session::{
    SessionError, SessionRecorder, SessionReport, SessionStatus, SessionType,
};
use neuroalert_core::utils::time::MockTimeProvider;
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::time::sleep;

const T0: u64 = 1_700_000_000_000;

fn setup(
    config: SessionConfig,
) -> (SessionRecorder<EegSimulator>, Arc<EegSimulator>, Arc<MockTimeProvider>) {
    let clock = Arc::new(MockTimeProvider::new(T0));
    let simulator = Arc::new(
        EegSimulator::with_time_provider(SimulationConfig::seeded(77), clock.clone())
            .expect("valid config"),
    );
    let recorder = SessionRecorder::with_time_provider(Arc::clone(&simulator), config, clock.clone());
    (recorder, simulator, clock)
}

#[tokio::test(start_paused = true)]
async fn test_paused_session_records_nothing() {
    let (recorder, simulator, _clock) = setup(SessionConfig::default());

    recorder
        .start("patient_007", SessionType::Monitoring)
        .expect("Failed to start session");
    sleep(Duration::from_millis(4_100)).await;

    recorder.pause().expect("Failed to pause");
    assert_eq!(recorder.status(), Some(SessionStatus::Paused));
    sleep(Duration::from_millis(2_000)).await;

    recorder.resume().expect("Failed to resume");
    sleep(Duration::from_millis(2_100)).await;

    let record = recorder.complete().expect("Failed to complete");
    assert_eq!(record.samples.len(), 30);
    assert_eq!(record.predictions.len(), 3);
    assert_eq!(simulator.status().ticks, 30);
    assert!(!simulator.is_active());
}

#[tokio::test(start_paused = true)]
async fn test_progress_follows_active_time() {
    let (recorder, _simulator, clock) = setup(SessionConfig::default());

    recorder
        .start_default(SessionType::Screening)
        .expect("Failed to start session");
    assert_eq!(recorder.progress(), 0.0);
    assert!(!recorder.is_due());

    clock.advance_by(150_000);
    assert!((recorder.progress() - 0.5).abs() < 1e-9);

    recorder.pause().expect("Failed to pause");
    clock.advance_by(600_000);
    assert!((recorder.progress() - 0.5).abs() < 1e-9);

    recorder.resume().expect("Failed to resume");
    clock.advance_by(150_000);
    assert!(recorder.is_due());
    assert_eq!(recorder.progress(), 1.0);

    let record = recorder.complete().expect("Failed to complete");
    assert_eq!(record.patient_id, "patient_001");
    assert_eq!(record.duration_secs, 300);
}

#[tokio::test(start_paused = true)]
async fn test_terminate_discards_session() {
    let (recorder, simulator, _clock) = setup(SessionConfig::default());

    recorder
        .start("p1", SessionType::Diagnostic)
        .expect("Failed to start session");
    sleep(Duration::from_millis(1_100)).await;

    recorder.terminate().expect("Failed to terminate");
    assert!(recorder.status().is_none());
    assert!(!simulator.is_active());
    assert!(matches!(recorder.complete(), Err(SessionError::NoSession)));

    recorder
        .start("p2", SessionType::Diagnostic)
        .expect("A new session can start after termination");
    assert_eq!(recorder.status(), Some(SessionStatus::Active));
}

#[tokio::test(start_paused = true)]
async fn test_report_written_as_json() {
    let (recorder, _simulator, _clock) = setup(SessionConfig::default());

    recorder
        .start("patient_report", SessionType::Diagnostic)
        .expect("Failed to start session");
    sleep(Duration::from_millis(10_100)).await;

    let record = recorder.complete().expect("Failed to complete");
    let report = SessionReport::new(record, T0 + 10_000);

    assert_eq!(report.summary.sample_count, 50);
    assert_eq!(report.summary.prediction_count, 5);
    assert_eq!(report.summary.label_counts.values().sum::<usize>(), 5);
    assert!(report.summary.mean_bands.is_some());
    assert!(!report.summary.recommendations.is_empty());
    assert_eq!(
        Some(report.summary.dominant_label),
        report.session.predictions.last().map(|p| p.label())
    );

    let file = NamedTempFile::new().unwrap();
    std::fs::write(file.path(), report.to_json_pretty().unwrap()).unwrap();

    let content = std::fs::read_to_string(file.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(value["session"]["patient_id"], "patient_report");
    assert_eq!(value["session"]["session_type"], "diagnostic");
    assert_eq!(value["summary"]["prediction_count"], 5);
}
