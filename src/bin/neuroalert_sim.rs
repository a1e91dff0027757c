//! Run the synthetic feed for a fixed duration and stream it as JSON lines

use clap::Parser;
use crossbeam::channel::Receiver;
use neuroalert_core::config::ConfigLoader;
use neuroalert_core::hal::simulation::SimulationConfig;
use neuroalert_core::hal::{EegSample, EegSimulator, Prediction};
use neuroalert_core::session::{SessionRecorder, SessionReport, SessionType};
use neuroalert_core::{current_timestamp_millis, NeuroAlertResult};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, sleep_until, Instant};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML configuration file, which must exist; otherwise ./neuroalert.toml is read when present
    #[arg(short, long, env = "NEUROALERT_CONFIG")]
    config: Option<PathBuf>,

    /// How long to run; defaults to the configured session target
    #[arg(short, long)]
    duration_secs: Option<u64>,

    /// Fixed RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Emit every sample, not only predictions
    #[arg(long)]
    samples: bool,

    /// Write the session report as JSON to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Patient identifier recorded with the session
    #[arg(long)]
    patient_id: Option<String>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum FeedEvent<'a> {
    Sample(&'a EegSample),
    Prediction(&'a Prediction),
}

fn write_event(out: &mut impl Write, event: &FeedEvent<'_>) -> NeuroAlertResult<()> {
    serde_json::to_writer(&mut *out, event)?;
    out.write_all(b"\n")?;
    Ok(())
}

fn drain(
    out: &mut impl Write,
    samples: Option<&Receiver<EegSample>>,
    predictions: &Receiver<Prediction>,
) -> NeuroAlertResult<()> {
    if let Some(samples) = samples {
        for sample in samples.try_iter() {
            write_event(out, &FeedEvent::Sample(&sample))?;
        }
    }
    for prediction in predictions.try_iter() {
        write_event(out, &FeedEvent::Prediction(&prediction))?;
    }
    out.flush()?;
    Ok(())
}

async fn run(args: Args) -> NeuroAlertResult<()> {
    let loader = match &args.config {
        Some(path) => ConfigLoader::from_file(path.clone()),
        None => ConfigLoader::new(),
    };
    let mut config = loader.load()?;
    if let Some(seed) = args.seed {
        config.simulation.seed = Some(seed);
    }
    info!(summary = ?config.summary(), "starting neuroalert-sim");

    let simulation: SimulationConfig = config.simulation.clone();
    let simulator = Arc::new(EegSimulator::new(simulation)?);
    let capacity = neuroalert_core::config::session::DEFAULT_CHANNEL_CAPACITY;
    let predictions = simulator.subscribe_predictions(capacity);
    let samples = args.samples.then(|| simulator.subscribe_samples(capacity));

    let recorder = SessionRecorder::new(Arc::clone(&simulator), config.session.clone());
    let session_id = match args.patient_id {
        Some(patient_id) => recorder.start(patient_id, SessionType::Monitoring)?,
        None => recorder.start_default(SessionType::Monitoring)?,
    };

    let duration = args.duration_secs.unwrap_or(config.session.target_duration_secs);
    let deadline = sleep_until(Instant::now() + Duration::from_secs(duration));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(deadline, ctrl_c);

    let mut flush = interval(config.simulation.tick_interval());
    let stdout = io::stdout();
    let mut out = stdout.lock();

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            _ = &mut ctrl_c => {
                info!(%session_id, "interrupted");
                break;
            }
            _ = flush.tick() => {
                drain(&mut out, samples.as_ref().map(|s| s.receiver()), predictions.receiver())?;
            }
        }
    }

    let record = recorder.complete()?;
    drain(&mut out, samples.as_ref().map(|s| s.receiver()), predictions.receiver())?;

    let report = SessionReport::new(record, current_timestamp_millis());
    info!(
        %session_id,
        predictions = report.summary.prediction_count,
        dominant_label = %report.summary.dominant_label,
        average_confidence = report.summary.average_confidence,
        "session finished"
    );

    if let Some(path) = &args.report {
        std::fs::write(path, report.to_json_pretty()?)?;
        info!(path = %path.display(), "report written");
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    if let Err(e) = run(args).await {
        error!(component = e.component(), "{e}");
        std::process::exit(1);
    }
}
