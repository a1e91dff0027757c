//! NeuroAlert core: synthetic EEG feed and rule-based health classifier
//!
//! This library drives a simulated brain-signal stream for a monitoring
//! dashboard. It features:
//!
//! - A timer-driven generator emitting five-band samples from a hidden
//!   physiological state
//! - A memoryless state model re-rolled on a fixed cadence
//! - A rule-based classifier turning state and sample into a labelled prediction
//! - Bounded history with time-window queries and listener fan-out
//! - Session recording and summary reports
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use neuroalert_core::hal::{EegSimulator, PredictionLabel};
//! use neuroalert_core::hal::simulation::SimulationConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let simulator = EegSimulator::new(SimulationConfig::default())?;
//!
//!     simulator.on_prediction(|prediction| {
//!         if prediction.label() != PredictionLabel::Normal {
//!             println!("{}: {}", prediction.label(), prediction.explanation());
//!         }
//!     });
//!
//!     simulator.start()?;
//!     tokio::time::sleep(std::time::Duration::from_secs(10)).await;
//!     simulator.stop();
//!
//!     let recent = simulator.historical_data(5.0);
//!     println!("{} samples in the last five minutes", recent.len());
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod acquisition;
pub mod classification;
pub mod config;
pub mod error;
pub mod hal;
pub mod session;
pub mod utils;

// Re-export commonly used types for convenience
pub use hal::{
    EegFeed, EegSample, EegSimulator, ListenerId, PhysiologicalState, Prediction,
    PredictionLabel, SimulatorError,
};

pub use crate::config::{ConfigLoader, NeuroAlertConfig};
pub use error::{NeuroAlertError, NeuroAlertResult};
pub use session::{SessionRecorder, SessionReport};

pub use utils::{
    time::{current_timestamp_millis, TimeProvider},
    validation::{ValidationError, ValidationResult},
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: "Synthetic EEG feed and rule-based health classifier".to_string(),
        features: vec![
            "Timer-driven five-band signal simulation".to_string(),
            "Cadenced state re-roll and classification".to_string(),
            "Bounded history with time-window queries".to_string(),
            "Session recording and reports".to_string(),
            "Layered configuration".to_string(),
        ],
    }
}

/// Library version information
#[derive(Debug, Clone)]
pub struct VersionInfo {
    /// Library name
    pub name: String,
    /// Version string
    pub version: String,
    /// Description
    pub description: String,
    /// List of features
    pub features: Vec<String>,
}
