// src/config/mod.rs
//! Configuration management
//!
//! [`NeuroAlertConfig`] gathers every tunable of the crate into two sections,
//! `[simulation]` and `[session]`. Each field carries a serde default so a
//! partial file, or no file at all, still yields a complete configuration.

pub mod constants;
pub mod loader;
pub mod session_config;

pub use constants::*;
pub use loader::{ConfigError, ConfigLoader};
pub use session_config::SessionConfig;

use crate::hal::simulation::SimulationConfig;
use crate::utils::validation::ValidationResult;
use serde::{Deserialize, Serialize};

/// Complete crate configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct NeuroAlertConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,

    #[serde(default)]
    pub session: SessionConfig,
}

impl NeuroAlertConfig {
    /// Validate both sections, reporting the first offending field
    pub fn validate(&self) -> ValidationResult<()> {
        self.simulation.validate()?;
        self.session.validate()?;
        Ok(())
    }

    /// Short description for startup logging
    pub fn summary(&self) -> ConfigSummary {
        ConfigSummary {
            tick_interval_ms: self.simulation.tick_interval_ms,
            prediction_cadence_ticks: self.simulation.prediction_cadence_ticks,
            history_capacity: self.simulation.history_capacity,
            seeded: self.simulation.seed.is_some(),
            target_duration_secs: self.session.target_duration_secs,
        }
    }
}

/// Configuration summary for display/logging
#[derive(Debug, Clone, Serialize)]
pub struct ConfigSummary {
    pub tick_interval_ms: u64,
    pub prediction_cadence_ticks: u32,
    pub history_capacity: usize,
    pub seeded: bool,
    pub target_duration_secs: u64,
}
