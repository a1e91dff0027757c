//! Simulation configuration structures
//! Location: src/hal/simulation/config.rs

use crate::classification::TransitionWeights;
use crate::config::constants::simulation;
use crate::utils::validation::{validate_range, ValidationResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for the synthetic feed and its classifier cadence
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SimulationConfig {
    #[serde(default = "defaults::tick_interval_ms")]
    pub tick_interval_ms: u64,

    #[serde(default = "defaults::prediction_cadence_ticks")]
    pub prediction_cadence_ticks: u32,

    #[serde(default = "defaults::history_capacity")]
    pub history_capacity: usize,

    #[serde(default = "defaults::noise_amplitude")]
    pub noise_amplitude: f64,

    /// Fixed RNG seed; `None` seeds from OS entropy
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub transition_weights: TransitionWeights,
}

mod defaults {
    use crate::config::constants::simulation::*;

    pub fn tick_interval_ms() -> u64 { DEFAULT_TICK_INTERVAL_MS }
    pub fn prediction_cadence_ticks() -> u32 { DEFAULT_PREDICTION_CADENCE_TICKS }
    pub fn history_capacity() -> usize { DEFAULT_HISTORY_CAPACITY }
    pub fn noise_amplitude() -> f64 { DEFAULT_NOISE_AMPLITUDE }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: simulation::DEFAULT_TICK_INTERVAL_MS,
            prediction_cadence_ticks: simulation::DEFAULT_PREDICTION_CADENCE_TICKS,
            history_capacity: simulation::DEFAULT_HISTORY_CAPACITY,
            noise_amplitude: simulation::DEFAULT_NOISE_AMPLITUDE,
            seed: None,
            transition_weights: TransitionWeights::default(),
        }
    }
}

impl SimulationConfig {
    /// Reproducible configuration for tests and demos
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn validate(&self) -> ValidationResult<()> {
        validate_range(
            "simulation.tick_interval_ms",
            self.tick_interval_ms,
            simulation::MIN_TICK_INTERVAL_MS,
            simulation::MAX_TICK_INTERVAL_MS,
        )?;
        validate_range(
            "simulation.prediction_cadence_ticks",
            self.prediction_cadence_ticks,
            1,
            simulation::MAX_PREDICTION_CADENCE_TICKS,
        )?;
        validate_range(
            "simulation.history_capacity",
            self.history_capacity,
            1,
            simulation::MAX_HISTORY_CAPACITY,
        )?;
        validate_range(
            "simulation.noise_amplitude",
            self.noise_amplitude,
            0.0,
            simulation::MAX_NOISE_AMPLITUDE,
        )?;
        self.transition_weights.validate()?;
        Ok(())
    }
}
