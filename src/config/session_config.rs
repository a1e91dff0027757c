//! Session recording configuration

use crate::config::constants::session;
use crate::utils::validation::{validate_range, ValidationResult};
use serde::{Deserialize, Serialize};

/// Rolling window sizes and target length for recorded sessions
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default = "defaults::sample_window")]
    pub sample_window: usize,

    #[serde(default = "defaults::prediction_window")]
    pub prediction_window: usize,

    #[serde(default = "defaults::target_duration_secs")]
    pub target_duration_secs: u64,

    #[serde(default = "defaults::patient_id")]
    pub default_patient_id: String,
}

mod defaults {
    use crate::config::constants::session::*;

    pub fn sample_window() -> usize { DEFAULT_SAMPLE_WINDOW }
    pub fn prediction_window() -> usize { DEFAULT_PREDICTION_WINDOW }
    pub fn target_duration_secs() -> u64 { DEFAULT_TARGET_DURATION_SECS }
    pub fn patient_id() -> String { DEFAULT_PATIENT_ID.to_string() }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sample_window: session::DEFAULT_SAMPLE_WINDOW,
            prediction_window: session::DEFAULT_PREDICTION_WINDOW,
            target_duration_secs: session::DEFAULT_TARGET_DURATION_SECS,
            default_patient_id: session::DEFAULT_PATIENT_ID.to_string(),
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_range("session.sample_window", self.sample_window, 1, usize::MAX)?;
        validate_range("session.prediction_window", self.prediction_window, 1, usize::MAX)?;
        validate_range(
            "session.target_duration_secs",
            self.target_duration_secs,
            1,
            session::MAX_TARGET_DURATION_SECS,
        )?;
        Ok(())
    }
}
