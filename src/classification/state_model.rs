// src/classification/state_model.rs
//! Memoryless re-roll of the hidden physiological state

use crate::config::constants::transitions;
use crate::hal::types::PhysiologicalState;
use crate::utils::validation::{validate_distribution, ValidationResult};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Probability of landing in each state on a re-roll
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct TransitionWeights {
    #[serde(default = "defaults::normal")]
    pub normal: f64,
    #[serde(default = "defaults::stress")]
    pub stress: f64,
    #[serde(default = "defaults::fatigue")]
    pub fatigue: f64,
    #[serde(default = "defaults::anomaly")]
    pub anomaly: f64,
}

mod defaults {
    use crate::config::constants::transitions::*;

    pub fn normal() -> f64 { NORMAL_WEIGHT }
    pub fn stress() -> f64 { STRESS_WEIGHT }
    pub fn fatigue() -> f64 { FATIGUE_WEIGHT }
    pub fn anomaly() -> f64 { ANOMALY_WEIGHT }
}

impl Default for TransitionWeights {
    fn default() -> Self {
        Self {
            normal: transitions::NORMAL_WEIGHT,
            stress: transitions::STRESS_WEIGHT,
            fatigue: transitions::FATIGUE_WEIGHT,
            anomaly: transitions::ANOMALY_WEIGHT,
        }
    }
}

impl TransitionWeights {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_distribution(
            &[
                ("transition_weights.normal", self.normal),
                ("transition_weights.stress", self.stress),
                ("transition_weights.fatigue", self.fatigue),
                ("transition_weights.anomaly", self.anomaly),
            ],
            transitions::WEIGHT_SUM_TOLERANCE,
        )
    }

    pub fn weight(&self, state: PhysiologicalState) -> f64 {
        match state {
            PhysiologicalState::Normal => self.normal,
            PhysiologicalState::Stress => self.stress,
            PhysiologicalState::Fatigue => self.fatigue,
            PhysiologicalState::Anomaly => self.anomaly,
        }
    }
}

/// Maps a uniform draw onto a state through cumulative thresholds.
///
/// With default weights: `r < 0.70` normal, `< 0.85` stress, `< 0.95`
/// fatigue, anything else anomaly. The previous state plays no part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateTransitionModel {
    stress_from: f64,
    fatigue_from: f64,
    anomaly_from: f64,
}

impl StateTransitionModel {
    pub fn new(weights: &TransitionWeights) -> Self {
        let stress_from = weights.normal;
        let fatigue_from = stress_from + weights.stress;
        let anomaly_from = fatigue_from + weights.fatigue;
        Self {
            stress_from,
            fatigue_from,
            anomaly_from,
        }
    }

    /// State selected by the draw `r` in `[0, 1)`
    pub fn next_state(&self, r: f64) -> PhysiologicalState {
        if r < self.stress_from {
            PhysiologicalState::Normal
        } else if r < self.fatigue_from {
            PhysiologicalState::Stress
        } else if r < self.anomaly_from {
            PhysiologicalState::Fatigue
        } else {
            PhysiologicalState::Anomaly
        }
    }

    pub fn sample_next<R: Rng + ?Sized>(&self, rng: &mut R) -> PhysiologicalState {
        self.next_state(rng.gen::<f64>())
    }
}

impl Default for StateTransitionModel {
    fn default() -> Self {
        Self::new(&TransitionWeights::default())
    }
}
