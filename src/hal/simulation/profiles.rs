//! Per-state band signatures for the synthetic feed
//! Location: src/hal/simulation/profiles.rs

use crate::hal::types::{EegBand, PhysiologicalState};
use serde::{Deserialize, Serialize};

/// Oscillation parameters for one band: `base + sin(t / time_scale_ms) * amplitude`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct BandOscillation {
    pub base: f64,
    pub amplitude: f64,
    pub time_scale_ms: f64,
}

impl BandOscillation {
    pub const fn new(base: f64, amplitude: f64, time_scale_ms: f64) -> Self {
        Self { base, amplitude, time_scale_ms }
    }

    /// Noise-free value at `timestamp_ms`
    pub fn evaluate(&self, timestamp_ms: u64) -> f64 {
        self.base + (timestamp_ms as f64 / self.time_scale_ms).sin() * self.amplitude
    }
}

/// Clinical signature of one physiological state across all five bands
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StateProfile {
    pub state: PhysiologicalState,
    pub description: String,
    pub alpha: BandOscillation,
    pub beta: BandOscillation,
    pub theta: BandOscillation,
    pub delta: BandOscillation,
    pub gamma: BandOscillation,
}

impl StateProfile {
    pub fn oscillation(&self, band: EegBand) -> &BandOscillation {
        match band {
            EegBand::Alpha => &self.alpha,
            EegBand::Beta => &self.beta,
            EegBand::Theta => &self.theta,
            EegBand::Delta => &self.delta,
            EegBand::Gamma => &self.gamma,
        }
    }

    /// Balanced activity across bands
    pub fn normal() -> Self {
        Self {
            state: PhysiologicalState::Normal,
            description: "Balanced brainwave activity".to_string(),
            alpha: BandOscillation::new(10.0, 2.0, 1000.0),
            beta: BandOscillation::new(15.0, 3.0, 800.0),
            theta: BandOscillation::new(6.0, 1.0, 1200.0),
            delta: BandOscillation::new(2.0, 0.5, 1500.0),
            gamma: BandOscillation::new(35.0, 5.0, 600.0),
        }
    }

    /// Elevated beta and gamma with faster oscillation
    pub fn stress() -> Self {
        Self {
            state: PhysiologicalState::Stress,
            description: "Elevated high-frequency activity".to_string(),
            alpha: BandOscillation::new(8.0, 1.5, 1000.0),
            beta: BandOscillation::new(25.0, 5.0, 600.0),
            theta: BandOscillation::new(7.0, 1.5, 1200.0),
            delta: BandOscillation::new(1.5, 0.3, 1500.0),
            gamma: BandOscillation::new(40.0, 8.0, 500.0),
        }
    }

    /// Slow bands raised, fast bands suppressed
    pub fn fatigue() -> Self {
        Self {
            state: PhysiologicalState::Fatigue,
            description: "Raised theta and delta with reduced alpha, beta and gamma".to_string(),
            alpha: BandOscillation::new(7.0, 1.0, 1000.0),
            beta: BandOscillation::new(10.0, 2.0, 800.0),
            theta: BandOscillation::new(12.0, 3.0, 1000.0),
            delta: BandOscillation::new(4.0, 1.0, 1200.0),
            gamma: BandOscillation::new(25.0, 3.0, 700.0),
        }
    }

    /// All bands raised with wide, fast swings
    pub fn anomaly() -> Self {
        Self {
            state: PhysiologicalState::Anomaly,
            description: "Irregular high-amplitude activity".to_string(),
            alpha: BandOscillation::new(15.0, 8.0, 500.0),
            beta: BandOscillation::new(30.0, 15.0, 300.0),
            theta: BandOscillation::new(15.0, 5.0, 800.0),
            delta: BandOscillation::new(6.0, 2.0, 1000.0),
            gamma: BandOscillation::new(50.0, 20.0, 200.0),
        }
    }

    pub fn for_state(state: PhysiologicalState) -> Self {
        match state {
            PhysiologicalState::Normal => Self::normal(),
            PhysiologicalState::Stress => Self::stress(),
            PhysiologicalState::Fatigue => Self::fatigue(),
            PhysiologicalState::Anomaly => Self::anomaly(),
        }
    }
}

/// Lookup of state profiles, indexed by state
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileTable {
    profiles: [StateProfile; 4],
}

impl ProfileTable {
    pub fn get(&self, state: PhysiologicalState) -> &StateProfile {
        &self.profiles[Self::index(state)]
    }

    /// Replace the profile for `profile.state`
    pub fn with_profile(mut self, profile: StateProfile) -> Self {
        let index = Self::index(profile.state);
        self.profiles[index] = profile;
        self
    }

    fn index(state: PhysiologicalState) -> usize {
        match state {
            PhysiologicalState::Normal => 0,
            PhysiologicalState::Stress => 1,
            PhysiologicalState::Fatigue => 2,
            PhysiologicalState::Anomaly => 3,
        }
    }
}

impl Default for ProfileTable {
    fn default() -> Self {
        Self {
            profiles: [
                StateProfile::normal(),
                StateProfile::stress(),
                StateProfile::fatigue(),
                StateProfile::anomaly(),
            ],
        }
    }
}
