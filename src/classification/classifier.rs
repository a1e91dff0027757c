// src/classification/classifier.rs
//! Rule-based classification keyed on the hidden state

use super::state_model::{StateTransitionModel, TransitionWeights};
use crate::config::constants::classifier::*;
use crate::hal::types::{EegSample, PhysiologicalState, Prediction, PredictionLabel};
use rand::Rng;
use tracing::debug;

/// Outcome of the decision ladder before a confidence is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub label: PredictionLabel,
    /// Inclusive lower and upper bound of the confidence draw
    pub confidence_range: (f64, f64),
    pub explanation: &'static str,
}

/// Select label, confidence range and explanation for `state` and `sample`.
///
/// Only the stress branch looks at the sample: raised beta together with
/// raised gamma turns a stressed reading into a mild anomaly.
pub fn decide(state: PhysiologicalState, sample: &EegSample) -> Decision {
    match state {
        PhysiologicalState::Normal => Decision {
            label: PredictionLabel::Normal,
            confidence_range: NORMAL_CONFIDENCE,
            explanation: "Balanced brainwave activity indicates healthy cognitive state",
        },
        PhysiologicalState::Stress
            if sample.beta() > STRESS_BETA_THRESHOLD && sample.gamma() > STRESS_GAMMA_THRESHOLD =>
        {
            Decision {
                label: PredictionLabel::MildAnomaly,
                confidence_range: STRESS_ANOMALY_CONFIDENCE,
                explanation: "Elevated beta and gamma waves suggest increased stress levels",
            }
        }
        PhysiologicalState::Stress => Decision {
            label: PredictionLabel::Normal,
            confidence_range: STRESS_NORMAL_CONFIDENCE,
            explanation: "Slight elevation in high-frequency activity",
        },
        PhysiologicalState::Fatigue => Decision {
            label: PredictionLabel::CognitiveFatigue,
            confidence_range: FATIGUE_CONFIDENCE,
            explanation: "Increased theta and delta activity with reduced beta waves indicate cognitive fatigue",
        },
        PhysiologicalState::Anomaly => Decision {
            label: PredictionLabel::EarlyRisk,
            confidence_range: ANOMALY_CONFIDENCE,
            explanation: "Irregular brainwave patterns detected - monitoring recommended",
        },
    }
}

/// Classify with an explicit uniform draw in `[0, 1]` for the confidence
pub fn classify_with_draw(
    state: PhysiologicalState,
    sample: &EegSample,
    draw: f64,
    timestamp: u64,
) -> Prediction {
    let decision = decide(state, sample);
    let (low, high) = decision.confidence_range;
    let draw = if draw.is_nan() { 0.0 } else { draw.clamp(0.0, 1.0) };
    let confidence = (low + draw * (high - low)).min(CONFIDENCE_CEILING);

    Prediction::new(decision.label, confidence, decision.explanation, timestamp)
}

/// Classify drawing the confidence from `rng`
pub fn classify<R: Rng + ?Sized>(
    state: PhysiologicalState,
    sample: &EegSample,
    timestamp: u64,
    rng: &mut R,
) -> Prediction {
    classify_with_draw(state, sample, rng.gen::<f64>(), timestamp)
}

/// Owns the hidden state and pairs the re-roll with classification
#[derive(Debug, Clone)]
pub struct StateClassifier {
    transitions: StateTransitionModel,
    state: PhysiologicalState,
    rerolls: u64,
}

impl StateClassifier {
    pub fn new(weights: &TransitionWeights) -> Self {
        Self {
            transitions: StateTransitionModel::new(weights),
            state: PhysiologicalState::default(),
            rerolls: 0,
        }
    }

    pub fn state(&self) -> PhysiologicalState {
        self.state
    }

    pub fn rerolls(&self) -> u64 {
        self.rerolls
    }

    /// Draw a fresh hidden state
    pub fn update_state<R: Rng + ?Sized>(&mut self, rng: &mut R) -> PhysiologicalState {
        let previous = self.state;
        self.state = self.transitions.sample_next(rng);
        self.rerolls += 1;
        if previous != self.state {
            debug!(from = %previous, to = %self.state, "physiological state changed");
        }
        self.state
    }

    /// Classify `sample` under the current hidden state
    pub fn classify<R: Rng + ?Sized>(&self, sample: &EegSample, timestamp: u64, rng: &mut R) -> Prediction {
        classify(self.state, sample, timestamp, rng)
    }

    /// Re-roll the state, then classify `sample` under the new one
    pub fn reroll_and_classify<R: Rng + ?Sized>(
        &mut self,
        sample: &EegSample,
        timestamp: u64,
        rng: &mut R,
    ) -> Prediction {
        self.update_state(rng);
        self.classify(sample, timestamp, rng)
    }

    #[cfg(test)]
    pub(crate) fn force_state(&mut self, state: PhysiologicalState) {
        self.state = state;
    }
}

impl Default for StateClassifier {
    fn default() -> Self {
        Self::new(&TransitionWeights::default())
    }
}
