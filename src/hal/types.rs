// src/hal/types.rs
//! Core types for the synthetic EEG feed

use crate::config::constants::classifier::CONFIDENCE_CEILING;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The five synthetic frequency bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EegBand {
    Alpha,
    Beta,
    Theta,
    Delta,
    Gamma,
}

impl EegBand {
    /// All bands in emission order
    pub const ALL: [EegBand; 5] = [
        EegBand::Alpha,
        EegBand::Beta,
        EegBand::Theta,
        EegBand::Delta,
        EegBand::Gamma,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EegBand::Alpha => "alpha",
            EegBand::Beta => "beta",
            EegBand::Theta => "theta",
            EegBand::Delta => "delta",
            EegBand::Gamma => "gamma",
        }
    }
}

/// Power per band for one instant
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BandPowers {
    pub alpha: f64,
    pub beta: f64,
    pub theta: f64,
    pub delta: f64,
    pub gamma: f64,
}

impl BandPowers {
    pub fn new(alpha: f64, beta: f64, theta: f64, delta: f64, gamma: f64) -> Self {
        Self { alpha, beta, theta, delta, gamma }
    }

    pub fn get(&self, band: EegBand) -> f64 {
        match band {
            EegBand::Alpha => self.alpha,
            EegBand::Beta => self.beta,
            EegBand::Theta => self.theta,
            EegBand::Delta => self.delta,
            EegBand::Gamma => self.gamma,
        }
    }

    pub fn set(&mut self, band: EegBand, value: f64) {
        match band {
            EegBand::Alpha => self.alpha = value,
            EegBand::Beta => self.beta = value,
            EegBand::Theta => self.theta = value,
            EegBand::Delta => self.delta = value,
            EegBand::Gamma => self.gamma = value,
        }
    }

    pub fn as_array(&self) -> [f64; 5] {
        [self.alpha, self.beta, self.theta, self.delta, self.gamma]
    }

    /// Arithmetic mean of the five bands
    pub fn mean(&self) -> f64 {
        self.as_array().iter().sum::<f64>() / EegBand::ALL.len() as f64
    }

    /// Copy with every negative (or NaN) band replaced by zero
    pub fn clamped_non_negative(&self) -> Self {
        let clamp = |v: f64| if v > 0.0 { v } else { 0.0 };
        Self {
            alpha: clamp(self.alpha),
            beta: clamp(self.beta),
            theta: clamp(self.theta),
            delta: clamp(self.delta),
            gamma: clamp(self.gamma),
        }
    }
}

/// One instant of synthetic multi-band signal data.
///
/// Band values are never negative and `composite` is always the mean of the
/// five bands: both are enforced at construction, including when a sample is
/// deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "SampleRecord")]
pub struct EegSample {
    timestamp: u64,
    alpha: f64,
    beta: f64,
    theta: f64,
    delta: f64,
    gamma: f64,
    composite: f64,
}

impl EegSample {
    /// Build a sample from raw band powers, clamping negatives to zero
    pub fn from_bands(timestamp: u64, bands: BandPowers) -> Self {
        let bands = bands.clamped_non_negative();
        Self {
            timestamp,
            alpha: bands.alpha,
            beta: bands.beta,
            theta: bands.theta,
            delta: bands.delta,
            gamma: bands.gamma,
            composite: bands.mean(),
        }
    }

    /// Milliseconds since the Unix epoch
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn composite(&self) -> f64 {
        self.composite
    }

    pub fn band(&self, band: EegBand) -> f64 {
        self.bands().get(band)
    }

    pub fn bands(&self) -> BandPowers {
        BandPowers::new(self.alpha, self.beta, self.theta, self.delta, self.gamma)
    }
}

/// Wire shape of a sample; `composite` is recomputed on the way in.
#[derive(Deserialize)]
struct SampleRecord {
    timestamp: u64,
    alpha: f64,
    beta: f64,
    theta: f64,
    delta: f64,
    gamma: f64,
}

impl From<SampleRecord> for EegSample {
    fn from(record: SampleRecord) -> Self {
        EegSample::from_bands(
            record.timestamp,
            BandPowers::new(record.alpha, record.beta, record.theta, record.delta, record.gamma),
        )
    }
}

/// Hidden physiological regime driving the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhysiologicalState {
    #[default]
    Normal,
    Stress,
    Fatigue,
    Anomaly,
}

impl PhysiologicalState {
    pub const ALL: [PhysiologicalState; 4] = [
        PhysiologicalState::Normal,
        PhysiologicalState::Stress,
        PhysiologicalState::Fatigue,
        PhysiologicalState::Anomaly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PhysiologicalState::Normal => "normal",
            PhysiologicalState::Stress => "stress",
            PhysiologicalState::Fatigue => "fatigue",
            PhysiologicalState::Anomaly => "anomaly",
        }
    }
}

impl fmt::Display for PhysiologicalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Consumer-facing classification label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionLabel {
    Normal,
    MildAnomaly,
    CognitiveFatigue,
    EarlyRisk,
}

impl PredictionLabel {
    pub const ALL: [PredictionLabel; 4] = [
        PredictionLabel::Normal,
        PredictionLabel::MildAnomaly,
        PredictionLabel::CognitiveFatigue,
        PredictionLabel::EarlyRisk,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionLabel::Normal => "normal",
            PredictionLabel::MildAnomaly => "mild_anomaly",
            PredictionLabel::CognitiveFatigue => "cognitive_fatigue",
            PredictionLabel::EarlyRisk => "early_risk",
        }
    }
}

impl fmt::Display for PredictionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classification result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PredictionRecord")]
pub struct Prediction {
    label: PredictionLabel,
    confidence: f64,
    explanation: String,
    timestamp: u64,
}

impl Prediction {
    /// Build a prediction; confidence is clamped into `[0, 0.99]`
    pub fn new(
        label: PredictionLabel,
        confidence: f64,
        explanation: impl Into<String>,
        timestamp: u64,
    ) -> Self {
        Self {
            label,
            confidence: clamp_confidence(confidence),
            explanation: explanation.into(),
            timestamp,
        }
    }

    pub fn label(&self) -> PredictionLabel {
        self.label
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Milliseconds since the Unix epoch
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }
}

fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        return 0.0;
    }
    confidence.clamp(0.0, CONFIDENCE_CEILING)
}

#[derive(Deserialize)]
struct PredictionRecord {
    label: PredictionLabel,
    confidence: f64,
    explanation: String,
    timestamp: u64,
}

impl From<PredictionRecord> for Prediction {
    fn from(record: PredictionRecord) -> Self {
        Prediction::new(record.label, record.confidence, record.explanation, record.timestamp)
    }
}
