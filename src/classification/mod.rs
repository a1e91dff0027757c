//! State-driven classification of the synthetic feed
//!
//! The hidden physiological state is re-rolled on a fixed cadence and every
//! prediction is a pure function of that state, the latest sample and one
//! uniform draw for the confidence.

pub mod classifier;
pub mod state_model;

pub use classifier::{classify, classify_with_draw, decide, Decision, StateClassifier};
pub use state_model::{StateTransitionModel, TransitionWeights};
