// src/hal/traits.rs
//! Core HAL trait for EEG feed abstraction

use crate::hal::listeners::{ListenerId, PredictionListener, SampleListener};
use crate::hal::types::EegSample;
use std::error::Error;

/// A live source of EEG samples and predictions.
///
/// The simulator is the only implementation in this crate; consumers such as
/// the session recorder depend on this trait so a hardware feed can stand in.
pub trait EegFeed: Send + Sync {
    type Error: Error + Send + Sync + 'static;

    /// Begin emitting; no-op when already running
    fn start(&self) -> Result<(), Self::Error>;

    /// Stop emitting; no-op when idle
    fn stop(&self);

    fn is_active(&self) -> bool;

    fn on_data(&self, listener: SampleListener) -> ListenerId;

    fn remove_data_listener(&self, id: ListenerId) -> bool;

    fn on_prediction(&self, listener: PredictionListener) -> ListenerId;

    fn remove_prediction_listener(&self, id: ListenerId) -> bool;

    /// Samples from the last `window_minutes`, oldest first
    fn historical_data(&self, window_minutes: f64) -> Vec<EegSample>;
}
