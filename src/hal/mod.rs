// src/hal/mod.rs
//! Hardware Abstraction Layer for EEG feeds

pub mod listeners;
pub mod simulation;
pub mod simulator;
pub mod traits;
pub mod types;


pub use listeners::{ListenerId, PredictionListener, SampleListener};
pub use simulator::{ChannelSubscription, EegSimulator, SimulatorError, SimulatorStatus, TickOutcome};
pub use traits::*;
pub use types::*;
