//! Synthetic EEG signal simulation
//! Location: src/hal/simulation/mod.rs

pub mod config;
pub mod profiles;
pub mod signal_generator;

pub use self::config::SimulationConfig;
pub use profiles::{BandOscillation, ProfileTable, StateProfile};
pub use signal_generator::EegSignalGenerator;
