//! Common utility functions for NeuroAlert core
//!
//! - Time and timestamp access with an injectable clock
//! - Configuration validation helpers

pub mod time;
pub mod validation;

pub use time::{
    current_timestamp_millis,
    window_cutoff_millis,
    MockTimeProvider,
    SystemTimeProvider,
    TimeProvider,
};

pub use validation::{
    validate_distribution,
    validate_probability,
    validate_range,
    ValidationError,
    ValidationResult,
};
