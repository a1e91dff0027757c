// src/error.rs
//! Unified error handling for NeuroAlert core
//!
//! Each module reports its own `thiserror` enum. [`NeuroAlertError`] wraps
//! them so binaries and integration code can propagate any of them with `?`.

use crate::config::ConfigError;
use crate::hal::SimulatorError;
use crate::session::SessionError;
use crate::utils::validation::ValidationError;
use thiserror::Error;

/// Unified error type for the crate
#[derive(Debug, Error)]
pub enum NeuroAlertError {
    #[error("[CONFIG] {0}")]
    Config(#[from] ConfigError),

    #[error("[SIMULATOR] {0}")]
    Simulator(#[from] SimulatorError),

    #[error("[SESSION] {0}")]
    Session(#[from] SessionError),

    #[error("[VALIDATION] {0}")]
    Validation(#[from] ValidationError),

    #[error("[SERIALIZATION] {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("[IO] {0}")]
    Io(#[from] std::io::Error),
}

impl NeuroAlertError {
    /// Name of the subsystem the error came from, for log fields
    pub fn component(&self) -> &'static str {
        match self {
            NeuroAlertError::Config(_) => "config",
            NeuroAlertError::Simulator(_) => "simulator",
            NeuroAlertError::Session(_) => "session",
            NeuroAlertError::Validation(_) => "validation",
            NeuroAlertError::Serialization(_) => "serialization",
            NeuroAlertError::Io(_) => "io",
        }
    }

    /// Whether retrying the same call could succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            NeuroAlertError::Session(SessionError::NoSession)
            | NeuroAlertError::Session(SessionError::InvalidTransition { .. })
            | NeuroAlertError::Session(SessionError::AlreadyInProgress { .. }) => true,
            NeuroAlertError::Io(_) => true,
            _ => false,
        }
    }
}

/// Result type alias for NeuroAlert operations
pub type NeuroAlertResult<T> = Result<T, NeuroAlertError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionStatus;
    use std::error::Error;

    fn out_of_range() -> ValidationError {
        ValidationError::OutOfRange {
            field: "simulation.tick_interval_ms".to_string(),
            value: "0".to_string(),
            min: "10".to_string(),
            max: "60000".to_string(),
        }
    }

    #[test]
    fn test_conversion_preserves_source() {
        let err: NeuroAlertError = SimulatorError::InvalidConfig(out_of_range()).into();

        assert_eq!(err.component(), "simulator");
        assert!(err.to_string().starts_with("[SIMULATOR]"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_question_mark_propagation() {
        fn inner() -> NeuroAlertResult<()> {
            crate::utils::validate_range("simulation.tick_interval_ms", 0u64, 10, 60_000)?;
            Ok(())
        }

        let err = inner().unwrap_err();
        assert!(matches!(err, NeuroAlertError::Validation(_)));
        assert!(err.to_string().contains("tick_interval_ms"));
    }

    #[test]
    fn test_recoverability() {
        let transition: NeuroAlertError = SessionError::InvalidTransition {
            action: "pause",
            status: SessionStatus::Completed,
        }
        .into();
        assert!(transition.is_recoverable());

        let config: NeuroAlertError = ValidationError::ConstraintViolation {
            fields: vec!["a".to_string()],
            message: "bad".to_string(),
        }
        .into();
        assert!(!config.is_recoverable());
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NeuroAlertError>();
    }
}
