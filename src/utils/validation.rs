//! Validation helpers for configuration values
//!
//! Range and probability checks shared by the simulation and session
//! configuration sections.

use std::fmt::Display;
use thiserror::Error;

/// Validation result type
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validation error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Value out of valid range
    #[error("Field '{field}' value '{value}' is out of range [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: String,
        min: String,
        max: String,
    },

    /// Cross-field validation failure
    #[error("Constraint violated on {fields:?}: {message}")]
    ConstraintViolation {
        fields: Vec<String>,
        message: String,
    },
}

/// Check that `value` lies in `[min, max]`
pub fn validate_range<T>(field: &str, value: T, min: T, max: T) -> ValidationResult<T>
where
    T: PartialOrd + Display + Copy,
{
    // NaN fails both comparisons, so check inclusion rather than exclusion
    if value >= min && value <= max {
        Ok(value)
    } else {
        Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        })
    }
}

/// Check that `value` is a probability in `[0, 1]`
pub fn validate_probability(field: &str, value: f64) -> ValidationResult<f64> {
    validate_range(field, value, 0.0, 1.0)
}

/// Check that a set of probabilities sums to one within `tolerance`
pub fn validate_distribution(fields: &[(&str, f64)], tolerance: f64) -> ValidationResult<()> {
    for (field, value) in fields {
        validate_probability(field, *value)?;
    }

    let total: f64 = fields.iter().map(|(_, value)| value).sum();
    if (total - 1.0).abs() > tolerance {
        return Err(ValidationError::ConstraintViolation {
            fields: fields.iter().map(|(field, _)| field.to_string()).collect(),
            message: format!("weights sum to {total}, expected 1.0"),
        });
    }

    Ok(())
}
