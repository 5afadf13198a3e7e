//! Validation Error Types

use thiserror::Error;

/// Errors raised while validating a submission
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Value out of allowed range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// NaN or infinite value
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}
