//! Submission Validator for Range Checking

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// pH valid range
    pub ph_range: (f64, f64),
    /// Daily usage valid range (liters)
    pub liters_range: (f64, f64),
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            ph_range: (0.0, 14.0),
            liters_range: (0.0, f64::MAX),
        }
    }
}

/// Validator for dashboard submissions
#[derive(Debug, Clone)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a single value against an inclusive range
    pub fn validate_range(
        &self,
        field: &'static str,
        value: f64,
        range: (f64, f64),
    ) -> Result<(), ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NotFinite { field });
        }
        if value < range.0 || value > range.1 {
            debug!("Rejected {field}={value}");
            Err(ValidationError::OutOfRange {
                field,
                value,
                min: range.0,
                max: range.1,
            })
        } else {
            Ok(())
        }
    }

    /// Validate a pH reading
    pub fn validate_ph(&self, ph: f64) -> Result<(), ValidationError> {
        self.validate_range("pH", ph, self.config.ph_range)
    }

    /// Validate a daily usage volume
    pub fn validate_liters(&self, liters: f64) -> Result<(), ValidationError> {
        self.validate_range("liters", liters, self.config.liters_range)
    }

    /// A household name must contain something other than whitespace.
    ///
    /// The name itself is stored as typed.
    pub fn validate_household(&self, household: &str) -> Result<(), ValidationError> {
        if household.trim().is_empty() {
            Err(ValidationError::MissingField("household"))
        } else {
            Ok(())
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}
