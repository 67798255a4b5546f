//! Validation Error Types

use thiserror::Error;

/// A single rejected input field
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
    #[error("{field} value {value} is not a finite number")]
    NonFinite { field: &'static str, value: f64 },

    /// Wrong number of values for a fixed-size input
    #[error("{field}: expected {expected} values, got {actual}")]
    WrongLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl ValidationError {
    /// Name of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::OutOfRange { field, .. }
            | ValidationError::NonFinite { field, .. }
            | ValidationError::WrongLength { field, .. } => field,
        }
    }
}
