//! Boundary Validation
//!
//! Range checks for patient observations and finiteness checks for model
//! feature vectors, applied before anything reaches the rule engine or the
//! ensembles.

mod error;
mod validator;

pub use error::ValidationError;
pub use validator::{Range, ValidationConfig, ValidationResult, Validator};
