//! Risk Inference Engine
//!
//! Combines three independently trained classifiers per task by averaging
//! their class probabilities (soft voting):
//! - Maternal pregnancy risk (8 features: low / medium / high)
//! - Fetal cardiotocograph risk (21 features: normal / suspect / pathological)
//!
//! Classifiers are loaded once at startup and queried read-only afterwards.

mod classifier;
mod ensemble;
mod features;
mod onnx;
mod registry;

pub use classifier::{Classifier, StaticClassifier};
pub use ensemble::{EnsemblePrediction, EnsemblePredictor, VotingStrategy, ENSEMBLE_SIZE};
pub use features::{FeatureSchema, FetalFeatures, PregnancyFeatures, RiskTask};
pub use onnx::OnnxClassifier;
pub use registry::{load_ensemble, ModelSpec};

use thiserror::Error;

/// Errors during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model load failed: {0}")]
    ModelLoadError(String),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Invalid input shape: expected {expected}, got {actual}")]
    InvalidInputShape { expected: String, actual: String },
    #[error("Classifier {classifier} returned invalid probabilities: {reason}")]
    InvalidProbabilities { classifier: String, reason: String },
    #[error("Ensemble needs exactly {expected} classifiers, got {actual}")]
    MemberCount { expected: usize, actual: usize },
}
