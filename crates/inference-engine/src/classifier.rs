//! Classifier capability

use crate::InferenceError;
use tracing::debug;

/// Anything that yields per-class probabilities for one feature vector.
///
/// Implementations are queried concurrently through shared references and
/// must not mutate themselves during prediction.
pub trait Classifier: Send + Sync {
    /// Identifier used in logs and errors
    fn name(&self) -> &str;

    /// Per-class probabilities for a single feature vector
    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError>;
}

/// Classifier that always returns the same probabilities (for testing and
/// dry runs without model files)
#[derive(Debug, Clone)]
pub struct StaticClassifier {
    name: String,
    probabilities: Vec<f64>,
}

impl StaticClassifier {
    pub fn new(name: &str, probabilities: Vec<f64>) -> Self {
        debug!("Creating static classifier {}: {:?}", name, probabilities);
        Self {
            name: name.to_string(),
            probabilities,
        }
    }

    /// Equal probability for every class
    pub fn uniform(name: &str, classes: usize) -> Self {
        Self::new(name, vec![1.0 / classes.max(1) as f64; classes])
    }
}

impl Classifier for StaticClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict_proba(&self, _features: &[f64]) -> Result<Vec<f64>, InferenceError> {
        Ok(self.probabilities.clone())
    }
}
