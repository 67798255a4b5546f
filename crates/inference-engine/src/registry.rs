//! Startup loading of model ensembles

use crate::classifier::Classifier;
use crate::ensemble::{EnsemblePredictor, VotingStrategy, ENSEMBLE_SIZE};
use crate::features::RiskTask;
use crate::onnx::OnnxClassifier;
use crate::InferenceError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Where an ensemble's models live and how they vote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSpec {
    /// One ONNX file per ensemble member
    pub paths: Vec<PathBuf>,
    /// Index of the probability tensor among the model outputs
    pub probability_output: usize,
    pub voting: VotingStrategy,
}

impl Default for ModelSpec {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            probability_output: 1,
            voting: VotingStrategy::Soft,
        }
    }
}

impl ModelSpec {
    /// Default file layout under `dir`: `<task>_<member>.onnx`
    pub fn in_dir(dir: impl Into<PathBuf>, task: RiskTask) -> Self {
        let dir = dir.into();
        let paths = ["random_forest", "xgboost", "mlp"]
            .iter()
            .map(|member| dir.join(format!("{}_{}.onnx", task.as_str(), member)))
            .collect();
        Self {
            paths,
            ..Default::default()
        }
    }
}

/// Load every member of an ensemble. Any unreadable model fails the whole load.
pub fn load_ensemble(task: RiskTask, spec: &ModelSpec) -> Result<EnsemblePredictor, InferenceError> {
    if spec.paths.len() != ENSEMBLE_SIZE {
        return Err(InferenceError::MemberCount {
            expected: ENSEMBLE_SIZE,
            actual: spec.paths.len(),
        });
    }

    info!("Loading {} ensemble from {} models", task.as_str(), spec.paths.len());
    let members = spec
        .paths
        .iter()
        .map(|path| {
            OnnxClassifier::load(path, task.feature_count(), spec.probability_output)
                .map(|clf| Arc::new(clf) as Arc<dyn Classifier>)
        })
        .collect::<Result<Vec<_>, _>>()?;

    EnsemblePredictor::new(task, members, spec.voting)
}
