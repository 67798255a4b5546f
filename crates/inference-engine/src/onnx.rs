//! ONNX-backed classifier using tract

use crate::classifier::Classifier;
use crate::InferenceError;
use std::path::Path;
use tracing::{debug, info};
use tract_onnx::prelude::*;

type OnnxPlan = TypedRunnableModel<TypedModel>;

/// Classifier exported to ONNX (sklearn / XGBoost converters).
///
/// Such exports emit the predicted label first and the probability tensor
/// second; the index of the probability output is configurable.
pub struct OnnxClassifier {
    name: String,
    plan: OnnxPlan,
    feature_count: usize,
    probability_output: usize,
}

impl OnnxClassifier {
    /// Load and optimize a model for single-row input of `feature_count` f32 values
    pub fn load(path: &Path, feature_count: usize, probability_output: usize) -> Result<Self, InferenceError> {
        info!("Loading ONNX model {} ({} features)", path.display(), feature_count);

        let load_err = |e: TractError| InferenceError::ModelLoadError(format!("{}: {}", path.display(), e));
        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| model.with_input_fact(0, f32::fact([1, feature_count]).into()))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(load_err)?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        info!("Model {} loaded successfully", name);
        Ok(Self {
            name,
            plan,
            feature_count,
            probability_output,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError> {
        if features.len() != self.feature_count {
            return Err(InferenceError::InvalidInputShape {
                expected: format!("[1, {}]", self.feature_count),
                actual: format!("[1, {}]", features.len()),
            });
        }

        let failed = |e: TractError| InferenceError::InferenceFailed(format!("{}: {}", self.name, e));

        let row: Vec<f32> = features.iter().map(|&v| v as f32).collect();
        let input: Tensor = tract_ndarray::Array2::from_shape_vec((1, self.feature_count), row)
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?
            .into();

        let outputs = self.plan.run(tvec!(input.into())).map_err(failed)?;
        let tensor = outputs.get(self.probability_output).ok_or_else(|| {
            InferenceError::InferenceFailed(format!(
                "{}: model has {} outputs, probability output index is {}",
                self.name,
                outputs.len(),
                self.probability_output
            ))
        })?;

        let probabilities = tensor.cast_to::<f64>().map_err(failed)?;
        let probabilities = probabilities.as_slice::<f64>().map_err(failed)?.to_vec();
        debug!("{} probabilities: {:?}", self.name, probabilities);
        Ok(probabilities)
    }
}
