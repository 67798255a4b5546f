//! Risk Prediction Routes

use axum::{extract::State, Json};
use inference_engine::{EnsemblePredictor, FeatureSchema, FetalFeatures, PregnancyFeatures};
use metrics::counter;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use crate::error::ApiError;
use crate::AppState;

/// Decimal places kept in reported probabilities
const PROBABILITY_DECIMALS: i32 = 4;

/// Averaged class probabilities and the winning class
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// `Class_<i>` → probability
    #[serde(rename = "Probabilities")]
    pub probabilities: BTreeMap<String, f64>,
    #[serde(rename = "EnsemblePrediction")]
    pub ensemble_prediction: usize,
}

/// Maternal risk: 0 low, 1 medium, 2 high
pub async fn predict_pregnancy(
    State(state): State<Arc<AppState>>,
    Json(features): Json<PregnancyFeatures>,
) -> Result<Json<PredictionResponse>, ApiError> {
    predict(&state, Arc::clone(&state.pregnancy), features).await
}

/// Fetal CTG class: 0 normal, 1 suspect, 2 pathological
pub async fn predict_fetal(
    State(state): State<Arc<AppState>>,
    Json(features): Json<FetalFeatures>,
) -> Result<Json<PredictionResponse>, ApiError> {
    predict(&state, Arc::clone(&state.fetal), features).await
}

async fn predict<F: FeatureSchema>(
    state: &AppState,
    predictor: Arc<EnsemblePredictor>,
    features: F,
) -> Result<Json<PredictionResponse>, ApiError> {
    let values = features.values();
    state
        .validator
        .validate_features(F::NAMES, &values)
        .into_result()
        .map_err(ApiError::Validation)?;

    let task = predictor.task();
    let prediction = tokio::task::spawn_blocking(move || predictor.predict(&values))
        .await
        .map_err(|e| ApiError::Worker(e.to_string()))??;

    counter!(
        "antenatal_predictions_total",
        "task" => task.as_str(),
        "class" => task.class_labels()[prediction.predicted_class]
    )
    .increment(1);
    debug!(
        "{} prediction: class {} {:?}",
        task.as_str(),
        prediction.predicted_class,
        prediction.probabilities
    );

    let probabilities = prediction
        .rounded(PROBABILITY_DECIMALS)
        .into_iter()
        .enumerate()
        .map(|(i, p)| (format!("Class_{}", i), p))
        .collect();

    Ok(Json(PredictionResponse {
        probabilities,
        ensemble_prediction: prediction.predicted_class,
    }))
}
