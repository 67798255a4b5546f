//! Report Analysis Route

use axum::{extract::State, Json};
use metrics::counter;
use rule_engine::{Condition, ObservationSet, RuleOutcome};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::AppState;

/// Lab report submitted for analysis
#[derive(Debug, Deserialize)]
pub struct ReportInput {
    pub data: ObservationSet,
    /// Caller-assigned report identifier
    #[serde(default)]
    pub id: Option<String>,
}

/// Rule outcome plus summary flags
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    #[serde(flatten)]
    pub outcome: RuleOutcome,
    pub anemia: bool,
    pub gdm: bool,
    pub thyroid: bool,
    pub report_id: String,
}

impl AnalyzeResponse {
    fn new(outcome: RuleOutcome, report_id: String) -> Self {
        Self {
            anemia: outcome.has(Condition::Anemia),
            gdm: outcome.has(Condition::GestationalDiabetes),
            thyroid: outcome.has(Condition::ThyroidDysfunction),
            outcome,
            report_id,
        }
    }
}

/// Run every clinical rule over one report
pub async fn analyze_report(
    State(state): State<Arc<AppState>>,
    Json(report): Json<ReportInput>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    state
        .validator
        .validate_observations(&report.data)
        .into_result()
        .map_err(ApiError::Validation)?;

    let outcome = state.rules.evaluate(&report.data);
    let report_id = report.id.unwrap_or_else(|| Uuid::new_v4().to_string());

    counter!("antenatal_reports_analyzed_total").increment(1);
    for condition in outcome.conditions.iter() {
        counter!("antenatal_conditions_flagged_total", "condition" => condition.as_str()).increment(1);
    }
    info!(
        "Report {} analyzed: {} alerts, {} conditions",
        report_id,
        outcome.alerts.len(),
        outcome.conditions.len()
    );

    Ok(Json(AnalyzeResponse::new(outcome, report_id)))
}
