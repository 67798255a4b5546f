//! Antenatal Screening API Server
//!
//! HTTP front end for the rule engine and the two risk ensembles:
//! - `POST /analyze` runs the clinical rules over a lab report
//! - `POST /predict_preg` and `POST /predict_fetal` query the ensembles
//! - `GET /`, `GET /api/v1/health` and `GET /metrics` for operations

use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use data_validator::Validator;
use inference_engine::{load_ensemble, EnsemblePredictor, RiskTask, VotingStrategy};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use rule_engine::RuleEngine;
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use anyhow::Context;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod error;
pub mod routes;
mod settings;

pub use error::ApiError;
pub use settings::{LoggingSettings, ModelSettings, ServerSettings, Settings, DEFAULT_CONFIG_PATH};

/// Application state shared across handlers
pub struct AppState {
    pub rules: Arc<RuleEngine>,
    pub pregnancy: Arc<EnsemblePredictor>,
    pub fetal: Arc<EnsemblePredictor>,
    pub validator: Validator,
    /// Renders the Prometheus exposition
    pub metrics: PrometheusHandle,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(
        rules: RuleEngine,
        pregnancy: EnsemblePredictor,
        fetal: EnsemblePredictor,
        validator: Validator,
        metrics: PrometheusHandle,
    ) -> Self {
        Self {
            rules: Arc::new(rules),
            pregnancy: Arc::new(pregnancy),
            fetal: Arc::new(fetal),
            validator,
            metrics,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: Instant::now(),
        }
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    /// Rule names in evaluation order
    pub rules: Vec<&'static str>,
    pub models: ModelStatus,
}

/// Loaded ensembles
#[derive(Debug, Serialize)]
pub struct ModelStatus {
    pub pregnancy: EnsembleHealth,
    pub fetal: EnsembleHealth,
}

/// One loaded ensemble
#[derive(Debug, Serialize)]
pub struct EnsembleHealth {
    pub members: Vec<String>,
    pub voting: VotingStrategy,
    pub classes: &'static [&'static str],
}

impl EnsembleHealth {
    fn of(predictor: &EnsemblePredictor) -> Self {
        Self {
            members: predictor.member_names().into_iter().map(String::from).collect(),
            voting: predictor.voting(),
            classes: predictor.task().class_labels(),
        }
    }
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/api/v1/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/analyze", post(routes::analyze::analyze_report))
        .route("/predict_preg", post(routes::predict::predict_pregnancy))
        .route("/predict_fetal", post(routes::predict::predict_fetal))
        .layer(
            ServiceBuilder::new().layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                    .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
            ),
        )
        .with_state(state)
}

async fn root_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "message": "Predictor is running." }))
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        rules: state.rules.rule_names(),
        models: ModelStatus {
            pregnancy: EnsembleHealth::of(&state.pregnancy),
            fetal: EnsembleHealth::of(&state.fetal),
        },
    })
}

async fn metrics_handler(State(state): State<Arc<AppState>>) -> String {
    state.metrics.render()
}

/// Initialize logging. An unknown `logging.level` is an error.
pub fn init_logging(settings: &LoggingSettings) -> anyhow::Result<()> {
    let level = Level::from_str(&settings.level)
        .with_context(|| format!("Invalid logging.level {:?}", settings.level))?;
    let builder = FmtSubscriber::builder().with_max_level(level).with_target(true);

    if settings.json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

/// Build every component from settings. Fails if the thresholds are
/// inconsistent or any model cannot be loaded.
pub fn build_state(settings: &Settings, metrics: PrometheusHandle) -> anyhow::Result<AppState> {
    let rules = RuleEngine::new(settings.thresholds.clone())?;
    let pregnancy = load_ensemble(RiskTask::Pregnancy, &settings.models.spec(RiskTask::Pregnancy))?;
    let fetal = load_ensemble(RiskTask::Fetal, &settings.models.spec(RiskTask::Fetal))?;
    let validator = Validator::new(settings.validation.clone());

    Ok(AppState::new(rules, pregnancy, fetal, validator, metrics))
}

/// Run the server
pub async fn run_server(settings: Settings) -> anyhow::Result<()> {
    let metrics = PrometheusBuilder::new().install_recorder()?;
    let state = Arc::new(build_state(&settings, metrics)?);
    let app = create_router(state);

    info!("Starting API server on {}", settings.server.bind);

    let listener = tokio::net::TcpListener::bind(&settings.server.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use inference_engine::{Classifier, StaticClassifier};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn ensemble(task: RiskTask, outputs: [[f64; 3]; 3]) -> EnsemblePredictor {
        let members = outputs
            .iter()
            .enumerate()
            .map(|(i, p)| Arc::new(StaticClassifier::new(&format!("m{}", i), p.to_vec())) as Arc<dyn Classifier>)
            .collect();
        EnsemblePredictor::new(task, members, VotingStrategy::Soft).unwrap()
    }

    fn test_app() -> Router {
        let handle = PrometheusBuilder::new().build_recorder().handle();
        let state = AppState::new(
            RuleEngine::default(),
            ensemble(RiskTask::Pregnancy, [[0.1, 0.6, 0.3], [0.2, 0.5, 0.3], [0.0, 0.7, 0.3]]),
            ensemble(RiskTask::Fetal, [[0.9, 0.05, 0.05], [0.8, 0.1, 0.1], [0.7, 0.2, 0.1]]),
            Validator::default(),
            handle,
        );
        create_router(Arc::new(state))
    }

    async fn post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    fn pregnancy_features() -> Value {
        json!({
            "age": 29.0, "systolic": 120.0, "diastolic": 80.0, "bs": 7.0,
            "bmi": 24.0, "heart_rate": 76.0, "body_temp": 98.0, "previous_complications": 0.0
        })
    }

    #[tokio::test]
    async fn test_health_lists_models() {
        let (status, body) = get(test_app(), "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);

        let health: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(health["status"], "healthy");
        assert_eq!(health["rules"].as_array().unwrap().len(), 8);
        assert_eq!(health["models"]["fetal"]["members"], json!(["m0", "m1", "m2"]));
        assert_eq!(health["models"]["pregnancy"]["voting"], "soft");
    }

    #[tokio::test]
    async fn test_root() {
        let (status, body) = get(test_app(), "/").await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["message"], "Predictor is running.");
    }

    #[tokio::test]
    async fn test_analyze_flags_and_report_id() {
        let (status, body) = post(
            test_app(),
            "/analyze",
            json!({
                "id": "r-42",
                "data": { "hb_1st": 9.5, "ogtt_f": 95.0, "tsh_1": 3.1, "sysmptoms": ["fatigue"] }
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["report_id"], "r-42");
        assert_eq!(body["anemia"], true);
        assert_eq!(body["gdm"], true);
        assert_eq!(body["thyroid"], true);
        assert!(body["alerts"].as_array().unwrap().len() >= 3);
        assert!(body["supplement_recommendations"].is_array());
        assert!(body["dietary_recommendations"].is_array());
    }

    #[tokio::test]
    async fn test_analyze_empty_report() {
        let (status, body) = post(test_app(), "/analyze", json!({ "data": {} })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["alerts"], json!([]));
        assert_eq!(body["anemia"], false);
        let report_id = body["report_id"].as_str().unwrap();
        assert!(uuid::Uuid::parse_str(report_id).is_ok());
    }

    #[tokio::test]
    async fn test_analyze_zero_reading_treated_as_absent() {
        let (status, body) = post(
            test_app(),
            "/analyze",
            json!({ "data": { "ogtt_f": 0.0, "ogtt_2h": 160.0, "sbp": 0, "dbp": 95.0 } }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["gdm"], true);
        let alerts = body["alerts"].as_array().unwrap();
        assert!(!alerts.iter().any(|a| a.as_str().unwrap().contains("Isolated high BP")));
    }

    #[tokio::test]
    async fn test_analyze_rejects_out_of_range() {
        let (status, body) = post(test_app(), "/analyze", json!({ "data": { "hb_1st": 95.0, "sbp": 900.0 } })).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let fields: Vec<_> = body["details"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["field"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(fields, vec!["hb_1st", "sbp"]);
    }

    #[tokio::test]
    async fn test_predict_pregnancy() {
        let (status, body) = post(test_app(), "/predict_preg", pregnancy_features()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["EnsemblePrediction"], 1);
        assert_eq!(body["Probabilities"]["Class_0"], 0.1);
        assert_eq!(body["Probabilities"]["Class_1"], 0.6);
        assert_eq!(body["Probabilities"]["Class_2"], 0.3);
    }

    #[tokio::test]
    async fn test_predict_fetal() {
        let names = RiskTask::Fetal.feature_names();
        let features: serde_json::Map<String, Value> = names.iter().map(|n| (n.to_string(), json!(1.0))).collect();

        let (status, body) = post(test_app(), "/predict_fetal", Value::Object(features)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["EnsemblePrediction"], 0);
        assert_eq!(body["Probabilities"]["Class_0"], 0.8);
    }

    #[tokio::test]
    async fn test_predict_missing_feature_rejected() {
        let (status, _) = post(test_app(), "/predict_preg", json!({ "age": 30.0 })).await;
        assert!(status.is_client_error());
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        let settings = LoggingSettings {
            level: "verbose".to_string(),
            json: false,
        };
        let err = init_logging(&settings).unwrap_err();
        assert!(err.to_string().contains("verbose"));
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        let (status, _) = get(test_app(), "/metrics").await;
        assert_eq!(status, StatusCode::OK);
    }
}
