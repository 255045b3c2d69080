use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

use crate::analysis::Analysis;
use crate::error::PlateError;
use crate::models::{AnalysisRequest, AnalysisResponse, AnalysisStatus, Config};

/// Application state
pub struct AppState {
    analysis: Analysis,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_analysis(Analysis::new())
    }

    pub fn with_analysis(analysis: Analysis) -> Self {
        Self { analysis }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the API router
pub fn create_router() -> Router {
    router_with_state(AppState::new())
}

pub fn router_with_state(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/api/v1/analyze", post(analyze_handler))
        .route("/api/v1/deck", post(deck_handler))
        .route("/api/v1/version", get(version_handler))
        .route("/api/v1/validate", post(validate_handler))
        .layer(cors)
        .with_state(Arc::new(state))
}

async fn root_handler() -> Json<serde_json::Value> {
    Json(json!({
        "service": "Plate Buckling Service",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "description": "Linear buckling of stiffened steel plates using CalculiX (ccx)",
        "supported_elements": ["S4"],
        "loads": ["sx", "sy", "tau", "pressure"]
    }))
}

async fn health_check() -> Json<serde_json::Value> {
    let ccx_path = crate::executor::resolve_ccx_path();

    let ccx_available = std::process::Command::new(&ccx_path)
        .arg("-v")
        .output()
        .is_ok();

    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "calculix_available": ccx_available,
        "calculix_command": ccx_path
    }))
}

async fn version_handler() -> Json<serde_json::Value> {
    Json(json!({
        "service": "Plate Buckling Service",
        "version": env!("CARGO_PKG_VERSION"),
        "api_version": "v1",
        "solver": "CalculiX (ccx)"
    }))
}

/// Validate the design and configuration without meshing
async fn validate_handler(Json(request): Json<AnalysisRequest>) -> Result<Json<serde_json::Value>, ApiError> {
    tracing::info!("Validating design");

    request.design.validate().map_err(PlateError::from)?;
    if let Some(config) = &request.config {
        config.validate().map_err(PlateError::from)?;
    }

    Ok(Json(json!({
        "valid": true,
        "message": "Design validation passed",
        "regions": request.design.regions().len()
    })))
}

/// Render the solver deck without running it
async fn deck_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Response, ApiError> {
    let config = request.config.clone().unwrap_or_default();
    let deck = state.analysis.prepare_deck(&request.design, &request.load, &config)?;

    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], deck.into_string()).into_response())
}

async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let job_id = Uuid::new_v4().to_string();
    tracing::info!("Received analysis request {}", job_id);
    tracing::info!(
        "  Plate: {}x{}x{} mm, Stiffeners: {}",
        request.design.width,
        request.design.height,
        request.design.thickness,
        request.design.stiffeners.len()
    );
    tracing::info!(
        "  Loads: sx={}, sy={}, tau={}, pressure={}",
        request.load.sx,
        request.load.sy,
        request.load.tau,
        request.load.pressure
    );

    let AnalysisRequest { design, load, config } = request;
    let config: Config = config.unwrap_or_default();
    let analysis = state.analysis.clone();

    // The solver blocks for the whole run
    let outcome = tokio::task::spawn_blocking(move || analysis.run(&design, &load, &config))
        .await
        .map_err(|e| ApiError::InternalError(format!("Analysis task failed: {}", e)))?;

    match outcome {
        Ok(report) => {
            tracing::info!("Analysis {} finished: {:?}", job_id, report);
            Ok(Json(AnalysisResponse {
                job_id,
                status: AnalysisStatus::Success,
                results: Some(report),
                error_message: None,
                timestamp: chrono::Utc::now().to_rfc3339(),
            }))
        }
        Err(err) if err.is_recoverable() => {
            tracing::warn!("Analysis {} failed: {}", job_id, err);
            Ok(Json(AnalysisResponse {
                job_id,
                status: AnalysisStatus::Failed,
                results: None,
                error_message: Some(err.to_string()),
                timestamp: chrono::Utc::now().to_rfc3339(),
            }))
        }
        Err(err) => Err(err.into()),
    }
}

/// API Errors
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<PlateError> for ApiError {
    fn from(err: PlateError) -> Self {
        match err {
            PlateError::Validation(_) => ApiError::ValidationError(err.to_string()),
            _ => {
                tracing::error!("{}", err);
                ApiError::InternalError(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
