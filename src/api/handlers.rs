use crate::api::AppState;
use crate::error::{AppError, Result};
use crate::models::{Classification, IncidentReport, ModelMetadata};
use axum::{
    extract::State,
    http::HeaderMap,
    Json,
};
use serde::Serialize;
use validator::Validate;

/// Health / readiness probe.
///
/// Republishes the loaded model identifier and the training metadata
/// sidecar so the downstream platform can display what it is talking to.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.ctx.model.descriptor().to_string(),
        fine_tuned: state.ctx.model.is_fine_tuned(),
        metadata: state.ctx.metadata.clone(),
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model: String,
    pub fine_tuned: bool,
    pub metadata: Option<ModelMetadata>,
}

/// Classify one incident report.
///
/// The engine itself never fails; the only error paths out of this
/// handler are authentication and request validation.
pub async fn classify(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<IncidentReport>,
) -> Result<Json<Classification>> {
    check_api_key(&state, &headers)?;
    request.validate()?;

    let result = state.engine.classify(&request);

    tracing::info!(
        category = %result.predicted_category,
        severity = result.severity_score,
        confidence = result.confidence,
        "Classified incident report"
    );

    Ok(Json(result))
}

fn check_api_key(state: &AppState, headers: &HeaderMap) -> Result<()> {
    let Some(expected) = state.api_key.as_deref() else {
        return Ok(());
    };

    let provided = headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if provided != expected {
        return Err(AppError::Authentication(
            "missing or invalid API key".to_string(),
        ));
    }
    Ok(())
}
