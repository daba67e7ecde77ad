use axum::extract::State;
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /health - liveness, plus where the backend is expected to be
pub async fn health_get(State(state): State<AppState>) -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.config.environment,
        "backend": state.backend.base_url(),
        "sessions": state.sessions.len().await,
    })))
}
