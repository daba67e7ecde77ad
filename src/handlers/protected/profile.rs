use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};

use crate::backend::{Resource, UserProfile};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentSession};
use crate::session::ProfilePatch;
use crate::state::AppState;

/// GET /api/shell/profile
pub async fn profile_get(Extension(CurrentSession(session)): Extension<CurrentSession>) -> ApiResult<UserProfile> {
    Ok(ApiResponse::success(session.profile().await))
}

/// PATCH /api/shell/profile
///
/// The cached profile is updated before the backend confirms, so the header
/// and avatar reflect the change immediately. A failed save puts back only
/// the fields this request changed.
pub async fn profile_patch(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    payload: Result<Json<ProfilePatch>, JsonRejection>,
) -> ApiResult<UserProfile> {
    let Json(patch) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    if patch.is_empty() {
        return Err(ApiError::bad_request("Nothing to update"));
    }
    patch
        .validate()
        .map_err(|fields| ApiError::validation_error("Invalid profile", Some(fields)))?;

    let previous = session.apply_profile(&patch).await;
    let body = serde_json::to_value(&patch)
        .map_err(|e| ApiError::internal_server_error(format!("Failed to encode profile: {}", e)))?;

    match state
        .backend
        .update(session.token(), Resource::Users, &previous.id, &body)
        .await
    {
        Ok(_) => Ok(ApiResponse::success(session.profile().await)),
        Err(e) => {
            tracing::warn!("Profile save failed for {}, reverting: {}", previous.id, e);
            session.revert_profile(&patch, &previous).await;
            Err(e.into())
        }
    }
}
