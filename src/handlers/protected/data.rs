// handlers/protected/data.rs - resource CRUD proxied to the backend
//
// GET    /api/data/:resource        list (query string passed through)
// POST   /api/data/:resource        create
// GET    /api/data/:resource/:id    show
// PUT    /api/data/:resource/:id    update
// DELETE /api/data/:resource/:id    delete
//
// The session's backend token is attached to each call; the backend stays the
// authority on whether the user may touch the record.

use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Extension, Json,
};
use serde_json::Value;

use crate::backend::Resource;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentSession};
use crate::state::AppState;

fn parse_resource(name: &str) -> Result<Resource, ApiError> {
    name.parse::<Resource>().map_err(ApiError::not_found)
}

fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    let Json(body) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    if !body.is_object() {
        return Err(ApiError::bad_request("Request body must be a JSON object"));
    }
    Ok(body)
}

pub async fn resource_get(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Path(resource): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult<Value> {
    let resource = parse_resource(&resource)?;

    let mut query: Vec<(String, String)> = query.into_iter().collect();
    query.sort();

    let data = state.backend.list(session.token(), resource, &query).await?;
    Ok(ApiResponse::success(data))
}

pub async fn resource_post(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Path(resource): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let resource = parse_resource(&resource)?;
    let body = json_body(payload)?;

    let data = state.backend.create(session.token(), resource, &body).await?;
    Ok(ApiResponse::created(data))
}

pub async fn record_get(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Path((resource, id)): Path<(String, String)>,
) -> ApiResult<Value> {
    let resource = parse_resource(&resource)?;
    let data = state.backend.get(session.token(), resource, &id).await?;
    Ok(ApiResponse::success(data))
}

pub async fn record_put(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Path((resource, id)): Path<(String, String)>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let resource = parse_resource(&resource)?;
    let body = json_body(payload)?;

    let data = state.backend.update(session.token(), resource, &id, &body).await?;
    Ok(ApiResponse::success(data))
}

pub async fn record_delete(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Path((resource, id)): Path<(String, String)>,
) -> ApiResult<Value> {
    let resource = parse_resource(&resource)?;
    let data = state.backend.delete(session.token(), resource, &id).await?;
    Ok(ApiResponse::success(data))
}
