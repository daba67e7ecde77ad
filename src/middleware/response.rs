use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

use crate::error::ApiError;

/// Handler payload plus the status it goes out with.
///
/// Successful responses are wrapped as `{ success: true, data }`. A response
/// built with [`ApiResponse::refused`] keeps its payload but goes out in the
/// error shape of the given [`ApiError`], with the payload under `data`.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub status: StatusCode,
    refusal: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self::with_status(data, StatusCode::OK)
    }

    pub fn with_status(data: T, status: StatusCode) -> Self {
        Self {
            data,
            status,
            refusal: None,
        }
    }

    pub fn created(data: T) -> Self {
        Self::with_status(data, StatusCode::CREATED)
    }

    /// Error response that still carries something for the shell to render
    pub fn refused(error: ApiError, data: T) -> Self {
        let status = StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self {
            data,
            status,
            refusal: Some(error),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let data = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return ApiError::internal_server_error("Failed to serialize response data").into_response();
            }
        };

        let body = match &self.refusal {
            Some(error) => {
                let mut body = error.to_json();
                body["data"] = data;
                body
            }
            None => json!({ "success": true, "data": data }),
        };

        (self.status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;
