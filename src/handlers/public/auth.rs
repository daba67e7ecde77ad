// handlers/public/auth.rs - sign-in, sign-out and provider discovery

use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{generate_jwt, session_cookie, Claims};
use crate::error::{ApiError, HOME_PATH};
use crate::middleware::session::with_cleared_cookie;
use crate::middleware::{resolve_session, ApiResponse, ApiResult};
use crate::session::profile::is_plausible_email;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    fn validate(&self) -> Result<(), ApiError> {
        let mut field_errors = HashMap::new();
        if self.email.trim().is_empty() {
            field_errors.insert("email".to_string(), "Email is required".to_string());
        } else if !is_plausible_email(self.email.trim()) {
            field_errors.insert("email".to_string(), "Enter a valid email address".to_string());
        }
        if self.password.is_empty() {
            field_errors.insert("password".to_string(), "Password is required".to_string());
        }

        if field_errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error("Invalid sign-in form", Some(field_errors)))
        }
    }
}

/// GET /api/auth/providers - sign-in methods the login page may offer
pub async fn providers_get(State(state): State<AppState>) -> ApiResult<Value> {
    let mut providers = vec!["credentials"];
    providers.extend(state.config.oauth.enabled_providers());
    Ok(ApiResponse::success(json!({ "providers": providers })))
}

/**
 * POST /api/auth/login - exchange credentials for a console session
 *
 * Expected Input:
 * ```json
 * { "email": "string", "password": "string" }
 * ```
 *
 * The backend validates the credentials and hands back its own token plus the
 * user profile. Both stay server-side; the browser only receives a signed
 * cookie naming the session. The navigation tree is fetched right away so the
 * first page render already has it.
 */
pub async fn login_post(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    request.validate()?;

    let sign_in = state.backend.sign_in(request.email.trim(), &request.password).await?;
    let session = state.sessions.create(sign_in).await;
    let profile = session.profile().await;

    let claims = Claims::new(session.id, profile.id.clone(), state.config.session.expiry_hours);
    let token = match generate_jwt(&claims, &state.config.session) {
        Ok(token) => token,
        Err(e) => {
            state.sessions.invalidate(&session.id).await;
            return Err(e.into());
        }
    };

    let menu = session.load_menu().await;
    if let Some(error) = &menu.error {
        tracing::warn!("Signed in {} without navigation: {}", profile.email, error);
    }
    tracing::info!("Session {} started for {}", session.id, profile.email);

    let mut response = ApiResponse::success(json!({
        "user": profile,
        "redirect": HOME_PATH,
        "menu": menu,
    }))
    .into_response();

    let cookie = HeaderValue::from_str(&session_cookie(&token, &state.config.session))
        .map_err(|_| ApiError::internal_server_error("Could not issue session"))?;
    response.headers_mut().append(header::SET_COOKIE, cookie);
    Ok(response)
}

/// POST /api/auth/logout - drop the session and its navigation tree
pub async fn logout_post(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let ended = match resolve_session(&state, &headers).await {
        Some(session) => state.sessions.invalidate(&session.id).await,
        None => false,
    };

    let response = ApiResponse::success(json!({ "signed_out": ended })).into_response();
    with_cleared_cookie(&state, response)
}
