use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::{clear_session_cookie, cookie_value, validate_jwt};
use crate::error::ApiError;
use crate::session::SessionContext;
use crate::state::AppState;

/// Session of the current request, injected by the session and gate middleware
#[derive(Clone)]
pub struct CurrentSession(pub Arc<SessionContext>);

/// Look up the live session named by the request's cookie
pub async fn resolve_session(state: &AppState, headers: &HeaderMap) -> Option<Arc<SessionContext>> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    let token = cookie_value(cookies, &state.config.session.cookie_name)?;

    let claims = match validate_jwt(token, &state.config.session) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!("Ignoring session cookie: {}", e);
            return None;
        }
    };

    state.sessions.get(&claims.sid).await
}

/// Requires a signed-in session. A 401 coming back from the handler (the
/// backend rejected the session's token) ends the session: it is invalidated
/// and the cookie cleared, so the client lands on the login page.
pub async fn require_session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(session) = resolve_session(&state, request.headers()).await else {
        return with_cleared_cookie(&state, ApiError::unauthorized("Sign in required").into_response());
    };

    request.extensions_mut().insert(CurrentSession(session.clone()));
    let response = next.run(request).await;

    if response.status() == StatusCode::UNAUTHORIZED {
        tracing::warn!("Backend rejected session {}, forcing logout", session.id);
        state.sessions.invalidate(&session.id).await;
        return with_cleared_cookie(&state, response);
    }

    response
}

pub fn with_cleared_cookie(state: &AppState, mut response: Response) -> Response {
    if let Ok(value) = HeaderValue::from_str(&clear_session_cookie(&state.config.session)) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}
