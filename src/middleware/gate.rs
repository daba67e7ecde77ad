use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;

use super::response::ApiResponse;
use super::session::{resolve_session, with_cleared_cookie, CurrentSession};
use crate::access::path::{has_path_prefix, normalize_path};
use crate::access::AccessState;
use crate::error::{ApiError, LOGIN_PATH};
use crate::session::SessionContext;
use crate::state::AppState;

/// Wraps every page. Signed-in navigations go through the session's route
/// gate; anonymous visitors only reach excluded (public) pages and are sent to
/// the login page otherwise.
pub async fn route_gate_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    // unknown API routes end up here as the router fallback
    if has_path_prefix(&path, "/api") {
        return ApiError::not_found(format!("No API route for {}", path)).into_response();
    }

    let Some(session) = resolve_session(&state, request.headers()).await else {
        if state.sessions.exclusions().matches(normalize_path(&path)) {
            return next.run(request).await;
        }
        tracing::debug!("Anonymous request for '{}', redirecting to login", path);
        return Redirect::to(LOGIN_PATH).into_response();
    };

    let outcome = session.navigate(&path).await;

    // backend refused the token during the check: forced logout
    if session.gate.token_rejected() {
        tracing::warn!("Backend rejected session {} on '{}', forcing logout", session.id, path);
        state.sessions.invalidate(&session.id).await;
        return with_cleared_cookie(&state, Redirect::to(LOGIN_PATH).into_response());
    }

    match outcome {
        AccessState::Granted => {
            request.extensions_mut().insert(CurrentSession(session));
            next.run(request).await
        }
        AccessState::Denied | AccessState::Checking => access_denied(&session, &path).await,
    }
}

async fn access_denied(session: &SessionContext, path: &str) -> Response {
    let notifications = session.notifications.drain().await;
    ApiResponse::refused(
        ApiError::forbidden("Access denied"),
        json!({
            "view": AccessState::Denied.view(),
            "path": path,
            "notifications": notifications,
        }),
    )
    .into_response()
}
