// handlers/pages.rs - page shell for every gated GET path
//
// The route gate has already decided access by the time this runs. The page
// gets its sidebar and the action capabilities the menu grants for the path.

use axum::{extract::State, http::Uri, Extension};
use serde_json::{json, Value};

use crate::access::path::normalize_path;
use crate::access::{resolve_capabilities, AccessState};
use crate::middleware::{ApiResponse, ApiResult, CurrentSession};
use crate::sidebar;
use crate::state::AppState;

pub async fn page_get(
    State(state): State<AppState>,
    uri: Uri,
    session: Option<Extension<CurrentSession>>,
) -> ApiResult<Value> {
    let path = normalize_path(uri.path()).to_string();

    let Some(Extension(CurrentSession(session))) = session else {
        let mut providers = vec!["credentials"];
        providers.extend(state.config.oauth.enabled_providers());
        return Ok(ApiResponse::success(json!({
            "view": "public",
            "path": path,
            "providers": providers,
        })));
    };

    // no-op once the tree has been fetched for this session
    let menu = session.load_menu().await;
    let capabilities = resolve_capabilities(&menu.tree, &path);

    Ok(ApiResponse::success(json!({
        "view": AccessState::Granted.view(),
        "path": path,
        "capabilities": capabilities,
        "sidebar": sidebar::render(&menu.tree),
        "menu": {
            "loading": menu.loading,
            "error": menu.error,
        },
        "notifications": session.notifications.drain().await,
        "user": session.profile().await,
    })))
}
