use axum::{extract::Query, Extension};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::access::path::normalize_path;
use crate::access::{find_node, resolve_capabilities};
use crate::menu::MenuState;
use crate::middleware::{ApiResponse, ApiResult, CurrentSession};
use crate::sidebar::{self, SidebarView};

#[derive(Debug, Deserialize)]
pub struct CapabilitiesQuery {
    pub path: String,
}

/// GET /api/shell/sidebar
pub async fn sidebar_get(Extension(CurrentSession(session)): Extension<CurrentSession>) -> ApiResult<SidebarView> {
    let menu = session.load_menu().await;
    Ok(ApiResponse::success(sidebar::render(&menu.tree)))
}

/// GET /api/shell/capabilities?path=/tenants/edit/7
///
/// Capabilities come from the cached tree only; no backend call is made and
/// an unknown path yields all-false.
pub async fn capabilities_get(
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Query(query): Query<CapabilitiesQuery>,
) -> ApiResult<Value> {
    let path = normalize_path(&query.path);
    let tree = session.menu.tree();
    let matched = find_node(&tree, path).map(|node| node.id.clone());

    Ok(ApiResponse::success(json!({
        "path": path,
        "matched": matched,
        "capabilities": resolve_capabilities(&tree, path),
    })))
}

/// GET /api/shell/menu - raw menu state for this session
pub async fn menu_get(Extension(CurrentSession(session)): Extension<CurrentSession>) -> ApiResult<MenuState> {
    Ok(ApiResponse::success(session.load_menu().await))
}

/// POST /api/shell/menu/reload - refetch after navigation was edited
pub async fn menu_reload_post(Extension(CurrentSession(session)): Extension<CurrentSession>) -> ApiResult<MenuState> {
    tracing::info!("Reloading navigation for session {}", session.id);
    Ok(ApiResponse::success(session.reload_menu().await))
}
