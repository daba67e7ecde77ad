use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{pages, protected, public};
use crate::middleware::{require_session_middleware, route_gate_middleware};
use crate::state::AppState;

/// Full console router. Anything not matched by an API route is treated as a
/// page navigation and goes through the route gate.
pub fn router(state: AppState) -> Router {
    let enable_cors = state.config.server.enable_cors;

    let app = Router::new()
        .route("/health", get(public::health_get))
        .merge(auth_public_routes())
        .merge(protected_routes(state.clone()))
        .fallback_service(page_routes(state.clone()))
        .with_state(state);

    let app = app.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));
    if enable_cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

fn auth_public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/providers", get(public::providers_get))
        .route("/api/auth/login", post(public::login_post))
        .route("/api/auth/logout", post(public::logout_post))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Shell: sidebar, capabilities, menu state, profile
        .route("/api/shell/sidebar", get(protected::sidebar_get))
        .route("/api/shell/capabilities", get(protected::capabilities_get))
        .route("/api/shell/menu", get(protected::menu_get))
        .route("/api/shell/menu/reload", post(protected::menu_reload_post))
        .route(
            "/api/shell/profile",
            get(protected::profile_get).patch(protected::profile_patch),
        )
        // Resource proxy
        .route(
            "/api/data/:resource",
            get(protected::resource_get).post(protected::resource_post),
        )
        .route(
            "/api/data/:resource/:id",
            get(protected::record_get)
                .put(protected::record_put)
                .delete(protected::record_delete),
        )
        .route_layer(from_fn_with_state(state, require_session_middleware))
}

fn page_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::page_get))
        .route("/*path", get(pages::page_get))
        .layer(from_fn_with_state(state.clone(), route_gate_middleware))
        .with_state(state)
}
