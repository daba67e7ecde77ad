#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    extract::Path,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use estate_console::{app, backend::BackendClient, config::AppConfig, state::AppState};
use reqwest::header::{COOKIE, SET_COOKIE};
use serde_json::{json, Value};

/// Console under test, wired to an in-process mock backend
pub struct TestShell {
    pub base_url: String,
    pub backend_url: String,
    pub client: reqwest::Client,
    pub cookie_name: String,
}

impl TestShell {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sign in and return the `name=value` pair to send back as Cookie
    pub async fn login(&self, email: &str) -> Result<String> {
        let res = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": email, "password": "secret" }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed with {}", res.status());

        let prefix = format!("{}=", self.cookie_name);
        res.headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with(&prefix))
            .and_then(|v| v.split(';').next())
            .map(str::to_string)
            .context("login response carried no session cookie")
    }

    pub async fn get(&self, path: &str, cookie: Option<&str>) -> Result<reqwest::Response> {
        let mut request = self.client.get(self.url(path));
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }
        Ok(request.send().await?)
    }
}

pub async fn spawn_shell() -> Result<TestShell> {
    spawn_shell_with(|_| {}).await
}

pub async fn spawn_shell_with(configure: impl FnOnce(&mut AppConfig)) -> Result<TestShell> {
    let backend_url = spawn(mock_backend()).await?;
    let config = test_config(&backend_url, configure);
    let state = AppState::new(config)?;
    serve_shell(state, backend_url).await
}

/// Sign-in and CRUD reach the mock backend, but menu fetches and access
/// checks go to a port nothing listens on
pub async fn spawn_shell_without_navigation(configure: impl FnOnce(&mut AppConfig)) -> Result<TestShell> {
    let backend_url = spawn(mock_backend()).await?;
    let config = test_config(&backend_url, configure);

    let closed_port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let closed_url = format!("http://127.0.0.1:{}", closed_port);
    let timeout = Duration::from_secs(config.backend.timeout_secs);
    let backend = Arc::new(BackendClient::from_config(&config.backend)?);
    let navigation = Arc::new(BackendClient::new(&closed_url, timeout)?);

    let state = AppState::with_navigation(config, backend, navigation);
    serve_shell(state, backend_url).await
}

fn test_config(backend_url: &str, configure: impl FnOnce(&mut AppConfig)) -> AppConfig {
    let mut config = AppConfig::development();
    config.backend.base_url = backend_url.to_string();
    config.backend.timeout_secs = 5;
    configure(&mut config);
    config
}

async fn serve_shell(state: AppState, backend_url: String) -> Result<TestShell> {
    let cookie_name = state.config.session.cookie_name.clone();
    let base_url = spawn(app::router(state)).await?;

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()?;

    Ok(TestShell {
        base_url,
        backend_url,
        client,
        cookie_name,
    })
}

async fn spawn(router: Router) -> Result<String> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    let base_url = format!("http://127.0.0.1:{}", port);
    wait_ready(&base_url, Duration::from_secs(5)).await?;
    Ok(base_url)
}

async fn wait_ready(base_url: &str, timeout: Duration) -> Result<()> {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if tokio::net::TcpStream::connect(base_url.trim_start_matches("http://")).await.is_ok() {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    anyhow::bail!("server did not become ready on {} within {:?}", base_url, timeout)
}

// ---------------------------------------------------------------------------
// Mock backend
//
// admin@example.com   token tok-admin, role r1
// norole@example.com  token tok-norole, no role
// expired@example.com token tok-expired, every later call answers 401
// ---------------------------------------------------------------------------

fn mock_backend() -> Router {
    Router::new()
        .route("/api/auth/login", post(mock_login))
        .route("/api/menus/sidebar", get(mock_sidebar))
        .route("/api/menus/check-access", post(mock_check_access))
        .route("/api/:resource", get(mock_list).post(mock_create))
        .route(
            "/api/:resource/:id",
            get(mock_show).put(mock_update).delete(mock_delete),
        )
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

/// Valid token or the 401 the backend would send
fn authorize(headers: &HeaderMap) -> Result<String, Response> {
    match bearer(headers) {
        Some(token) if token != "tok-expired" => Ok(token),
        _ => Err(failure(StatusCode::UNAUTHORIZED, "Token expired")),
    }
}

async fn mock_login(Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    if body["password"] != "secret" {
        return failure(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }

    let (token, role) = match email {
        "admin@example.com" => ("tok-admin", json!("r1")),
        "norole@example.com" => ("tok-norole", Value::Null),
        "expired@example.com" => ("tok-expired", json!(1)),
        _ => return failure(StatusCode::UNAUTHORIZED, "Invalid credentials"),
    };

    Json(json!({
        "success": true,
        "data": {
            "token": token,
            "user": { "id": 7, "name": "Test User", "email": email, "roleId": role }
        }
    }))
    .into_response()
}

async fn mock_sidebar(headers: HeaderMap) -> Response {
    if let Err(denied) = authorize(&headers) {
        return denied;
    }

    // double-wrapped on purpose; the client normalizes it
    Json(json!({
        "success": true,
        "data": {
            "success": true,
            "data": {
                "navMain": [
                    { "id": 1, "title": "Dashboard", "url": "/dashboard", "icon": "LayoutDashboard", "order": 1,
                      "capabilities": { "canView": true } },
                    { "id": 2, "title": "Property", "url": "#", "icon": "Building", "order": 2, "children": [
                        { "id": 21, "title": "Units", "url": "/units", "order": 2,
                          "capabilities": { "canView": true } },
                        { "id": 22, "title": "Tenants", "url": "/tenants", "icon": "Users", "order": 1,
                          "capabilities": { "canView": true, "canAdd": true, "canEdit": true } }
                    ]},
                    { "id": 9, "title": "Settings", "url": "#", "icon": "Settings", "order": 9, "children": [
                        { "id": 91, "title": "Users", "url": "/users", "icon": "UserCog",
                          "capabilities": { "canView": true, "canDelete": true } }
                    ]}
                ]
            }
        }
    }))
    .into_response()
}

async fn mock_check_access(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Err(denied) = authorize(&headers) {
        return denied;
    }

    match body["path"].as_str().unwrap_or_default() {
        "/broken" => (StatusCode::OK, "<html>upstream proxy error</html>").into_response(),
        "/no-decision" => Json(json!({ "success": true, "data": {} })).into_response(),
        "/bare-success" => Json(json!({ "success": true })).into_response(),
        path if path.starts_with("/reports") => {
            Json(json!({ "success": true, "data": { "hasAccess": false } })).into_response()
        }
        _ => Json(json!({ "success": true, "data": { "hasAccess": true } })).into_response(),
    }
}

async fn mock_list(Path(resource): Path<String>, headers: HeaderMap) -> Response {
    if let Err(denied) = authorize(&headers) {
        return denied;
    }
    Json(json!({
        "success": true,
        "data": [ { "id": 1, "resource": resource }, { "id": 2, "resource": resource } ]
    }))
    .into_response()
}

async fn mock_create(Path(resource): Path<String>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Err(denied) = authorize(&headers) {
        return denied;
    }
    let mut record = body;
    record["id"] = json!(100);
    record["resource"] = json!(resource);
    (StatusCode::CREATED, Json(json!({ "success": true, "data": record }))).into_response()
}

async fn mock_show(Path((resource, id)): Path<(String, String)>, headers: HeaderMap) -> Response {
    if let Err(denied) = authorize(&headers) {
        return denied;
    }
    if id == "404" {
        return failure(StatusCode::NOT_FOUND, "Record not found");
    }
    Json(json!({ "success": true, "data": { "id": id, "resource": resource } })).into_response()
}

async fn mock_update(
    Path((resource, id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = authorize(&headers) {
        return denied;
    }
    if resource == "users" && body.get("email").and_then(Value::as_str) == Some("taken@example.com") {
        return Json(json!({ "success": false, "error": "Email already in use" })).into_response();
    }
    let mut record = body;
    record["id"] = json!(id);
    Json(json!({ "success": true, "data": record })).into_response()
}

async fn mock_delete(Path((_resource, id)): Path<(String, String)>, headers: HeaderMap) -> Response {
    if let Err(denied) = authorize(&headers) {
        return denied;
    }
    Json(json!({ "success": true, "data": { "id": id, "deleted": true } })).into_response()
}
