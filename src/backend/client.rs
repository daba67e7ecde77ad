use std::time::Duration;

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use url::Url;

use super::envelope::Envelope;
use super::error::{BackendError, BackendResult};
use super::resource::Resource;
use super::{AccessDecision, NavigationApi};
use crate::config::BackendConfig;
use crate::menu::node::{optional_string_or_number, string_or_number};
use crate::menu::tree::NavigationPayload;
use crate::menu::RawMenuNode;

/// Profile snapshot of the signed-in user, as the backend reports it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "role_id", deserialize_with = "optional_string_or_number")]
    pub role_id: Option<String>,
    #[serde(default)]
    pub role_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Result of a credentials sign-in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignIn {
    pub token: String,
    pub user: UserProfile,
}

/// reqwest client bound to one backend origin
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base: Url,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> BackendResult<Self> {
        let mut base = Url::parse(base_url)?;
        // Url::join replaces the last segment unless the base ends in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base })
    }

    pub fn from_config(config: &BackendConfig) -> BackendResult<Self> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    fn endpoint(&self, path: &str) -> BackendResult<Url> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }

    fn resource_url(&self, resource: Resource, id: Option<&str>) -> BackendResult<Url> {
        let mut url = self.endpoint(&format!("api/{}", resource.segment()))?;
        if let Some(id) = id {
            url.path_segments_mut()
                .map_err(|_| BackendError::Rejected(format!("cannot address {} by id", resource)))?
                .push(id);
        }
        Ok(url)
    }

    /// Send a request and fold transport, HTTP status and envelope into one result
    async fn send(&self, request: RequestBuilder) -> BackendResult<Envelope> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = Envelope::parse(&body)
                .map(|env| env.error_message())
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("request failed").to_string());
            tracing::debug!("Backend answered {}: {}", status, message);
            return Err(BackendError::from_status(status.as_u16(), message));
        }

        Envelope::parse(&body)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> BackendResult<SignIn> {
        let url = self.endpoint("api/auth/login")?;
        let request = self
            .http
            .post(url)
            .json(&json!({ "email": email, "password": password }));
        self.send(request).await?.into_typed()
    }

    pub async fn list(&self, token: &str, resource: Resource, query: &[(String, String)]) -> BackendResult<Value> {
        let url = self.resource_url(resource, None)?;
        let request = self.http.get(url).bearer_auth(token).query(query);
        self.send(request).await?.into_data()
    }

    pub async fn get(&self, token: &str, resource: Resource, id: &str) -> BackendResult<Value> {
        let url = self.resource_url(resource, Some(id))?;
        self.send(self.http.get(url).bearer_auth(token)).await?.into_data()
    }

    pub async fn create(&self, token: &str, resource: Resource, body: &Value) -> BackendResult<Value> {
        let url = self.resource_url(resource, None)?;
        self.send(self.http.post(url).bearer_auth(token).json(body))
            .await?
            .into_data()
    }

    pub async fn update(&self, token: &str, resource: Resource, id: &str, body: &Value) -> BackendResult<Value> {
        let url = self.resource_url(resource, Some(id))?;
        self.send(self.http.put(url).bearer_auth(token).json(body))
            .await?
            .into_data()
    }

    pub async fn delete(&self, token: &str, resource: Resource, id: &str) -> BackendResult<Value> {
        let url = self.resource_url(resource, Some(id))?;
        self.send(self.http.delete(url).bearer_auth(token)).await?.into_data()
    }
}

#[async_trait]
impl NavigationApi for BackendClient {
    async fn fetch_navigation(&self, token: &str) -> BackendResult<Vec<RawMenuNode>> {
        let url = self.endpoint("api/menus/sidebar")?;
        let payload: NavigationPayload = self
            .send(self.http.get(url).bearer_auth(token))
            .await?
            .into_typed()?;
        Ok(payload.nav_main)
    }

    async fn check_access(&self, token: &str, path: &str) -> BackendResult<AccessDecision> {
        let url = self.endpoint("api/menus/check-access")?;
        let request = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&json!({ "path": path }));
        // an envelope that parsed is an answer; anything short of hasAccess:true denies
        let data = self.send(request).await?.into_data()?;
        Ok(AccessDecision::from_data(&data))
    }
}
