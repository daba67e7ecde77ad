//! Client side of the external REST backend.
//!
//! Every call returns [`BackendResult`]; envelopes are normalized in
//! [`envelope::Envelope`] so handlers never look at raw response shapes.

pub mod client;
pub mod envelope;
pub mod error;
pub mod resource;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::menu::RawMenuNode;

pub use client::{BackendClient, SignIn, UserProfile};
pub use envelope::Envelope;
pub use error::{BackendError, BackendResult};
pub use resource::Resource;

/// Answer of the remote "may this user open this path" check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessDecision {
    #[serde(default)]
    pub has_access: bool,
}

impl AccessDecision {
    /// Read the `data` of a successful check. Only an explicit
    /// `hasAccess: true` grants; a missing or odd payload is a denial.
    pub fn from_data(data: &Value) -> Self {
        Self {
            has_access: data.get("hasAccess").and_then(Value::as_bool).unwrap_or(false),
        }
    }
}

/// The two backend calls navigation depends on. Split out so the menu store
/// and the route gate can run against an in-memory double.
#[async_trait]
pub trait NavigationApi: Send + Sync {
    /// `GET /api/menus/sidebar` for the bearer of `token`
    async fn fetch_navigation(&self, token: &str) -> BackendResult<Vec<RawMenuNode>>;

    /// `POST /api/menus/check-access` with the raw pathname
    async fn check_access(&self, token: &str, path: &str) -> BackendResult<AccessDecision>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn only_explicit_true_grants() {
        assert!(AccessDecision::from_data(&json!({ "hasAccess": true })).has_access);
        assert!(!AccessDecision::from_data(&json!({ "hasAccess": false })).has_access);
        assert!(!AccessDecision::from_data(&json!({})).has_access);
        assert!(!AccessDecision::from_data(&Value::Null).has_access);
        assert!(!AccessDecision::from_data(&json!({ "hasAccess": "yes" })).has_access);
    }
}
