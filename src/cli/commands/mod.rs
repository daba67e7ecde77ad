pub mod access;
pub mod auth;
pub mod menu;

use std::time::Duration;

use crate::backend::BackendClient;
use crate::cli::config::{resolve_api_url, CliProfile};

/// Backend client for the given flag or saved profile
pub(crate) fn backend_client(api_url: Option<String>, profile: &CliProfile) -> anyhow::Result<BackendClient> {
    let base_url = resolve_api_url(api_url, profile);
    let timeout = Duration::from_secs(crate::config::config().backend.timeout_secs);
    Ok(BackendClient::new(&base_url, timeout)?)
}
