use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::backend::UserProfile;

/// What `estate auth login` leaves behind for later commands
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliProfile {
    pub api_base_url: Option<String>,
    pub token: Option<String>,
    pub user: Option<UserProfile>,
    pub signed_in_at: Option<DateTime<Utc>>,
}

impl CliProfile {
    pub fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }

    pub fn sign_out(&mut self) {
        self.token = None;
        self.user = None;
        self.signed_in_at = None;
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("ESTATE_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("estate").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_profile() -> anyhow::Result<CliProfile> {
    let profile_file = get_config_dir()?.join("profile.json");

    if !profile_file.exists() {
        return Ok(CliProfile::default());
    }

    let content = fs::read_to_string(profile_file)?;
    let profile: CliProfile = serde_json::from_str(&content)?;
    Ok(profile)
}

pub fn save_profile(profile: &CliProfile) -> anyhow::Result<()> {
    let profile_file = get_config_dir()?.join("profile.json");

    let content = serde_json::to_string_pretty(profile)?;
    fs::write(profile_file, content)?;
    Ok(())
}

/// Explicit flag, then the saved profile, then the process configuration
pub fn resolve_api_url(flag: Option<String>, profile: &CliProfile) -> String {
    flag.or_else(|| profile.api_base_url.clone())
        .unwrap_or_else(|| crate::config::config().backend.base_url.clone())
}

pub fn require_token(profile: &CliProfile) -> anyhow::Result<&str> {
    profile
        .token
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("Not signed in, run `estate auth login` first"))
}
