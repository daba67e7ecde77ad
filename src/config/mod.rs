use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub backend: BackendConfig,
    pub server: ServerConfig,
    pub session: SessionConfig,
    pub access: AccessConfig,
    pub oauth: OAuthConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Origin of the REST backend, e.g. `https://api.example.com`
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub enable_cors: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub secret: String,
    pub expiry_hours: u64,
    pub secure_cookie: bool,
    pub http_only: bool,
}

/// What the route gate does when the access check itself cannot be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    FailOpen,
    FailClosed,
}

impl FailurePolicy {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "open" | "fail_open" | "fail-open" => Some(FailurePolicy::FailOpen),
            "closed" | "fail_closed" | "fail-closed" => Some(FailurePolicy::FailClosed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Public pages that never reach the remote access check
    pub excluded_paths: Vec<String>,
    pub failure_policy: FailurePolicy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OAuthConfig {
    pub google_client_id: Option<String>,
    pub google_client_secret: Option<String>,
    pub github_client_id: Option<String>,
    pub github_client_secret: Option<String>,
}

impl OAuthConfig {
    /// Providers are only advertised when both halves of the credential pair are present
    pub fn enabled_providers(&self) -> Vec<&'static str> {
        let mut providers = Vec::new();
        if is_set(&self.google_client_id) && is_set(&self.google_client_secret) {
            providers.push("google");
        }
        if is_set(&self.github_client_id) && is_set(&self.github_client_secret) {
            providers.push("github");
        }
        providers
    }
}

fn is_set(value: &Option<String>) -> bool {
    value.as_deref().map(|v| !v.trim().is_empty()).unwrap_or(false)
}

pub const DEFAULT_EXCLUDED_PATHS: &[&str] = &[
    "/auth/login",
    "/auth/register",
    "/auth/error",
    "/welcome",
    "/unauthorized",
    "/not-found",
];

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Backend overrides
        if let Ok(v) = env::var("API_BASE_URL") {
            self.backend.base_url = v.trim_end_matches('/').to_string();
        }
        if let Ok(v) = env::var("API_TIMEOUT_SECS") {
            self.backend.timeout_secs = v.parse().unwrap_or(self.backend.timeout_secs);
        }

        // Server overrides
        if let Some(port) = env::var("ESTATE_CONSOLE_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }
        if let Ok(v) = env::var("SERVER_ENABLE_CORS") {
            self.server.enable_cors = v.parse().unwrap_or(self.server.enable_cors);
        }

        // Session overrides
        if let Ok(v) = env::var("SESSION_SECRET") {
            self.session.secret = v;
        }
        if let Ok(v) = env::var("SESSION_COOKIE_NAME") {
            self.session.cookie_name = v;
        }
        if let Ok(v) = env::var("SESSION_EXPIRY_HOURS") {
            self.session.expiry_hours = v.parse().unwrap_or(self.session.expiry_hours);
        }
        if let Ok(v) = env::var("SESSION_SECURE_COOKIE") {
            self.session.secure_cookie = v.parse().unwrap_or(self.session.secure_cookie);
        }

        // Access overrides
        if let Ok(v) = env::var("ACCESS_EXCLUDED_PATHS") {
            self.access.excluded_paths = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(v) = env::var("ACCESS_FAILURE_POLICY") {
            self.access.failure_policy =
                FailurePolicy::parse(&v).unwrap_or(self.access.failure_policy);
        }

        // OAuth credentials
        self.oauth.google_client_id = env::var("GOOGLE_CLIENT_ID").ok().or(self.oauth.google_client_id);
        self.oauth.google_client_secret = env::var("GOOGLE_CLIENT_SECRET").ok().or(self.oauth.google_client_secret);
        self.oauth.github_client_id = env::var("GITHUB_CLIENT_ID").ok().or(self.oauth.github_client_id);
        self.oauth.github_client_secret = env::var("GITHUB_CLIENT_SECRET").ok().or(self.oauth.github_client_secret);

        self
    }

    fn excluded_defaults() -> Vec<String> {
        DEFAULT_EXCLUDED_PATHS.iter().map(|s| s.to_string()).collect()
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            backend: BackendConfig {
                base_url: "http://localhost:8080".to_string(),
                timeout_secs: 30,
            },
            server: ServerConfig {
                port: 3000,
                enable_cors: true,
            },
            session: SessionConfig {
                cookie_name: "estate_session".to_string(),
                secret: "development-session-secret".to_string(),
                expiry_hours: 24 * 7, // 1 week
                secure_cookie: false,
                http_only: true,
            },
            access: AccessConfig {
                excluded_paths: Self::excluded_defaults(),
                failure_policy: FailurePolicy::FailOpen,
            },
            oauth: OAuthConfig::default(),
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            backend: BackendConfig {
                base_url: "https://staging-api.example.com".to_string(),
                timeout_secs: 15,
            },
            server: ServerConfig {
                port: 3000,
                enable_cors: true,
            },
            session: SessionConfig {
                cookie_name: "estate_session".to_string(),
                secret: String::new(),
                expiry_hours: 24,
                secure_cookie: true,
                http_only: true,
            },
            access: AccessConfig {
                excluded_paths: Self::excluded_defaults(),
                failure_policy: FailurePolicy::FailOpen,
            },
            oauth: OAuthConfig::default(),
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            backend: BackendConfig {
                base_url: "https://api.example.com".to_string(),
                timeout_secs: 10,
            },
            server: ServerConfig {
                port: 3000,
                enable_cors: false,
            },
            session: SessionConfig {
                cookie_name: "__Host-estate_session".to_string(),
                secret: String::new(),
                expiry_hours: 8,
                secure_cookie: true,
                http_only: true,
            },
            access: AccessConfig {
                excluded_paths: Self::excluded_defaults(),
                failure_policy: FailurePolicy::FailOpen,
            },
            oauth: OAuthConfig::default(),
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
