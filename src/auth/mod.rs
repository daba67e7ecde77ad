use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SessionConfig;

/// Contents of the signed session cookie. Only identifies the session; the
/// profile and backend token stay server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sid: Uuid,
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(sid: Uuid, user_id: String, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sid,
            sub: user_id,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("Invalid session token: {0}")]
    InvalidToken(String),
    #[error("Session secret not configured")]
    InvalidSecret,
}

pub fn generate_jwt(claims: &Claims, config: &SessionConfig) -> Result<String, JwtError> {
    if config.secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

pub fn validate_jwt(token: &str, config: &SessionConfig) -> Result<Claims, JwtError> {
    if config.secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
    decode::<Claims>(token, &decoding_key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|e| JwtError::InvalidToken(e.to_string()))
}

/// `Set-Cookie` value carrying the session token
pub fn session_cookie(token: &str, config: &SessionConfig) -> String {
    let max_age = config.expiry_hours * 3600;
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; SameSite=Lax",
        config.cookie_name, token, max_age
    );
    if config.http_only {
        cookie.push_str("; HttpOnly");
    }
    if config.secure_cookie {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that removes the session cookie
pub fn clear_session_cookie(config: &SessionConfig) -> String {
    let mut cookie = format!("{}=; Path=/; Max-Age=0; SameSite=Lax", config.cookie_name);
    if config.http_only {
        cookie.push_str("; HttpOnly");
    }
    if config.secure_cookie {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Pull the named cookie out of a `Cookie` header value
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}
