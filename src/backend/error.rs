use thiserror::Error;

/// Failure of a call to the REST backend, normalized from transport, HTTP status and envelope
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Backend unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed backend response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Not authenticated: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Request rejected: {0}")]
    Rejected(String),
}

impl BackendError {
    /// The call never produced a usable answer (network failure or unreadable body)
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, BackendError::Transport(_) | BackendError::Decode(_))
    }

    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 => BackendError::Unauthorized(message),
            403 => BackendError::Forbidden(message),
            404 => BackendError::NotFound(message),
            _ => BackendError::Status { status, message },
        }
    }
}

pub type BackendResult<T> = Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_variants() {
        assert!(matches!(BackendError::from_status(401, "x"), BackendError::Unauthorized(_)));
        assert!(matches!(BackendError::from_status(403, "x"), BackendError::Forbidden(_)));
        assert!(matches!(BackendError::from_status(404, "x"), BackendError::NotFound(_)));
        assert!(matches!(
            BackendError::from_status(500, "boom"),
            BackendError::Status { status: 500, .. }
        ));
    }

    #[test]
    fn only_transport_and_decode_count_as_transport_failures() {
        let decode = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        assert!(BackendError::Decode(decode).is_transport_failure());
        assert!(!BackendError::Rejected("no".into()).is_transport_failure());
        assert!(!BackendError::from_status(502, "bad gateway").is_transport_failure());
    }
}
