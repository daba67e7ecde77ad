use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{BackendError, BackendResult};

/// Uniform `{ success, data?, error? }` envelope every backend endpoint answers with
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl Envelope {
    /// Parse a raw body. Some endpoints wrap their payload twice
    /// (`{ success, data: { success, data } }`); that inner layer is peeled here
    /// so no caller ever unwraps by hand.
    pub fn parse(body: &str) -> BackendResult<Self> {
        let envelope: Envelope = serde_json::from_str(body)?;
        Ok(envelope.normalize())
    }

    pub fn normalize(mut self) -> Self {
        if let Some(Value::Object(inner)) = &self.data {
            let is_wrapped = inner.contains_key("success")
                && inner.get("success").map(Value::is_boolean).unwrap_or(false)
                && inner.keys().all(|k| matches!(k.as_str(), "success" | "data" | "error" | "message"));
            if is_wrapped {
                let inner_success = inner.get("success").and_then(Value::as_bool).unwrap_or(false);
                let inner_error = inner.get("error").and_then(Value::as_str).map(str::to_string);
                let inner_data = inner.get("data").cloned();
                self.success = self.success && inner_success;
                self.error = self.error.or(inner_error);
                self.data = inner_data;
            }
        }
        self
    }

    pub fn error_message(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| "request was not successful".to_string())
    }

    /// Turn the envelope into the payload, or the backend's own error text
    pub fn into_data(self) -> BackendResult<Value> {
        if !self.success {
            return Err(BackendError::Rejected(self.error_message()));
        }
        Ok(self.data.unwrap_or(Value::Null))
    }

    pub fn into_typed<T: DeserializeOwned>(self) -> BackendResult<T> {
        let data = self.into_data()?;
        Ok(serde_json::from_value(data)?)
    }
}
