use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// One-shot message for the user (the dashboard shows these as toasts)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            created_at: Utc::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, message)
    }
}

/// Pending notifications for one session; each is delivered exactly once
#[derive(Debug, Default)]
pub struct Notifications {
    pending: Mutex<Vec<Notification>>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push(&self, notification: Notification) {
        self.pending.lock().await.push(notification);
    }

    pub async fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.pending.lock().await)
    }

    pub async fn len(&self) -> usize {
        self.pending.lock().await.len()
    }
}
