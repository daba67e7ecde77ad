use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::backend::{AccessDecision, BackendError, BackendResult, NavigationApi};
use crate::menu::RawMenuNode;

/// How the in-memory backend answers a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Allow,
    Deny,
    /// Non-success HTTP status
    Reject(u16),
    /// Body that cannot be read, i.e. the call "threw"
    Unreachable,
    /// Connection refused before any response
    Transport,
}

async fn failure(answer: Answer) -> BackendError {
    match answer {
        Answer::Transport => {
            // nothing listens on port 1; reqwest reports the refused connection
            let err = reqwest::Client::new()
                .get("http://127.0.0.1:1/")
                .timeout(Duration::from_secs(2))
                .send()
                .await
                .unwrap_err();
            BackendError::Transport(err)
        }
        Answer::Reject(status) => BackendError::from_status(status, "rejected by fake backend"),
        Answer::Unreachable => {
            BackendError::Decode(serde_json::from_str::<Value>("<html>").unwrap_err())
        }
        Answer::Allow | Answer::Deny => BackendError::Rejected("request was not successful".into()),
    }
}

/// In-memory `NavigationApi` with call counters
pub struct FakeNavigation {
    navigation: Result<Value, Answer>,
    answers: HashMap<String, Answer>,
    default_answer: Answer,
    delays: HashMap<String, Duration>,
    fetch_calls: AtomicUsize,
    check_calls: AtomicUsize,
    checked: Mutex<Vec<String>>,
}

impl FakeNavigation {
    pub fn new() -> Self {
        Self {
            navigation: Ok(json!([])),
            answers: HashMap::new(),
            default_answer: Answer::Allow,
            delays: HashMap::new(),
            fetch_calls: AtomicUsize::new(0),
            check_calls: AtomicUsize::new(0),
            checked: Mutex::new(Vec::new()),
        }
    }

    pub fn with_navigation(mut self, nav_main: Value) -> Self {
        self.navigation = Ok(nav_main);
        self
    }

    pub fn failing_navigation(mut self, answer: Answer) -> Self {
        self.navigation = Err(answer);
        self
    }

    pub fn answer(mut self, path: &str, answer: Answer) -> Self {
        self.answers.insert(path.to_string(), answer);
        self
    }

    pub fn default_answer(mut self, answer: Answer) -> Self {
        self.default_answer = answer;
        self
    }

    pub fn delay(mut self, path: &str, delay: Duration) -> Self {
        self.delays.insert(path.to_string(), delay);
        self
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn check_calls(&self) -> usize {
        self.check_calls.load(Ordering::SeqCst)
    }

    pub fn checked_paths(&self) -> Vec<String> {
        self.checked.lock().unwrap().clone()
    }
}

#[async_trait]
impl NavigationApi for FakeNavigation {
    async fn fetch_navigation(&self, _token: &str) -> BackendResult<Vec<RawMenuNode>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        match &self.navigation {
            Ok(value) => Ok(serde_json::from_value(value.clone())?),
            Err(answer) => Err(failure(*answer).await),
        }
    }

    async fn check_access(&self, _token: &str, path: &str) -> BackendResult<AccessDecision> {
        self.check_calls.fetch_add(1, Ordering::SeqCst);
        self.checked.lock().unwrap().push(path.to_string());

        if let Some(delay) = self.delays.get(path) {
            tokio::time::sleep(*delay).await;
        }

        match self.answers.get(path).copied().unwrap_or(self.default_answer) {
            Answer::Allow => Ok(AccessDecision { has_access: true }),
            Answer::Deny => Ok(AccessDecision { has_access: false }),
            other => Err(failure(other).await),
        }
    }
}
