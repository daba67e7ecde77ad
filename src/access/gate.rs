use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{watch, Mutex};

use super::exclusions::ExclusionList;
use super::path::normalize_path;
use crate::backend::{BackendError, NavigationApi};
use crate::config::FailurePolicy;
use crate::notify::{Notification, Notifications};

/// Per-navigation state: every path change starts in `Checking`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessState {
    Checking,
    Granted,
    Denied,
}

/// What the shell shows for a given state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GateView {
    Loading,
    Content,
    AccessDenied,
}

impl AccessState {
    pub fn view(&self) -> GateView {
        match self {
            AccessState::Checking => GateView::Loading,
            AccessState::Granted => GateView::Content,
            AccessState::Denied => GateView::AccessDenied,
        }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, AccessState::Granted)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateSnapshot {
    pub path: String,
    pub state: AccessState,
    /// Navigation counter the state belongs to
    pub generation: u64,
}

/// Gates page rendering behind the backend's access check.
///
/// Decisions are never cached and never derived from the session's menu tree.
/// A result that arrives after a newer navigation started is returned to its
/// caller but not published as the current state.
pub struct RouteAccessGate {
    api: Arc<dyn NavigationApi>,
    exclusions: ExclusionList,
    policy: FailurePolicy,
    generation: AtomicU64,
    state: watch::Sender<GateSnapshot>,
    last_denied: Mutex<Option<String>>,
    notifications: Arc<Notifications>,
    /// Set once the backend refuses the session token itself
    token_rejected: AtomicBool,
}

impl RouteAccessGate {
    pub fn new(
        api: Arc<dyn NavigationApi>,
        exclusions: ExclusionList,
        policy: FailurePolicy,
        notifications: Arc<Notifications>,
    ) -> Self {
        let (state, _) = watch::channel(GateSnapshot {
            path: String::new(),
            state: AccessState::Checking,
            generation: 0,
        });

        Self {
            api,
            exclusions,
            policy,
            generation: AtomicU64::new(0),
            state,
            last_denied: Mutex::new(None),
            notifications,
            token_rejected: AtomicBool::new(false),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<GateSnapshot> {
        self.state.subscribe()
    }

    pub fn current(&self) -> GateSnapshot {
        self.state.borrow().clone()
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// The backend answered 401 to an access check. The denial is not a
    /// permission problem; the session has to end.
    pub fn token_rejected(&self) -> bool {
        self.token_rejected.load(Ordering::SeqCst)
    }

    /// Run the check for a navigation to `path` and return its outcome
    pub async fn navigate(&self, token: &str, path: &str) -> AccessState {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.publish(generation, path, AccessState::Checking);

        let outcome = self.evaluate(token, path).await;

        if self.token_rejected() {
            self.publish(generation, path, outcome);
        } else if self.publish(generation, path, outcome) {
            self.record_outcome(path, outcome).await;
        } else {
            tracing::debug!("Discarding stale access result for '{}' ({:?})", path, outcome);
        }

        outcome
    }

    async fn evaluate(&self, token: &str, path: &str) -> AccessState {
        if self.exclusions.matches(normalize_path(path)) {
            tracing::debug!("'{}' is excluded from access checks", path);
            return AccessState::Granted;
        }

        match self.api.check_access(token, path).await {
            Ok(decision) if decision.has_access => AccessState::Granted,
            Ok(_) => {
                tracing::info!("Access to '{}' denied by backend", path);
                AccessState::Denied
            }
            Err(BackendError::Unauthorized(message)) => {
                tracing::warn!("Access check for '{}' refused the session token: {}", path, message);
                self.token_rejected.store(true, Ordering::SeqCst);
                AccessState::Denied
            }
            Err(e) if e.is_transport_failure() => match self.policy {
                FailurePolicy::FailOpen => {
                    tracing::warn!("Access check for '{}' could not be performed, allowing: {}", path, e);
                    AccessState::Granted
                }
                FailurePolicy::FailClosed => {
                    tracing::warn!("Access check for '{}' could not be performed, denying: {}", path, e);
                    AccessState::Denied
                }
            },
            Err(e) => {
                tracing::info!("Access check for '{}' rejected: {}", path, e);
                AccessState::Denied
            }
        }
    }

    /// Publish `state` if `generation` is still the newest navigation
    fn publish(&self, generation: u64, path: &str, state: AccessState) -> bool {
        self.state.send_if_modified(|current| {
            if generation < current.generation {
                return false;
            }
            *current = GateSnapshot {
                path: path.to_string(),
                state,
                generation,
            };
            true
        })
    }

    async fn record_outcome(&self, path: &str, state: AccessState) {
        let mut last_denied = self.last_denied.lock().await;
        match state {
            AccessState::Denied => {
                if last_denied.as_deref() != Some(path) {
                    *last_denied = Some(path.to_string());
                    self.notifications
                        .push(Notification::error(format!("You do not have access to {}", path)))
                        .await;
                }
            }
            AccessState::Granted => *last_denied = None,
            AccessState::Checking => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Answer, FakeNavigation};
    use std::time::Duration;

    fn gate(api: FakeNavigation, policy: FailurePolicy) -> (Arc<FakeNavigation>, RouteAccessGate, Arc<Notifications>) {
        let api = Arc::new(api);
        let notifications = Arc::new(Notifications::new());
        let gate = RouteAccessGate::new(
            api.clone(),
            ExclusionList::new(["/auth/login", "/welcome"]),
            policy,
            notifications.clone(),
        );
        (api, gate, notifications)
    }

    #[tokio::test]
    async fn excluded_paths_are_granted_without_calls() {
        let (api, gate, _) = gate(FakeNavigation::new().default_answer(Answer::Deny), FailurePolicy::FailOpen);

        assert_eq!(gate.navigate("tok", "/auth/login").await, AccessState::Granted);
        assert_eq!(gate.navigate("tok", "/welcome").await, AccessState::Granted);
        assert_eq!(gate.navigate("tok", "/welcome/intro").await, AccessState::Granted);
        assert_eq!(api.check_calls(), 0);
    }

    #[tokio::test]
    async fn backend_grant_and_denial() {
        let (api, gate, notifications) = gate(
            FakeNavigation::new().answer("/users", Answer::Allow).answer("/roles", Answer::Deny),
            FailurePolicy::FailOpen,
        );

        assert_eq!(gate.navigate("tok", "/users").await, AccessState::Granted);
        assert_eq!(gate.navigate("tok", "/roles").await, AccessState::Denied);
        assert_eq!(gate.current().state, AccessState::Denied);
        assert_eq!(gate.current().state.view(), GateView::AccessDenied);
        assert_eq!(api.check_calls(), 2);
        assert_eq!(api.checked_paths(), vec!["/users", "/roles"]);
        assert_eq!(notifications.len().await, 1);
    }

    #[tokio::test]
    async fn non_success_response_denies() {
        let (_, gate, notifications) = gate(
            FakeNavigation::new().default_answer(Answer::Reject(500)),
            FailurePolicy::FailOpen,
        );

        assert_eq!(gate.navigate("tok", "/assets").await, AccessState::Denied);
        assert_eq!(notifications.len().await, 1);
    }

    #[tokio::test]
    async fn unreachable_backend_fails_open_by_default() {
        let (_, gate, notifications) = gate(
            FakeNavigation::new().default_answer(Answer::Unreachable),
            FailurePolicy::FailOpen,
        );

        assert_eq!(gate.navigate("tok", "/assets").await, AccessState::Granted);
        assert_eq!(gate.current().state.view(), GateView::Content);
        assert_eq!(notifications.len().await, 0);
    }

    #[tokio::test]
    async fn unreachable_backend_denies_when_fail_closed() {
        let (_, gate, _) = gate(
            FakeNavigation::new().default_answer(Answer::Unreachable),
            FailurePolicy::FailClosed,
        );

        assert_eq!(gate.navigate("tok", "/assets").await, AccessState::Denied);
    }

    #[tokio::test]
    async fn refused_connection_follows_policy() {
        let (_, open, notifications) = gate(
            FakeNavigation::new().default_answer(Answer::Transport),
            FailurePolicy::FailOpen,
        );
        assert_eq!(open.navigate("tok", "/assets").await, AccessState::Granted);
        assert_eq!(notifications.len().await, 0);

        let (_, closed, _) = gate(
            FakeNavigation::new().default_answer(Answer::Transport),
            FailurePolicy::FailClosed,
        );
        assert_eq!(closed.navigate("tok", "/assets").await, AccessState::Denied);
        assert!(!closed.token_rejected());
    }

    #[tokio::test]
    async fn rejected_token_denies_without_toast() {
        let (_, gate, notifications) = gate(
            FakeNavigation::new().answer("/dashboard", Answer::Reject(401)),
            FailurePolicy::FailOpen,
        );

        assert_eq!(gate.navigate("tok", "/dashboard").await, AccessState::Denied);
        assert!(gate.token_rejected());
        assert_eq!(gate.current().state, AccessState::Denied);
        assert_eq!(notifications.len().await, 0);
    }

    #[tokio::test]
    async fn forbidden_check_is_a_plain_denial() {
        let (_, gate, notifications) = gate(
            FakeNavigation::new().default_answer(Answer::Reject(403)),
            FailurePolicy::FailOpen,
        );

        assert_eq!(gate.navigate("tok", "/roles").await, AccessState::Denied);
        assert!(!gate.token_rejected());
        assert_eq!(notifications.len().await, 1);
    }

    #[tokio::test]
    async fn repeated_denials_notify_once() {
        let (api, gate, notifications) = gate(
            FakeNavigation::new().answer("/roles", Answer::Deny),
            FailurePolicy::FailOpen,
        );

        for _ in 0..3 {
            assert_eq!(gate.navigate("tok", "/roles").await, AccessState::Denied);
        }
        assert_eq!(api.check_calls(), 3);
        assert_eq!(notifications.drain().await.len(), 1);

        // leaving and coming back is a new denial
        gate.navigate("tok", "/dashboard").await;
        gate.navigate("tok", "/roles").await;
        assert_eq!(notifications.drain().await.len(), 1);
    }

    #[tokio::test]
    async fn state_starts_checking_and_settles() {
        let (_, gate, _) = gate(
            FakeNavigation::new().delay("/units", Duration::from_millis(50)),
            FailurePolicy::FailOpen,
        );
        let mut rx = gate.subscribe();

        let nav = gate.navigate("tok", "/units");
        tokio::pin!(nav);

        tokio::select! {
            _ = &mut nav => panic!("check should still be in flight"),
            changed = rx.changed() => {
                changed.unwrap();
                assert_eq!(rx.borrow().state, AccessState::Checking);
                assert_eq!(rx.borrow().state.view(), GateView::Loading);
            }
        }

        assert_eq!(nav.await, AccessState::Granted);
        assert_eq!(gate.current().state, AccessState::Granted);
        assert_eq!(gate.current().path, "/units");
    }

    #[tokio::test]
    async fn stale_results_do_not_overwrite_newer_navigation() {
        let (_, gate, notifications) = gate(
            FakeNavigation::new()
                .answer("/roles", Answer::Deny)
                .delay("/roles", Duration::from_millis(80))
                .answer("/units", Answer::Allow),
            FailurePolicy::FailOpen,
        );

        let (slow, fast) = tokio::join!(gate.navigate("tok", "/roles"), gate.navigate("tok", "/units"));

        assert_eq!(slow, AccessState::Denied);
        assert_eq!(fast, AccessState::Granted);
        let current = gate.current();
        assert_eq!(current.path, "/units");
        assert_eq!(current.state, AccessState::Granted);
        assert_eq!(notifications.len().await, 0);
    }
}
