//! Signed-in browser sessions.
//!
//! Each session owns its profile snapshot, backend token, menu store and route
//! gate. Handlers receive it through request extensions; nothing reads session
//! data from ambient storage. Logging out invalidates the context and discards
//! its menu tree.

pub mod profile;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::access::{AccessState, ExclusionList, RouteAccessGate};
use crate::backend::{NavigationApi, SignIn, UserProfile};
use crate::config::{AppConfig, FailurePolicy};
use crate::menu::{MenuState, MenuTreeStore};
use crate::notify::Notifications;

pub use profile::ProfilePatch;

pub struct SessionContext {
    pub id: Uuid,
    token: String,
    profile: RwLock<UserProfile>,
    pub menu: MenuTreeStore,
    pub gate: RouteAccessGate,
    pub notifications: Arc<Notifications>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    invalidated: AtomicBool,
}

impl SessionContext {
    /// Bearer token for backend calls made on behalf of this session
    pub fn token(&self) -> &str {
        &self.token
    }

    pub async fn profile(&self) -> UserProfile {
        self.profile.read().await.clone()
    }

    pub async fn role_id(&self) -> Option<String> {
        self.profile.read().await.role_id.clone()
    }

    /// Apply `patch` to the cached profile right away and hand back the
    /// previous snapshot so a failed save can be undone.
    pub async fn apply_profile(&self, patch: &ProfilePatch) -> UserProfile {
        let mut profile = self.profile.write().await;
        let previous = profile.clone();
        patch.apply_to(&mut profile);
        previous
    }

    /// Undo a failed save of `patch` without clobbering later changes
    pub async fn revert_profile(&self, patch: &ProfilePatch, previous: &UserProfile) {
        patch.revert_on(&mut *self.profile.write().await, previous);
    }

    pub async fn load_menu(&self) -> MenuState {
        let role_id = self.role_id().await;
        self.menu.load(&self.token, role_id.as_deref()).await
    }

    pub async fn reload_menu(&self) -> MenuState {
        let role_id = self.role_id().await;
        self.menu.reload(&self.token, role_id.as_deref()).await
    }

    pub async fn navigate(&self, path: &str) -> AccessState {
        self.gate.navigate(&self.token, path).await
    }

    pub fn is_active(&self) -> bool {
        !self.invalidated.load(Ordering::SeqCst) && Utc::now() < self.expires_at
    }

    pub fn invalidate(&self) {
        self.invalidated.store(true, Ordering::SeqCst);
        self.menu.clear();
    }
}

/// All live sessions of this process
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, Arc<SessionContext>>>,
    api: Arc<dyn NavigationApi>,
    exclusions: ExclusionList,
    failure_policy: FailurePolicy,
    synthesize_local_entries: bool,
    expiry_hours: u64,
}

impl SessionRegistry {
    pub fn new(api: Arc<dyn NavigationApi>, config: &AppConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            api,
            exclusions: ExclusionList::from_config(&config.access),
            failure_policy: config.access.failure_policy,
            synthesize_local_entries: !config.environment.is_production(),
            expiry_hours: config.session.expiry_hours,
        }
    }

    pub fn exclusions(&self) -> &ExclusionList {
        &self.exclusions
    }

    pub async fn create(&self, sign_in: SignIn) -> Arc<SessionContext> {
        self.prune_expired().await;

        let now = Utc::now();
        let notifications = Arc::new(Notifications::new());
        let context = Arc::new(SessionContext {
            id: Uuid::new_v4(),
            token: sign_in.token,
            profile: RwLock::new(sign_in.user),
            menu: MenuTreeStore::new(self.api.clone(), self.synthesize_local_entries),
            gate: RouteAccessGate::new(
                self.api.clone(),
                self.exclusions.clone(),
                self.failure_policy,
                notifications.clone(),
            ),
            notifications,
            created_at: now,
            expires_at: now + Duration::hours(self.expiry_hours as i64),
            invalidated: AtomicBool::new(false),
        });

        self.sessions.write().await.insert(context.id, context.clone());
        tracing::debug!("Created session {}", context.id);
        context
    }

    /// Live session by id; expired or invalidated ones are dropped on sight
    pub async fn get(&self, id: &Uuid) -> Option<Arc<SessionContext>> {
        let session = self.sessions.read().await.get(id).cloned()?;
        if session.is_active() {
            return Some(session);
        }
        self.invalidate(id).await;
        None
    }

    pub async fn invalidate(&self, id: &Uuid) -> bool {
        match self.sessions.write().await.remove(id) {
            Some(session) => {
                session.invalidate();
                tracing::debug!("Invalidated session {}", id);
                true
            }
            None => false,
        }
    }

    /// Drop sessions whose browser never came back. Returns how many went.
    pub async fn prune_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| {
            let keep = session.is_active();
            if !keep {
                session.invalidate();
            }
            keep
        });

        let pruned = before - sessions.len();
        if pruned > 0 {
            tracing::debug!("Pruned {} expired sessions", pruned);
        }
        pruned
    }

    /// Background sweep so abandoned sessions do not pile up
    pub fn spawn_sweeper(self: Arc<Self>, every: std::time::Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                self.prune_expired().await;
            }
        })
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
