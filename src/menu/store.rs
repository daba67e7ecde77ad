use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use super::icon::Icon;
use super::node::{Capabilities, MenuNode};
use super::tree::MenuTree;
use crate::backend::NavigationApi;

pub const SETTINGS_GROUP_TITLE: &str = "Settings";
pub const NAVIGATION_CONFIG_ID: &str = "local-manage-navigation";
pub const NAVIGATION_CONFIG_TITLE: &str = "Manage Navigation";
pub const NAVIGATION_CONFIG_URL: &str = "/settings/menus";

/// What consumers of the store observe
#[derive(Debug, Clone, Default, Serialize)]
pub struct MenuState {
    pub tree: Arc<MenuTree>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Holds one session's navigation tree: fetched once, read-only afterwards,
/// discarded with the session.
pub struct MenuTreeStore {
    api: Arc<dyn NavigationApi>,
    synthesize_local_entries: bool,
    state: watch::Sender<MenuState>,
    attempted: AtomicBool,
}

impl MenuTreeStore {
    /// `synthesize_local_entries` is on outside production; it adds the
    /// navigation-configuration screen for developers.
    pub fn new(api: Arc<dyn NavigationApi>, synthesize_local_entries: bool) -> Self {
        let (state, _) = watch::channel(MenuState::default());
        Self {
            api,
            synthesize_local_entries,
            state,
            attempted: AtomicBool::new(false),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<MenuState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> MenuState {
        self.state.borrow().clone()
    }

    pub fn tree(&self) -> Arc<MenuTree> {
        self.state.borrow().tree.clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.attempted.load(Ordering::SeqCst) && !self.state.borrow().loading
    }

    /// First call fetches; later calls return the settled state untouched.
    /// A failed fetch is not retried here, see [`MenuTreeStore::reload`].
    pub async fn load(&self, token: &str, role_id: Option<&str>) -> MenuState {
        if self.attempted.swap(true, Ordering::SeqCst) {
            return self.snapshot();
        }
        self.fetch(token, role_id).await
    }

    pub async fn reload(&self, token: &str, role_id: Option<&str>) -> MenuState {
        self.attempted.store(true, Ordering::SeqCst);
        self.fetch(token, role_id).await
    }

    /// Drop the tree (logout)
    pub fn clear(&self) {
        self.settle(MenuTree::empty(), None);
    }

    async fn fetch(&self, token: &str, role_id: Option<&str>) -> MenuState {
        let Some(role_id) = role_id.filter(|r| !r.trim().is_empty()) else {
            tracing::debug!("No role on session, navigation stays empty");
            self.settle(MenuTree::empty(), None);
            return self.snapshot();
        };

        self.state.send_modify(|state| state.loading = true);

        let result = match self.api.fetch_navigation(token).await {
            Ok(raw) => MenuTree::from_raw(raw).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match result {
            Ok(mut tree) => {
                if self.synthesize_local_entries && add_navigation_config_entry(&mut tree) {
                    tracing::debug!("Added '{}' entry under '{}'", NAVIGATION_CONFIG_TITLE, SETTINGS_GROUP_TITLE);
                }
                tracing::info!("Loaded {} navigation entries for role {}", tree.len(), role_id);
                self.settle(tree, None);
            }
            Err(message) => {
                tracing::warn!("Failed to load navigation for role {}: {}", role_id, message);
                self.settle(MenuTree::empty(), Some(message));
            }
        }

        self.snapshot()
    }

    fn settle(&self, tree: MenuTree, error: Option<String>) {
        self.state.send_replace(MenuState {
            tree: Arc::new(tree),
            loading: false,
            error,
        });
    }
}

/// Append the navigation-configuration screen under the settings group unless
/// it is already there. Returns whether the tree changed.
pub fn add_navigation_config_entry(tree: &mut MenuTree) -> bool {
    if tree.contains_id(NAVIGATION_CONFIG_ID) {
        return false;
    }

    let Some(group) = tree.root_group_mut(SETTINGS_GROUP_TITLE) else {
        return false;
    };

    let present = group.children.iter().any(|child| {
        child.url.route() == Some(NAVIGATION_CONFIG_URL)
            || child.title.eq_ignore_ascii_case(NAVIGATION_CONFIG_TITLE)
    });
    if present {
        return false;
    }

    let order = group.children.iter().map(|c| c.order).max().map(|o| o + 1).unwrap_or(0);
    group.children.push(
        MenuNode::route(NAVIGATION_CONFIG_ID, NAVIGATION_CONFIG_TITLE, NAVIGATION_CONFIG_URL)
            .with_icon(Icon::Menu)
            .with_order(order)
            .with_capabilities(Capabilities::all()),
    );
    true
}
