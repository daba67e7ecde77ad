use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::node::{MenuNode, RawMenuNode};

#[derive(Debug, Error)]
pub enum MenuError {
    #[error("Duplicate menu id '{0}'")]
    DuplicateId(String),

    #[error("Menu payload has no navMain list")]
    MissingNavigation,

    #[error("Invalid menu payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

/// `data` of the sidebar endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationPayload {
    #[serde(default)]
    pub nav_main: Vec<RawMenuNode>,
}

/// The session's navigation tree. Read-only once built; ids are unique across
/// every level.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MenuTree {
    roots: Vec<MenuNode>,
}

impl MenuTree {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_raw(raw: Vec<RawMenuNode>) -> Result<Self, MenuError> {
        Self::from_nodes(raw.into_iter().map(MenuNode::from).collect())
    }

    pub fn from_nodes(mut roots: Vec<MenuNode>) -> Result<Self, MenuError> {
        roots.sort_by_key(|n| n.order);
        let tree = Self { roots };
        tree.check_unique_ids()?;
        Ok(tree)
    }

    /// Accepts a bare node list, `{ navMain }`, or the full `{ success, data: { navMain } }`
    /// response, so saved API responses can be fed straight in.
    pub fn from_payload(payload: Value) -> Result<Self, MenuError> {
        let nodes: Vec<RawMenuNode> = match payload {
            Value::Array(items) => serde_json::from_value(Value::Array(items))?,
            Value::Object(mut map) => {
                if let Some(nav) = map.remove("navMain") {
                    serde_json::from_value(nav)?
                } else if let Some(data) = map.remove("data") {
                    return Self::from_payload(data);
                } else {
                    return Err(MenuError::MissingNavigation);
                }
            }
            _ => return Err(MenuError::MissingNavigation),
        };
        Self::from_raw(nodes)
    }

    fn check_unique_ids(&self) -> Result<(), MenuError> {
        let mut seen = HashSet::new();
        for node in self.iter() {
            if !seen.insert(node.id.as_str()) {
                return Err(MenuError::DuplicateId(node.id.clone()));
            }
        }
        Ok(())
    }

    pub fn roots(&self) -> &[MenuNode] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total node count across all levels
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Pre-order walk over every node
    pub fn iter(&self) -> impl Iterator<Item = &MenuNode> {
        let mut stack: Vec<&MenuNode> = self.roots.iter().rev().collect();
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    pub fn find_by_id(&self, id: &str) -> Option<&MenuNode> {
        self.iter().find(|n| n.id == id)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.find_by_id(id).is_some()
    }

    /// Top-level group with the given title (case-insensitive)
    pub(crate) fn root_group_mut(&mut self, title: &str) -> Option<&mut MenuNode> {
        self.roots
            .iter_mut()
            .find(|n| n.title.eq_ignore_ascii_case(title))
    }
}
