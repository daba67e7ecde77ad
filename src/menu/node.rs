use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::icon::Icon;

/// What the signed-in user may do on the screen a menu node leads to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Capabilities {
    pub can_view: bool,
    pub can_add: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_confirm: bool,
}

impl Capabilities {
    pub fn all() -> Self {
        Self {
            can_view: true,
            can_add: true,
            can_edit: true,
            can_delete: true,
            can_confirm: true,
        }
    }

    pub fn none() -> Self {
        Self::default()
    }
}

/// A node's route, or the `#` placeholder used by group headers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum MenuUrl {
    Route(String),
    GroupHeader,
}

pub const GROUP_HEADER_URL: &str = "#";

impl MenuUrl {
    pub fn route(&self) -> Option<&str> {
        match self {
            MenuUrl::Route(url) => Some(url),
            MenuUrl::GroupHeader => None,
        }
    }

    pub fn is_group_header(&self) -> bool {
        matches!(self, MenuUrl::GroupHeader)
    }
}

impl From<Option<String>> for MenuUrl {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(url) if !url.trim().is_empty() && url.trim() != GROUP_HEADER_URL => {
                MenuUrl::Route(url.trim().to_string())
            }
            _ => MenuUrl::GroupHeader,
        }
    }
}

impl From<&str> for MenuUrl {
    fn from(value: &str) -> Self {
        MenuUrl::from(Some(value.to_string()))
    }
}

impl From<MenuUrl> for String {
    fn from(value: MenuUrl) -> Self {
        match value {
            MenuUrl::Route(url) => url,
            MenuUrl::GroupHeader => GROUP_HEADER_URL.to_string(),
        }
    }
}

/// A menu entry exactly as `GET /api/menus/sidebar` delivers it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMenuNode {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub order: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub capabilities: Capabilities,
    #[serde(default)]
    pub children: Option<Vec<RawMenuNode>>,
}

fn default_active() -> bool {
    true
}

/// Ids arrive as strings from some endpoints and integers from others
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "id must be a string or number, got {}",
            other
        ))),
    }
}

pub(crate) fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "id must be a string or number, got {}",
            other
        ))),
    }
}

/// Navigation entry after icon resolution and sibling ordering
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuNode {
    pub id: String,
    pub title: String,
    pub url: MenuUrl,
    pub icon: Icon,
    pub order: i64,
    pub is_active: bool,
    pub capabilities: Capabilities,
    pub children: Vec<MenuNode>,
}

impl MenuNode {
    pub fn route(id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: MenuUrl::from(Some(url.into())),
            icon: Icon::DEFAULT,
            order: 0,
            is_active: true,
            capabilities: Capabilities::default(),
            children: Vec::new(),
        }
    }

    pub fn group(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self::route(id, title, GROUP_HEADER_URL)
    }

    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = icon;
        self
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_children(mut self, children: Vec<MenuNode>) -> Self {
        self.children = children;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

impl From<RawMenuNode> for MenuNode {
    fn from(raw: RawMenuNode) -> Self {
        let mut children: Vec<MenuNode> = raw
            .children
            .unwrap_or_default()
            .into_iter()
            .map(MenuNode::from)
            .collect();
        // sort_by_key is stable, so equal orders keep fetch order
        children.sort_by_key(|c| c.order);

        Self {
            id: raw.id,
            title: raw.title,
            url: MenuUrl::from(raw.url),
            icon: raw.icon.as_deref().map(Icon::resolve).unwrap_or_default(),
            order: raw.order,
            is_active: raw.is_active,
            capabilities: raw.capabilities,
            children,
        }
    }
}
