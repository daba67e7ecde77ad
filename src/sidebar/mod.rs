//! Sidebar model built from the session's menu tree.
//!
//! Pure presentation: entries with children become collapsible groups, the
//! rest are links. An empty tree renders the static fallback instead.

pub mod fallback;

use serde::{Deserialize, Serialize};

use crate::menu::{Icon, MenuNode, MenuTree};

pub use fallback::fallback_navigation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SidebarEntry {
    Link {
        id: String,
        title: String,
        url: String,
        icon: Icon,
        enabled: bool,
    },
    Group {
        id: String,
        title: String,
        url: Option<String>,
        icon: Icon,
        enabled: bool,
        children: Vec<SidebarEntry>,
    },
}

impl SidebarEntry {
    pub fn title(&self) -> &str {
        match self {
            SidebarEntry::Link { title, .. } | SidebarEntry::Group { title, .. } => title,
        }
    }

    pub fn is_enabled(&self) -> bool {
        match self {
            SidebarEntry::Link { enabled, .. } | SidebarEntry::Group { enabled, .. } => *enabled,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SidebarSource {
    Menu,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidebarView {
    pub source: SidebarSource,
    pub entries: Vec<SidebarEntry>,
}

pub fn render(tree: &MenuTree) -> SidebarView {
    if tree.is_empty() {
        return SidebarView {
            source: SidebarSource::Fallback,
            entries: fallback_navigation(),
        };
    }

    SidebarView {
        source: SidebarSource::Menu,
        entries: tree.roots().iter().map(|n| entry(n, true)).collect(),
    }
}

fn entry(node: &MenuNode, parent_enabled: bool) -> SidebarEntry {
    let enabled = parent_enabled && node.is_active;

    if node.is_leaf() && !node.url.is_group_header() {
        return SidebarEntry::Link {
            id: node.id.clone(),
            title: node.title.clone(),
            url: node.url.route().unwrap_or_default().to_string(),
            icon: node.icon,
            enabled,
        };
    }

    SidebarEntry::Group {
        id: node.id.clone(),
        title: node.title.clone(),
        url: node.url.route().map(str::to_string),
        icon: node.icon,
        enabled,
        children: node.children.iter().map(|c| entry(c, enabled)).collect(),
    }
}

/// Indented outline for terminals
pub fn render_text(view: &SidebarView) -> String {
    let mut out = String::new();
    for e in &view.entries {
        write_entry(&mut out, e, 0);
    }
    out
}

fn write_entry(out: &mut String, entry: &SidebarEntry, depth: usize) {
    let indent = "  ".repeat(depth);
    let disabled = if entry.is_enabled() { "" } else { " (disabled)" };
    match entry {
        SidebarEntry::Link { title, url, icon, .. } => {
            out.push_str(&format!("{}- {} [{}] {}{}\n", indent, title, icon.name(), url, disabled));
        }
        SidebarEntry::Group { title, icon, children, .. } => {
            out.push_str(&format!("{}+ {} [{}]{}\n", indent, title, icon.name(), disabled));
            for child in children {
                write_entry(out, child, depth + 1);
            }
        }
    }
}
