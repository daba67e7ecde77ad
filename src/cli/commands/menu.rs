use std::path::{Path, PathBuf};

use clap::Subcommand;
use serde_json::{json, Value};

use super::backend_client;
use crate::access::path::normalize_path;
use crate::access::{find_node, resolve_capabilities};
use crate::backend::NavigationApi;
use crate::cli::config::{load_profile, require_token};
use crate::cli::utils::output_value;
use crate::cli::OutputFormat;
use crate::menu::store::add_navigation_config_entry;
use crate::menu::MenuTree;
use crate::sidebar;

#[derive(Subcommand)]
pub enum MenuCommands {
    #[command(about = "Render the sidebar for a navigation tree")]
    Sidebar {
        #[arg(long, help = "Read the tree from a JSON or YAML file instead of the backend")]
        file: Option<PathBuf>,
        #[arg(long, help = "Add the local Manage Navigation entry under Settings")]
        local_entries: bool,
    },

    #[command(about = "Show the capabilities a navigation tree grants for a path")]
    Resolve {
        #[arg(help = "Route path, e.g. /tenants/edit/7")]
        path: String,
        #[arg(long, help = "Read the tree from a JSON or YAML file instead of the backend")]
        file: Option<PathBuf>,
    },
}

pub async fn handle(cmd: MenuCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        MenuCommands::Sidebar { file, local_entries } => {
            let mut tree = load_tree(file.as_deref()).await?;
            if local_entries {
                add_navigation_config_entry(&mut tree);
            }

            let view = sidebar::render(&tree);
            output_value(&output_format, &serde_json::to_value(&view)?, || sidebar::render_text(&view))
        }
        MenuCommands::Resolve { path, file } => {
            let tree = load_tree(file.as_deref()).await?;
            let path = normalize_path(&path);
            let node = find_node(&tree, path);
            let capabilities = resolve_capabilities(&tree, path);

            let value = json!({
                "path": path,
                "matched": node.map(|n| json!({ "id": n.id, "title": n.title, "url": n.url })),
                "capabilities": capabilities,
            });

            output_value(&output_format, &value, || {
                let matched = node
                    .map(|n| format!("{} ({})", n.title, n.id))
                    .unwrap_or_else(|| "no menu entry".to_string());
                format!(
                    "{} -> {}\n  view:{} add:{} edit:{} delete:{} confirm:{}\n",
                    path,
                    matched,
                    capabilities.can_view,
                    capabilities.can_add,
                    capabilities.can_edit,
                    capabilities.can_delete,
                    capabilities.can_confirm
                )
            })
        }
    }
}

async fn load_tree(file: Option<&Path>) -> anyhow::Result<MenuTree> {
    match file {
        Some(path) => load_tree_file(path),
        None => {
            let profile = load_profile()?;
            let token = require_token(&profile)?;
            let client = backend_client(None, &profile)?;
            let raw = client.fetch_navigation(token).await?;
            Ok(MenuTree::from_raw(raw)?)
        }
    }
}

/// Accepts a bare node list, `{ navMain: [...] }` or the full backend envelope
pub fn load_tree_file(path: &Path) -> anyhow::Result<MenuTree> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;

    let payload: Value = match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
        _ => serde_json::from_str(&content)?,
    };

    Ok(MenuTree::from_payload(payload)?)
}
