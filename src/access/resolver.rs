use super::path::{has_path_prefix, normalize_path};
use crate::menu::{Capabilities, MenuNode, MenuTree};

/// Capabilities for `path`, taken from the most specific matching node.
///
/// An exact url match anywhere in the tree beats any prefix match. Within each
/// pass children are searched before their parent, so deeper nodes win. Nothing
/// matching yields all-false.
pub fn resolve_capabilities(tree: &MenuTree, path: &str) -> Capabilities {
    find_node(tree, path)
        .map(|node| node.capabilities)
        .unwrap_or_default()
}

/// The node whose capabilities apply to `path`, if any
pub fn find_node<'a>(tree: &'a MenuTree, path: &str) -> Option<&'a MenuNode> {
    let path = normalize_path(path);
    search(tree.roots(), &|url: &str| url == path)
        .or_else(|| search(tree.roots(), &|url: &str| has_path_prefix(path, url)))
}

fn search<'a>(nodes: &'a [MenuNode], matches: &dyn Fn(&str) -> bool) -> Option<&'a MenuNode> {
    for node in nodes {
        if let Some(found) = search(&node.children, matches) {
            return Some(found);
        }
        // group headers are never a match target themselves
        if let Some(url) = node.url.route() {
            if matches(url) {
                return Some(node);
            }
        }
    }
    None
}
