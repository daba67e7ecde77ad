/// Segment-aware prefix test: `/users` covers `/users` and `/users/edit/7` but
/// not `/users-archive`. A prefix ending in `/` covers any continuation.
pub fn has_path_prefix(path: &str, prefix: &str) -> bool {
    if prefix.is_empty() || !path.starts_with(prefix) {
        return false;
    }
    if path.len() == prefix.len() || prefix.ends_with('/') {
        return true;
    }
    path.as_bytes()[prefix.len()] == b'/'
}

/// Drop query string, fragment and a trailing slash (except for the root)
pub fn normalize_path(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    }
}
