use super::path::has_path_prefix;
use crate::config::AccessConfig;

/// Public paths that bypass the remote access check entirely
#[derive(Debug, Clone, Default)]
pub struct ExclusionList {
    prefixes: Vec<String>,
}

impl ExclusionList {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.is_empty())
                .collect(),
        }
    }

    pub fn from_config(config: &AccessConfig) -> Self {
        Self::new(config.excluded_paths.iter().cloned())
    }

    /// Exact match or path-prefix match against any configured entry
    pub fn matches(&self, path: &str) -> bool {
        self.prefixes.iter().any(|prefix| has_path_prefix(path, prefix))
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }
}
