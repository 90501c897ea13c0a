//! Explicit application context, replacing the source's module-level
//! globals (active project, retriever, store, profile, plugin paths) — see
//! spec §9, "Global mutable state".
//!
//! Every entry point (CLI command, MCP tool handler, test) is handed a
//! `Context` rather than reaching for process-wide statics.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::EnvConfig;
use crate::profile::Profile;

/// Everything an indexing or search run needs, constructed once at startup.
#[derive(Clone)]
pub struct Context {
    /// Root of the Unreal project (contains `Content/`, `Source/`, etc).
    pub project_root: PathBuf,
    /// Content roots for each enabled plugin, discovered at startup.
    pub plugin_content_roots: Arc<Vec<PluginRoot>>,
    pub profile: Arc<Profile>,
    pub env: Arc<EnvConfig>,
    /// Path to the project's embedded knowledge-store database file.
    pub db_path: PathBuf,
}

/// A plugin's content root and the mount point its game paths are rewritten
/// under (spec §3.2: "each plugin → `/<PluginName>/`").
#[derive(Debug, Clone)]
pub struct PluginRoot {
    pub plugin_name: String,
    pub content_dir: PathBuf,
}

impl Context {
    #[must_use]
    pub fn new(project_root: PathBuf, db_path: PathBuf, profile: Profile) -> Self {
        Self {
            project_root,
            plugin_content_roots: Arc::new(Vec::new()),
            profile: Arc::new(profile),
            env: Arc::new(EnvConfig::load()),
            db_path,
        }
    }

    #[must_use]
    pub fn with_plugin_roots(mut self, roots: Vec<PluginRoot>) -> Self {
        self.plugin_content_roots = Arc::new(roots);
        self
    }

    /// Discover `<project_root>/Plugins/*/Content` directories, each mounted
    /// under `/<PluginName>/` per spec §3.2.
    #[must_use]
    pub fn discover_plugin_roots(project_root: &std::path::Path) -> Vec<PluginRoot> {
        let plugins_dir = project_root.join("Plugins");
        let mut roots = Vec::new();
        let Ok(entries) = std::fs::read_dir(&plugins_dir) else {
            return roots;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let content_dir = path.join("Content");
            if !content_dir.is_dir() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            roots.push(PluginRoot {
                plugin_name: name.to_string(),
                content_dir,
            });
        }
        roots.sort_by(|a, b| a.plugin_name.cmp(&b.plugin_name));
        roots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discover_plugin_roots_finds_content_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("Plugins/GameFeatures/Content")).unwrap();
        std::fs::create_dir_all(root.join("Plugins/NoContent")).unwrap();
        let roots = Context::discover_plugin_roots(root);
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].plugin_name, "GameFeatures");
    }
}
