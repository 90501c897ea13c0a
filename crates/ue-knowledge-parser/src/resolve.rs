//! Parser binary resolution (spec §4.4): local config file, in-tree
//! platform path, optional download cache — never network I/O unless
//! explicitly enabled, which this build never does.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

const CONFIG_FILE_NAME: &str = ".ue_asset_parser_path";
const CACHE_ENV: &str = "UE_ASSETPARSER_CACHE_DIR";

fn platform_binary_name() -> &'static str {
    if cfg!(target_os = "windows") {
        "ue_asset_parser.exe"
    } else {
        "ue_asset_parser"
    }
}

/// Resolve the parser binary path, trying in order:
/// 1. A path written in `<project_root>/.ue_asset_parser_path`.
/// 2. An in-tree path relative to `project_root` (`Tools/<platform-binary>`).
/// 3. A cached download under `UE_ASSETPARSER_CACHE_DIR`, if set.
pub fn resolve_binary(project_root: &Path) -> Result<PathBuf> {
    let config_path = project_root.join(CONFIG_FILE_NAME);
    if let Ok(contents) = std::fs::read_to_string(&config_path) {
        let candidate = PathBuf::from(contents.trim());
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    let in_tree = project_root.join("Tools").join(platform_binary_name());
    if in_tree.is_file() {
        return Ok(in_tree);
    }

    if let Ok(cache_dir) = std::env::var(CACHE_ENV) {
        let cached = PathBuf::from(cache_dir).join(platform_binary_name());
        if cached.is_file() {
            return Ok(cached);
        }
    }

    Err(Error::BinaryMissing(format!(
        "checked {}, {}, and ${CACHE_ENV}",
        config_path.display(),
        in_tree.display()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_everywhere_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(resolve_binary(dir.path()).is_err());
    }

    #[test]
    fn config_file_wins_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let binary = dir.path().join("my_parser");
        std::fs::write(&binary, b"").unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), binary.to_string_lossy().as_bytes())
            .unwrap();
        let resolved = resolve_binary(dir.path()).unwrap();
        assert_eq!(resolved, binary);
    }

    #[test]
    fn in_tree_tools_path_is_found() {
        let dir = tempfile::tempdir().unwrap();
        let tools_dir = dir.path().join("Tools");
        std::fs::create_dir_all(&tools_dir).unwrap();
        std::fs::write(tools_dir.join(platform_binary_name()), b"").unwrap();
        let resolved = resolve_binary(dir.path()).unwrap();
        assert_eq!(resolved, tools_dir.join(platform_binary_name()));
    }
}
