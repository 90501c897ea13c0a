//! Phase 0 — discovery (spec §4.5).

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::types::IndexOptions;

#[must_use]
pub fn discover_assets(
    content_root: &Path,
    plugin_content_roots: &[PathBuf],
    options: &IndexOptions,
) -> Vec<PathBuf> {
    let mut found = Vec::new();
    for root in std::iter::once(content_root).chain(plugin_content_roots.iter().map(PathBuf::as_path)) {
        walk_one(root, options, &mut found);
    }
    found.sort();
    found.dedup();
    if let Some(max_assets) = options.max_assets {
        found.truncate(max_assets);
    }
    found
}

fn walk_one(root: &Path, options: &IndexOptions, found: &mut Vec<PathBuf>) {
    if !root.is_dir() {
        return;
    }
    let walker = if options.recursive {
        WalkDir::new(root)
    } else {
        WalkDir::new(root).max_depth(1)
    };
    for entry in walker.into_iter().filter_map(std::result::Result::ok) {
        if entry.path().extension().and_then(std::ffi::OsStr::to_str) != Some("uasset") {
            continue;
        }
        let path_str = entry.path().to_string_lossy();
        if options
            .exclude_patterns
            .iter()
            .any(|pattern| path_str.contains(pattern.as_str()))
        {
            continue;
        }
        found.push(entry.into_path());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_uassets_recursively() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("Sub")).unwrap();
        std::fs::write(dir.path().join("A.uasset"), b"").unwrap();
        std::fs::write(dir.path().join("Sub/B.uasset"), b"").unwrap();
        std::fs::write(dir.path().join("ignore.txt"), b"").unwrap();

        let found = discover_assets(dir.path(), &[], &IndexOptions::default());
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn non_recursive_skips_subdirs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("Sub")).unwrap();
        std::fs::write(dir.path().join("A.uasset"), b"").unwrap();
        std::fs::write(dir.path().join("Sub/B.uasset"), b"").unwrap();

        let options = IndexOptions {
            recursive: false,
            ..Default::default()
        };
        let found = discover_assets(dir.path(), &[], &options);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn exclude_patterns_filter_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("Developers")).unwrap();
        std::fs::write(dir.path().join("A.uasset"), b"").unwrap();
        std::fs::write(dir.path().join("Developers/B.uasset"), b"").unwrap();

        let options = IndexOptions {
            exclude_patterns: vec!["Developers".to_string()],
            ..Default::default()
        };
        let found = discover_assets(dir.path(), &[], &options);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn max_assets_truncates_after_stable_sort() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["C.uasset", "A.uasset", "B.uasset"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        let options = IndexOptions {
            max_assets: Some(2),
            ..Default::default()
        };
        let found = discover_assets(dir.path(), &[], &options);
        assert_eq!(found.len(), 2);
        assert!(found[0].to_string_lossy().ends_with("A.uasset"));
    }
}
