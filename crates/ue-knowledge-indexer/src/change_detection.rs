//! Phase 1 — change detection (spec §4.5, §8 invariant 7).

use std::path::{Path, PathBuf};

use ue_knowledge_store::Store;

use crate::error::Result;

/// Filter `discovered` down to files that are new or whose `(mtime, size)`
/// no longer matches `file_meta`. `force` bypasses the check entirely.
pub fn filter_changed(store: &Store, discovered: &[PathBuf], force: bool) -> Result<Vec<PathBuf>> {
    if force {
        return Ok(discovered.to_vec());
    }
    let mut working_set = Vec::new();
    for path in discovered {
        if has_changed(store, path)? {
            working_set.push(path.clone());
        }
    }
    Ok(working_set)
}

fn has_changed(store: &Store, path: &Path) -> Result<bool> {
    let metadata = match std::fs::metadata(path) {
        Ok(m) => m,
        Err(_) => return Ok(true),
    };
    let size = metadata.len() as i64;
    let mtime = metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
        .map_or(0, |d| d.as_millis() as i64);

    let Some(existing) = store.get_file_meta(&path.to_string_lossy())? else {
        return Ok(true);
    };
    // ±1ms tolerance per spec §8 invariant 7.
    Ok((existing.mtime - mtime).abs() > 1 || existing.size != size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_file_is_changed() {
        let store = Store::open_in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("A.uasset");
        std::fs::write(&file, b"content").unwrap();
        let changed = filter_changed(&store, &[file], false).unwrap();
        assert_eq!(changed.len(), 1);
    }

    #[test]
    fn unchanged_file_is_skipped() {
        let store = Store::open_in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("A.uasset");
        std::fs::write(&file, b"content").unwrap();
        let metadata = std::fs::metadata(&file).unwrap();
        let mtime = metadata
            .modified()
            .unwrap()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_millis() as i64;
        store
            .upsert_file_meta(&file.to_string_lossy(), mtime, metadata.len() as i64, None)
            .unwrap();

        let changed = filter_changed(&store, &[file], false).unwrap();
        assert!(changed.is_empty());
    }

    #[test]
    fn force_always_returns_full_set() {
        let store = Store::open_in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("A.uasset");
        std::fs::write(&file, b"content").unwrap();
        let metadata = std::fs::metadata(&file).unwrap();
        store.upsert_file_meta(&file.to_string_lossy(), 0, metadata.len() as i64, None).unwrap();

        let changed = filter_changed(&store, &[file], true).unwrap();
        assert_eq!(changed.len(), 1);
    }
}
