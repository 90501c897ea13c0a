//! `resolve_cpp_sources`, `scan_cpp_classes` (spec §4.3).

use std::collections::HashMap;
use std::path::Path;

use regex::Regex;
use rusqlite::OptionalExtension;
use walkdir::WalkDir;

use ue_knowledge_schema::prefix_candidates;

use crate::error::Result;
use crate::store::Store;
use crate::types::CppResolution;

fn class_decl_regex() -> Regex {
    Regex::new(
        r"(?m)^\s*(?:UCLASS|USTRUCT)\s*\([^)]*\)\s*class\s+(?:[A-Z_][A-Z0-9_]*_API\s+)?([A-Za-z_]\w*)\s*(?::\s*public\s+([A-Za-z_]\w*))?",
    )
    .expect("static regex is valid")
}

impl Store {
    /// For each input name, generate candidates via the prefix-probing rule
    /// and return the first hit under the original input key. Candidates
    /// shared between inputs must resolve to both (spec §4.3).
    pub fn resolve_cpp_sources(&self, class_names: &[String]) -> Result<HashMap<String, CppResolution>> {
        self.pool.with_reader(|conn| {
            let mut results = HashMap::new();
            for input in class_names {
                for candidate in prefix_candidates(input) {
                    let hit: Option<(String, String)> = conn
                        .query_row(
                            "SELECT doc_id, source_path FROM cpp_class_index WHERE class_name = ?1",
                            [&candidate],
                            |row| Ok((row.get(0)?, row.get(1)?)),
                        )
                        .optional()?;
                    if let Some((doc_id, source_path)) = hit {
                        results.insert(
                            input.clone(),
                            CppResolution {
                                class_name: candidate,
                                doc_id,
                                source_path,
                            },
                        );
                        break;
                    }
                }
            }
            Ok(results)
        })
    }

    /// Walk `Source/` and `Plugins/*/Source/` for `.h` files, regex-extract
    /// `UCLASS`/`USTRUCT` declarations, and upsert them into
    /// `cpp_class_index`. Tolerates missing folders and malformed files
    /// (spec §4.3).
    pub fn scan_cpp_classes(&self, project_root: &Path) -> Result<usize> {
        let pattern = class_decl_regex();
        let mut roots = vec![project_root.join("Source")];
        let plugins_dir = project_root.join("Plugins");
        if plugins_dir.is_dir() {
            if let Ok(entries) = std::fs::read_dir(&plugins_dir) {
                for entry in entries.flatten() {
                    let source = entry.path().join("Source");
                    if source.is_dir() {
                        roots.push(source);
                    }
                }
            }
        }

        let mut upserts = Vec::new();
        for root in &roots {
            if !root.is_dir() {
                continue;
            }
            for entry in WalkDir::new(root).into_iter().filter_map(std::result::Result::ok) {
                if entry.path().extension().and_then(std::ffi::OsStr::to_str) != Some("h") {
                    continue;
                }
                let Ok(contents) = std::fs::read_to_string(entry.path()) else {
                    continue;
                };
                let relative = entry
                    .path()
                    .strip_prefix(project_root)
                    .unwrap_or(entry.path())
                    .to_string_lossy()
                    .replace('\\', "/");
                for caps in pattern.captures_iter(&contents) {
                    let Some(class_name) = caps.get(1) else { continue };
                    upserts.push((class_name.as_str().to_string(), relative.clone()));
                }
            }
        }

        let count = upserts.len();
        self.pool.with_writer(|conn| {
            let tx = conn.unchecked_transaction()?;
            for (class_name, source_path) in &upserts {
                let doc_id = format!("cpp_class:{class_name}");
                tx.execute(
                    "INSERT INTO cpp_class_index (class_name, doc_id, source_path)
                     VALUES (?1, ?2, ?3)
                     ON CONFLICT(class_name) DO UPDATE SET
                        doc_id = excluded.doc_id, source_path = excluded.source_path",
                    rusqlite::params![class_name, doc_id, source_path],
                )?;
            }
            tx.commit()?;
            Ok(())
        })?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn scan_extracts_uclass_with_parent() {
        let dir = tempfile::tempdir().unwrap();
        let source_dir = dir.path().join("Source").join("MyGame").join("Public");
        std::fs::create_dir_all(&source_dir).unwrap();
        let header = source_dir.join("LyraCharacter.h");
        let mut file = std::fs::File::create(&header).unwrap();
        writeln!(
            file,
            "UCLASS(BlueprintType)\nclass MYGAME_API ALyraCharacter : public ACharacter\n{{\n}};"
        )
        .unwrap();

        let store = Store::open_in_memory().unwrap();
        let count = store.scan_cpp_classes(dir.path()).unwrap();
        assert_eq!(count, 1);

        let resolved = store.resolve_cpp_sources(&["LyraCharacter".to_string()]).unwrap();
        assert_eq!(resolved["LyraCharacter"].class_name, "ALyraCharacter");
    }

    #[test]
    fn missing_source_dir_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.scan_cpp_classes(dir.path()).unwrap(), 0);
    }
}
