//! Parent-class resolution for `inherits_from` edges (spec §4.5).

use ue_knowledge_schema::normalize_reference;
use ue_knowledge_store::Store;

use crate::error::Result;

/// Resolve a raw parent-class string to an `inherits_from` edge target,
/// following the six-rule fallback chain. Returns `None` when no edge
/// should be emitted (rule 1).
pub fn resolve_parent_class(store: &Store, raw_parent: &str) -> Result<Option<String>> {
    let trimmed = raw_parent.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("unknown") || trimmed.eq_ignore_ascii_case("none") {
        return Ok(None);
    }

    // Rules 2-4 are handled by the shared normalizer: `/Script/Module.Class`
    // and bare names both resolve to a `class:` ref, `/Game/...` and plugin
    // paths resolve to `asset:`.
    let Some(normalized) = normalize_reference(trimmed) else {
        return Ok(None);
    };

    // Rule 5: if normalization produced a bare class name, prefer a resolved
    // asset path when one exists under that name in `docs` or
    // `lightweight_assets`.
    if let ue_knowledge_schema::NormalizedRef::Class(name) = &normalized {
        if let Some(path) = find_asset_path_by_name(store, name)? {
            return Ok(Some(format!("asset:{path}")));
        }
    }

    // Rule 6: otherwise the normalizer's own class fallback stands.
    Ok(Some(normalized.as_id()))
}

fn find_asset_path_by_name(store: &Store, name: &str) -> Result<Option<String>> {
    if let Some(path) = store.find_doc_path_by_name(name)? {
        return Ok(Some(path));
    }
    Ok(store.find_lightweight_path_by_name(name)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_unknown_produce_no_edge() {
        let store = Store::open_in_memory().unwrap();
        assert!(resolve_parent_class(&store, "").unwrap().is_none());
        assert!(resolve_parent_class(&store, "Unknown").unwrap().is_none());
        assert!(resolve_parent_class(&store, "None").unwrap().is_none());
    }

    #[test]
    fn script_module_class_resolves() {
        let store = Store::open_in_memory().unwrap();
        let edge = resolve_parent_class(&store, "/Script/GameplayAbilities.GameplayEffect").unwrap();
        assert_eq!(edge, Some("class:GameplayEffect".to_string()));
    }

    #[test]
    fn game_path_resolves_to_asset() {
        let store = Store::open_in_memory().unwrap();
        let edge = resolve_parent_class(&store, "/Game/GE_Base").unwrap();
        assert_eq!(edge, Some("asset:/Game/GE_Base".to_string()));
    }

    #[test]
    fn bare_name_fallback_is_class() {
        let store = Store::open_in_memory().unwrap();
        let edge = resolve_parent_class(&store, "GE_Damage").unwrap();
        assert_eq!(edge, Some("class:GE_Damage".to_string()));
    }
}
