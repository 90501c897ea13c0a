//! Project profile: declarative per-project config merged on top of engine
//! defaults (spec §4.1).
//!
//! Grounded on `original_source/UnrealAgent/project_profile.py`: a profile is
//! a flat struct of maps/sets, loaded once, merged per-key (overlay replaces
//! default wholesale — lists are never concatenated), and cached.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Engine-wide defaults, embedded so the crate works with zero external
/// config files. Mirrors the shape of a named profile JSON file.
pub const ENGINE_DEFAULTS_JSON: &str = r#"{
  "export_class_reclassify": {},
  "name_prefixes": {
    "GE_": "GameplayEffect",
    "GA_": "GameplayAbility",
    "BP_": "Blueprint",
    "WBP_": "WidgetBlueprint",
    "M_": "Material",
    "MI_": "MaterialInstance",
    "MF_": "MaterialFunction",
    "DT_": "DataTable"
  },
  "semantic_types": [
    "Blueprint", "WidgetBlueprint", "Material", "MaterialInstance",
    "MaterialFunction", "DataTable", "GameplayEffect", "GameplayAbility",
    "InputAction", "InputMappingContext"
  ],
  "game_feature_types": ["GameFeatureData"],
  "blueprint_parent_redirects": {},
  "data_asset_extractors": [],
  "deep_ref_export_classes": ["GameFeatureData", "DataRegistry"],
  "deep_ref_candidates": [],
  "widget_rank_terms": ["widget", "hud", "menu", "ui"],
  "widget_fallback_patterns": ["BP_", "WBP_", "M_", "MI_", "MF_", "DT_", "S_"]
}"#;

/// All project-specific configuration consumed by the indexer, parser
/// sidecar, and search engine. See spec §4.1.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub profile_name: String,
    pub export_class_reclassify: HashMap<String, String>,
    pub name_prefixes: HashMap<String, String>,
    pub semantic_types: HashSet<String>,
    pub game_feature_types: HashSet<String>,
    pub blueprint_parent_redirects: HashMap<String, String>,
    pub data_asset_extractors: HashSet<String>,
    pub deep_ref_export_classes: HashSet<String>,
    pub deep_ref_candidates: HashSet<String>,
    pub widget_rank_terms: Vec<String>,
    pub widget_fallback_patterns: Vec<String>,
}

impl Profile {
    /// Parse the embedded engine defaults. Infallible in practice (the
    /// constant is test-covered), but returns `Result` to keep the call site
    /// uniform with `load`.
    pub fn engine_defaults() -> Result<Self> {
        Self::from_json_str(ENGINE_DEFAULTS_JSON)
    }

    fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(Error::from)
    }

    /// Load a named project profile, merged on top of the engine defaults,
    /// per spec §4.1's "per-key overlay replaces default" rule.
    pub fn load(overlay_path: impl AsRef<Path>) -> Result<Self> {
        let defaults = Self::engine_defaults()?;
        let raw = fs::read_to_string(overlay_path.as_ref())?;
        let overlay: Value = serde_json::from_str(&raw)?;
        defaults.merge_overlay(&overlay)
    }

    /// Merge a raw JSON overlay object onto `self`, field by field. Every
    /// key present in the overlay fully replaces the default value for that
    /// key (spec §4.1: "lists are not concatenated").
    pub fn merge_overlay(&self, overlay: &Value) -> Result<Self> {
        let Value::Object(overlay_map) = overlay else {
            return Err(Error::Profile(
                "profile overlay must be a JSON object".to_string(),
            ));
        };

        let mut defaults_value = serde_json::to_value(self).map_err(Error::from)?;
        let Value::Object(defaults_map) = &mut defaults_value else {
            unreachable!("Profile always serializes to an object");
        };
        for (key, value) in overlay_map {
            defaults_map.insert(key.clone(), value.clone());
        }

        serde_json::from_value(defaults_value).map_err(Error::from)
    }

    /// Serialize the resolved profile to the sidecar JSON file consumed by
    /// the external asset parser (spec §4.1), so both sides agree on
    /// reclassification rules.
    pub fn write_sidecar(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Is this asset type one that should get full semantic extraction?
    #[must_use]
    pub fn is_semantic_type(&self, asset_type: &str) -> bool {
        self.semantic_types.contains(asset_type)
    }

    /// Is this asset type routed to the game-feature extractor?
    #[must_use]
    pub fn is_game_feature_type(&self, asset_type: &str) -> bool {
        self.game_feature_types.contains(asset_type)
    }

    /// Resolve a filename prefix to an asset type, longest-prefix-first.
    #[must_use]
    pub fn resolve_name_prefix(&self, name: &str) -> Option<&str> {
        self.name_prefixes
            .iter()
            .filter(|(prefix, _)| name.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, asset_type)| asset_type.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_defaults_parse() {
        let p = Profile::engine_defaults().unwrap();
        assert!(p.semantic_types.contains("Blueprint"));
        assert_eq!(
            p.name_prefixes.get("GE_").map(String::as_str),
            Some("GameplayEffect")
        );
    }

    #[test]
    fn overlay_replaces_not_concatenates() {
        let defaults = Profile::engine_defaults().unwrap();
        let overlay: Value = serde_json::json!({
            "semantic_types": ["OnlyThisOne"],
            "name_prefixes": {"LAS_": "LyraExperienceActionSet"}
        });
        let merged = defaults.merge_overlay(&overlay).unwrap();
        assert_eq!(merged.semantic_types.len(), 1);
        assert!(merged.semantic_types.contains("OnlyThisOne"));
        assert!(!merged.semantic_types.contains("Blueprint"));
        // Unrelated keys are untouched by the overlay.
        assert!(merged.name_prefixes.contains_key("GE_"));
        assert_eq!(
            merged.name_prefixes.get("LAS_").map(String::as_str),
            Some("LyraExperienceActionSet")
        );
    }

    #[test]
    fn resolve_name_prefix_picks_longest_match() {
        let mut p = Profile::engine_defaults().unwrap();
        p.name_prefixes
            .insert("GE_Damage_".to_string(), "SpecialDamageEffect".to_string());
        assert_eq!(
            p.resolve_name_prefix("GE_Damage_Pistol"),
            Some("SpecialDamageEffect")
        );
        assert_eq!(p.resolve_name_prefix("GE_Heal"), Some("GameplayEffect"));
        assert_eq!(p.resolve_name_prefix("Unrelated"), None);
    }

    #[test]
    fn write_sidecar_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.sidecar.json");
        let p = Profile::engine_defaults().unwrap();
        p.write_sidecar(&path).unwrap();
        let reloaded: Profile =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(reloaded.semantic_types, p.semantic_types);
    }
}
