//! Phase 3 — reclassify `Unknown` assets (spec §4.5).

use std::path::Path;
use std::time::Duration;

use serde_json::Value;
use ue_knowledge_core::Profile;
use ue_knowledge_parser::{BatchCommand, ParserAdapter};

use crate::batching::chunk_paths;
use crate::error::Result;
use crate::types::{AssetClassification, IndexCounters};

const OFPA_MARKER: &str = "__ExternalActors__";
const CANDIDATE_SIZE_MAX: u64 = 2_000_000;

/// Is `classification` worth a full `batch-summary` reload? (spec §4.5:
/// "matching a candidate heuristic").
fn is_reclassify_candidate(classification: &AssetClassification, profile: &Profile, is_plugin_root: bool) -> bool {
    if classification.asset_type != "Unknown" {
        return false;
    }
    let path_str = classification.path.as_str();
    let is_ofpa = path_str.contains(OFPA_MARKER);

    if profile.resolve_name_prefix(&classification.name).is_some() {
        return true;
    }
    if is_plugin_root && !is_ofpa {
        return true;
    }
    if let Some(size) = classification.size {
        if size > 0 && size < CANDIDATE_SIZE_MAX && !is_ofpa {
            return true;
        }
    }
    false
}

pub fn reclassify_unknown(
    adapter: &dyn ParserAdapter,
    classifications: &mut std::collections::HashMap<String, AssetClassification>,
    plugin_root_prefixes: &[String],
    profile: &Profile,
    batch_size: usize,
    batch_timeout: Duration,
    counters: &mut IndexCounters,
) -> Result<()> {
    let candidates: Vec<_> = classifications
        .values()
        .filter(|c| {
            let is_plugin_root = plugin_root_prefixes.iter().any(|p| c.path.starts_with(p.as_str()));
            is_reclassify_candidate(c, profile, is_plugin_root)
        })
        .map(|c| c.abs_path.clone())
        .collect();

    for batch in chunk_paths(&candidates, batch_size) {
        let outcome = adapter.run_batch(BatchCommand::BatchSummary, &batch, batch_timeout)?;
        counters.errors += outcome.errors;
        for record in &outcome.records {
            apply_summary(record, classifications, profile, counters);
        }
    }
    Ok(())
}

fn apply_summary(
    record: &Value,
    classifications: &mut std::collections::HashMap<String, AssetClassification>,
    profile: &Profile,
    counters: &mut IndexCounters,
) {
    let Some(path) = record.get("path").and_then(Value::as_str) else {
        counters.errors += 1;
        return;
    };
    let Some(main_class) = record.get("main_class").and_then(Value::as_str) else {
        return;
    };
    let Some(classification) = classifications.get_mut(path) else {
        return;
    };
    let old_type = classification.asset_type.clone();
    classification.main_class = Some(main_class.to_string());
    classification.asset_type = resolve_reclassified_type(main_class, path, profile);
    if classification.asset_type != old_type {
        counters.bump_type(&classification.asset_type);
    }
}

fn resolve_reclassified_type(main_class: &str, path: &str, profile: &Profile) -> String {
    if let Some(mapped) = profile.export_class_reclassify.get(main_class) {
        return mapped.clone();
    }
    if let Some(suffix) = main_class.strip_prefix("GameFeatureAction_") {
        let _ = suffix;
        if let Some(prefix_type) = profile.resolve_name_prefix(asset_name_from_path(path)) {
            return prefix_type.to_string();
        }
        if plugin_folder_name(path).is_some_and(|folder| folder == asset_name_from_path(path)) {
            return "GameFeatureData".to_string();
        }
    }
    main_class.to_string()
}

fn asset_name_from_path(path: &str) -> &str {
    Path::new(path).file_stem().and_then(std::ffi::OsStr::to_str).unwrap_or(path)
}

fn plugin_folder_name(path: &str) -> Option<&str> {
    path.strip_prefix('/')?.split('/').next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;
    use ue_knowledge_parser::{testing::FakeParserAdapter, BatchOutcome};

    fn classification(path: &str, size: u64) -> AssetClassification {
        AssetClassification {
            path: path.to_string(),
            abs_path: std::path::PathBuf::from(path),
            asset_type: "Unknown".to_string(),
            main_class: None,
            name: asset_name_from_path(path).to_string(),
            size: Some(size),
        }
    }

    #[test]
    fn direct_export_class_reclassify_applies() {
        let fake = FakeParserAdapter::default();
        fake.batch_responses.lock().unwrap().push(BatchOutcome {
            records: vec![json!({"path": "/Game/Foo", "main_class": "UMyCustomType"})],
            errors: 0,
            timed_out: false,
        });
        let mut profile = Profile::default();
        profile
            .export_class_reclassify
            .insert("UMyCustomType".to_string(), "CustomThing".to_string());

        let mut classifications = HashMap::new();
        classifications.insert("/Game/Foo".to_string(), classification("/Game/Foo", 100));

        let mut counters = IndexCounters::default();
        reclassify_unknown(
            &fake,
            &mut classifications,
            &[],
            &profile,
            500,
            std::time::Duration::from_secs(60),
            &mut counters,
        )
        .unwrap();

        assert_eq!(classifications["/Game/Foo"].asset_type, "CustomThing");
    }

    #[test]
    fn game_feature_action_prefix_routes_via_name_prefix() {
        let fake = FakeParserAdapter::default();
        fake.batch_responses.lock().unwrap().push(BatchOutcome {
            records: vec![json!({"path": "/Game/LAS_Shooter", "main_class": "GameFeatureAction_AddWidgets"})],
            errors: 0,
            timed_out: false,
        });
        let mut profile = Profile::default();
        profile
            .name_prefixes
            .insert("LAS_".to_string(), "LyraExperienceActionSet".to_string());

        let mut classifications = HashMap::new();
        classifications.insert(
            "/Game/LAS_Shooter".to_string(),
            classification("/Game/LAS_Shooter", 100),
        );

        let mut counters = IndexCounters::default();
        reclassify_unknown(
            &fake,
            &mut classifications,
            &[],
            &profile,
            500,
            std::time::Duration::from_secs(60),
            &mut counters,
        )
        .unwrap();

        assert_eq!(classifications["/Game/LAS_Shooter"].asset_type, "LyraExperienceActionSet");
    }
}
