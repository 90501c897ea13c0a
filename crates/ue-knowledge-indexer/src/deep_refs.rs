//! Phase 4b — deep refs (spec §4.5).
//!
//! For `Unknown`/`DataAsset` assets whose export class or name looks
//! high-value, run a single-file `inspect` and regex-extract `/Game/...`
//! and `/<Plugin>/...` paths out of the raw JSON text, storing them as
//! lightweight rows even though the asset itself isn't semantically
//! extracted.

use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use serde_json::Value;
use ue_knowledge_core::Profile;
use ue_knowledge_parser::{ParserAdapter, SingleCommand, SingleOutput};
use ue_knowledge_store::LightweightAssetRow;

use crate::error::Result;
use crate::types::{AssetClassification, IndexCounters};

fn game_path_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/[A-Za-z][A-Za-z0-9_]*(?:/[A-Za-z0-9_.]+)+").unwrap())
}

fn is_deep_ref_candidate(classification: &AssetClassification, profile: &Profile) -> bool {
    if !matches!(classification.asset_type.as_str(), "Unknown" | "DataAsset") {
        return false;
    }
    if let Some(main_class) = &classification.main_class {
        if profile.deep_ref_export_classes.contains(main_class) {
            return true;
        }
    }
    profile
        .deep_ref_candidates
        .iter()
        .any(|candidate| classification.name.starts_with(candidate.as_str()))
}

pub fn run_deep_refs_phase(
    adapter: &dyn ParserAdapter,
    classifications: &std::collections::HashMap<String, AssetClassification>,
    profile: &Profile,
    asset_timeout: Duration,
    counters: &mut IndexCounters,
) -> Result<Vec<LightweightAssetRow>> {
    let mut rows = Vec::new();
    for classification in classifications.values() {
        if !is_deep_ref_candidate(classification, profile) {
            continue;
        }
        let SingleOutput::Json(inspect_json) = adapter.run_single(SingleCommand::Inspect, &classification.abs_path, asset_timeout)? else {
            continue;
        };
        let refs = extract_deep_refs(&classification.path, &inspect_json);
        if refs.is_empty() {
            continue;
        }
        counters.lightweight_indexed += 1;
        rows.push(LightweightAssetRow {
            path: classification.path.clone(),
            name: classification.name.clone(),
            asset_type: Some(classification.asset_type.clone()),
            references: refs,
        });
    }
    Ok(rows)
}

fn extract_deep_refs(own_path: &str, inspect_json: &Value) -> Vec<String> {
    let text = inspect_json.to_string();
    let mut seen = std::collections::BTreeSet::new();
    for candidate in game_path_regex().find_iter(&text) {
        let path = candidate.as_str();
        if path == own_path || path.starts_with("/Script/") {
            continue;
        }
        seen.insert(format!("asset:{path}"));
    }
    seen.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;
    use ue_knowledge_parser::testing::FakeParserAdapter;

    fn classification(path: &str, asset_type: &str, main_class: Option<&str>) -> AssetClassification {
        AssetClassification {
            path: path.to_string(),
            abs_path: PathBuf::from(path),
            asset_type: asset_type.to_string(),
            main_class: main_class.map(str::to_string),
            name: crate::util::name_from_path(path),
            size: Some(10),
        }
    }

    #[test]
    fn deep_refs_extracted_and_own_path_and_script_skipped() {
        let fake = FakeParserAdapter::default();
        fake.single_responses.lock().unwrap().push(SingleOutput::Json(json!({
            "exports": [{"properties": [
                {"name": "Ref", "value": "/Game/Other/Asset"},
                {"name": "Self", "value": "/Game/GFD_Self"},
                {"name": "Script", "value": "/Script/Engine.Actor"},
            ]}],
        })));
        let mut profile = Profile::default();
        profile.deep_ref_export_classes.insert("UGameFeatureData".to_string());
        let mut classifications = std::collections::HashMap::new();
        classifications.insert(
            "/Game/GFD_Self".to_string(),
            classification("/Game/GFD_Self", "Unknown", Some("UGameFeatureData")),
        );
        let mut counters = IndexCounters::default();
        let rows = run_deep_refs_phase(&fake, &classifications, &profile, Duration::from_secs(60), &mut counters).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].references, vec!["asset:/Game/Other/Asset".to_string()]);
    }

    #[test]
    fn non_candidates_are_skipped_entirely() {
        let fake = FakeParserAdapter::default();
        let profile = Profile::default();
        let mut classifications = std::collections::HashMap::new();
        classifications.insert(
            "/Game/Tex".to_string(),
            classification("/Game/Tex", "Texture2D", None),
        );
        let mut counters = IndexCounters::default();
        let rows = run_deep_refs_phase(&fake, &classifications, &profile, Duration::from_secs(60), &mut counters).unwrap();
        assert!(rows.is_empty());
    }
}
