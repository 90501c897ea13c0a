//! Phase 4 — lightweight indexing (spec §4.5).

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde_json::Value;
use ue_knowledge_parser::{BatchCommand, ParserAdapter};
use ue_knowledge_schema::normalize_reference;
use ue_knowledge_store::LightweightAssetRow;

use crate::batching::chunk_paths;
use crate::error::Result;
use crate::types::{AssetClassification, IndexCounters, SEMANTIC_TYPES, SKIP_REFS_TYPES};

/// Partition non-semantic classifications into skip-refs (empty-ref
/// lightweight rows) and needs-refs (batch-refs), applying any finer
/// reclassification `batch-refs` reports back onto `classifications` so
/// Phase 5 picks up newly-semantic assets.
pub fn run_lightweight_phase(
    adapter: &dyn ParserAdapter,
    classifications: &mut HashMap<String, AssetClassification>,
    batch_size: usize,
    batch_timeout: Duration,
    counters: &mut IndexCounters,
) -> Result<Vec<LightweightAssetRow>> {
    let mut skip_refs_paths = Vec::new();
    let mut needs_refs_paths = Vec::new();
    for classification in classifications.values() {
        if SEMANTIC_TYPES.contains(&classification.asset_type.as_str()) {
            continue;
        }
        if SKIP_REFS_TYPES.contains(&classification.asset_type.as_str()) {
            skip_refs_paths.push(classification.path.clone());
        } else {
            needs_refs_paths.push(classification.abs_path.clone());
        }
    }

    let mut rows: Vec<LightweightAssetRow> = skip_refs_paths
        .into_iter()
        .map(|path| {
            let classification = &classifications[&path];
            LightweightAssetRow {
                path,
                name: classification.name.clone(),
                asset_type: Some(classification.asset_type.clone()),
                references: Vec::new(),
            }
        })
        .collect();

    rows.extend(run_needs_refs(adapter, classifications, &needs_refs_paths, batch_size, batch_timeout, counters)?);
    Ok(rows)
}

fn run_needs_refs(
    adapter: &dyn ParserAdapter,
    classifications: &mut HashMap<String, AssetClassification>,
    paths: &[PathBuf],
    batch_size: usize,
    batch_timeout: Duration,
    counters: &mut IndexCounters,
) -> Result<Vec<LightweightAssetRow>> {
    let mut rows = Vec::new();
    for batch in chunk_paths(paths, batch_size) {
        let outcome = adapter.run_batch(BatchCommand::BatchRefs, &batch, batch_timeout)?;
        counters.errors += outcome.errors;
        for record in &outcome.records {
            let Some(path) = record.get("path").and_then(Value::as_str) else {
                counters.errors += 1;
                continue;
            };
            let refs: Vec<String> = record
                .get("refs")
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .filter_map(normalize_reference)
                        .map(|n| n.as_id())
                        .collect()
                })
                .unwrap_or_default();

            let finer_type = record.get("asset_type").and_then(Value::as_str);
            let is_now_semantic = finer_type.is_some_and(|t| SEMANTIC_TYPES.contains(&t));

            if is_now_semantic {
                if let Some(classification) = classifications.get_mut(path) {
                    let new_type = finer_type.unwrap().to_string();
                    if classification.asset_type != new_type {
                        classification.asset_type = new_type.clone();
                        counters.bump_type(&new_type);
                    }
                }
                continue;
            }

            let classification = classifications.get(path);
            rows.push(LightweightAssetRow {
                path: path.to_string(),
                name: classification.map_or_else(|| crate::util::name_from_path(path), |c| c.name.clone()),
                asset_type: finer_type
                    .map(str::to_string)
                    .or_else(|| classification.map(|c| c.asset_type.clone())),
                references: refs,
            });
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use ue_knowledge_parser::testing::FakeParserAdapter;
    use ue_knowledge_parser::BatchOutcome;

    fn classification(path: &str, asset_type: &str) -> AssetClassification {
        AssetClassification {
            path: path.to_string(),
            abs_path: PathBuf::from(path),
            asset_type: asset_type.to_string(),
            main_class: None,
            name: crate::util::name_from_path(path),
            size: Some(10),
        }
    }

    #[test]
    fn skip_refs_types_get_empty_ref_rows_without_a_subprocess_call() {
        let fake = FakeParserAdapter::default();
        let mut classifications = HashMap::new();
        classifications.insert("/Game/T_Rock".to_string(), classification("/Game/T_Rock", "Texture2D"));
        let mut counters = IndexCounters::default();
        let rows = run_lightweight_phase(&fake, &mut classifications, 500, Duration::from_secs(60), &mut counters).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].references.is_empty());
    }

    #[test]
    fn batch_refs_reroutes_finer_semantic_type() {
        let fake = FakeParserAdapter::default();
        fake.batch_responses.lock().unwrap().push(BatchOutcome {
            records: vec![json!({"path": "/Game/GE_Unknown", "asset_type": "GameplayEffect", "refs": []})],
            errors: 0,
            timed_out: false,
        });
        let mut classifications = HashMap::new();
        classifications.insert("/Game/GE_Unknown".to_string(), classification("/Game/GE_Unknown", "Unknown"));
        let mut counters = IndexCounters::default();
        let rows = run_lightweight_phase(&fake, &mut classifications, 500, Duration::from_secs(60), &mut counters).unwrap();
        assert!(rows.is_empty());
        assert_eq!(classifications["/Game/GE_Unknown"].asset_type, "GameplayEffect");
    }

    #[test]
    fn needs_refs_stores_normalized_reference_ids() {
        let fake = FakeParserAdapter::default();
        fake.batch_responses.lock().unwrap().push(BatchOutcome {
            records: vec![json!({"path": "/Game/DataTable1", "refs": ["/Game/Other"]})],
            errors: 0,
            timed_out: false,
        });
        let mut classifications = HashMap::new();
        classifications.insert("/Game/DataTable1".to_string(), classification("/Game/DataTable1", "SomeNonSkipType"));
        let mut counters = IndexCounters::default();
        let rows = run_lightweight_phase(&fake, &mut classifications, 500, Duration::from_secs(60), &mut counters).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].references, vec!["asset:/Game/Other".to_string()]);
    }
}
