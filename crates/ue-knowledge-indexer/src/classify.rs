//! Phase 2 — fast classify (spec §4.5).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::Value;
use ue_knowledge_parser::{BatchCommand, ParserAdapter};

use crate::batching::chunk_paths;
use crate::error::Result;
use crate::types::{AssetClassification, IndexCounters};

/// Run `batch-fast` over the working set in `batch_size` chunks, parsing
/// each NDJSON record into a `path → classification` map and bumping
/// per-type counters.
pub fn fast_classify(
    adapter: &dyn ParserAdapter,
    working_set: &[PathBuf],
    batch_size: usize,
    batch_timeout: Duration,
    counters: &mut IndexCounters,
) -> Result<HashMap<String, AssetClassification>> {
    let mut classifications = HashMap::new();
    for batch in chunk_paths(working_set, batch_size) {
        let outcome = adapter.run_batch(BatchCommand::BatchFast, &batch, batch_timeout)?;
        counters.errors += outcome.errors;
        for record in &outcome.records {
            if let Some(classification) = parse_record(record) {
                counters.bump_type(&classification.asset_type);
                classifications.insert(classification.path.clone(), classification);
            } else {
                counters.errors += 1;
            }
        }
    }
    Ok(classifications)
}

fn parse_record(record: &Value) -> Option<AssetClassification> {
    let path = record.get("path")?.as_str()?.to_string();
    let asset_type = record
        .get("asset_type")
        .and_then(Value::as_str)
        .unwrap_or("Unknown")
        .to_string();
    let name = record
        .get("name")
        .and_then(Value::as_str)
        .map_or_else(|| default_name(&path), str::to_string);
    Some(AssetClassification {
        abs_path: PathBuf::from(&path),
        path,
        asset_type,
        main_class: record.get("main_class").and_then(Value::as_str).map(str::to_string),
        name,
        size: record.get("size").and_then(Value::as_u64),
    })
}

fn default_name(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map_or_else(|| path.to_string(), |s| s.to_string_lossy().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use ue_knowledge_parser::testing::FakeParserAdapter;
    use ue_knowledge_parser::BatchOutcome;

    #[test]
    fn classifies_and_counts_types() {
        let fake = FakeParserAdapter::default();
        fake.batch_responses.lock().unwrap().push(BatchOutcome {
            records: vec![
                json!({"path": "/Game/GE_Damage", "asset_type": "GameplayEffect", "name": "GE_Damage"}),
                json!({"path": "/Game/T_Rock", "asset_type": "Texture2D"}),
            ],
            errors: 1,
            timed_out: false,
        });
        let mut counters = IndexCounters::default();
        let classifications = fast_classify(
            &fake,
            &[PathBuf::from("/Game/GE_Damage.uasset"), PathBuf::from("/Game/T_Rock.uasset")],
            500,
            Duration::from_secs(60),
            &mut counters,
        )
        .unwrap();

        assert_eq!(classifications.len(), 2);
        assert_eq!(counters.errors, 1);
        assert_eq!(counters.by_type["GameplayEffect"], 1);
        assert_eq!(classifications["/Game/T_Rock"].name, "T_Rock");
    }
}
