//! Material/MaterialInstance/MaterialFunction extraction: `batch-material`
//! (spec §4.5).
//!
//! The batch command's JSON shape (scalar/vector/texture params, static
//! switches) matches [`material_params`] directly for `Material` and
//! `MaterialInstance`. `MaterialFunction` assets are routed through the
//! same builder rather than `materialfunction_params`, since `batch-material`
//! never reports the function's input/output pin list — only single-asset
//! `materialfunction` does, and Phase 5 groups all three types under one
//! batch call.

use serde_json::{Map, Value};
use ue_knowledge_schema::{material_params, DocChunk, MaterialParamsInput};

#[must_use]
pub fn extract(record: &Value) -> Vec<DocChunk> {
    let Some(path) = record.get("path").and_then(Value::as_str) else {
        return Vec::new();
    };
    let name = crate::util::name_from_path(path);
    let is_instance = record.get("is_instance").and_then(Value::as_bool).unwrap_or(false);
    let doc = material_params(MaterialParamsInput {
        path: path.to_string(),
        name,
        is_instance,
        parent: record.get("parent").and_then(Value::as_str).unwrap_or_default().to_string(),
        domain: record.get("domain").and_then(Value::as_str).unwrap_or_default().to_string(),
        blend_mode: record.get("blend_mode").and_then(Value::as_str).unwrap_or_default().to_string(),
        shading_model: record
            .get("shading_model")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        scalar_params: object_field(record, "scalar_params"),
        vector_params: object_field(record, "vector_params"),
        texture_params: object_field(record, "texture_params"),
        static_switches: object_field(record, "static_switches"),
        references_out: Vec::new(),
        module: None,
    });
    vec![doc]
}

fn object_field(record: &Value, key: &str) -> Map<String, Value> {
    record.get(key).and_then(Value::as_object).cloned().unwrap_or_default()
}
