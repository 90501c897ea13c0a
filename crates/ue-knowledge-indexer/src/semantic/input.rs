//! `InputAction` / `InputMappingContext` extraction (spec §4.5).

use serde_json::Value;
use ue_knowledge_parser::ParsedReferences;
use ue_knowledge_schema::{normalize_reference, DocChunk, DocKind};

#[must_use]
pub fn extract_input_action(path: &str, inspect_json: &Value, refs: &ParsedReferences) -> Vec<DocChunk> {
    let name = crate::util::name_from_path(path);
    let triggers = class_like(&refs.class_refs, "Trigger");
    let modifiers = class_like(&refs.class_refs, "Modifier");
    let display_text = inspect_json
        .pointer("/exports/0/properties")
        .and_then(Value::as_array)
        .and_then(|props| props.iter().find(|p| p.get("name").and_then(Value::as_str) == Some("DisplayName")))
        .and_then(|p| p.get("value"))
        .and_then(Value::as_str)
        .unwrap_or(&name);

    let mut text = format!("InputAction {name} ({display_text})");
    if !triggers.is_empty() {
        text.push_str(&format!(". Triggers: {}", triggers.join(", ")));
    }
    if !modifiers.is_empty() {
        text.push_str(&format!(". Modifiers: {}", modifiers.join(", ")));
    }
    text.push('.');

    let references_out = asset_refs(refs);
    vec![DocChunk::new(
        format!("asset:{path}"),
        DocKind::AssetSummary,
        path,
        name,
        text,
        Some(ue_knowledge_schema::module_from_asset_path(path)),
        Some("InputAction".to_string()),
    )
    .with_references(references_out)]
}

#[must_use]
pub fn extract_input_mapping_context(path: &str, refs: &ParsedReferences) -> Vec<DocChunk> {
    let name = crate::util::name_from_path(path);
    let actions: Vec<String> = refs
        .asset_refs
        .iter()
        .filter(|r| crate::util::name_from_path(r).starts_with("IA_"))
        .cloned()
        .collect();
    let triggers = class_like(&refs.class_refs, "Trigger");
    let modifiers = class_like(&refs.class_refs, "Modifier");

    let mut text = format!("InputMappingContext {name}");
    if !actions.is_empty() {
        text.push_str(&format!(". Maps actions: {}", actions.join(", ")));
    }
    if !triggers.is_empty() {
        text.push_str(&format!(". Triggers: {}", triggers.join(", ")));
    }
    if !modifiers.is_empty() {
        text.push_str(&format!(". Modifiers: {}", modifiers.join(", ")));
    }
    text.push('.');

    vec![DocChunk::new(
        format!("asset:{path}"),
        DocKind::AssetSummary,
        path,
        name,
        text,
        Some(ue_knowledge_schema::module_from_asset_path(path)),
        Some("InputMappingContext".to_string()),
    )
    .with_references(asset_refs(refs))]
}

fn class_like(class_refs: &[String], marker: &str) -> Vec<String> {
    class_refs.iter().filter(|c| c.contains(marker)).cloned().collect()
}

fn asset_refs(refs: &ParsedReferences) -> Vec<String> {
    refs.asset_refs
        .iter()
        .filter_map(|r| normalize_reference(r))
        .map(|n| n.as_id())
        .collect()
}
