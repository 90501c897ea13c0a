//! `GameFeatureData`/`LyraExperienceActionSet`/profile-configured
//! game-feature-type extraction: walks an `inspect` result's exports for
//! `GameFeatureAction_*` classes and CDOs (spec §4.5).

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use ue_knowledge_schema::{normalize_reference, DocChunk};

use crate::gameplay_tags::{append_tags_line, collect_tags};

#[must_use]
pub fn extract(path: &str, asset_type: &str, inspect_json: &Value) -> Vec<DocChunk> {
    let name = crate::util::name_from_path(path);
    let exports = inspect_json.get("exports").and_then(Value::as_array).cloned().unwrap_or_default();

    let mut typed_refs: BTreeMap<String, String> = BTreeMap::new();
    for export in &exports {
        let class = export.get("class").and_then(Value::as_str).unwrap_or_default();
        let export_name = export.get("name").and_then(Value::as_str).unwrap_or_default();

        if class.starts_with("GameFeatureAction_") {
            collect_action_refs(class, export, &mut typed_refs);
        }
        if is_cdo_export(export_name) {
            collect_cdo_refs(export, &mut typed_refs);
        }
    }

    let tags = collect_tags(inspect_json);
    let mut metadata = Map::new();
    metadata.insert("gameplay_tags".into(), Value::Array(tags.iter().cloned().map(Value::String).collect()));
    metadata.insert("action_count".into(), Value::from(exports.len()));

    let text = append_tags_line(&format!("{name} is a {asset_type}."), &tags);
    let references_out: Vec<String> = typed_refs.keys().cloned().collect();

    vec![DocChunk::new(
        format!("asset:{path}"),
        ue_knowledge_schema::DocKind::AssetSummary,
        path,
        name,
        text,
        Some(ue_knowledge_schema::module_from_asset_path(path)),
        Some(asset_type.to_string()),
    )
    .with_metadata(metadata)
    .with_references(references_out)
    .with_typed_references(typed_refs)]
}

fn is_cdo_export(export_name: &str) -> bool {
    export_name.starts_with("Default__") && export_name.ends_with("_C")
}

fn collect_action_refs(class: &str, export: &Value, typed_refs: &mut BTreeMap<String, String>) {
    let label = if class.contains("AddWidgets") {
        "registers_widget"
    } else if class.contains("AddComponents") {
        "adds_component"
    } else if class.contains("InputContextMapping") || class.contains("AddInputMapping") {
        "maps_input"
    } else {
        "targets_actor"
    };
    let Some(properties) = export.get("properties").and_then(Value::as_array) else {
        return;
    };
    for property in properties {
        let prop_name = property.get("name").and_then(Value::as_str).unwrap_or_default();
        let edge_label = if prop_name.eq_ignore_ascii_case("layout") { "uses_layout" } else { label };
        for target in reference_values(property.get("value")) {
            typed_refs.insert(target, edge_label.to_string());
        }
    }
}

fn collect_cdo_refs(export: &Value, typed_refs: &mut BTreeMap<String, String>) {
    let Some(properties) = export.get("properties").and_then(Value::as_array) else {
        return;
    };
    for property in properties {
        let prop_name = property.get("name").and_then(Value::as_str).unwrap_or_default();
        let label = if prop_name.eq_ignore_ascii_case("ActionSets") {
            Some("includes_action_set")
        } else if prop_name.eq_ignore_ascii_case("DefaultPawnData") {
            Some("uses_pawn_data")
        } else {
            None
        };
        if let Some(label) = label {
            for target in reference_values(property.get("value")) {
                typed_refs.insert(target, label.to_string());
            }
        }
    }
}

fn reference_values(value: Option<&Value>) -> Vec<String> {
    let mut out = Vec::new();
    match value {
        Some(Value::String(s)) => {
            if let Some(normalized) = normalize_reference(s) {
                out.push(normalized.as_id());
            }
        }
        Some(Value::Array(items)) => {
            for item in items {
                out.extend(reference_values(Some(item)));
            }
        }
        _ => {}
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn collects_typed_edges_from_action_and_cdo() {
        let inspect = json!({
            "exports": [
                {
                    "name": "Action_0",
                    "class": "GameFeatureAction_AddWidgets",
                    "properties": [
                        {"name": "Widgets", "value": ["/Game/UI/WBP_Hud"]},
                    ],
                },
                {
                    "name": "Default__LAS_Shooter_C",
                    "class": "LyraExperienceActionSet",
                    "properties": [
                        {"name": "ActionSets", "value": ["/Game/AS_Base"]},
                        {"name": "DefaultPawnData", "value": "/Game/HeroData_ShooterGame"},
                    ],
                },
            ],
        });
        let docs = extract("/Game/LAS_Shooter", "LyraExperienceActionSet", &inspect);
        assert_eq!(docs.len(), 1);
        let doc = &docs[0];
        assert_eq!(doc.edge_label_for("asset:/Game/UI/WBP_Hud"), "registers_widget");
        assert_eq!(doc.edge_label_for("asset:/Game/AS_Base"), "includes_action_set");
        assert_eq!(
            doc.edge_label_for("asset:/Game/HeroData_ShooterGame"),
            "uses_pawn_data"
        );
    }
}
