//! Widget Blueprint extraction: `batch-widget` → `AssetSummary` +
//! `umg_widget_tree` (spec §4.5).

use serde_json::Value;
use ue_knowledge_schema::{asset_summary, normalize_reference, umg_widget_tree, AssetSummaryInput, DocChunk};

#[must_use]
pub fn extract(record: &Value) -> Vec<DocChunk> {
    let Some(path) = record.get("path").and_then(Value::as_str) else {
        return Vec::new();
    };
    let name = crate::util::name_from_path(path);
    let widget_count = record.get("widget_count").and_then(Value::as_u64).unwrap_or(0) as usize;
    let widget_names = string_list(record, "widget_names");
    let parent = record.get("parent").and_then(Value::as_str).unwrap_or_default();
    let interfaces = string_list(record, "interfaces");
    let events = string_list(record, "events");
    let variables = string_list(record, "variables");
    let functions = string_list(record, "functions");

    let summary = asset_summary(AssetSummaryInput {
        path: path.to_string(),
        name: name.clone(),
        asset_type: "WidgetBlueprint".to_string(),
        widget_count,
        parent_class: parent.to_string(),
        interfaces,
        events,
        variables,
        functions,
        references_out: normalize_reference(parent).map(|n| n.as_id()).into_iter().collect(),
        ..Default::default()
    });

    let root_widget = widget_names.first().cloned().unwrap_or_default();
    let hierarchy_text = record
        .get("widgets")
        .map_or_else(String::new, std::string::ToString::to_string);
    let tree = umg_widget_tree(path, &name, &root_widget, &widget_names, &hierarchy_text, Vec::new(), None);

    vec![summary, tree]
}

fn string_list(record: &Value, key: &str) -> Vec<String> {
    record
        .get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_summary_and_widget_tree() {
        let record = json!({
            "path": "/Game/WBP_Healthbar",
            "widget_count": 3,
            "widget_names": ["Root", "Bar", "Text"],
        });
        let docs = extract(&record);
        assert_eq!(docs.len(), 2);
        assert!(docs[1].text.contains("Root"));
    }
}
