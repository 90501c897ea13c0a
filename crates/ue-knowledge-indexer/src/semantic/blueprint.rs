//! Blueprint extraction: `batch-blueprint` → `AssetSummary` + one
//! `bp_graph_summary` per function (spec §4.5).

use serde_json::Value;
use ue_knowledge_schema::{
    asset_summary, bp_graph_summary, normalize_reference, AssetSummaryInput, BpGraphInput, BpParamDirection,
    BpParameter, DocChunk,
};

#[must_use]
pub fn extract(record: &Value) -> Vec<DocChunk> {
    let Some(path) = record.get("path").and_then(Value::as_str) else {
        return Vec::new();
    };
    let name = crate::util::name_from_path(path);
    let parent = record.get("parent").and_then(Value::as_str).unwrap_or_default();
    let events = string_list(record, "events");
    let components = string_list(record, "components");
    let variables = string_list(record, "variables");
    let interfaces = string_list(record, "interfaces");

    let mut docs = vec![asset_summary(AssetSummaryInput {
        path: path.to_string(),
        name: name.clone(),
        asset_type: "Blueprint".to_string(),
        parent_class: parent.to_string(),
        events: events.clone(),
        components,
        variables: variables.clone(),
        interfaces,
        references_out: parent_ref(parent),
        ..Default::default()
    })];

    if let Some(Value::Array(functions)) = record.get("functions") {
        for function in functions {
            docs.push(build_function_doc(path, &name, function, &events));
        }
    }
    docs
}

fn build_function_doc(path: &str, asset_name: &str, function: &Value, event_names: &[String]) -> DocChunk {
    let function_name = function.get("name").and_then(Value::as_str).unwrap_or("Unknown").to_string();
    let is_event = event_names.iter().any(|e| e == &function_name);
    let flags = string_list(function, "flags");
    let calls = string_list(function, "calls");
    let (has_branches, complexity) = function
        .get("control_flow")
        .map(|cf| {
            (
                cf.get("has_branches").and_then(Value::as_bool).unwrap_or(false),
                cf.get("complexity").and_then(Value::as_str).unwrap_or("low").to_string(),
            )
        })
        .unwrap_or((false, "low".to_string()));
    let parameters = function
        .get("parameters")
        .and_then(Value::as_array)
        .map(|params| {
            params
                .iter()
                .filter_map(|p| {
                    Some(BpParameter {
                        name: p.get("name")?.as_str()?.to_string(),
                        param_type: p.get("type").and_then(Value::as_str).unwrap_or("Unknown").to_string(),
                        direction: match p.get("direction").and_then(Value::as_str) {
                            Some("out") => BpParamDirection::Out,
                            Some("return") => BpParamDirection::Return,
                            _ => BpParamDirection::In,
                        },
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    bp_graph_summary(BpGraphInput {
        path: path.to_string(),
        asset_name: asset_name.to_string(),
        function_name,
        flags,
        calls,
        variables: Vec::new(),
        references_out: Vec::new(),
        module: None,
        is_event,
        has_branches,
        complexity,
        parameters,
    })
}

fn parent_ref(parent: &str) -> Vec<String> {
    normalize_reference(parent).map(|n| n.as_id()).into_iter().collect()
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
    fn builds_summary_and_one_doc_per_function() {
        let record = json!({
            "path": "/Game/BP_Foo",
            "parent": "Actor",
            "events": ["BeginPlay"],
            "functions": [
                {"name": "BeginPlay", "flags": ["BlueprintEvent"], "calls": ["SetActorLocation"]},
                {"name": "TakeDamage", "flags": [], "calls": []},
            ],
        });
        let docs = extract(&record);
        assert_eq!(docs.len(), 3);
        assert_eq!(docs[0].asset_type.as_deref(), Some("Blueprint"));
    }
}
