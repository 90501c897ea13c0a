//! DataTable extraction: `batch-datatable` (spec §4.5).

use serde_json::Value;
use ue_knowledge_schema::{datatable, DocChunk};

#[must_use]
pub fn extract(record: &Value) -> Vec<DocChunk> {
    let Some(path) = record.get("path").and_then(Value::as_str) else {
        return Vec::new();
    };
    let name = crate::util::name_from_path(path);
    let row_struct = record.get("row_struct").and_then(Value::as_str).unwrap_or("Unknown").to_string();
    let row_count = record.get("row_count").and_then(Value::as_u64).unwrap_or(0) as usize;
    let columns = string_list(record, "columns");
    let sample_keys = string_list(record, "sample_keys");
    vec![datatable(path, &name, &row_struct, row_count, &columns, &sample_keys, None)]
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
    fn builds_datatable_doc() {
        let record = json!({
            "path": "/Game/DT_Items",
            "row_struct": "FItemRow",
            "row_count": 10,
            "columns": ["Name"],
        });
        let docs = extract(&record);
        assert_eq!(docs.len(), 1);
        assert!(docs[0].text.contains("10 rows"));
    }
}
