//! Gameplay-tag collection from arbitrary `inspect` JSON (spec §4.5,
//! §8 invariant 8).

use std::collections::BTreeSet;

use serde_json::Value;

/// Recursively walk `value` looking for `{"_type": "GameplayTag", "TagName":
/// ...}` and `{"_type": "GameplayTagContainer", "tags": [...]}`. Returns a
/// deduplicated, sorted tag list — walking twice yields the same result.
#[must_use]
pub fn collect_tags(value: &Value) -> Vec<String> {
    let mut tags = BTreeSet::new();
    walk(value, &mut tags);
    tags.into_iter().collect()
}

fn walk(value: &Value, tags: &mut BTreeSet<String>) {
    match value {
        Value::Object(map) => {
            match map.get("_type").and_then(Value::as_str) {
                Some("GameplayTag") => {
                    if let Some(name) = map.get("TagName").and_then(Value::as_str) {
                        tags.insert(name.to_string());
                    }
                }
                Some("GameplayTagContainer") => {
                    if let Some(Value::Array(entries)) = map.get("tags") {
                        for entry in entries {
                            if let Some(name) = entry.as_str() {
                                tags.insert(name.to_string());
                            } else {
                                walk(entry, tags);
                            }
                        }
                    }
                }
                _ => {}
            }
            for v in map.values() {
                walk(v, tags);
            }
        }
        Value::Array(items) => {
            for item in items {
                walk(item, tags);
            }
        }
        _ => {}
    }
}

/// Append `Tags: a, b, c` to `text` unless a tags line is already present.
#[must_use]
pub fn append_tags_line(text: &str, tags: &[String]) -> String {
    if tags.is_empty() || text.contains("Tags:") {
        return text.to_string();
    }
    format!("{text} Tags: {}.", tags.join(", "))
}
