//! `DataAsset` extraction via a per-class extractor registry (spec §4.5):
//! "dispatch to a per-class extractor registered via a decorator-like
//! registry; fallback extractor reports property names and up to 10
//! collected refs. Extractors are whitelisted by
//! `profile.data_asset_extractors`."

use std::collections::HashMap;

use serde_json::Value;
use ue_knowledge_schema::{normalize_reference, DocChunk, DocKind};

pub type ExtractorFn = fn(path: &str, inspect_json: &Value) -> DocChunk;

/// Registry of per-class `DataAsset` extractors, keyed by the asset's
/// `main_class`. Empty by default; callers register project-specific
/// extractors before running the pipeline.
#[derive(Default)]
pub struct DataAssetExtractorRegistry {
    extractors: HashMap<String, ExtractorFn>,
}

impl DataAssetExtractorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, class_name: impl Into<String>, extractor: ExtractorFn) {
        self.extractors.insert(class_name.into(), extractor);
    }

    /// Dispatch to the registered extractor for `class_name` if it is both
    /// registered and present in `whitelist`; otherwise fall back to the
    /// generic property-dump extractor.
    #[must_use]
    pub fn extract(&self, class_name: &str, path: &str, inspect_json: &Value, whitelist: &std::collections::HashSet<String>) -> DocChunk {
        if whitelist.contains(class_name) {
            if let Some(extractor) = self.extractors.get(class_name) {
                return extractor(path, inspect_json);
            }
        }
        fallback_extract(path, class_name, inspect_json)
    }
}

#[must_use]
pub fn fallback_extract(path: &str, class_name: &str, inspect_json: &Value) -> DocChunk {
    let name = crate::util::name_from_path(path);
    let properties = inspect_json
        .pointer("/exports/0/properties")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let property_names: Vec<String> = properties
        .iter()
        .filter_map(|p| p.get("name").and_then(Value::as_str).map(str::to_string))
        .collect();

    let mut references_out = Vec::new();
    for property in &properties {
        if references_out.len() >= 10 {
            break;
        }
        if let Some(value) = property.get("value").and_then(Value::as_str) {
            if let Some(normalized) = normalize_reference(value) {
                if matches!(normalized, ue_knowledge_schema::NormalizedRef::Asset(_)) {
                    references_out.push(normalized.as_id());
                }
            }
        }
    }

    let text = format!(
        "DataAsset {name} of class {class_name}. Properties: {}.",
        property_names.iter().take(15).cloned().collect::<Vec<_>>().join(", ")
    );

    let mut metadata = serde_json::Map::new();
    metadata.insert("property_names".into(), Value::from(property_names));

    DocChunk::new(
        format!("asset:{path}"),
        DocKind::AssetSummary,
        path,
        name,
        text,
        Some(ue_knowledge_schema::module_from_asset_path(path)),
        Some(class_name.to_string()),
    )
    .with_metadata(metadata)
    .with_references(references_out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fallback_lists_property_names_and_caps_refs() {
        let inspect = json!({
            "exports": [{
                "properties": [
                    {"name": "Damage", "type": "float", "value": 25},
                    {"name": "Icon", "type": "TextureRef", "value": "/Game/T_Icon"},
                ],
            }],
        });
        let doc = fallback_extract("/Game/DA_Weapon", "UWeaponDataAsset", &inspect);
        assert!(doc.text.contains("Damage"));
        assert!(doc.references_out.contains(&"asset:/Game/T_Icon".to_string()));
    }

    #[test]
    fn registry_dispatches_only_when_whitelisted() {
        fn custom(path: &str, _inspect: &Value) -> DocChunk {
            DocChunk::new(
                format!("asset:{path}"),
                DocKind::AssetSummary,
                path,
                "custom",
                "custom text",
                None,
                Some("CustomDataAsset".to_string()),
            )
        }
        let mut registry = DataAssetExtractorRegistry::new();
        registry.register("CustomDataAsset", custom);

        let empty_whitelist = std::collections::HashSet::new();
        let doc = registry.extract("CustomDataAsset", "/Game/DA_Custom", &json!({}), &empty_whitelist);
        assert_eq!(doc.text, "DataAsset DA_Custom of class CustomDataAsset. Properties: .");

        let mut whitelist = std::collections::HashSet::new();
        whitelist.insert("CustomDataAsset".to_string());
        let doc = registry.extract("CustomDataAsset", "/Game/DA_Custom", &json!({}), &whitelist);
        assert_eq!(doc.text, "custom text");
    }
}
