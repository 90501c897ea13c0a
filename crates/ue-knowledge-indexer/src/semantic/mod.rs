//! Phase 5 — semantic extraction dispatch (spec §4.5).
//!
//! Groups the working set by asset type, calls the matching batch command
//! (or falls back to single-asset commands for types with no batch form),
//! and routes each record to its type-specific extractor.

pub mod blueprint;
pub mod data_asset;
pub mod datatable;
pub mod game_feature;
pub mod input;
pub mod material;
pub mod widget;

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde_json::Value;
use ue_knowledge_core::Profile;
use ue_knowledge_parser::{BatchCommand, ParserAdapter, SingleCommand, SingleOutput};
use ue_knowledge_schema::DocChunk;

use crate::error::Result;
use crate::types::{AssetClassification, IndexCounters};
use data_asset::DataAssetExtractorRegistry;

pub struct SemanticContext<'a> {
    pub adapter: &'a dyn ParserAdapter,
    pub profile: &'a Profile,
    pub registry: &'a DataAssetExtractorRegistry,
    pub batch_size: usize,
    pub batch_timeout: Duration,
    pub asset_timeout: Duration,
}

/// Run Phase 5 over every classification whose (possibly redirected) asset
/// type is semantic. Returns the accumulated `DocChunk`s; callers upsert
/// them into the store.
pub fn run_semantic_phase(
    ctx: &SemanticContext<'_>,
    classifications: &HashMap<String, AssetClassification>,
    counters: &mut IndexCounters,
) -> Result<Vec<DocChunk>> {
    let mut by_type: HashMap<&str, Vec<&AssetClassification>> = HashMap::new();
    for classification in classifications.values() {
        if crate::types::SEMANTIC_TYPES.contains(&classification.asset_type.as_str()) {
            by_type.entry(classification.asset_type.as_str()).or_default().push(classification);
        }
    }

    let mut docs = Vec::new();

    if let Some(items) = by_type.get("Blueprint") {
        docs.extend(run_blueprints(ctx, items, counters)?);
    }
    if let Some(items) = by_type.get("WidgetBlueprint") {
        docs.extend(run_batch_extractor(ctx, items, BatchCommand::BatchWidget, widget::extract, counters)?);
    }
    for material_type in ["Material", "MaterialInstance", "MaterialFunction"] {
        if let Some(items) = by_type.get(material_type) {
            docs.extend(run_batch_extractor(ctx, items, BatchCommand::BatchMaterial, material::extract, counters)?);
        }
    }
    if let Some(items) = by_type.get("DataTable") {
        docs.extend(run_batch_extractor(ctx, items, BatchCommand::BatchDatatable, datatable::extract, counters)?);
    }

    for (asset_type, items) in &by_type {
        if ctx.profile.is_game_feature_type(asset_type) {
            docs.extend(run_game_feature(ctx, asset_type, items)?);
        }
    }
    if let Some(items) = by_type.get("InputAction") {
        docs.extend(run_input_actions(ctx, items)?);
    }
    if let Some(items) = by_type.get("InputMappingContext") {
        docs.extend(run_input_mapping_contexts(ctx, items)?);
    }
    if let Some(items) = by_type.get("DataAsset") {
        docs.extend(run_data_assets(ctx, items)?);
    }

    for (asset_type, items) in &by_type {
        if matches!(
            *asset_type,
            "Blueprint"
                | "WidgetBlueprint"
                | "Material"
                | "MaterialInstance"
                | "MaterialFunction"
                | "DataTable"
                | "InputAction"
                | "InputMappingContext"
                | "DataAsset"
        ) || ctx.profile.is_game_feature_type(asset_type)
        {
            continue;
        }
        docs.extend(run_asset_summary_only(items));
    }

    for doc in &docs {
        counters.semantic_indexed += 1;
        counters.bump_type(doc.asset_type.as_deref().unwrap_or("Unknown"));
    }
    Ok(docs)
}

fn run_batch_extractor(
    ctx: &SemanticContext<'_>,
    items: &[&AssetClassification],
    command: BatchCommand,
    extract: fn(&Value) -> Vec<DocChunk>,
    counters: &mut IndexCounters,
) -> Result<Vec<DocChunk>> {
    let paths: Vec<PathBuf> = items.iter().map(|c| c.abs_path.clone()).collect();
    let mut docs = Vec::new();
    for batch in crate::batching::chunk_paths(&paths, ctx.batch_size) {
        let outcome = ctx.adapter.run_batch(command, &batch, ctx.batch_timeout)?;
        counters.errors += outcome.errors;
        for record in &outcome.records {
            docs.extend(extract(record));
        }
    }
    Ok(docs)
}

/// Blueprint is handled separately from the generic batch path because a
/// redirected record (per `profile.blueprint_parent_redirects`) needs a
/// follow-up `inspect` call for its CDO rather than the blueprint extractor.
fn run_blueprints(
    ctx: &SemanticContext<'_>,
    items: &[&AssetClassification],
    counters: &mut IndexCounters,
) -> Result<Vec<DocChunk>> {
    let paths: Vec<PathBuf> = items.iter().map(|c| c.abs_path.clone()).collect();
    let mut docs = Vec::new();
    for batch in crate::batching::chunk_paths(&paths, ctx.batch_size) {
        let outcome = ctx.adapter.run_batch(BatchCommand::BatchBlueprint, &batch, ctx.batch_timeout)?;
        counters.errors += outcome.errors;
        for record in &outcome.records {
            let parent = record.get("parent").and_then(Value::as_str).unwrap_or_default();
            if let Some(redirect_type) = ctx.profile.blueprint_parent_redirects.get(parent) {
                let Some(path) = record.get("path").and_then(Value::as_str) else {
                    continue;
                };
                docs.extend(run_redirected_blueprint(ctx, path, redirect_type)?);
            } else {
                docs.extend(blueprint::extract(record));
            }
        }
    }
    Ok(docs)
}

fn run_redirected_blueprint(ctx: &SemanticContext<'_>, path: &str, redirect_type: &str) -> Result<Vec<DocChunk>> {
    let SingleOutput::Json(inspect_json) = ctx.adapter.run_single(SingleCommand::Inspect, std::path::Path::new(path), ctx.asset_timeout)? else {
        return Ok(Vec::new());
    };
    let cdo_json = cdo_view(&inspect_json);
    if ctx.profile.is_game_feature_type(redirect_type) {
        return Ok(game_feature::extract(path, redirect_type, &cdo_json));
    }
    Ok(Vec::new())
}

/// Build a view of `inspect_json` whose `/exports/0` is the CDO export
/// (`Default__*_C`) if one exists, else the original main export (spec
/// §4.5: "Blueprint-subclass CDOs").
fn cdo_view(inspect_json: &Value) -> Value {
    let Some(exports) = inspect_json.get("exports").and_then(Value::as_array) else {
        return inspect_json.clone();
    };
    let cdo = exports.iter().find(|e| {
        e.get("name")
            .and_then(Value::as_str)
            .is_some_and(|n| n.starts_with("Default__") && n.ends_with("_C"))
    });
    let Some(cdo) = cdo else {
        return inspect_json.clone();
    };
    let mut rest: Vec<Value> = exports.iter().filter(|e| !std::ptr::eq(*e, cdo)).cloned().collect();
    let mut reordered = vec![cdo.clone()];
    reordered.append(&mut rest);
    let mut view = inspect_json.clone();
    view["exports"] = Value::Array(reordered);
    view
}

fn run_game_feature(ctx: &SemanticContext<'_>, asset_type: &str, items: &[&AssetClassification]) -> Result<Vec<DocChunk>> {
    let mut docs = Vec::new();
    for classification in items {
        let SingleOutput::Json(inspect_json) =
            ctx.adapter.run_single(SingleCommand::Inspect, &classification.abs_path, ctx.asset_timeout)?
        else {
            continue;
        };
        docs.extend(game_feature::extract(&classification.path, asset_type, &inspect_json));
    }
    Ok(docs)
}

fn run_input_actions(ctx: &SemanticContext<'_>, items: &[&AssetClassification]) -> Result<Vec<DocChunk>> {
    let mut docs = Vec::new();
    for classification in items {
        let SingleOutput::Json(inspect_json) =
            ctx.adapter.run_single(SingleCommand::Inspect, &classification.abs_path, ctx.asset_timeout)?
        else {
            continue;
        };
        let SingleOutput::Xml(refs) =
            ctx.adapter.run_single(SingleCommand::References, &classification.abs_path, ctx.asset_timeout)?
        else {
            continue;
        };
        docs.extend(input::extract_input_action(&classification.path, &inspect_json, &refs));
    }
    Ok(docs)
}

fn run_input_mapping_contexts(ctx: &SemanticContext<'_>, items: &[&AssetClassification]) -> Result<Vec<DocChunk>> {
    let mut docs = Vec::new();
    for classification in items {
        let SingleOutput::Xml(refs) =
            ctx.adapter.run_single(SingleCommand::References, &classification.abs_path, ctx.asset_timeout)?
        else {
            continue;
        };
        docs.extend(input::extract_input_mapping_context(&classification.path, &refs));
    }
    Ok(docs)
}

fn run_data_assets(ctx: &SemanticContext<'_>, items: &[&AssetClassification]) -> Result<Vec<DocChunk>> {
    let mut docs = Vec::new();
    for classification in items {
        let SingleOutput::Json(inspect_json) =
            ctx.adapter.run_single(SingleCommand::Inspect, &classification.abs_path, ctx.asset_timeout)?
        else {
            continue;
        };
        let class_name = classification.main_class.clone().unwrap_or_else(|| "DataAsset".to_string());
        docs.push(ctx.registry.extract(&class_name, &classification.path, &inspect_json, &ctx.profile.data_asset_extractors));
    }
    Ok(docs)
}

fn run_asset_summary_only(items: &[&AssetClassification]) -> Vec<DocChunk> {
    items
        .iter()
        .map(|c| {
            ue_knowledge_schema::asset_summary(ue_knowledge_schema::AssetSummaryInput {
                path: c.path.clone(),
                name: c.name.clone(),
                asset_type: c.asset_type.clone(),
                parent_class: c.main_class.clone().unwrap_or_default(),
                ..Default::default()
            })
        })
        .collect()
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
            size: Some(100),
        }
    }

    #[test]
    fn routes_widget_blueprints_through_batch_widget() {
        let fake = FakeParserAdapter::default();
        fake.batch_responses.lock().unwrap().push(BatchOutcome {
            records: vec![json!({"path": "/Game/WBP_Hud", "widget_count": 1, "widget_names": ["Root"]})],
            errors: 0,
            timed_out: false,
        });
        let profile = Profile::default();
        let registry = DataAssetExtractorRegistry::new();
        let ctx = SemanticContext {
            adapter: &fake,
            profile: &profile,
            registry: &registry,
            batch_size: 500,
            batch_timeout: Duration::from_secs(60),
            asset_timeout: Duration::from_secs(60),
        };
        let mut classifications = HashMap::new();
        classifications.insert("/Game/WBP_Hud".to_string(), classification("/Game/WBP_Hud", "WidgetBlueprint"));
        let mut counters = IndexCounters::default();
        let docs = run_semantic_phase(&ctx, &classifications, &mut counters).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(counters.semantic_indexed, 2);
    }

    #[test]
    fn redirected_blueprint_routes_through_game_feature_extractor() {
        let fake = FakeParserAdapter::default();
        fake.batch_responses.lock().unwrap().push(BatchOutcome {
            records: vec![json!({"path": "/Game/LE_Shooter", "parent": "LyraExperienceDefinition"})],
            errors: 0,
            timed_out: false,
        });
        fake.single_responses.lock().unwrap().push(SingleOutput::Json(json!({
            "exports": [
                {"name": "Default__LE_Shooter_C", "class": "LyraExperienceActionSet", "properties": [
                    {"name": "ActionSets", "value": ["/Game/AS_Base"]},
                ]},
            ],
        })));
        let mut profile = Profile::default();
        profile
            .blueprint_parent_redirects
            .insert("LyraExperienceDefinition".to_string(), "LyraExperienceActionSet".to_string());
        profile.game_feature_types.insert("LyraExperienceActionSet".to_string());
        let registry = DataAssetExtractorRegistry::new();
        let ctx = SemanticContext {
            adapter: &fake,
            profile: &profile,
            registry: &registry,
            batch_size: 500,
            batch_timeout: Duration::from_secs(60),
            asset_timeout: Duration::from_secs(60),
        };
        let mut classifications = HashMap::new();
        classifications.insert("/Game/LE_Shooter".to_string(), classification("/Game/LE_Shooter", "Blueprint"));
        let mut counters = IndexCounters::default();
        let docs = run_semantic_phase(&ctx, &classifications, &mut counters).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].edge_label_for("asset:/Game/AS_Base"), "includes_action_set");
    }

    #[test]
    fn unlisted_semantic_type_gets_asset_summary_only() {
        let fake = FakeParserAdapter::default();
        let profile = Profile::default();
        let registry = DataAssetExtractorRegistry::new();
        let ctx = SemanticContext {
            adapter: &fake,
            profile: &profile,
            registry: &registry,
            batch_size: 500,
            batch_timeout: Duration::from_secs(60),
            asset_timeout: Duration::from_secs(60),
        };
        let mut classifications = HashMap::new();
        classifications.insert("/Game/GA_Dash".to_string(), classification("/Game/GA_Dash", "GameplayAbility"));
        let mut counters = IndexCounters::default();
        let docs = run_semantic_phase(&ctx, &classifications, &mut counters).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].kind, ue_knowledge_schema::DocKind::AssetSummary);
    }
}
