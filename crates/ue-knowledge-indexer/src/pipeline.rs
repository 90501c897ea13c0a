//! Top-level pipeline orchestrator (spec §4.5): wires Phases 0-7 together.

use std::collections::HashMap;
use std::time::Instant;

use ue_knowledge_core::{Context, Profile};
use ue_knowledge_parser::ParserAdapter;
use ue_knowledge_schema::{normalize_reference, DocChunk};
use ue_knowledge_store::Store;

use crate::change_detection::filter_changed;
use crate::classify::fast_classify;
use crate::deep_refs::run_deep_refs_phase;
use crate::discovery::discover_assets;
use crate::embeddings::{embed_docs, Embedder};
use crate::error::Result;
use crate::lightweight_indexing::run_lightweight_phase;
use crate::reclassify::reclassify_unknown;
use crate::refs::resolve_parent_class;
use crate::semantic::data_asset::DataAssetExtractorRegistry;
use crate::semantic::{run_semantic_phase, SemanticContext};
use crate::types::{IndexCounters, IndexOptions, PhaseTiming};

pub struct Pipeline<'a> {
    pub context: &'a Context,
    pub store: &'a Store,
    pub adapter: &'a dyn ParserAdapter,
    pub registry: &'a DataAssetExtractorRegistry,
    pub embedder: Option<&'a dyn Embedder>,
}

impl<'a> Pipeline<'a> {
    pub fn run(&self, options: &IndexOptions) -> Result<IndexCounters> {
        let mut counters = IndexCounters::default();
        let mut timing: HashMap<String, PhaseTiming> = HashMap::new();
        let profile: &Profile = &self.context.profile;
        let batch_timeout = self.context.env.batch_timeout;
        let asset_timeout = self.context.env.asset_timeout;
        let batch_size = options.batch_size;

        let plugin_content_roots: Vec<std::path::PathBuf> =
            self.context.plugin_content_roots.iter().map(|r| r.content_dir.clone()).collect();

        let phase0 = Instant::now();
        let content_root = self.context.project_root.join("Content");
        let discovered = discover_assets(&content_root, &plugin_content_roots, options);
        counters.total_found = discovered.len();
        record_timing(&mut timing, "discovery", phase0, discovered.len());

        let phase1 = Instant::now();
        let working_set = filter_changed(self.store, &discovered, options.force)?;
        counters.unchanged = discovered.len() - working_set.len();
        record_timing(&mut timing, "change_detection", phase1, working_set.len());

        if working_set.is_empty() {
            finish(&mut counters, timing, self.context);
            return Ok(counters);
        }

        let phase2 = Instant::now();
        let mut classifications = fast_classify(self.adapter, &working_set, batch_size, batch_timeout, &mut counters)?;
        record_timing(&mut timing, "fast_classify", phase2, classifications.len());

        let plugin_root_prefixes: Vec<String> = self
            .context
            .plugin_content_roots
            .iter()
            .map(|r| format!("/{}/", r.plugin_name))
            .collect();

        let phase3 = Instant::now();
        reclassify_unknown(
            self.adapter,
            &mut classifications,
            &plugin_root_prefixes,
            profile,
            batch_size,
            batch_timeout,
            &mut counters,
        )?;
        record_timing(&mut timing, "reclassify", phase3, classifications.len());

        if options.dry_run {
            finish(&mut counters, timing, self.context);
            return Ok(counters);
        }

        let phase4 = Instant::now();
        let mut lightweight_rows =
            run_lightweight_phase(self.adapter, &mut classifications, batch_size, batch_timeout, &mut counters)?;
        counters.lightweight_indexed += lightweight_rows.len();
        record_timing(&mut timing, "lightweight", phase4, lightweight_rows.len());

        let phase4b = Instant::now();
        let deep_ref_rows = run_deep_refs_phase(self.adapter, &classifications, profile, asset_timeout, &mut counters)?;
        record_timing(&mut timing, "deep_refs", phase4b, deep_ref_rows.len());
        lightweight_rows.extend(deep_ref_rows);
        self.store.upsert_lightweight_batch(&lightweight_rows)?;

        let phase5 = Instant::now();
        let semantic_ctx = SemanticContext {
            adapter: self.adapter,
            profile,
            registry: self.registry,
            batch_size,
            batch_timeout,
            asset_timeout,
        };
        let mut docs = run_semantic_phase(&semantic_ctx, &classifications, &mut counters)?;
        resolve_inherits_from_edges(self.store, &mut docs)?;
        record_timing(&mut timing, "semantic", phase5, docs.len());

        let embeddings = match self.embedder {
            Some(embedder) if self.context.env.embeddings_enabled => Some(embed_docs(embedder, &mut docs)?),
            _ => None,
        };
        self.store.upsert_docs_batch(&docs, embeddings.as_deref(), options.force)?;

        let phase6 = Instant::now();
        let asset_type_by_abs_path: HashMap<std::path::PathBuf, &str> = classifications
            .values()
            .map(|c| (c.abs_path.clone(), c.asset_type.as_str()))
            .collect();
        for path in &working_set {
            let Ok(metadata) = std::fs::metadata(path) else {
                continue;
            };
            let mtime = metadata
                .modified()
                .ok()
                .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
                .map_or(0, |d| d.as_millis() as i64);
            let asset_type = asset_type_by_abs_path.get(path).copied();
            self.store.upsert_file_meta(&path.to_string_lossy(), mtime, metadata.len() as i64, asset_type)?;
        }
        record_timing(&mut timing, "file_metadata", phase6, working_set.len());

        finish(&mut counters, timing, self.context);
        Ok(counters)
    }
}

/// `inherits_from` edges are resolved after semantic extraction so the
/// resolver can look up assets already indexed this run (spec §4.5 rule 5).
///
/// The extractor that built `doc` already pushed a normalized placeholder
/// reference for the raw parent-class string (e.g. `class:Actor`) into
/// `references_out`/`typed_references_out`. When resolution upgrades that
/// placeholder to a more specific target (e.g. `asset:/Game/BP_ActorBase`,
/// rule 5), the placeholder is removed so the two don't coexist as a
/// spurious extra edge.
fn resolve_inherits_from_edges(store: &Store, docs: &mut [DocChunk]) -> Result<()> {
    for doc in docs.iter_mut() {
        let Some(parent_class) = doc
            .metadata
            .get("parent_class")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
        else {
            continue;
        };
        let Some(target) = resolve_parent_class(store, &parent_class)? else {
            continue;
        };
        if let Some(placeholder) = normalize_reference(&parent_class).map(|n| n.as_id()) {
            if placeholder != target {
                doc.references_out.retain(|r| r != &placeholder);
                doc.typed_references_out.remove(&placeholder);
            }
        }
        doc.typed_references_out.insert(target.clone(), "inherits_from".to_string());
        if !doc.references_out.contains(&target) {
            doc.references_out.push(target);
        }
    }
    Ok(())
}

fn record_timing(timing: &mut HashMap<String, PhaseTiming>, name: &str, started: Instant, item_count: usize) {
    timing.insert(
        name.to_string(),
        PhaseTiming {
            duration_ms: started.elapsed().as_millis() as u64,
            item_count,
            subprocess_calls: 0,
            db_writes: 0,
        },
    );
}

fn finish(counters: &mut IndexCounters, timing: HashMap<String, PhaseTiming>, context: &Context) {
    if context.env.timing_enabled {
        counters.timing = Some(timing);
    }
}
