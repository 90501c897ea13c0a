//! [`KnowledgeApi`]: the one entry point every transport (MCP server, CLI,
//! tests) calls through (spec §6.3). Both operations are infallible at
//! this boundary — failures are carried in the response body rather than
//! propagated, per spec §7's error-propagation rule.

use std::sync::Arc;

use ue_knowledge_core::Profile;
use ue_knowledge_retriever::{QueryEmbedder, Retriever};
use ue_knowledge_store::{RefDirection, Store};

use crate::error::Result;
use crate::modes::{inherits, name, refs, semantic, tags, trace};
use crate::postprocess;
use crate::route::{self, route};
use crate::types::{
    Detail, InspectOptions, InspectResponse, SearchHit, SearchMode, SearchRequest, SearchResponse, SystemTrace,
};

const DEFAULT_GRAPH_DEPTH: u32 = 2;
const DEFAULT_GRAPH_MAX_NODES: usize = 50;

pub struct KnowledgeApi {
    store: Arc<Store>,
    profile: Arc<Profile>,
    embedder: Option<Arc<dyn QueryEmbedder>>,
}

impl KnowledgeApi {
    #[must_use]
    pub fn new(store: Arc<Store>, profile: Arc<Profile>) -> Self {
        Self { store, profile, embedder: None }
    }

    #[must_use]
    pub fn with_embedder(store: Arc<Store>, profile: Arc<Profile>, embedder: Arc<dyn QueryEmbedder>) -> Self {
        Self { store, profile, embedder: Some(embedder) }
    }

    fn retriever(&self) -> Retriever<'_> {
        let retriever = Retriever::new(&self.store);
        match &self.embedder {
            Some(embedder) => retriever.with_embedder(embedder.as_ref()),
            None => retriever,
        }
    }

    #[must_use]
    pub fn search(&self, request: &SearchRequest) -> SearchResponse {
        match self.try_search(request) {
            Ok(response) => response,
            Err(err) => SearchResponse {
                query: request.query.clone(),
                search_type: request.search_type.map_or_else(|| route(&request.query).as_str().to_string(), |m| m.as_str().to_string()),
                detail: "summary".to_string(),
                count: 0,
                results: Vec::new(),
                trace: None,
                note: Some(format!("search failed: {err}")),
            },
        }
    }

    fn try_search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let auto_routed = request.search_type.is_none();
        let mut mode = request.search_type.unwrap_or_else(|| route(&request.query));

        let (mut hits, mut trace_payload) = self.dispatch(mode, &request.query, request.limit)?;

        let dotted_tags_fallthrough =
            auto_routed && mode == SearchMode::Tags && !request.query.trim().starts_with("tag:") && hits.is_empty();
        if dotted_tags_fallthrough {
            mode = SearchMode::Semantic;
            let (fallback_hits, fallback_trace) = self.dispatch(mode, &request.query, request.limit)?;
            hits = fallback_hits;
            trace_payload = fallback_trace;
        }

        if let Some(asset_types) = &request.asset_types {
            hits = postprocess::filter_asset_types(hits, asset_types);
        }
        hits = postprocess::dedupe_by_path(hits);
        hits = postprocess::sort_hits(hits);
        hits = postprocess::rerank(&self.profile, mode, &request.query, hits);
        hits.truncate(request.limit);
        let (hits, detail) = postprocess::enrich(&self.store, mode, hits)?;

        Ok(SearchResponse {
            query: request.query.clone(),
            search_type: mode.as_str().to_string(),
            detail: match detail {
                Detail::Full => "full".to_string(),
                Detail::Summary => "summary".to_string(),
            },
            count: hits.len(),
            results: hits,
            trace: trace_payload,
            note: None,
        })
    }

    fn dispatch(&self, mode: SearchMode, query: &str, limit: usize) -> Result<(Vec<SearchHit>, Option<Vec<SystemTrace>>)> {
        match mode {
            SearchMode::Tags => {
                let tag_query = query.strip_prefix("tag:").unwrap_or(query);
                Ok((tags::search(&self.store, tag_query, limit)?, None))
            }
            SearchMode::Inherits => {
                let target = route::extract_inherits_target(query).unwrap_or_else(|| query.to_string());
                Ok((inherits::search(&self.store, &target, limit)?, None))
            }
            SearchMode::Trace => {
                let (hits, traces) = trace::search(&self.store, &self.profile, query, limit)?;
                Ok((hits, Some(traces)))
            }
            SearchMode::Refs => Ok((refs::search(&self.store, query, limit)?, None)),
            SearchMode::Name => {
                let retriever = self.retriever();
                Ok((name::search(&self.store, &retriever, query, limit)?, None))
            }
            SearchMode::Semantic => {
                let retriever = self.retriever();
                Ok((semantic::search(&retriever, query, limit)?, None))
            }
        }
    }

    #[must_use]
    pub fn inspect_asset(&self, path: &str, opts: &InspectOptions) -> InspectResponse {
        match self.try_inspect_asset(path, opts) {
            Ok(response) => response,
            Err(err) => InspectResponse {
                path: path.to_string(),
                name: None,
                asset_type: None,
                content: None,
                metadata: None,
                graph: None,
                note: Some(format!("inspect failed: {err}")),
            },
        }
    }

    fn try_inspect_asset(&self, path: &str, opts: &InspectOptions) -> Result<InspectResponse> {
        let docs = self.store.get_docs_by_path(path)?;
        let lightweight = if docs.is_empty() { self.store.get_lightweight_by_path(path)? } else { None };

        let (name, asset_type) = match (docs.first(), &lightweight) {
            (Some(doc), _) => (Some(doc.name.clone()), doc.asset_type.clone()),
            (None, Some(row)) => (Some(row.name.clone()), row.asset_type.clone()),
            (None, None) => (None, None),
        };

        if opts.type_only {
            return Ok(InspectResponse { path: path.to_string(), name, asset_type, content: None, metadata: None, graph: None, note: None });
        }

        let graph = if opts.detail.as_deref() == Some("graph") {
            let doc_id = format!("asset:{path}");
            Some(self.store.expand_refs(&doc_id, RefDirection::Both, DEFAULT_GRAPH_DEPTH, DEFAULT_GRAPH_MAX_NODES, None)?)
        } else {
            None
        };

        if docs.is_empty() {
            let note = if lightweight.is_some() {
                Some("lightweight asset: no semantic text body indexed".to_string())
            } else {
                Some("unknown path: no indexed document".to_string())
            };
            return Ok(InspectResponse { path: path.to_string(), name, asset_type, content: None, metadata: None, graph, note });
        }

        let content = Some(docs.iter().map(|d| d.text.as_str()).collect::<Vec<_>>().join("\n\n"));
        let mut metadata = serde_json::Map::new();
        for doc in &docs {
            for (key, value) in &doc.metadata {
                metadata.insert(key.clone(), value.clone());
            }
        }
        let metadata = if metadata.is_empty() { None } else { Some(metadata) };

        Ok(InspectResponse {
            path: path.to_string(),
            name,
            asset_type,
            content: if opts.summarize { content.map(|c| c.chars().take(800).collect()) } else { content },
            metadata,
            graph,
            note: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ue_knowledge_schema::{DocChunk, DocKind};

    fn store_with_pistol() -> Arc<Store> {
        let store = Store::open_in_memory().unwrap();
        store
            .upsert_doc(
                &DocChunk::new(
                    "asset:/Game/BP_Pistol",
                    DocKind::AssetSummary,
                    "/Game/BP_Pistol",
                    "BP_Pistol",
                    "Pistol weapon blueprint",
                    None,
                    Some("Blueprint".to_string()),
                ),
                None,
                false,
            )
            .unwrap();
        Arc::new(store)
    }

    #[test]
    fn search_routes_exact_path_to_name_mode() {
        let api = KnowledgeApi::new(store_with_pistol(), Arc::new(Profile::default()));
        let request = SearchRequest { query: "/Game/BP_Pistol".to_string(), ..SearchRequest::default() };
        let response = api.search(&request);
        assert_eq!(response.search_type, "name");
        assert!(response.count >= 1);
        assert!(response.note.is_none());
    }

    #[test]
    fn inspect_asset_type_only_skips_content() {
        let api = KnowledgeApi::new(store_with_pistol(), Arc::new(Profile::default()));
        let response = api.inspect_asset("/Game/BP_Pistol", &InspectOptions { type_only: true, ..InspectOptions::default() });
        assert_eq!(response.asset_type.as_deref(), Some("Blueprint"));
        assert!(response.content.is_none());
    }

    #[test]
    fn inspect_asset_unknown_path_carries_note_not_error() {
        let api = KnowledgeApi::new(store_with_pistol(), Arc::new(Profile::default()));
        let response = api.inspect_asset("/Game/Nope", &InspectOptions::default());
        assert!(response.note.is_some());
    }
}
