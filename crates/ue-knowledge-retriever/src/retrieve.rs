//! `retrieve` (spec §4.6): hybrid exact/semantic search with graph expansion.

use ue_knowledge_store::{SearchResult, Store};

use crate::classify::classify_query;
use crate::embedder::QueryEmbedder;
use crate::error::Result;
use crate::fts_query::prepare_fts_query;
use crate::types::{ContextBundle, QueryType, RetrieveOptions};

pub struct Retriever<'a> {
    pub store: &'a Store,
    pub embedder: Option<&'a dyn QueryEmbedder>,
}

impl<'a> Retriever<'a> {
    #[must_use]
    pub fn new(store: &'a Store) -> Self {
        Self { store, embedder: None }
    }

    #[must_use]
    pub fn with_embedder(mut self, embedder: &'a dyn QueryEmbedder) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Classify (unless overridden), run the appropriate search path(s),
    /// merge, optionally expand the reference graph from the top hit, and
    /// estimate the resulting context's token budget (spec §4.6).
    pub fn retrieve(&self, query: &str, options: &RetrieveOptions) -> Result<ContextBundle> {
        let query_type = options.query_type.unwrap_or_else(|| classify_query(query));

        let results = match query_type {
            QueryType::Exact => self.exact_then_semantic(query, options)?,
            QueryType::Semantic => self.semantic_then_exact(query, options)?,
            QueryType::Hybrid => {
                let mut exact = self.search_exact(query, options)?;
                let semantic = self.search_semantic(query, options)?;
                exact.extend(semantic);
                merge_dedup(exact)
            }
        };

        let graph = if options.expand_refs {
            results
                .first()
                .map(|top| {
                    self.store.expand_refs(
                        &top.doc_id,
                        options.ref_direction,
                        options.ref_depth,
                        options.max_ref_nodes,
                        None,
                    )
                })
                .transpose()?
        } else {
            None
        };

        let estimated_tokens = estimate_tokens(&results);
        Ok(ContextBundle {
            query_type: Some(query_type),
            results,
            graph,
            estimated_tokens,
        })
    }

    fn exact_then_semantic(&self, query: &str, options: &RetrieveOptions) -> Result<Vec<SearchResult>> {
        let mut exact = self.search_exact(query, options)?;
        if exact.len() < options.k && self.embedder.is_some() {
            let semantic = self.search_semantic(query, options)?;
            exact.extend(semantic);
            return Ok(merge_dedup(exact));
        }
        Ok(exact)
    }

    fn semantic_then_exact(&self, query: &str, options: &RetrieveOptions) -> Result<Vec<SearchResult>> {
        let mut semantic = self.search_semantic(query, options)?;
        if semantic.len() < options.k {
            let exact = self.search_exact(query, options)?;
            semantic.extend(exact);
            return Ok(merge_dedup(semantic));
        }
        Ok(semantic)
    }

    fn search_exact(&self, query: &str, options: &RetrieveOptions) -> Result<Vec<SearchResult>> {
        let fts_query = prepare_fts_query(query);
        if fts_query.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.store.search_fts(&fts_query, &options.filters, options.k, 0)?)
    }

    fn search_semantic(&self, query: &str, options: &RetrieveOptions) -> Result<Vec<SearchResult>> {
        let Some(embedder) = self.embedder else {
            return Ok(Vec::new());
        };
        let vector = embedder.embed_query(query).map_err(|_| crate::error::Error::Embed(query.to_string()))?;
        Ok(self.store.search_vector(&vector, &options.filters, options.k, 0.0)?)
    }
}

/// Order-preserving dedup by `doc_id`: the first list's ordering wins (spec
/// §4.6 "primary list first").
fn merge_dedup(results: Vec<SearchResult>) -> Vec<SearchResult> {
    let mut seen = std::collections::HashSet::new();
    results.into_iter().filter(|r| seen.insert(r.doc_id.clone())).collect()
}

/// `ceil(total_chars / 4)` over every result's text (spec §4.6).
fn estimate_tokens(results: &[SearchResult]) -> usize {
    let total_chars: usize = results.iter().map(|r| r.text.chars().count()).sum();
    total_chars.div_ceil(4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ue_knowledge_schema::{DocChunk, DocKind};

    struct FakeEmbedder;
    impl QueryEmbedder for FakeEmbedder {
        fn embed_query(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![1.0, 0.0])
        }
    }

    fn doc(path: &str, text: &str) -> DocChunk {
        DocChunk::new(format!("asset:{path}"), DocKind::AssetSummary, path, path, text, None, Some("Blueprint".to_string()))
    }

    #[test]
    fn exact_query_hits_fts() {
        let store = Store::open_in_memory().unwrap();
        store.upsert_doc(&doc("/Game/BP_Pistol", "Pistol weapon blueprint"), None, false).unwrap();
        let retriever = Retriever::new(&store);
        let bundle = retriever.retrieve("/Game/BP_Pistol", &RetrieveOptions::default()).unwrap();
        assert_eq!(bundle.query_type, Some(QueryType::Exact));
        assert_eq!(bundle.results.len(), 1);
    }

    #[test]
    fn merge_dedup_keeps_primary_list_order() {
        let a = vec![
            SearchResult {
                doc_id: "asset:/Game/A".to_string(),
                kind: "asset_summary".to_string(),
                path: "/Game/A".to_string(),
                name: "A".to_string(),
                module: None,
                asset_type: None,
                text: "a".to_string(),
                metadata: serde_json::Map::new(),
                score: 1.0,
            },
            SearchResult {
                doc_id: "asset:/Game/B".to_string(),
                kind: "asset_summary".to_string(),
                path: "/Game/B".to_string(),
                name: "B".to_string(),
                module: None,
                asset_type: None,
                text: "b".to_string(),
                metadata: serde_json::Map::new(),
                score: 0.5,
            },
        ];
        let mut combined = a.clone();
        combined.push(a[0].clone());
        let merged = merge_dedup(combined);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].doc_id, "asset:/Game/A");
    }

    #[test]
    fn token_estimate_rounds_up() {
        let results = vec![SearchResult {
            doc_id: "x".to_string(),
            kind: "asset_summary".to_string(),
            path: "x".to_string(),
            name: "x".to_string(),
            module: None,
            asset_type: None,
            text: "abcde".to_string(),
            metadata: serde_json::Map::new(),
            score: 1.0,
        }];
        assert_eq!(estimate_tokens(&results), 2);
    }

    #[test]
    fn semantic_query_without_embedder_falls_back_to_exact() {
        let store = Store::open_in_memory().unwrap();
        store.upsert_doc(&doc("/Game/Foo", "how does the pistol reload"), None, false).unwrap();
        let retriever = Retriever::new(&store);
        let bundle = retriever.retrieve("how does the pistol reload work", &RetrieveOptions::default()).unwrap();
        assert_eq!(bundle.query_type, Some(QueryType::Semantic));
        assert_eq!(bundle.results.len(), 1);
    }

    #[test]
    fn with_embedder_allows_semantic_search() {
        let store = Store::open_in_memory().unwrap();
        let retriever = Retriever::new(&store).with_embedder(&FakeEmbedder);
        let bundle = retriever.retrieve("how does damage scaling work", &RetrieveOptions::default()).unwrap();
        assert_eq!(bundle.query_type, Some(QueryType::Semantic));
        assert!(bundle.results.is_empty());
    }
}
