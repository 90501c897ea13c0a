//! Retrieval input/output shapes (spec §4.6).

use serde::{Deserialize, Serialize};
use ue_knowledge_store::{ReferenceGraph, SearchFilters, SearchResult};

/// `classify_query`'s verdict on how a raw query string should be routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    Exact,
    Semantic,
    Hybrid,
}

/// `retrieve`'s parameters beyond the raw query text.
#[derive(Debug, Clone)]
pub struct RetrieveOptions {
    pub filters: SearchFilters,
    pub k: usize,
    pub expand_refs: bool,
    pub ref_direction: ue_knowledge_store::RefDirection,
    pub ref_depth: u32,
    pub max_ref_nodes: usize,
    pub query_type: Option<QueryType>,
}

impl Default for RetrieveOptions {
    fn default() -> Self {
        Self {
            filters: SearchFilters::default(),
            k: 10,
            expand_refs: false,
            ref_direction: ue_knowledge_store::RefDirection::Forward,
            ref_depth: 2,
            max_ref_nodes: 50,
            query_type: None,
        }
    }
}

/// `retrieve`'s return value: the merged result set plus an optional
/// expanded reference graph and a rough token-budget estimate for the
/// caller to size its context window against (spec §4.6).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextBundle {
    pub query_type: Option<QueryType>,
    pub results: Vec<SearchResult>,
    pub graph: Option<ReferenceGraph>,
    pub estimated_tokens: usize,
}
