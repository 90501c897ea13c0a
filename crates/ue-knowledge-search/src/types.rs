//! Search engine output shapes (spec §4.7).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    Tags,
    Inherits,
    Trace,
    Refs,
    Name,
    Semantic,
}

impl SearchMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tags => "tags",
            Self::Inherits => "inherits",
            Self::Trace => "trace",
            Self::Refs => "refs",
            Self::Name => "name",
            Self::Semantic => "semantic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Detail {
    Full,
    Summary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub path: String,
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    pub score: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceTarget {
    pub path: String,
    pub name: String,
    pub asset_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemTrace {
    pub target: Option<TraceTarget>,
    pub systems: Vec<String>,
    pub structural_dependencies: Vec<String>,
    pub visual_dependencies: Vec<String>,
    pub inbound_references: Vec<String>,
    pub ownership_chain: Vec<String>,
    pub unresolved_script_refs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub search_type: String,
    pub detail: String,
    pub count: usize,
    pub results: Vec<SearchHit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Vec<SystemTrace>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub search_type: Option<SearchMode>,
    pub asset_types: Option<Vec<String>>,
    pub limit: usize,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            search_type: None,
            asset_types: None,
            limit: 20,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InspectOptions {
    pub summarize: bool,
    pub type_only: bool,
    /// Only recognized value is `"graph"` (spec §6.3).
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectResponse {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph: Option<ue_knowledge_store::ReferenceGraph>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
