//! Result shapes returned by store operations (spec §4.3).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefDirection {
    Forward,
    Reverse,
    Both,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub doc_id: String,
    pub kind: String,
    pub path: String,
    pub name: String,
    pub module: Option<String>,
    pub asset_type: Option<String>,
    pub text: String,
    pub metadata: Map<String, Value>,
    pub score: f32,
}

#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    pub kind: Option<String>,
    pub path_prefix: Option<String>,
    pub module: Option<String>,
    pub asset_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub doc_id: String,
    pub kind: String,
    pub path: String,
    pub name: String,
    pub depth: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from_id: String,
    pub to_id: String,
    pub edge_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildResult {
    pub path: String,
    pub name: String,
    pub asset_type: Option<String>,
    pub depth: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferencingAsset {
    pub path: String,
    pub name: String,
    pub asset_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagMatch {
    pub path: String,
    pub name: String,
    pub asset_type: Option<String>,
    pub tag: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CppResolution {
    pub class_name: String,
    pub doc_id: String,
    pub source_path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchUpsertReport {
    pub inserted: usize,
    pub errors: usize,
    pub last_error: Option<String>,
}

/// A row bound for `lightweight_assets` (spec §4.3 `upsert_lightweight_batch`).
#[derive(Debug, Clone)]
pub struct LightweightAssetRow {
    pub path: String,
    pub name: String,
    pub asset_type: Option<String>,
    pub references: Vec<String>,
}

pub type TypedRefs = BTreeMap<String, String>;
