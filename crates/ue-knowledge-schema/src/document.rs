//! The atomic indexed unit: [`DocChunk`] and its variant tag [`DocKind`]
//! (spec §3.1).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::fingerprint::fingerprint;

/// Document variant tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocKind {
    AssetSummary,
    UmgWidgetTree,
    BpGraphSummary,
    MaterialParams,
    MaterialfunctionParams,
    Datatable,
    SourceFile,
    CppClass,
    CppFunc,
    CppProperty,
}

impl DocKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AssetSummary => "asset_summary",
            Self::UmgWidgetTree => "umg_widget_tree",
            Self::BpGraphSummary => "bp_graph_summary",
            Self::MaterialParams => "material_params",
            Self::MaterialfunctionParams => "materialfunction_params",
            Self::Datatable => "datatable",
            Self::SourceFile => "source_file",
            Self::CppClass => "cpp_class",
            Self::CppFunc => "cpp_func",
            Self::CppProperty => "cpp_property",
        }
    }

    #[must_use]
    pub fn from_str_opt(s: &str) -> Option<Self> {
        Some(match s {
            "asset_summary" => Self::AssetSummary,
            "umg_widget_tree" => Self::UmgWidgetTree,
            "bp_graph_summary" => Self::BpGraphSummary,
            "material_params" => Self::MaterialParams,
            "materialfunction_params" => Self::MaterialfunctionParams,
            "datatable" => Self::Datatable,
            "source_file" => Self::SourceFile,
            "cpp_class" => Self::CppClass,
            "cpp_func" => Self::CppFunc,
            "cpp_property" => Self::CppProperty,
            _ => return None,
        })
    }
}

impl std::fmt::Display for DocKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The atomic indexed unit (spec §3.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocChunk {
    pub doc_id: String,
    pub kind: DocKind,
    pub path: String,
    pub name: String,
    pub text: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(default)]
    pub references_out: Vec<String>,
    #[serde(default)]
    pub typed_references_out: BTreeMap<String, String>,
    pub module: Option<String>,
    pub asset_type: Option<String>,
    pub fingerprint: String,
    pub schema_version: u32,
    pub embed_model: Option<String>,
    pub embed_version: Option<String>,
}

pub const CURRENT_SCHEMA_VERSION: u32 = 1;

impl DocChunk {
    /// Build a new chunk, deriving `fingerprint` from `text` (spec §3.1:
    /// "fingerprint is derived from text").
    #[must_use]
    pub fn new(
        doc_id: impl Into<String>,
        kind: DocKind,
        path: impl Into<String>,
        name: impl Into<String>,
        text: impl Into<String>,
        module: Option<String>,
        asset_type: Option<String>,
    ) -> Self {
        let text = text.into();
        let fp = fingerprint(&text);
        Self {
            doc_id: doc_id.into(),
            kind,
            path: path.into(),
            name: name.into(),
            text,
            metadata: Map::new(),
            references_out: Vec::new(),
            typed_references_out: BTreeMap::new(),
            module,
            asset_type,
            fingerprint: fp,
            schema_version: CURRENT_SCHEMA_VERSION,
            embed_model: None,
            embed_version: None,
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    #[must_use]
    pub fn with_references(mut self, references_out: Vec<String>) -> Self {
        self.references_out = references_out;
        self
    }

    #[must_use]
    pub fn with_typed_references(mut self, typed: BTreeMap<String, String>) -> Self {
        self.typed_references_out = typed;
        self
    }

    /// Recompute `fingerprint` after mutating `text` directly (used by tag
    /// appension in the indexer's gameplay-tag pass, spec §4.5).
    pub fn recompute_fingerprint(&mut self) {
        self.fingerprint = fingerprint(&self.text);
    }

    /// The edge label for a given outgoing reference target: the typed label
    /// if present, else the default `uses_asset` (spec §4.3 `upsert_doc`).
    #[must_use]
    pub fn edge_label_for(&self, target: &str) -> &str {
        self.typed_references_out
            .get(target)
            .map(String::as_str)
            .unwrap_or("uses_asset")
    }
}

/// Derive the top-level mount point / module name from a game path, e.g.
/// `/Game/UI/HUD/Widget` -> `UI` (spec §4.2).
#[must_use]
pub fn module_from_asset_path(path: &str) -> String {
    let parts: Vec<&str> = path.split('/').collect();
    if parts.len() >= 3 && parts[1] == "Game" {
        parts[2].to_string()
    } else if parts.len() >= 2 && !parts[1].is_empty() {
        // Plugin-mounted path: /<PluginName>/...
        parts[1].to_string()
    } else {
        "Unknown".to_string()
    }
}

/// Derive the module from a C++ source-relative path, e.g.
/// `Source/MyGame/Public/Foo.h` -> `MyGame` (spec §4.2).
#[must_use]
pub fn module_from_source_path(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    let parts: Vec<&str> = normalized.split('/').collect();
    if parts.len() >= 2 && (parts[0] == "Source" || parts[0] == "Plugins") {
        parts[1].to_string()
    } else {
        "Unknown".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_from_asset_path_game_root() {
        assert_eq!(module_from_asset_path("/Game/UI/HUD/Widget"), "UI");
    }

    #[test]
    fn module_from_asset_path_plugin_root() {
        assert_eq!(
            module_from_asset_path("/GameFeatures/Experiences/E_Default"),
            "GameFeatures"
        );
    }

    #[test]
    fn module_from_source_path_variants() {
        assert_eq!(
            module_from_source_path("Source/MyGame/Public/Foo.h"),
            "MyGame"
        );
        assert_eq!(
            module_from_source_path("Plugins/GameFeatures/Source/Foo.h"),
            "GameFeatures"
        );
    }

    #[test]
    fn doc_chunk_new_derives_fingerprint() {
        let doc = DocChunk::new(
            "asset:/Game/Foo",
            DocKind::AssetSummary,
            "/Game/Foo",
            "Foo",
            "Foo is a Blueprint.",
            None,
            Some("Blueprint".to_string()),
        );
        assert_eq!(doc.fingerprint.len(), 16);
    }

    #[test]
    fn edge_label_defaults_to_uses_asset() {
        let doc = DocChunk::new(
            "asset:/Game/Foo",
            DocKind::AssetSummary,
            "/Game/Foo",
            "Foo",
            "text",
            None,
            None,
        );
        assert_eq!(doc.edge_label_for("asset:/Game/Bar"), "uses_asset");
    }
}
