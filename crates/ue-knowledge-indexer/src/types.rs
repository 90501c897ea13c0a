//! Pipeline input/output shapes (spec §4.5).

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct IndexOptions {
    pub force: bool,
    pub batch_size: usize,
    pub recursive: bool,
    pub max_assets: Option<usize>,
    pub exclude_patterns: Vec<String>,
    pub dry_run: bool,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            force: false,
            batch_size: 500,
            recursive: true,
            max_assets: None,
            exclude_patterns: Vec::new(),
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhaseTiming {
    pub duration_ms: u64,
    pub item_count: usize,
    pub subprocess_calls: usize,
    pub db_writes: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexCounters {
    pub total_found: usize,
    pub unchanged: usize,
    pub lightweight_indexed: usize,
    pub semantic_indexed: usize,
    pub errors: usize,
    pub by_type: HashMap<String, usize>,
    pub timing: Option<HashMap<String, PhaseTiming>>,
}

impl IndexCounters {
    pub fn bump_type(&mut self, asset_type: &str) {
        *self.by_type.entry(asset_type.to_string()).or_insert(0) += 1;
    }
}

/// A single `batch-fast` / `batch-summary` classification result.
#[derive(Debug, Clone, Default)]
pub struct AssetClassification {
    pub path: String,
    pub abs_path: PathBuf,
    pub asset_type: String,
    pub main_class: Option<String>,
    pub name: String,
    pub size: Option<u64>,
}

pub const SKIP_REFS_TYPES: &[&str] = &[
    "Texture2D",
    "TextureCube",
    "StaticMesh",
    "SkeletalMesh",
    "AnimSequence",
    "AnimMontage",
    "SoundWave",
    "SoundCue",
    "PhysicsAsset",
];

pub const SEMANTIC_TYPES: &[&str] = &[
    "Blueprint",
    "WidgetBlueprint",
    "Material",
    "MaterialInstance",
    "MaterialFunction",
    "DataTable",
    "GameplayEffect",
    "GameplayAbility",
    "GameFeatureData",
    "LyraExperienceActionSet",
    "InputAction",
    "InputMappingContext",
    "DataAsset",
];
