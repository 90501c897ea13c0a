//! Shared project bootstrap for both binaries: resolve the profile, the
//! embedded store, and the parser adapter from nothing but a project root
//! (spec §6.2, §6.4).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ue_knowledge_core::{Context, Profile};
use ue_knowledge_indexer::semantic::data_asset::DataAssetExtractorRegistry;
use ue_knowledge_parser::{resolve_binary, SubprocessParserAdapter};
use ue_knowledge_store::Store;

use crate::db_path::derive_db_path;
use crate::error::{Result, ServerError};

const PROFILE_OVERLAY_FILE: &str = ".ue_knowledge_profile.json";

pub struct ProjectSetup {
    pub context: Context,
    pub store: Arc<Store>,
    pub adapter: SubprocessParserAdapter,
    pub registry: DataAssetExtractorRegistry,
}

/// Build everything an indexing run or a search session needs from just a
/// project root: discover plugin content roots, load the profile (engine
/// defaults, overlaid by a project-local `.ue_knowledge_profile.json` if
/// present), resolve the parser binary, and open the embedded database at
/// its spec-derived path.
pub fn bootstrap(project_root: &Path) -> Result<ProjectSetup> {
    if !project_root.join("Content").is_dir() {
        return Err(ServerError::NotAProjectRoot(project_root.to_path_buf()));
    }

    let overlay_path = project_root.join(PROFILE_OVERLAY_FILE);
    let profile =
        if overlay_path.is_file() { Profile::load(&overlay_path)? } else { Profile::engine_defaults()? };

    let db_path = derive_db_path(project_root);
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let plugin_roots = Context::discover_plugin_roots(project_root);
    let context = Context::new(project_root.to_path_buf(), db_path.clone(), profile).with_plugin_roots(plugin_roots);

    let store = Arc::new(Store::open(&db_path)?);
    let binary_path = resolve_parser_binary(project_root)?;
    let adapter = SubprocessParserAdapter::new(binary_path, None);
    let registry = DataAssetExtractorRegistry::new();

    Ok(ProjectSetup { context, store, adapter, registry })
}

fn resolve_parser_binary(project_root: &Path) -> Result<PathBuf> {
    resolve_binary(project_root).map_err(ServerError::from)
}
