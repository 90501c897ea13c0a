//! `inherits` mode (spec §4.7): walk `inherits_from` edges downward from a
//! named class/asset.

use ue_knowledge_store::Store;

use crate::error::Result;
use crate::types::SearchHit;

const MAX_DEPTH: u32 = 6;

pub fn search(store: &Store, target: &str, limit: usize) -> Result<Vec<SearchHit>> {
    let mut parent_ids = vec![format!("class:{target}")];
    if let Some(path) = store.find_doc_path_by_name(target)? {
        parent_ids.push(format!("asset:{path}"));
    } else if let Some(path) = store.find_lightweight_path_by_name(target)? {
        parent_ids.push(format!("asset:{path}"));
    }

    let children = store.find_children_of(&parent_ids, MAX_DEPTH)?;
    let mut hits: Vec<SearchHit> = children
        .into_iter()
        .map(|c| SearchHit {
            path: c.path,
            name: c.name,
            asset_type: c.asset_type,
            snippet: Some(format!("Inherits from {target} (depth {})", c.depth)),
            content: None,
            metadata: None,
            score: 1.0 / c.depth.max(1) as f32,
        })
        .collect();
    hits.truncate(limit);
    Ok(hits)
}
