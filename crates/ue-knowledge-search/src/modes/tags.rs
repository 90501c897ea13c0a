//! `tags` mode (spec §4.7): exact or prefix match in `tags`.

use ue_knowledge_store::Store;

use crate::error::Result;
use crate::types::SearchHit;

pub fn search(store: &Store, tag_query: &str, limit: usize) -> Result<Vec<SearchHit>> {
    let matches = store.search_by_tag(tag_query, limit)?;
    Ok(matches
        .into_iter()
        .map(|m| SearchHit {
            path: m.path,
            name: m.name,
            asset_type: m.asset_type,
            snippet: Some(format!("Tag: {}", m.tag)),
            content: None,
            metadata: None,
            score: 1.0,
        })
        .collect())
}
