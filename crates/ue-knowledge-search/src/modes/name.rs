//! `name` mode (spec §4.7): exact-FTS plus a name scan plus a C++ class
//! fallback, with alias expansion for trailing-underscore prefix queries.

use std::collections::HashSet;

use ue_knowledge_retriever::{QueryType, RetrieveOptions, Retriever};
use ue_knowledge_store::Store;

use crate::error::Result;
use crate::types::SearchHit;

const SNIPPET_LEN: usize = 200;

/// Prefixes the engine's asset-naming convention treats as interchangeable
/// when a query arrives as a bare prefix (e.g. `BP_`).
fn alias_prefixes(prefix: &str) -> Vec<String> {
    match prefix {
        "BP_" => vec!["B_".to_string()],
        "B_" => vec!["BP_".to_string()],
        "WBP_" => vec!["W_".to_string()],
        "W_" => vec!["WBP_".to_string()],
        "S_" => vec!["SM_".to_string(), "SK_".to_string()],
        "SM_" | "SK_" => vec!["S_".to_string()],
        _ => Vec::new(),
    }
}

fn snippet(text: &str) -> String {
    let truncated: String = text.chars().take(SNIPPET_LEN).collect();
    truncated
}

pub fn search(store: &Store, retriever: &Retriever<'_>, name: &str, limit: usize) -> Result<Vec<SearchHit>> {
    let mut seen = HashSet::new();
    let mut hits = Vec::new();

    let options = RetrieveOptions { k: limit, query_type: Some(QueryType::Exact), ..RetrieveOptions::default() };
    let bundle = retriever.retrieve(name, &options)?;
    for r in bundle.results {
        if seen.insert(r.path.clone()) {
            hits.push(SearchHit {
                path: r.path,
                name: r.name,
                asset_type: r.asset_type,
                snippet: Some(snippet(&r.text)),
                content: None,
                metadata: None,
                score: r.score,
            });
        }
    }

    let mut prefixes = vec![name.to_string()];
    if name.ends_with('_') {
        prefixes.extend(alias_prefixes(name));
    }
    for prefix in prefixes {
        for m in store.find_by_name_prefix(&prefix, limit)? {
            if seen.insert(m.path.clone()) {
                hits.push(SearchHit {
                    path: m.path,
                    name: m.name,
                    asset_type: m.asset_type,
                    snippet: None,
                    content: None,
                    metadata: None,
                    score: 0.8,
                });
            }
        }
    }

    let resolved = store.resolve_cpp_sources(std::slice::from_ref(&name.to_string()))?;
    if let Some(res) = resolved.get(name) {
        if seen.insert(res.source_path.clone()) {
            hits.push(SearchHit {
                path: res.source_path.clone(),
                name: res.class_name.clone(),
                asset_type: Some("CppClass".to_string()),
                snippet: Some(format!("C++ class {}", res.class_name)),
                content: None,
                metadata: None,
                score: 0.9,
            });
        }
    }

    hits.truncate(limit);
    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ue_knowledge_schema::{DocChunk, DocKind};
    use ue_knowledge_store::LightweightAssetRow;

    #[test]
    fn finds_exact_fts_and_prefix_hits() {
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
        store
            .upsert_lightweight_batch(&[LightweightAssetRow {
                path: "/Game/BP_PistolMk2".to_string(),
                name: "BP_PistolMk2".to_string(),
                asset_type: Some("Blueprint".to_string()),
                references: vec![],
            }])
            .unwrap();

        let retriever = Retriever::new(&store);
        let hits = search(&store, &retriever, "BP_Pistol", 10).unwrap();
        assert!(hits.iter().any(|h| h.path == "/Game/BP_Pistol"));
        assert!(hits.iter().any(|h| h.path == "/Game/BP_PistolMk2"));
    }

    #[test]
    fn trailing_underscore_expands_aliases() {
        let store = Store::open_in_memory().unwrap();
        store
            .upsert_lightweight_batch(&[LightweightAssetRow {
                path: "/Game/B_OldPistol".to_string(),
                name: "B_OldPistol".to_string(),
                asset_type: Some("Blueprint".to_string()),
                references: vec![],
            }])
            .unwrap();

        let retriever = Retriever::new(&store);
        let hits = search(&store, &retriever, "BP_", 10).unwrap();
        assert!(hits.iter().any(|h| h.path == "/Game/B_OldPistol"));
    }
}
