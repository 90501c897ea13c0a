//! `refs` mode (spec §4.7): "where is X used/placed", resolved to one or
//! more target paths and answered via the reverse-reference index.

use std::sync::OnceLock;

use regex::Regex;
use ue_knowledge_store::Store;

use crate::error::Result;
use crate::types::SearchHit;

fn phrasing_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)where\s+(?:is|are)\s+(.+?)\s+(?:used|placed)").unwrap()
    })
}

fn level_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)what'?s?\s+in\s+(\S+)\s+level").unwrap())
}

/// Pull the asset token out of common English phrasings, falling back to
/// treating the whole query as a raw name/path.
#[must_use]
pub fn extract_target(query: &str) -> String {
    let trimmed = query.trim();
    if let Some(caps) = phrasing_regex().captures(trimmed) {
        return caps[1].trim().to_string();
    }
    trimmed.to_string()
}

pub fn search(store: &Store, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
    if let Some(caps) = level_regex().captures(query.trim()) {
        let level = &caps[1];
        return search_external_actors(store, level, limit);
    }

    let target = extract_target(query);
    let candidate_path = if target.starts_with('/') {
        target.clone()
    } else if let Some(path) = store.find_doc_path_by_name(&target)? {
        path
    } else if let Some(path) = store.find_lightweight_path_by_name(&target)? {
        path
    } else {
        target.clone()
    };

    let referencing = store.find_assets_referencing(&candidate_path, limit)?;
    Ok(referencing
        .into_iter()
        .map(|r| SearchHit {
            path: r.path,
            name: r.name,
            asset_type: r.asset_type,
            snippet: Some(format!("References {candidate_path}")),
            content: None,
            metadata: None,
            score: 1.0,
        })
        .collect())
}

fn search_external_actors(store: &Store, level: &str, limit: usize) -> Result<Vec<SearchHit>> {
    let fragment = format!("__ExternalActors__/{level}");
    let hits = store.find_by_path_containing(&fragment, limit)?;
    Ok(hits
        .into_iter()
        .map(|h| SearchHit {
            path: h.path,
            name: h.name,
            asset_type: h.asset_type,
            snippet: Some(format!("Placed in {level}")),
            content: None,
            metadata: None,
            score: 1.0,
        })
        .collect())
}
