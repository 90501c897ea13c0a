//! Post-processing shared by every mode (spec §4.7): asset-type filtering,
//! path dedupe, quality sort, intent-aware reranking, and full/summary
//! enrichment.

use std::collections::HashMap;

use serde_json::{Map, Value};
use ue_knowledge_core::Profile;
use ue_knowledge_store::Store;

use crate::error::Result;
use crate::types::{Detail, SearchHit, SearchMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intent {
    Blueprint,
    Widget,
    DataTable,
    Material,
    Interaction,
}

pub fn filter_asset_types(hits: Vec<SearchHit>, asset_types: &[String]) -> Vec<SearchHit> {
    if asset_types.is_empty() {
        return hits;
    }
    let wanted: Vec<String> = asset_types.iter().map(|t| t.to_ascii_lowercase()).collect();
    hits.into_iter()
        .filter(|h| h.asset_type.as_deref().is_some_and(|t| wanted.contains(&t.to_ascii_lowercase())))
        .collect()
}

/// `(score-as-ordered-int, has-known-type, has-snippet)`: the tie-break
/// used both for dedupe and for the final sort (spec §4.7).
fn quality_key(hit: &SearchHit) -> (i64, bool, bool) {
    let score_bits = (hit.score * 1_000_000.0).round() as i64;
    (score_bits, hit.asset_type.is_some(), hit.snippet.is_some())
}

pub fn dedupe_by_path(hits: Vec<SearchHit>) -> Vec<SearchHit> {
    let mut best: Vec<SearchHit> = Vec::new();
    let mut index_of: HashMap<String, usize> = HashMap::new();
    for hit in hits {
        if let Some(&i) = index_of.get(&hit.path) {
            if quality_key(&hit) > quality_key(&best[i]) {
                best[i] = hit;
            }
        } else {
            index_of.insert(hit.path.clone(), best.len());
            best.push(hit);
        }
    }
    best
}

pub fn sort_hits(mut hits: Vec<SearchHit>) -> Vec<SearchHit> {
    hits.sort_by(|a, b| quality_key(b).cmp(&quality_key(a)).then_with(|| a.name.cmp(&b.name)));
    hits
}

fn infer_intents(profile: &Profile, query: &str) -> Vec<Intent> {
    let lower = query.to_ascii_lowercase();
    let mut intents = Vec::new();
    if lower.contains("blueprint") || lower.split_whitespace().any(|t| t == "bp") {
        intents.push(Intent::Blueprint);
    }
    let tokens: Vec<&str> = lower.split_whitespace().collect();
    if profile.widget_rank_terms.iter().any(|term| {
        if term.len() <= 2 {
            tokens.contains(&term.as_str())
        } else {
            lower.contains(term.as_str())
        }
    }) {
        intents.push(Intent::Widget);
    }
    if lower.contains("datatable") || lower.contains("data table") || lower.contains("table") {
        intents.push(Intent::DataTable);
    }
    if lower.contains("material") {
        intents.push(Intent::Material);
    }
    if lower.contains("interact") {
        intents.push(Intent::Interaction);
    }
    intents
}

fn result_kind(asset_type: Option<&str>) -> Option<Intent> {
    let t = asset_type?;
    if t.eq_ignore_ascii_case("WidgetBlueprint") {
        Some(Intent::Widget)
    } else if t.eq_ignore_ascii_case("Blueprint") {
        Some(Intent::Blueprint)
    } else if t.eq_ignore_ascii_case("DataTable") {
        Some(Intent::DataTable)
    } else if t.to_ascii_lowercase().contains("material") {
        Some(Intent::Material)
    } else {
        None
    }
}

fn query_token_hits(query: &str, hit: &SearchHit) -> usize {
    let haystack = format!("{} {}", hit.name, hit.snippet.as_deref().unwrap_or_default()).to_ascii_lowercase();
    query.split_whitespace().filter(|t| t.len() > 2).filter(|t| haystack.contains(&t.to_ascii_lowercase())).count()
}

fn looks_low_info_blueprint(hit: &SearchHit) -> bool {
    if !hit.asset_type.as_deref().is_some_and(|t| t.eq_ignore_ascii_case("Blueprint")) {
        return false;
    }
    let text = hit.snippet.as_deref().unwrap_or_default();
    text.contains("Parent: Unknown")
        && !text.contains("Variables:")
        && !text.contains("Functions:")
        && !text.contains("Components:")
}

/// Intent-aware rerank for `semantic`/`name` modes: multiplicative
/// boosts/demerits followed by max-score normalization (spec §4.7).
pub fn rerank(profile: &Profile, mode: SearchMode, query: &str, mut hits: Vec<SearchHit>) -> Vec<SearchHit> {
    if !matches!(mode, SearchMode::Semantic | SearchMode::Name) {
        return hits;
    }
    let intents = infer_intents(profile, query);
    let mentions_save = query.to_ascii_lowercase().contains("save");

    for hit in &mut hits {
        let mut multiplier = 1.0_f32;
        let kind = result_kind(hit.asset_type.as_deref());

        if intents.contains(&Intent::Blueprint) && kind == Some(Intent::Blueprint) {
            multiplier *= 1.35;
        }
        if intents.contains(&Intent::Widget) && kind == Some(Intent::Widget) {
            multiplier *= 1.35;
        }
        if !mentions_save && hit.name.to_ascii_lowercase().contains("save") {
            multiplier *= 0.6;
        }
        if looks_low_info_blueprint(hit) {
            multiplier *= 0.6;
        }

        match query_token_hits(query, hit) {
            0 => multiplier *= 0.65,
            1 => {}
            _ => multiplier *= 1.1,
        }

        hit.score *= multiplier;
    }

    let max_score = hits.iter().map(|h| h.score).fold(0.0_f32, f32::max);
    if max_score > 0.0 {
        for hit in &mut hits {
            hit.score /= max_score;
        }
    }
    hits
}

fn merge_metadata(docs: &[ue_knowledge_store::SearchResult]) -> Map<String, Value> {
    let mut merged = Map::new();
    for doc in docs {
        for (key, value) in &doc.metadata {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// For narrow result sets (`name` mode; `semantic` with `<= 3` hits),
/// replace each hit's snippet with the full merged text across all doc
/// chunks sharing its path, and its metadata with the merged map (spec
/// §4.7). Returns the detail level actually applied.
pub fn enrich(store: &Store, mode: SearchMode, mut hits: Vec<SearchHit>) -> Result<(Vec<SearchHit>, Detail)> {
    let narrow = matches!(mode, SearchMode::Name) || (mode == SearchMode::Semantic && hits.len() <= 3);
    if !narrow {
        return Ok((hits, Detail::Summary));
    }
    for hit in &mut hits {
        let docs = store.get_docs_by_path(&hit.path)?;
        if docs.is_empty() {
            continue;
        }
        hit.content = Some(docs.iter().map(|d| d.text.as_str()).collect::<Vec<_>>().join("\n\n"));
        let merged = merge_metadata(&docs);
        if !merged.is_empty() {
            hit.metadata = Some(merged);
        }
    }
    Ok((hits, Detail::Full))
}
