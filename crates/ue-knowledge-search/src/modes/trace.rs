//! `trace` mode (spec §4.7): resolve a symbol to one or more asset paths
//! and build a system trace for each.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use ue_knowledge_core::Profile;
use ue_knowledge_store::{GraphEdge, Store};

use crate::error::Result;
use crate::types::{SearchHit, SystemTrace, TraceTarget};

const MAX_TARGETS: usize = 3;
const MAX_SUBLIST: usize = 25;
const OWNERSHIP_MAX_DEPTH: u32 = 4;

fn systems_talk_to_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^what\s+systems\s+does\s+(.+?)\s+talk\s+to\??$").unwrap())
}

fn how_does_work_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^how\s+does\s+(.+?)\s+work\??$").unwrap())
}

fn trace_verb_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^trace\s+(.+)$").unwrap())
}

/// Pull the asset/class token out of trace-trigger phrasing, falling back
/// to treating the whole query as a raw token.
#[must_use]
pub fn extract_target(query: &str) -> String {
    let trimmed = query.trim();
    for re in [systems_talk_to_regex(), how_does_work_regex(), trace_verb_regex()] {
        if let Some(caps) = re.captures(trimmed) {
            return caps[1].trim().to_string();
        }
    }
    trimmed.to_string()
}

/// Alias-probe and heuristic-prefix a bare token into candidate asset
/// paths, resolving up to `max` of them to backing rows (spec §4.7).
fn resolve_targets(store: &Store, profile: &Profile, token: &str, max: usize) -> Result<Vec<(String, String, Option<String>)>> {
    let mut candidates = vec![token.to_string()];
    for (from, to) in [("BP_", "B_"), ("B_", "BP_"), ("WBP_", "W_"), ("W_", "WBP_")] {
        if let Some(rest) = token.strip_prefix(from) {
            candidates.push(format!("{to}{rest}"));
        }
    }
    if !profile.widget_fallback_patterns.iter().any(|p| token.starts_with(p.as_str())) {
        for p in &profile.widget_fallback_patterns {
            candidates.push(format!("{p}{token}"));
        }
    }

    let mut resolved = Vec::new();
    let mut seen = HashSet::new();
    for candidate in candidates {
        if resolved.len() >= max {
            break;
        }
        let hit = if candidate.starts_with('/') {
            store.get_doc_by_path(&candidate)?.map(|d| (d.path, d.name, d.asset_type))
        } else {
            resolve_by_name(store, &candidate)?
        };
        if let Some((path, name, asset_type)) = hit {
            if seen.insert(path.clone()) {
                resolved.push((path, name, asset_type));
            }
        }
    }
    Ok(resolved)
}

fn resolve_by_name(store: &Store, name: &str) -> Result<Option<(String, String, Option<String>)>> {
    let matches = store.find_by_name_prefix(name, 5)?;
    if let Some(exact) = matches.iter().find(|m| m.name == name) {
        return Ok(Some((exact.path.clone(), exact.name.clone(), exact.asset_type.clone())));
    }
    Ok(matches.into_iter().next().map(|m| (m.path, m.name, m.asset_type)))
}

fn describe_target(to_id: &str) -> String {
    to_id.strip_prefix("asset:").unwrap_or(to_id).to_string()
}

fn dedupe_truncate(list: &mut Vec<String>, max: usize) {
    let mut seen = HashSet::new();
    list.retain(|s| seen.insert(s.clone()));
    list.truncate(max);
}

fn is_structural_edge(edge_type: &str) -> bool {
    matches!(
        edge_type,
        "inherits_from" | "adds_component" | "includes_action_set" | "uses_pawn_data" | "targets_actor" | "maps_input"
    )
}

fn score_incoming(edge: &GraphEdge) -> i32 {
    let mut score = 0;
    if is_structural_edge(&edge.edge_type) {
        score += 10;
    }
    if edge.from_id.contains("GameFeature") {
        score += 5;
    }
    score
}

/// Walk inbound edges upward from `start_doc_id`, at each step preferring
/// structural edges and GameFeature-related names, up to `max_depth`
/// (spec §4.7 `build_ownership_chain`).
fn build_ownership_chain(store: &Store, start_doc_id: &str, max_depth: u32) -> Result<Vec<String>> {
    let mut chain = Vec::new();
    let mut visited = HashSet::new();
    visited.insert(start_doc_id.to_string());
    let mut current = start_doc_id.to_string();

    for _ in 0..max_depth {
        let incoming = store.incoming_edges(&current)?;
        let next = incoming
            .iter()
            .filter(|e| !visited.contains(&e.from_id))
            .max_by_key(|e| score_incoming(e));
        let Some(edge) = next else { break };
        let Some((_, name, _)) = store.doc_brief(&edge.from_id)? else { break };
        chain.push(name);
        visited.insert(edge.from_id.clone());
        current = edge.from_id.clone();
    }
    Ok(chain)
}

fn build_system_trace(
    store: &Store,
    target_path: &str,
    target_name: &str,
    target_type: Option<String>,
) -> Result<SystemTrace> {
    let doc_id = format!("asset:{target_path}");
    let mut trace = SystemTrace {
        target: Some(TraceTarget {
            path: target_path.to_string(),
            name: target_name.to_string(),
            asset_type: target_type,
        }),
        ..SystemTrace::default()
    };

    for edge in store.outgoing_edges(&doc_id)? {
        if let Some(script) = edge.to_id.strip_prefix("script:") {
            trace.unresolved_script_refs.push(script.to_string());
        } else if let Some(class_name) = edge.to_id.strip_prefix("class:") {
            trace.systems.push(class_name.to_string());
        } else if matches!(edge.edge_type.as_str(), "registers_widget" | "uses_layout") {
            trace.visual_dependencies.push(describe_target(&edge.to_id));
        } else {
            trace.structural_dependencies.push(describe_target(&edge.to_id));
        }
    }

    let referencing = store.find_assets_referencing(target_path, MAX_SUBLIST)?;
    trace.inbound_references = referencing.into_iter().map(|r| r.path).collect();
    trace.ownership_chain = build_ownership_chain(store, &doc_id, OWNERSHIP_MAX_DEPTH)?;

    dedupe_truncate(&mut trace.systems, MAX_SUBLIST);
    dedupe_truncate(&mut trace.structural_dependencies, MAX_SUBLIST);
    dedupe_truncate(&mut trace.visual_dependencies, MAX_SUBLIST);
    dedupe_truncate(&mut trace.inbound_references, MAX_SUBLIST);
    dedupe_truncate(&mut trace.unresolved_script_refs, MAX_SUBLIST);

    Ok(trace)
}

pub fn search(store: &Store, profile: &Profile, query: &str, limit: usize) -> Result<(Vec<SearchHit>, Vec<SystemTrace>)> {
    let token = extract_target(query);
    let targets = resolve_targets(store, profile, &token, MAX_TARGETS)?;

    let mut hits = Vec::new();
    let mut traces = Vec::new();
    for (path, name, asset_type) in targets {
        let trace = build_system_trace(store, &path, &name, asset_type.clone())?;
        hits.push(SearchHit {
            path: path.clone(),
            name: name.clone(),
            asset_type,
            snippet: Some(format!("System trace for {name}")),
            content: None,
            metadata: None,
            score: 1.0,
        });
        traces.push(trace);
    }
    hits.truncate(limit);
    Ok((hits, traces))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use ue_knowledge_schema::{DocChunk, DocKind};

    #[test]
    fn extracts_target_from_trace_phrasings() {
        assert_eq!(extract_target("what systems does BP_Pistol talk to"), "BP_Pistol");
        assert_eq!(extract_target("how does BP_Pistol work"), "BP_Pistol");
        assert_eq!(extract_target("trace BP_Pistol"), "BP_Pistol");
    }

    #[test]
    fn builds_trace_with_systems_and_structural_split() {
        let store = Store::open_in_memory().unwrap();
        let mut typed = BTreeMap::new();
        typed.insert("class:ACharacter".to_string(), "inherits_from".to_string());
        typed.insert("asset:/Game/WBP_Healthbar".to_string(), "registers_widget".to_string());
        let doc = DocChunk::new(
            "asset:/Game/BP_Hero",
            DocKind::AssetSummary,
            "/Game/BP_Hero",
            "BP_Hero",
            "text",
            None,
            Some("Blueprint".to_string()),
        )
        .with_references(vec!["class:ACharacter".to_string(), "asset:/Game/WBP_Healthbar".to_string()])
        .with_typed_references(typed);
        store.upsert_doc(&doc, None, false).unwrap();

        let (hits, traces) = search(&store, &Profile::default(), "trace BP_Hero", 10).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(traces.len(), 1);
        let trace = &traces[0];
        assert_eq!(trace.systems, vec!["ACharacter".to_string()]);
        assert_eq!(trace.visual_dependencies, vec!["/Game/WBP_Healthbar".to_string()]);
    }

    #[test]
    fn bare_token_resolves_via_profile_widget_fallback_patterns() {
        let store = Store::open_in_memory().unwrap();
        let doc = DocChunk::new(
            "asset:/Game/BP_Turret",
            DocKind::AssetSummary,
            "/Game/BP_Turret",
            "BP_Turret",
            "text",
            None,
            Some("Blueprint".to_string()),
        );
        store.upsert_doc(&doc, None, false).unwrap();

        let mut profile = Profile::default();
        profile.widget_fallback_patterns = vec!["BP_".to_string()];

        let (hits, _) = search(&store, &profile, "trace Turret", 10).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].path, "/Game/BP_Turret");

        let empty_profile = Profile::default();
        let (no_hits, _) = search(&store, &empty_profile, "trace Turret", 10).unwrap();
        assert!(no_hits.is_empty());
    }
}
