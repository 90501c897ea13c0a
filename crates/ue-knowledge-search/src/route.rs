//! Auto-routing a raw query string to a [`SearchMode`] (spec §4.7).

use std::sync::OnceLock;

use regex::Regex;

use crate::types::SearchMode;

const KNOWN_ASSET_PREFIXES: [&str; 7] = ["BP_", "WBP_", "M_", "MI_", "MF_", "DT_", "T_"];

fn inherits_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(inherits from|subclasses of|children of|classes extending)\s+(.+)").unwrap()
    })
}

fn trace_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(what systems does|how does|trace)\s+").unwrap())
}

fn dotted_pascal_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9]*(\.[A-Za-z0-9]+){1,}$").unwrap())
}

/// Auto-route `query` per spec §4.7's bullet list, in order.
#[must_use]
pub fn route(query: &str) -> SearchMode {
    let trimmed = query.trim();

    if trimmed.starts_with("tag:") {
        return SearchMode::Tags;
    }
    if inherits_regex().is_match(trimmed) {
        return SearchMode::Inherits;
    }
    if trace_regex().is_match(trimmed) {
        return SearchMode::Trace;
    }
    if trimmed.starts_with('/') && !trimmed.starts_with("/Script/") {
        return SearchMode::Name;
    }
    if KNOWN_ASSET_PREFIXES.iter().any(|p| trimmed.starts_with(p)) {
        return SearchMode::Name;
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.contains("where") && (lower.contains("used") || lower.contains("placed")) {
        return SearchMode::Refs;
    }
    if dotted_pascal_regex().is_match(trimmed) {
        return SearchMode::Tags;
    }
    SearchMode::Semantic
}

/// Extract the target phrase from an `inherits`-routed query (everything
/// after the matched trigger phrase).
#[must_use]
pub fn extract_inherits_target(query: &str) -> Option<String> {
    inherits_regex()
        .captures(query.trim())
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str().trim().trim_end_matches('?').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_prefix_routes_to_tags() {
        assert_eq!(route("tag:Weapon.Pistol"), SearchMode::Tags);
    }

    #[test]
    fn inherits_phrasing_routes_to_inherits() {
        assert_eq!(route("what inherits from ALyraCharacter"), SearchMode::Inherits);
        assert_eq!(extract_inherits_target("what inherits from ALyraCharacter").as_deref(), Some("ALyraCharacter"));
    }

    #[test]
    fn trace_phrasing_routes_to_trace() {
        assert_eq!(route("how does BP_Pistol work"), SearchMode::Trace);
        assert_eq!(route("trace BP_Pistol"), SearchMode::Trace);
    }

    #[test]
    fn game_path_routes_to_name() {
        assert_eq!(route("/Game/Weapons/BP_Pistol"), SearchMode::Name);
    }

    #[test]
    fn script_path_does_not_route_to_name() {
        assert_eq!(route("/Script/Engine.Actor"), SearchMode::Semantic);
    }

    #[test]
    fn asset_prefix_routes_to_name() {
        assert_eq!(route("BP_Pistol"), SearchMode::Name);
    }

    #[test]
    fn where_used_routes_to_refs() {
        assert_eq!(route("where is BP_Pistol used"), SearchMode::Refs);
    }

    #[test]
    fn dotted_pascal_routes_to_tags() {
        assert_eq!(route("Weapon.Pistol.Damage"), SearchMode::Tags);
    }

    #[test]
    fn default_routes_to_semantic() {
        assert_eq!(route("how do weapons deal damage"), SearchMode::Semantic);
    }
}
