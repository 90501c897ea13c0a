//! `classify_query` (spec §4.6).

use crate::types::QueryType;

const EXACT_PATH_PREFIXES: [&str; 4] = ["/Game/", "/Script/", "/Source/", "/Plugins/"];
const EXACT_NAME_PREFIXES: [&str; 7] = ["BP_", "WBP_", "M_", "MI_", "MF_", "DT_", "T_"];
const EXACT_EXTENSIONS: [&str; 3] = [".uasset", ".h", ".cpp"];
const INTERROGATIVES: [&str; 10] = [
    "how", "what", "why", "where", "when", "which", "explain", "describe", "find", "show",
];

fn looks_like_cpp_token(query: &str) -> bool {
    let mut chars = query.chars();
    let Some(first) = chars.next() else { return false };
    let Some(second) = chars.next() else { return false };
    matches!(first, 'U' | 'A' | 'F' | 'E') && second.is_uppercase()
}

fn is_exact_pattern(query: &str) -> bool {
    EXACT_PATH_PREFIXES.iter().any(|p| query.starts_with(p))
        || EXACT_NAME_PREFIXES.iter().any(|p| query.starts_with(p))
        || EXACT_EXTENSIONS.iter().any(|ext| query.ends_with(ext))
        || query.contains("::")
        || looks_like_cpp_token(query)
}

fn contains_interrogative(query: &str) -> bool {
    let lower = query.to_ascii_lowercase();
    INTERROGATIVES.iter().any(|w| lower.split_whitespace().any(|token| token == *w))
}

/// Route a raw query string to `exact`, `semantic`, or `hybrid` (spec §4.6).
///
/// Short (1-2 token) non-interrogative queries and anything left over both
/// land on `hybrid`; the distinction in the source rule is about the exact
/// and semantic fast paths, not about carving out a third bucket.
#[must_use]
pub fn classify_query(query: &str) -> QueryType {
    let trimmed = query.trim();
    if is_exact_pattern(trimmed) {
        return QueryType::Exact;
    }
    if contains_interrogative(trimmed) {
        return QueryType::Semantic;
    }
    QueryType::Hybrid
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn game_path_is_exact() {
        assert_eq!(classify_query("/Game/Weapons/BP_Pistol"), QueryType::Exact);
    }

    #[test]
    fn asset_prefix_is_exact() {
        assert_eq!(classify_query("BP_Pistol"), QueryType::Exact);
    }

    #[test]
    fn cpp_token_is_exact() {
        assert_eq!(classify_query("ULyraCharacter"), QueryType::Exact);
    }

    #[test]
    fn double_colon_is_exact() {
        assert_eq!(classify_query("ALyraCharacter::BeginPlay"), QueryType::Exact);
    }

    #[test]
    fn interrogative_is_semantic() {
        assert_eq!(classify_query("how does the damage system work"), QueryType::Semantic);
    }

    #[test]
    fn short_query_is_hybrid() {
        assert_eq!(classify_query("pistol damage"), QueryType::Hybrid);
    }

    #[test]
    fn long_non_interrogative_is_hybrid() {
        assert_eq!(classify_query("pistol reload animation montage blend"), QueryType::Hybrid);
    }

    proptest! {
        /// Spec §8 property 10: classification is a pure function of the
        /// query string, so the same query always lands on the same mode.
        #[test]
        fn classify_query_is_stable(query in "[A-Za-z0-9_/. :]{0,40}") {
            let first = classify_query(&query);
            let second = classify_query(&query);
            prop_assert_eq!(first, second);
        }
    }
}
