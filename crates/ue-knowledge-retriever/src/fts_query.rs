//! `prepare_fts_query` (spec §4.6): turn a free-text query into FTS5 MATCH
//! syntax without ever handing the engine an unbalanced quote or a bare
//! operator.

const FTS_META_CHARS: [char; 6] = ['"', '(', ')', ':', '^', '*'];

fn strip_meta_chars(token: &str) -> String {
    token.chars().filter(|c| !FTS_META_CHARS.contains(c)).collect()
}

fn is_game_path_token(token: &str) -> bool {
    token.starts_with("/Game/") || token.starts_with("/Script/")
}

/// Build an FTS5 `MATCH` expression: `/Game/` and `/Script/` paths are
/// quoted as phrases (they contain `/` and other FTS5-unsafe characters),
/// everything else is OR-joined as a word-prefix term.
#[must_use]
pub fn prepare_fts_query(query: &str) -> String {
    let mut clauses = Vec::new();
    for raw_token in query.split_whitespace() {
        if is_game_path_token(raw_token) {
            let escaped = raw_token.replace('"', "");
            clauses.push(format!("\"{escaped}\""));
            continue;
        }
        let cleaned = strip_meta_chars(raw_token);
        if cleaned.is_empty() {
            continue;
        }
        clauses.push(format!("{cleaned}*"));
    }
    clauses.join(" OR ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_words_become_prefix_or() {
        assert_eq!(prepare_fts_query("pistol damage"), "pistol* OR damage*");
    }

    #[test]
    fn game_path_is_quoted_as_phrase() {
        assert_eq!(prepare_fts_query("/Game/Weapons/BP_Pistol"), "\"/Game/Weapons/BP_Pistol\"");
    }

    #[test]
    fn meta_characters_are_stripped() {
        assert_eq!(prepare_fts_query("foo(bar)\"baz\""), "foobarbaz*");
    }

    #[test]
    fn mixed_path_and_words() {
        let result = prepare_fts_query("/Script/Engine.Actor damage");
        assert_eq!(result, "\"/Script/Engine.Actor\" OR damage*");
    }

    #[test]
    fn empty_query_yields_empty_string() {
        assert_eq!(prepare_fts_query("   "), "");
    }
}
