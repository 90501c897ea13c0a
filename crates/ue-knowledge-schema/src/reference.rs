//! Reference-string normalization (spec §3.3).
//!
//! The external parser emits reference strings in several shapes; before any
//! of them touch the edges table they are canonicalized to one of:
//! - `asset:<game-path>`
//! - `class:<ClassName>`
//! - `script:<raw>` (unresolved `/Script/...` token, kept for
//!   `unresolved_script_refs` reporting in trace queries)

use serde::{Deserialize, Serialize};

/// A canonicalized reference target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalizedRef {
    Asset(String),
    Class(String),
    Script(String),
}

impl NormalizedRef {
    /// Render as the namespaced `doc_id`-style string stored in edges.
    #[must_use]
    pub fn as_id(&self) -> String {
        match self {
            Self::Asset(p) => format!("asset:{p}"),
            Self::Class(c) => format!("class:{c}"),
            Self::Script(s) => format!("script:{s}"),
        }
    }
}

/// Class-name prefixes the engine conventionally uses (`U`nreal object,
/// `A`ctor, `F`-struct, `E`num, `S`tatic, `I`nterface, `T`emplate).
const PREFIX_LETTERS: [char; 7] = ['U', 'A', 'F', 'E', 'S', 'I', 'T'];

/// Is `name`'s first two characters consistent with an already-prefixed
/// engine class name (spec §3.3's last bullet)?
#[must_use]
pub fn looks_already_prefixed(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let Some(second) = chars.next() else {
        return false;
    };
    PREFIX_LETTERS.contains(&first) && second.is_uppercase()
}

/// Generate `U<Name>`, `A<Name>`, ... candidate class names for a bare,
/// not-already-prefixed token, used by `resolve_cpp_sources` (spec §3.3,
/// §4.3).
#[must_use]
pub fn prefix_candidates(bare_name: &str) -> Vec<String> {
    if looks_already_prefixed(bare_name) {
        return vec![bare_name.to_string()];
    }
    PREFIX_LETTERS
        .iter()
        .map(|p| format!("{p}{bare_name}"))
        .collect()
}

fn is_plugin_path(s: &str) -> bool {
    s.starts_with('/') && !s.starts_with("/Script/") && !s.starts_with("/Game/")
}

fn strip_trailing_generated_class_suffix(path: &str) -> String {
    match path.rsplit_once('/') {
        Some((head, last)) => {
            if let Some(stripped) = last.strip_suffix("_C") {
                if !stripped.is_empty() {
                    return format!("{head}/{stripped}");
                }
            }
            path.to_string()
        }
        None => path.to_string(),
    }
}

/// Parse a UE object-reference tuple like `(/Script/Engine, Actor, )`:
/// return the bare class field if present, else fall through to whatever
/// `/Script/...` field exists.
fn parse_tuple(inner: &str) -> Option<NormalizedRef> {
    let fields: Vec<&str> = inner
        .trim_matches(|c| c == '(' || c == ')')
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect();

    let script_field = fields.iter().find(|f| f.starts_with("/Script/"));
    let bare_field = fields
        .iter()
        .find(|f| !f.starts_with('/') && Some(**f) != script_field.copied());

    if let Some(bare) = bare_field {
        return Some(NormalizedRef::Class((*bare).to_string()));
    }
    if let Some(script) = script_field {
        return normalize_reference(script);
    }
    None
}

/// Canonicalize a raw reference string per spec §3.3. Returns `None` only
/// for an empty/whitespace-only input.
#[must_use]
pub fn normalize_reference(raw: &str) -> Option<NormalizedRef> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if raw.starts_with('(') && raw.ends_with(')') {
        return parse_tuple(raw);
    }

    if let Some(rest) = raw.strip_prefix("/Script/") {
        return Some(match rest.split_once('.') {
            Some((_module, class)) => NormalizedRef::Class(strip_trailing_class_c(class)),
            None => NormalizedRef::Class(rest.to_string()),
        });
    }

    if raw.starts_with("/Game/") || is_plugin_path(raw) {
        let path_only = raw.split('.').next().unwrap_or(raw);
        let path_only = strip_trailing_generated_class_suffix(path_only);
        return Some(NormalizedRef::Asset(path_only));
    }

    // Bare token: already-prefixed class names pass through as class refs;
    // per spec §4.5 parent-class resolution rule 6, anything else still
    // resolves to a class reference as a fallback (candidate generation for
    // C++ lookup is a separate concern, see `prefix_candidates`).
    Some(NormalizedRef::Class(raw.to_string()))
}

fn strip_trailing_class_c(class: &str) -> String {
    class.strip_suffix("_C").unwrap_or(class).to_string()
}
