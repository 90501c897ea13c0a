//! One embedded database per project, filename derived from the project
//! name (spec §6.2). The CLI and MCP binaries both call [`derive_db_path`]
//! instead of asking the caller to name the file themselves.

use std::path::{Path, PathBuf};

const DB_DIR: &str = ".ue_knowledge";

/// Lowercase, ASCII-alphanumeric-and-dash slug of `value`, collapsing any
/// run of other characters to a single `-` and trimming leading/trailing
/// dashes. Mirrors the project-name slugging used elsewhere in the corpus
/// for deriving filesystem-safe identifiers from arbitrary project names.
fn slugify(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut last_was_dash = false;
    for b in value.trim().bytes() {
        let lower = b.to_ascii_lowercase();
        if lower.is_ascii_alphanumeric() {
            out.push(lower as char);
            last_was_dash = false;
        } else if !out.is_empty() && !last_was_dash {
            out.push('-');
            last_was_dash = true;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    if out.is_empty() {
        "project".to_string()
    } else {
        out
    }
}

/// `<project_root>/.ue_knowledge/<slugified project name>.sqlite3`.
///
/// The project name is the root directory's own name (an Unreal project
/// root is always named after the project, e.g. `MyGame/MyGame.uproject`),
/// so no `.uproject` file needs to be located or parsed just to name the
/// database file.
#[must_use]
pub fn derive_db_path(project_root: &Path) -> PathBuf {
    let project_name = project_root
        .file_name()
        .and_then(|n| n.to_str())
        .map_or_else(|| "project".to_string(), slugify);
    project_root.join(DB_DIR).join(format!("{project_name}.sqlite3"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_sqlite_path_under_dotdir() {
        let path = derive_db_path(Path::new("/home/dev/My Cool Game"));
        assert_eq!(path, PathBuf::from("/home/dev/My Cool Game/.ue_knowledge/my-cool-game.sqlite3"));
    }

    #[test]
    fn falls_back_to_project_when_root_has_no_file_name() {
        let path = derive_db_path(Path::new("/"));
        assert_eq!(path, PathBuf::from("/.ue_knowledge/project.sqlite3"));
    }
}
