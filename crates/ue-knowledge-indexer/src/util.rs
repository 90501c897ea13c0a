//! Small shared helpers used across pipeline phases.

use std::path::Path;

#[must_use]
pub fn name_from_path(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map_or_else(|| path.to_string(), |s| s.to_string_lossy().to_string())
}
