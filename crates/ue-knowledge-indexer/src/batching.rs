//! Shared batch-splitting helper (spec §4.5 Phase 2: "batch_size, default
//! 500, clamped to 1..2000").

use std::path::PathBuf;

#[must_use]
pub fn chunk_paths(paths: &[PathBuf], batch_size: usize) -> Vec<Vec<PathBuf>> {
    let batch_size = batch_size.clamp(1, 2000);
    paths.chunks(batch_size).map(<[PathBuf]>::to_vec).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_into_capped_chunks() {
        let paths: Vec<PathBuf> = (0..5).map(|i| PathBuf::from(format!("{i}"))).collect();
        let chunks = chunk_paths(&paths, 2);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 2);
        assert_eq!(chunks[2].len(), 1);
    }

    #[test]
    fn batch_size_is_clamped() {
        let paths: Vec<PathBuf> = (0..3).map(|i| PathBuf::from(format!("{i}"))).collect();
        assert_eq!(chunk_paths(&paths, 0).len(), 3);
        assert_eq!(chunk_paths(&paths, 5000).len(), 1);
    }
}
