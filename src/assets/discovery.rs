//! Asset root discovery.
//!
//! Search order when no root is configured:
//! 1. `dist/` next to the executable
//! 2. `dist/` in the executable's parent directory
//! 3. `dist/` in the current working directory
//!
//! If nothing is found the server runs in proxy-only mode.

use std::path::{Path, PathBuf};

/// Directory name produced by the front-end build.
pub const DIST_DIR: &str = "dist";

/// Candidate roots in search order.
pub fn default_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        candidates.push(exe_dir.join(DIST_DIR));
        if let Some(parent) = exe_dir.parent() {
            candidates.push(parent.join(DIST_DIR));
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join(DIST_DIR));
    }

    candidates
}

/// Pick the asset root.
///
/// An explicit root wins when it is a directory; an explicit root that is
/// missing does not fall through to the search, since the operator asked for
/// that directory specifically.
pub fn discover_asset_root(explicit: Option<&Path>, candidates: &[PathBuf]) -> Option<PathBuf> {
    if let Some(root) = explicit {
        if root.is_dir() {
            return Some(root.to_path_buf());
        }
        tracing::warn!(path = %root.display(), "Configured asset directory not found");
        return None;
    }

    let found = candidates.iter().find(|p| p.is_dir()).cloned();
    if found.is_none() {
        tracing::warn!(
            searched = ?candidates,
            "Asset directory not found. Static file serving disabled; proxy mode is still active"
        );
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_existing_candidate_wins() {
        let sibling = tempfile::tempdir().unwrap();
        let parent = tempfile::tempdir().unwrap();
        let missing = sibling.path().join("nope");

        let candidates = vec![missing, parent.path().to_path_buf(), sibling.path().to_path_buf()];
        assert_eq!(
            discover_asset_root(None, &candidates),
            Some(parent.path().to_path_buf())
        );
    }

    #[test]
    fn test_explicit_root() {
        let dir = tempfile::tempdir().unwrap();
        let other = tempfile::tempdir().unwrap();
        let candidates = vec![other.path().to_path_buf()];

        assert_eq!(
            discover_asset_root(Some(dir.path()), &candidates),
            Some(dir.path().to_path_buf())
        );
        assert_eq!(
            discover_asset_root(Some(&dir.path().join("missing")), &candidates),
            None
        );
    }

    #[test]
    fn test_nothing_found() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(discover_asset_root(None, &[dir.path().join("dist")]), None);
    }
}
