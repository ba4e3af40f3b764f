// src/core/workspace.rs

//! Workspace binding: which folder owns the panels.

use crate::constants::PROJECT_FILENAME;
use std::path::{Path, PathBuf};

/// Returns the first folder in `folders` that directly contains the project
/// manifest, canonicalized. Order matters: callers pass their folder list in
/// priority order. `None` means nothing qualifies and the caller stays
/// inert.
pub fn find_project_root(folders: &[PathBuf]) -> Option<PathBuf> {
    folders
        .iter()
        .find(|folder| folder.join(PROJECT_FILENAME).is_file())
        .map(|folder| dunce::canonicalize(folder).unwrap_or_else(|_| folder.clone()))
}

/// The folder list for a CLI invocation: the working directory first, then
/// its ancestors, nearest first.
pub fn default_folders() -> Vec<PathBuf> {
    let Ok(cwd) = std::env::current_dir() else {
        return Vec::new();
    };
    cwd.ancestors().map(Path::to_path_buf).collect()
}

/// The manifest path inside a bound root.
pub fn manifest_path(root: &Path) -> PathBuf {
    root.join(PROJECT_FILENAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn picks_the_first_qualifying_folder() {
        let dir_a = tempfile::tempdir().unwrap();
        let dir_b = tempfile::tempdir().unwrap();
        fs::write(dir_b.path().join(PROJECT_FILENAME), "develop:\n").unwrap();

        let folders = vec![dir_a.path().to_path_buf(), dir_b.path().to_path_buf()];
        let root = find_project_root(&folders).unwrap();
        assert_eq!(root, dunce::canonicalize(dir_b.path()).unwrap());
    }

    #[test]
    fn no_manifest_anywhere_means_unbound() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_project_root(&[dir.path().to_path_buf()]).is_none());
    }

    #[test]
    fn a_directory_named_like_the_manifest_does_not_qualify() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(PROJECT_FILENAME)).unwrap();
        assert!(find_project_root(&[dir.path().to_path_buf()]).is_none());
    }
}
