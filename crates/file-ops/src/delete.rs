//! Recursive deletion under the served root.

use std::path::{Path, PathBuf};

use crate::FileOpsError;
use crate::resolve::resolve_under_root;

/// Deletes `request` (a file or a whole directory tree) under `root`.
///
/// Safety checks:
/// 1. The path must stay inside `root` (no `..`).
/// 2. The path must name something below `root`, never `root` itself.
///
/// A path that does not exist is not an error. Returns the resolved path.
pub fn delete_path(root: &Path, request: &str) -> Result<PathBuf, FileOpsError> {
    let target = resolve_under_root(root, request)?;
    if target == root {
        return Err(FileOpsError::InvalidPath(format!(
            "refusing to delete the served root: {request}"
        )));
    }

    let result = match std::fs::symlink_metadata(&target) {
        Ok(meta) if meta.is_dir() => std::fs::remove_dir_all(&target),
        Ok(_) => std::fs::remove_file(&target),
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => {
            tracing::info!(path = %target.display(), "deleted");
            Ok(target)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %target.display(), "delete target already absent");
            Ok(target)
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deletes_single_file() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("a.txt");
        std::fs::write(&file, b"data").unwrap();

        let deleted = delete_path(tmp.path(), "a.txt").unwrap();
        assert_eq!(deleted, file);
        assert!(!file.exists());
    }

    #[test]
    fn deletes_directory_recursively() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("backups").join("2024");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("db.tar"), b"x").unwrap();

        delete_path(tmp.path(), "/backups").unwrap();
        assert!(!tmp.path().join("backups").exists());
        assert!(tmp.path().exists());
    }

    #[test]
    fn missing_target_is_ok() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(delete_path(tmp.path(), "ghost.bin").is_ok());
    }

    #[test]
    fn refuses_root() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("keep.txt"), b"x").unwrap();

        assert!(delete_path(tmp.path(), "").is_err());
        assert!(delete_path(tmp.path(), "/").is_err());
        assert!(delete_path(tmp.path(), ".").is_err());
        assert!(tmp.path().join("keep.txt").exists());
    }

    #[test]
    fn refuses_traversal() {
        let outer = tempfile::tempdir().unwrap();
        let root = outer.path().join("public");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(outer.path().join("secret"), b"x").unwrap();

        let result = delete_path(&root, "../secret");
        assert!(matches!(result, Err(FileOpsError::InvalidPath(_))));
        assert!(outer.path().join("secret").exists());
    }
}
