//! Root-relative path resolution.

use std::path::{Component, Path, PathBuf};

use crate::FileOpsError;

/// Resolves a request path against the served `root`.
///
/// Leading slashes are ignored, so `/docs/a.txt` and `docs/a.txt` name the
/// same file. `.` components are dropped. Parent traversal (`..`) and
/// platform prefixes are refused. An empty path resolves to `root` itself.
pub fn resolve_under_root(root: &Path, request: &str) -> Result<PathBuf, FileOpsError> {
    let trimmed = request.trim_start_matches(['/', '\\']);

    let mut resolved = root.to_path_buf();
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                return Err(FileOpsError::InvalidPath(format!(
                    "parent directory traversal not allowed: {request}"
                )));
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(FileOpsError::InvalidPath(format!(
                    "absolute path not allowed: {request}"
                )));
            }
        }
    }

    Ok(resolved)
}

/// Creates `path` and any missing parents.
pub fn ensure_dir(path: &Path) -> Result<(), FileOpsError> {
    std::fs::create_dir_all(path)?;
    Ok(())
}
