//! Directory listing for the `list` route.

use std::path::Path;
use std::time::SystemTime;

use crate::FileOpsError;

/// A directory entry as shown by the listing.
#[derive(Debug, Clone, PartialEq)]
pub struct DirEntry {
    /// Entry name (not full path).
    pub name: String,
    /// Size in bytes as reported by the filesystem.
    pub size: u64,
    /// Last modification time, if the platform reports one.
    pub modified: Option<SystemTime>,
    /// Whether this entry is a directory.
    pub is_dir: bool,
}

/// Lists the contents of a directory, sorted by name.
///
/// Files and directories are both returned; hidden entries included.
/// Entries whose metadata cannot be read are skipped.
pub fn list_directory(path: &Path) -> Result<Vec<DirEntry>, FileOpsError> {
    if !path.is_dir() {
        return Err(FileOpsError::NotADirectory(path.display().to_string()));
    }

    let mut result: Vec<DirEntry> = std::fs::read_dir(path)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let metadata = entry.metadata().ok()?;
            Some(DirEntry {
                name: entry.file_name().to_string_lossy().to_string(),
                size: metadata.len(),
                modified: metadata.modified().ok(),
                is_dir: metadata.is_dir(),
            })
        })
        .collect();

    result.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_files_and_dirs_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path();

        std::fs::create_dir(base.join("beta")).unwrap();
        std::fs::write(base.join("alpha.txt"), "12345").unwrap();
        std::fs::write(base.join(".hidden"), "").unwrap();

        let entries = list_directory(base).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec![".hidden", "alpha.txt", "beta"]);

        assert_eq!(entries[1].size, 5);
        assert!(!entries[1].is_dir);
        assert!(entries[2].is_dir);
        assert!(entries[1].modified.is_some());
    }

    #[test]
    fn nonexistent_directory() {
        let result = list_directory(Path::new("/definitely/not/real"));
        assert!(matches!(result, Err(FileOpsError::NotADirectory(_))));
    }

    #[test]
    fn file_is_not_a_directory() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let err = list_directory(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn empty_directory() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(list_directory(tmp.path()).unwrap().is_empty());
    }
}
