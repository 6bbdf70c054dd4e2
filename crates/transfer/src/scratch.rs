use std::path::{Path, PathBuf};

use crate::TransferError;

/// Directory name of the scratch area under the system temp dir.
pub const SCRATCH_DIR_NAME: &str = "cmdfiles";

/// Persisted endpoint configuration, the only entry that survives a purge.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Process-local scratch directory holding chunk artifacts and the client
/// configuration file.
///
/// Consumers remove artifacts once they are sent. [`purge`](Self::purge)
/// clears everything but the configuration at process start, so a crashed
/// transfer leaves residue only until the next run.
#[derive(Debug, Clone)]
pub struct ScratchArea {
    root: PathBuf,
}

impl ScratchArea {
    /// Default location: `$TMPDIR/cmdfiles`.
    pub fn default_root() -> PathBuf {
        std::env::temp_dir().join(SCRATCH_DIR_NAME)
    }

    /// Opens (creating if needed) the scratch area at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, TransferError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Removes every entry except the configuration file.
    ///
    /// Returns the number of entries removed. Entries that vanish
    /// concurrently are ignored.
    pub fn purge(&self) -> Result<usize, TransferError> {
        let mut removed = 0;
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_name() == CONFIG_FILE_NAME {
                continue;
            }
            let path = entry.path();
            let result = if entry.file_type()?.is_dir() {
                std::fs::remove_dir_all(&path)
            } else {
                std::fs::remove_file(&path)
            };
            match result {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        if removed > 0 {
            tracing::debug!(root = %self.root.display(), removed, "purged scratch area");
        }
        Ok(removed)
    }

    /// Root directory of the scratch area.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the persisted endpoint configuration.
    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    /// Path of a chunk artifact: `{transfer_id}-{index}_{basename}`.
    pub fn artifact_path(&self, transfer_id: &str, index: u64, basename: &str) -> PathBuf {
        self.root.join(format!("{transfer_id}-{index}_{basename}"))
    }
}
