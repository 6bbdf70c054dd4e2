use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::TransferError;

/// Tracks the last chunk index claimed for each destination (thread-safe).
///
/// Only consulted when the receiver runs with sequence checking enabled.
/// Index 1 always starts a new run; index `n > 1` is accepted only if
/// `n - 1` was the last index recorded for the same destination.
#[derive(Debug, Default)]
pub struct SequenceLedger {
    last: Mutex<HashMap<PathBuf, u64>>,
}

impl SequenceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks that `index` may be written to `dest` next and claims it in
    /// the same critical section, so two deliveries of one index cannot
    /// both pass.
    ///
    /// Returns the previously claimed index, to be handed back to
    /// [`rollback`](Self::rollback) if the write fails. Index 0 (whole file)
    /// forgets `dest`.
    pub fn try_advance(&self, dest: &Path, index: u64) -> Result<u64, TransferError> {
        let mut last = self.lock();
        let previous = last.get(dest).copied().unwrap_or(0);
        if index > 1 && previous + 1 != index {
            return Err(TransferError::OutOfSequence {
                path: dest.display().to_string(),
                expected: previous + 1,
                got: index,
            });
        }
        set(&mut last, dest, index);
        Ok(previous)
    }

    /// Releases a claim made by [`try_advance`](Self::try_advance) whose
    /// write failed. Ignored if `dest` has moved on since.
    pub fn rollback(&self, dest: &Path, index: u64, previous: u64) {
        let mut last = self.lock();
        if last.get(dest).copied().unwrap_or(0) == index {
            set(&mut last, dest, previous);
        }
    }

    #[cfg(test)]
    fn last_index(&self, dest: &Path) -> u64 {
        self.lock().get(dest).copied().unwrap_or(0)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, u64>> {
        // A poisoned map still holds consistent u64 entries.
        self.last.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn set(last: &mut HashMap<PathBuf, u64>, dest: &Path, index: u64) {
    if index == 0 {
        last.remove(dest);
    } else {
        last.insert(dest.to_path_buf(), index);
    }
}
