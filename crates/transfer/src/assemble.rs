//! Receiver-side chunk assembly.
//!
//! The write policy is driven solely by the chunk index:
//!
//! | index | mode                | effect                                   |
//! |-------|---------------------|------------------------------------------|
//! | 0     | [`WriteMode::Whole`]  | replace destination atomically           |
//! | 1     | [`WriteMode::Fresh`]  | delete destination, then append          |
//! | ≥ 2   | [`WriteMode::Append`] | append to destination                    |
//!
//! Appends are not idempotent: delivering the same index twice writes its
//! bytes twice unless a [`SequenceLedger`] is attached.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::TransferError;
use crate::sequence::SequenceLedger;

/// How a received payload is applied to its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Whole-file upload: the payload is the complete file.
    Whole,
    /// First chunk of a multi-chunk upload.
    Fresh,
    /// Any later chunk.
    Append,
}

impl WriteMode {
    /// Maps a chunk index to its write mode.
    pub fn from_index(index: u64) -> Self {
        match index {
            0 => Self::Whole,
            1 => Self::Fresh,
            _ => Self::Append,
        }
    }
}

/// Applies received payloads to destination files.
#[derive(Debug, Default)]
pub struct ChunkAssembler {
    ledger: Option<SequenceLedger>,
}

impl ChunkAssembler {
    /// Creates an assembler that trusts the sender's ordering.
    pub fn new() -> Self {
        Self { ledger: None }
    }

    /// Creates an assembler that rejects duplicate or skipped indices.
    pub fn with_sequence_check() -> Self {
        Self {
            ledger: Some(SequenceLedger::new()),
        }
    }

    /// Writes `data` to `dest` according to `index`.
    ///
    /// The parent directory must already exist. With sequence checking the
    /// index is claimed before the write and released again if it fails.
    /// Nothing on disk is rolled back; earlier appends for the same
    /// destination stay in place.
    pub async fn write(
        &self,
        dest: &Path,
        index: u64,
        data: &[u8],
    ) -> Result<WriteMode, TransferError> {
        let claim = match &self.ledger {
            Some(ledger) => Some((ledger, ledger.try_advance(dest, index)?)),
            None => None,
        };

        let mode = WriteMode::from_index(index);
        let result = apply(dest, mode, data).await;
        if let (Err(_), Some((ledger, previous))) = (&result, claim) {
            ledger.rollback(dest, index, previous);
        }
        result?;

        debug!(dest = %dest.display(), index, bytes = data.len(), ?mode, "chunk written");
        Ok(mode)
    }
}

async fn apply(dest: &Path, mode: WriteMode, data: &[u8]) -> Result<(), TransferError> {
    match mode {
        WriteMode::Whole => replace(dest, data).await,
        WriteMode::Fresh => {
            remove_if_exists(dest).await?;
            append(dest, data).await
        }
        WriteMode::Append => append(dest, data).await,
    }
}

/// Writes to a sibling temp file and renames it over `dest`.
async fn replace(dest: &Path, data: &[u8]) -> Result<(), TransferError> {
    let tmp = temp_sibling(dest)?;
    if let Err(e) = tokio::fs::write(&tmp, data).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    if let Err(e) = tokio::fs::rename(&tmp, dest).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    Ok(())
}

async fn append(dest: &Path, data: &[u8]) -> Result<(), TransferError> {
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dest)
        .await?;
    file.write_all(data).await?;
    file.flush().await?;
    Ok(())
}

async fn remove_if_exists(path: &Path) -> Result<(), TransferError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn temp_sibling(dest: &Path) -> Result<PathBuf, TransferError> {
    let name = dest
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| TransferError::InvalidPath(dest.display().to_string()))?;
    Ok(dest.with_file_name(format!(".{name}.{}.part", uuid::Uuid::new_v4().simple())))
}
