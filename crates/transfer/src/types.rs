use std::path::PathBuf;

use cmdfiles_protocol::constants::{CLIENT_MAX_UPLOAD_SIZE, PIPELINE_DEPTH};

/// One chunk of a split file, materialized in the scratch area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkArtifact {
    /// Identifier shared by every chunk of one transfer.
    pub transfer_id: String,
    /// 1-based position of this chunk in the source file.
    pub index: u64,
    /// Location of the artifact on disk.
    pub path: PathBuf,
    /// Payload length in bytes.
    pub len: usize,
}

/// Tunables for splitting and streaming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferOptions {
    /// Maximum payload per chunk.
    pub chunk_size: usize,
    /// Files of at least this size are sent in chunks; smaller ones in one
    /// request.
    pub threshold: u64,
    /// Depth of the bounded reader/writer channel.
    pub pipeline_depth: usize,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            chunk_size: CLIENT_MAX_UPLOAD_SIZE,
            threshold: CLIENT_MAX_UPLOAD_SIZE as u64,
            pipeline_depth: PIPELINE_DEPTH,
        }
    }
}

impl TransferOptions {
    /// Returns `true` if a file of `size` bytes must be split.
    pub fn is_chunked(&self, size: u64) -> bool {
        size >= self.threshold
    }

    /// Number of chunks a file of `size` bytes is split into.
    pub fn chunk_count(&self, size: u64) -> u64 {
        size.div_ceil(self.chunk_size.max(1) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_wire_constants() {
        let opts = TransferOptions::default();
        assert_eq!(opts.chunk_size, 5 * 1024 * 1024);
        assert_eq!(opts.threshold, 5 * 1024 * 1024);
        assert_eq!(opts.pipeline_depth, 5);
    }

    #[test]
    fn threshold_is_inclusive() {
        let opts = TransferOptions {
            chunk_size: 10,
            threshold: 10,
            pipeline_depth: 1,
        };
        assert!(!opts.is_chunked(9));
        assert!(opts.is_chunked(10));
        assert!(opts.is_chunked(11));
    }

    #[test]
    fn chunk_count_rounds_up() {
        let opts = TransferOptions {
            chunk_size: 5,
            threshold: 5,
            pipeline_depth: 1,
        };
        assert_eq!(opts.chunk_count(0), 0);
        assert_eq!(opts.chunk_count(5), 1);
        assert_eq!(opts.chunk_count(6), 2);
        assert_eq!(opts.chunk_count(12), 3);
    }
}
