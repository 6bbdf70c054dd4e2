//! Chunked file transfer engine.
//!
//! Splits oversized files into bounded, sequentially numbered chunk
//! artifacts on the sending side and reassembles them append-only on the
//! receiving side. Every stage is connected by a bounded channel so that
//! memory use stays proportional to `chunk_size * depth`, never to the
//! size of the file.

mod assemble;
mod pipeline;
mod progress;
mod scratch;
mod sequence;
mod splitter;
mod types;
mod validation;

pub use assemble::{ChunkAssembler, WriteMode};
pub use pipeline::{ChunkPipeline, channel, read_full, spawn_reader};
pub use progress::{ProgressMeter, TransferProgress};
pub use scratch::{CONFIG_FILE_NAME, SCRATCH_DIR_NAME, ScratchArea};
pub use sequence::SequenceLedger;
pub use splitter::Splitter;
pub use types::{ChunkArtifact, TransferOptions};
pub use validation::validate_file_name;

/// Errors produced by the transfer crate.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("chunk out of sequence for {path}: expected {expected}, got {got}")]
    OutOfSequence {
        path: String,
        expected: u64,
        got: u64,
    },
}
