use std::path::Path;

use bytes::Bytes;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::pipeline::{self, ChunkPipeline};
use crate::scratch::ScratchArea;
use crate::types::ChunkArtifact;
use crate::{TransferError, TransferOptions};

/// Splits a source file into numbered chunk artifacts.
///
/// The source is read once, front to back, through a bounded
/// [`pipeline`](crate::spawn_reader). Each chunk is written to the scratch
/// area before it is handed downstream, so at most `pipeline_depth` chunks
/// are buffered in memory at any time.
pub struct Splitter {
    scratch: ScratchArea,
    chunk_size: usize,
    depth: usize,
}

impl Splitter {
    /// Creates a splitter writing artifacts into `scratch`.
    pub fn new(scratch: ScratchArea, options: &TransferOptions) -> Self {
        Self {
            scratch,
            chunk_size: options.chunk_size.max(1),
            depth: options.pipeline_depth,
        }
    }

    /// Starts splitting `source` and returns the artifact sequence.
    ///
    /// Indices start at 1 and all artifacts share one freshly generated
    /// transfer id. The sequence is lazy: the producer stalls once the
    /// consumer falls `pipeline_depth` artifacts behind. A read or write
    /// failure is delivered as the final `Err` item.
    pub async fn split(
        &self,
        source: &Path,
    ) -> Result<ChunkPipeline<Result<ChunkArtifact, TransferError>>, TransferError> {
        let basename = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                TransferError::InvalidPath(format!("no file name in {}", source.display()))
            })?
            .to_string();

        let file = tokio::fs::File::open(source).await?;
        let transfer_id = uuid::Uuid::new_v4().to_string();

        info!(
            transfer_id = %transfer_id,
            source = %source.display(),
            chunk_size = self.chunk_size,
            "splitting file"
        );

        let mut reads = pipeline::spawn_reader(file, self.chunk_size, self.depth);
        let (tx, artifacts) = pipeline::channel(self.depth);
        let scratch = self.scratch.clone();

        tokio::spawn(async move {
            let mut index = 0u64;
            while let Some(read) = reads.recv().await {
                let item = match read {
                    Ok(bytes) => {
                        index += 1;
                        write_artifact(&scratch, &transfer_id, index, &basename, bytes).await
                    }
                    Err(e) => Err(TransferError::Io(e)),
                };
                let failed = item.is_err();
                if let Err(mpsc::error::SendError(unsent)) = tx.send(item).await {
                    // Consumer is gone; nobody else will remove this one.
                    if let Ok(artifact) = unsent {
                        let _ = tokio::fs::remove_file(&artifact.path).await;
                    }
                    debug!(transfer_id = %transfer_id, index, "artifact consumer dropped");
                    break;
                }
                if failed {
                    break;
                }
            }
            debug!(transfer_id = %transfer_id, chunks = index, "splitter finished");
        });

        Ok(artifacts)
    }
}

async fn write_artifact(
    scratch: &ScratchArea,
    transfer_id: &str,
    index: u64,
    basename: &str,
    bytes: Bytes,
) -> Result<ChunkArtifact, TransferError> {
    let path = scratch.artifact_path(transfer_id, index, basename);
    tokio::fs::write(&path, &bytes).await?;
    Ok(ChunkArtifact {
        transfer_id: transfer_id.to_string(),
        index,
        path,
        len: bytes.len(),
    })
}
