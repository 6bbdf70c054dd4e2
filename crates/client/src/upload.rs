//! Chunk uploader.
//!
//! Files below the threshold go out in one multipart request. Larger files
//! are split into numbered artifacts and sent strictly one after another;
//! any failure aborts the remaining chunks.

use std::path::{Path, PathBuf};

use cmdfiles_protocol::constants::{
    FIELD_DIR, FIELD_FILENAME, FIELD_MULTI_INDEX, FIELD_UPLOAD_FILE,
};
use cmdfiles_transfer::{
    ChunkArtifact, ChunkPipeline, ScratchArea, Splitter, TransferError, TransferOptions,
};
use reqwest::multipart::{Form, Part};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::endpoint::Endpoint;
use crate::error::{ClientError, check_reply};

/// How a file will be sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadMode {
    /// One request, no `multiindex` field.
    Whole,
    /// `chunks` requests with indices `1..=chunks`.
    Chunked { chunks: u64 },
}

/// A validated upload, decided before any network call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPlan {
    pub source: PathBuf,
    pub file_name: String,
    pub size: u64,
    pub mode: UploadMode,
}

/// Outcome of one upload request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    /// Chunk index, 0 for a whole-file upload.
    pub index: u64,
    /// Local file that was sent (the source or a chunk artifact).
    pub sent: PathBuf,
    pub url: String,
    pub status: u16,
    /// Raw response body.
    pub body: String,
}

/// Sends local files to the server's upload route.
pub struct Uploader {
    http: reqwest::Client,
    endpoint: Endpoint,
    scratch: ScratchArea,
    options: TransferOptions,
}

impl Uploader {
    pub fn new(
        http: reqwest::Client,
        endpoint: Endpoint,
        scratch: ScratchArea,
        options: TransferOptions,
    ) -> Self {
        Self {
            http,
            endpoint,
            scratch,
            options,
        }
    }

    /// Validates `source` and decides between whole and chunked mode.
    ///
    /// Fails for a missing file, a directory, or a zero-length file.
    pub async fn plan(&self, source: &Path) -> Result<UploadPlan, ClientError> {
        if source.as_os_str().is_empty() {
            return Err(ClientError::InvalidSource("local file path is empty".into()));
        }

        let metadata = tokio::fs::metadata(source).await?;
        if metadata.is_dir() {
            return Err(ClientError::InvalidSource(format!(
                "{} is a directory",
                source.display()
            )));
        }

        let size = metadata.len();
        if size == 0 {
            return Err(ClientError::InvalidSource(format!(
                "{} is empty",
                source.display()
            )));
        }

        let file_name = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                ClientError::InvalidSource(format!("no file name in {}", source.display()))
            })?
            .to_string();

        let mode = if self.options.is_chunked(size) {
            UploadMode::Chunked {
                chunks: self.options.chunk_count(size),
            }
        } else {
            UploadMode::Whole
        };

        Ok(UploadPlan {
            source: source.to_path_buf(),
            file_name,
            size,
            mode,
        })
    }

    /// Uploads `source` into `remote_dir` on the server.
    ///
    /// Each receipt is also pushed to `receipts_tx` as soon as its request
    /// completes. Non-2xx responses and failure tokens abort the transfer
    /// with [`ClientError::Status`].
    pub async fn upload(
        &self,
        source: &Path,
        remote_dir: &str,
        receipts_tx: Option<mpsc::Sender<UploadReceipt>>,
    ) -> Result<Vec<UploadReceipt>, ClientError> {
        let plan = self.plan(source).await?;
        let url = self.endpoint.upload_url(remote_dir);

        info!(
            source = %plan.source.display(),
            size = plan.size,
            mode = ?plan.mode,
            url = %url,
            "uploading"
        );

        match plan.mode {
            UploadMode::Whole => {
                let data = tokio::fs::read(&plan.source).await?;
                let receipt = self
                    .post_part(&url, &plan.file_name, remote_dir, None, &plan.source, data)
                    .await?;
                notify(&receipts_tx, &receipt).await;
                Ok(vec![receipt])
            }
            UploadMode::Chunked { .. } => {
                let splitter = Splitter::new(self.scratch.clone(), &self.options);
                let artifacts = splitter.split(&plan.source).await?;
                self.send_chunks(&url, &plan.file_name, remote_dir, artifacts, &receipts_tx)
                    .await
            }
        }
    }

    /// Posts artifacts strictly in order. The first failure, whether a
    /// splitter error or a rejected request, stops the splitter and removes
    /// every artifact it already produced.
    async fn send_chunks(
        &self,
        url: &str,
        file_name: &str,
        remote_dir: &str,
        mut artifacts: ChunkPipeline<Result<ChunkArtifact, TransferError>>,
        receipts_tx: &Option<mpsc::Sender<UploadReceipt>>,
    ) -> Result<Vec<UploadReceipt>, ClientError> {
        let mut receipts = Vec::new();
        while let Some(artifact) = artifacts.recv().await {
            match self.send_chunk(url, file_name, remote_dir, artifact).await {
                Ok(receipt) => {
                    notify(receipts_tx, &receipt).await;
                    receipts.push(receipt);
                }
                Err(e) => {
                    warn!(url, sent = receipts.len(), error = %e, "chunked upload aborted");
                    discard(artifacts).await;
                    return Err(e);
                }
            }
        }
        Ok(receipts)
    }

    async fn send_chunk(
        &self,
        url: &str,
        file_name: &str,
        remote_dir: &str,
        artifact: Result<ChunkArtifact, TransferError>,
    ) -> Result<UploadReceipt, ClientError> {
        let artifact = artifact?;
        let result = match tokio::fs::read(&artifact.path).await {
            Ok(data) => {
                self.post_part(
                    url,
                    file_name,
                    remote_dir,
                    Some(artifact.index),
                    &artifact.path,
                    data,
                )
                .await
            }
            Err(e) => Err(e.into()),
        };

        if let Err(e) = tokio::fs::remove_file(&artifact.path).await {
            warn!(path = %artifact.path.display(), error = %e, "failed to remove chunk artifact");
        }
        result
    }

    async fn post_part(
        &self,
        url: &str,
        file_name: &str,
        remote_dir: &str,
        index: Option<u64>,
        sent: &Path,
        data: Vec<u8>,
    ) -> Result<UploadReceipt, ClientError> {
        let mut form = Form::new()
            .text(FIELD_FILENAME, file_name.to_string())
            .text(FIELD_DIR, remote_dir.to_string());
        if let Some(index) = index {
            form = form.text(FIELD_MULTI_INDEX, index.to_string());
        }
        let part = Part::bytes(data).file_name(file_name.to_string());
        form = form.part(FIELD_UPLOAD_FILE, part);

        let response = self.http.post(url).multipart(form).send().await?;
        let status = response.status();
        let body = response.text().await?;

        debug!(url, index = index.unwrap_or(0), status = status.as_u16(), "upload response");
        let body = check_reply(status.as_u16(), body)?;

        Ok(UploadReceipt {
            index: index.unwrap_or(0),
            sent: sent.to_path_buf(),
            url: url.to_string(),
            status: status.as_u16(),
            body,
        })
    }
}

/// Stops the splitter and removes the artifacts still queued.
async fn discard(mut artifacts: ChunkPipeline<Result<ChunkArtifact, TransferError>>) {
    artifacts.close();
    while let Some(item) = artifacts.recv().await {
        if let Ok(artifact) = item {
            let _ = tokio::fs::remove_file(&artifact.path).await;
        }
    }
}

async fn notify(tx: &Option<mpsc::Sender<UploadReceipt>>, receipt: &UploadReceipt) {
    if let Some(tx) = tx {
        let _ = tx.send(receipt.clone()).await;
    }
}
