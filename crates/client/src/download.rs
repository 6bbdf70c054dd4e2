//! Stream downloader.
//!
//! The response body is drained through the bounded pipeline and appended
//! to the local file chunk by chunk, so memory stays at
//! `chunk_size * depth` whatever the file size.

use std::io;
use std::path::{Path, PathBuf};

use cmdfiles_protocol::constants::{DOWNLOAD_CHUNK_SIZE, PIPELINE_DEPTH};
use cmdfiles_transfer::{ProgressMeter, TransferProgress, spawn_reader};
use futures_util::TryStreamExt;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio_util::io::StreamReader;
use tracing::{debug, info};

use crate::endpoint::Endpoint;
use crate::error::ClientError;

/// Result of a completed download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadReport {
    pub url: String,
    /// Local file written.
    pub path: PathBuf,
    pub total_bytes: u64,
}

/// Fetches files from the server's `files` route.
pub struct Downloader {
    http: reqwest::Client,
    endpoint: Endpoint,
    chunk_size: usize,
    depth: usize,
}

impl Downloader {
    pub fn new(http: reqwest::Client, endpoint: Endpoint) -> Self {
        Self {
            http,
            endpoint,
            chunk_size: DOWNLOAD_CHUNK_SIZE,
            depth: PIPELINE_DEPTH,
        }
    }

    /// Overrides the body chunk size and pipeline depth.
    pub fn with_chunking(mut self, chunk_size: usize, depth: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self.depth = depth.max(1);
        self
    }

    /// Downloads `remote` into `local_dir`, named after its last segment.
    ///
    /// A non-2xx response fails before any local file is touched. An
    /// existing local file is replaced. Progress is sent per chunk on
    /// `progress_tx`. A body read error fails the download with
    /// [`ClientError::Interrupted`] and leaves the partial file in place.
    pub async fn download(
        &self,
        remote: &str,
        local_dir: &str,
        progress_tx: Option<mpsc::Sender<TransferProgress>>,
    ) -> Result<DownloadReport, ClientError> {
        let path = local_target(remote, local_dir)?;
        let url = self.endpoint.files_url(remote);

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        match tokio::fs::remove_file(&path).await {
            Ok(()) => debug!(path = %path.display(), "replaced existing local file"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        info!(url = %url, path = %path.display(), "downloading");

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        let body = response.bytes_stream().map_err(io::Error::other);
        let mut chunks = spawn_reader(StreamReader::new(Box::pin(body)), self.chunk_size, self.depth);
        let mut meter = ProgressMeter::new();

        while let Some(chunk) = chunks.recv().await {
            let chunk = chunk.map_err(|source| ClientError::Interrupted {
                received: meter.total(),
                source,
            })?;
            file.write_all(&chunk).await?;

            let progress = meter.record(chunk.len() as u64);
            if let Some(tx) = &progress_tx {
                let _ = tx.send(progress).await;
            }
        }
        file.flush().await?;

        info!(path = %path.display(), total_bytes = meter.total(), "download complete");

        Ok(DownloadReport {
            url,
            path,
            total_bytes: meter.total(),
        })
    }
}

/// Local destination for `remote`: its last `/`-separated segment inside
/// `local_dir` (the current directory when empty).
pub fn local_target(remote: &str, local_dir: &str) -> Result<PathBuf, ClientError> {
    if remote.is_empty() {
        return Err(ClientError::InvalidRemotePath(
            "remote file path is empty".into(),
        ));
    }

    let name = remote.rsplit('/').next().unwrap_or(remote);
    if name.is_empty() || name == "." || name == ".." {
        return Err(ClientError::InvalidRemotePath(format!(
            "no file name in {remote}"
        )));
    }

    let dir = if local_dir.is_empty() { "." } else { local_dir };
    Ok(Path::new(dir).join(name))
}
