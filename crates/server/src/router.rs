//! Route table and the pass-through handlers (download, delete, list).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use axum::Router;
use axum::body::Body;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use cmdfiles_file_ops::{
    FileOpsError, delete_path, list_directory, render_listing, resolve_under_root,
};
use cmdfiles_protocol::ResponseToken;
use cmdfiles_transfer::ChunkAssembler;
use tokio_util::io::ReaderStream;
use tracing::{debug, info};

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::receive;

/// Read buffer used when streaming a file to a client.
const DOWNLOAD_BUFFER_SIZE: usize = 64 * 1024;

/// Shared state handed to every handler.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) root: Arc<PathBuf>,
    pub(crate) assembler: Arc<ChunkAssembler>,
}

/// Builds the application router for `config`.
///
/// The served root must already exist.
pub fn router(config: &ServerConfig) -> Router {
    let assembler = if config.strict_sequence {
        ChunkAssembler::with_sequence_check()
    } else {
        ChunkAssembler::new()
    };
    let state = AppState {
        root: Arc::new(config.root.clone()),
        assembler: Arc::new(assembler),
    };

    let upload_routes = Router::new()
        .route("/upload", post(receive::upload))
        .route("/upload/", post(receive::upload))
        .route("/upload/*rest", post(receive::upload))
        .layer(DefaultBodyLimit::max(config.max_upload_size));

    Router::new()
        .merge(upload_routes)
        .route("/files/*path", get(download))
        .route("/delete", get(delete_root))
        .route("/delete/", get(delete_root))
        .route("/delete/*path", get(delete))
        .route("/list", get(list_root))
        .route("/list/", get(list_root))
        .route("/list/*path", get(list))
        .with_state(state)
}

async fn download(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, ApiError> {
    let target = resolve_under_root(&state.root, &path)
        .map_err(|_| ApiError::from(ResponseToken::InvalidUrl))?;

    let metadata = match tokio::fs::metadata(&target).await {
        Ok(m) if m.is_file() => m,
        _ => return Err(ApiError::NotFound),
    };
    let file = tokio::fs::File::open(&target)
        .await
        .map_err(|_| ApiError::NotFound)?;

    debug!(path = %target.display(), size = metadata.len(), "serving file");

    let body = Body::from_stream(ReaderStream::with_capacity(file, DOWNLOAD_BUFFER_SIZE));
    let headers = [
        (header::CONTENT_TYPE, "application/octet-stream".to_string()),
        (header::CONTENT_LENGTH, metadata.len().to_string()),
    ];
    Ok((headers, body).into_response())
}

async fn delete_root() -> ApiError {
    ResponseToken::InvalidUrl.into()
}

async fn delete(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<&'static str, ApiError> {
    let root = Arc::clone(&state.root);
    let result = tokio::task::spawn_blocking(move || delete_path(&root, &path))
        .await
        .map_err(|e| ApiError::DeleteFailed(e.to_string()))?;

    match result {
        Ok(deleted) => {
            info!(path = %deleted.display(), "delete request served");
            Ok(ResponseToken::Success.as_str())
        }
        Err(FileOpsError::InvalidPath(_)) => Err(ResponseToken::InvalidUrl.into()),
        Err(e) => Err(ApiError::DeleteFailed(e.to_string())),
    }
}

async fn list_root(state: State<AppState>) -> Result<String, ApiError> {
    list(state, Path(String::new())).await
}

async fn list(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<String, ApiError> {
    let root = Arc::clone(&state.root);
    let result = tokio::task::spawn_blocking(move || {
        let dir = resolve_under_root(&root, &path)?;
        list_directory(&dir)
    })
    .await
    .map_err(|e| ApiError::ListFailed(e.to_string()))?;

    match result {
        Ok(entries) => Ok(render_listing(&entries, SystemTime::now())),
        Err(FileOpsError::InvalidPath(_)) => Err(ResponseToken::InvalidUrl.into()),
        Err(e) => Err(ApiError::ListFailed(e.to_string())),
    }
}
