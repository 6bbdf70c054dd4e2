//! Chunk receiver: the `upload` route.
//!
//! Each request carries either a whole file (no `multiindex`) or one chunk
//! of a larger file. The payload is buffered in memory, bounded by the
//! request body limit, then handed to the [`ChunkAssembler`].

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use bytes::Bytes;
use cmdfiles_file_ops::{ensure_dir, resolve_under_root};
use cmdfiles_protocol::ResponseToken;
use cmdfiles_protocol::constants::{
    FIELD_DIR, FIELD_FILENAME, FIELD_MULTI_INDEX, FIELD_UPLOAD_FILE,
};
use cmdfiles_transfer::{TransferError, WriteMode, validate_file_name};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::router::AppState;

/// Decoded multipart fields of one upload request.
#[derive(Debug, Default)]
struct Submission {
    file_name: String,
    dir: String,
    index: u64,
    data: Option<Bytes>,
}

impl Submission {
    /// Reads every field. Any decode failure, including hitting the body
    /// limit, is reported as `FILE_TOO_BIG`.
    async fn read(multipart: &mut Multipart) -> Result<Self, ApiError> {
        let mut submission = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(too_big)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                FIELD_FILENAME => submission.file_name = field.text().await.map_err(too_big)?,
                FIELD_DIR => submission.dir = field.text().await.map_err(too_big)?,
                FIELD_MULTI_INDEX => {
                    let raw = field.text().await.map_err(too_big)?;
                    submission.index = raw.trim().parse().unwrap_or(0);
                }
                FIELD_UPLOAD_FILE => submission.data = Some(field.bytes().await.map_err(too_big)?),
                _ => {
                    // Drain unknown fields so the body limit still applies.
                    field.bytes().await.map_err(too_big)?;
                }
            }
        }

        Ok(submission)
    }
}

fn too_big(e: impl std::fmt::Display) -> ApiError {
    warn!(error = %e, "multipart decode failed");
    ResponseToken::FileTooBig.into()
}

pub(crate) async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<&'static str, ApiError> {
    let mut multipart = multipart.map_err(too_big)?;
    let submission = Submission::read(&mut multipart).await?;

    let dir = resolve_under_root(&state.root, &submission.dir).map_err(|e| {
        warn!(dir = %submission.dir, error = %e, "rejected upload directory");
        ApiError::from(ResponseToken::InvalidDir)
    })?;
    let target = dir.clone();
    tokio::task::spawn_blocking(move || ensure_dir(&target))
        .await
        .map_err(|e| e.to_string())
        .and_then(|created| created.map_err(|e| e.to_string()))
        .map_err(|e| {
            warn!(dir = %dir.display(), error = %e, "cannot create upload directory");
            ApiError::from(ResponseToken::InvalidDir)
        })?;

    validate_file_name(&submission.file_name).map_err(|e| {
        warn!(file_name = %submission.file_name, error = %e, "rejected upload file name");
        ApiError::from(ResponseToken::InvalidFile)
    })?;
    let data = submission
        .data
        .ok_or(ApiError::Token(ResponseToken::InvalidFile))?;

    let dest = dir.join(&submission.file_name);
    let index = submission.index;

    match state.assembler.write(&dest, index, &data).await {
        Ok(mode) => {
            info!(dest = %dest.display(), index, bytes = data.len(), ?mode, "upload written");
            Ok(ResponseToken::Success.as_str())
        }
        Err(TransferError::OutOfSequence { expected, got, .. }) => {
            warn!(dest = %dest.display(), expected, got, "chunk out of order");
            Err(ResponseToken::ChunkOutOfOrder.into())
        }
        Err(e) => {
            warn!(dest = %dest.display(), index, error = %e, "upload write failed");
            let token = match WriteMode::from_index(index) {
                WriteMode::Whole => ResponseToken::WriteFileError,
                WriteMode::Fresh | WriteMode::Append => ResponseToken::WriteFileAppendError,
            };
            Err(token.into())
        }
    }
}
