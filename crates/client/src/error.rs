//! Error types for the client.

use cmdfiles_protocol::ResponseToken;
use cmdfiles_transfer::TransferError;

/// Errors produced by client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid source: {0}")]
    InvalidSource(String),

    #[error("invalid remote path: {0}")]
    InvalidRemotePath(String),

    #[error("download interrupted after {received} bytes: {source}")]
    Interrupted {
        received: u64,
        source: std::io::Error,
    },

    #[error(transparent)]
    Transfer(#[from] TransferError),
}

/// Accepts a server reply, returning its body.
///
/// A non-2xx status fails, and so does a 2xx body that parses as one of the
/// failure tokens. Bodies that are not tokens (listings) pass through.
pub(crate) fn check_reply(status: u16, body: String) -> Result<String, ClientError> {
    let token_failed = body
        .parse::<ResponseToken>()
        .is_ok_and(|token| !token.is_success());
    if (200..300).contains(&status) && !token_failed {
        return Ok(body);
    }
    Err(ClientError::Status {
        status,
        body: body.trim().to_string(),
    })
}
