//! Error types for the server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cmdfiles_protocol::ResponseToken;

/// Errors that stop the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot prepare served root {path}: {source}")]
    Root {
        path: String,
        source: std::io::Error,
    },
}

/// A failed request, rendered as a status code plus a plain-text body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request carried one of the well-known failure tokens.
    #[error("{0}")]
    Token(ResponseToken),

    #[error("not found")]
    NotFound,

    /// Delete failed on the filesystem.
    #[error("{0}")]
    DeleteFailed(String),

    /// Listing target could not be read.
    #[error("{0}")]
    ListFailed(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Token(token) => StatusCode::from_u16(token.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::DeleteFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ListFailed(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<ResponseToken> for ApiError {
    fn from(token: ResponseToken) -> Self {
        Self::Token(token)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::warn!(status = status.as_u16(), error = %self, "request failed");
        (status, self.to_string()).into_response()
    }
}
