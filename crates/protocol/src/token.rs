use std::fmt;
use std::str::FromStr;

/// Plain-text body returned by the server for every upload/delete outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseToken {
    Success,
    FileTooBig,
    InvalidDir,
    InvalidFile,
    InvalidUrl,
    WriteFileError,
    WriteFileAppendError,
    ChunkOutOfOrder,
}

/// Error returned when a body is not one of the known tokens.
#[derive(Debug, thiserror::Error)]
#[error("unknown response token: {0}")]
pub struct UnknownToken(pub String);

impl ResponseToken {
    /// Wire representation of the token.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::FileTooBig => "FILE_TOO_BIG",
            Self::InvalidDir => "INVALID_DIR",
            Self::InvalidFile => "INVALID_FILE",
            Self::InvalidUrl => "INVALID_URL",
            Self::WriteFileError => "WRITE_FILE_ERROR",
            Self::WriteFileAppendError => "WRITE_FILE_APPEND_ERROR",
            Self::ChunkOutOfOrder => "CHUNK_OUT_OF_ORDER",
        }
    }

    /// HTTP status code the server pairs with this token.
    pub fn status_code(self) -> u16 {
        match self {
            Self::Success => 200,
            Self::FileTooBig | Self::InvalidDir | Self::InvalidFile | Self::InvalidUrl => 400,
            Self::ChunkOutOfOrder => 409,
            Self::WriteFileError | Self::WriteFileAppendError => 500,
        }
    }

    /// Returns `true` for [`ResponseToken::Success`].
    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

impl fmt::Display for ResponseToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseToken {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = match s.trim() {
            "SUCCESS" => Self::Success,
            "FILE_TOO_BIG" => Self::FileTooBig,
            "INVALID_DIR" => Self::InvalidDir,
            "INVALID_FILE" => Self::InvalidFile,
            "INVALID_URL" => Self::InvalidUrl,
            "WRITE_FILE_ERROR" => Self::WriteFileError,
            "WRITE_FILE_APPEND_ERROR" => Self::WriteFileAppendError,
            "CHUNK_OUT_OF_ORDER" => Self::ChunkOutOfOrder,
            other => return Err(UnknownToken(other.to_string())),
        };
        Ok(token)
    }
}
