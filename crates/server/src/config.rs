use std::path::PathBuf;

use cmdfiles_protocol::constants::{DEFAULT_PORT, SERVER_MAX_REQUEST_SIZE};

/// Default directory served and written to.
pub const DEFAULT_ROOT: &str = "./public";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// TCP port to listen on (0 = OS-assigned).
    pub port: u16,
    /// Directory every request path is resolved under.
    pub root: PathBuf,
    /// Upload request body cap in bytes.
    pub max_upload_size: usize,
    /// Reject duplicate or skipped chunk indices with `409`.
    pub strict_sequence: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            root: PathBuf::from(DEFAULT_ROOT),
            max_upload_size: SERVER_MAX_REQUEST_SIZE,
            strict_sequence: false,
        }
    }
}
