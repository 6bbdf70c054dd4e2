//! Filesystem operations behind the file server's pass-through routes.
//!
//! Every request path is resolved relative to a served root and refused if
//! it would escape it. Provides recursive deletion, directory listing and
//! the plain-text table the `list` route returns.

mod browse;
mod delete;
mod format;
mod resolve;

pub use browse::{DirEntry, list_directory};
pub use delete::delete_path;
pub use format::{format_age, format_bytes, render_listing};
pub use resolve::{ensure_dir, resolve_under_root};

/// Errors produced by filesystem operations.
#[derive(Debug, thiserror::Error)]
pub enum FileOpsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("not a directory: {0}")]
    NotADirectory(String),
}
