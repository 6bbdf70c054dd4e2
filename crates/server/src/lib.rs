//! HTTP file server for cmdfiles.
//!
//! Routes:
//! - `POST /upload[/...]` multipart whole-file or chunk upload
//! - `GET /files/{path}` raw file bytes
//! - `GET /delete/{path}` recursive delete
//! - `GET /list[/{path}]` plain-text directory table
//!
//! Every path is resolved under the configured root and refused if it
//! would escape it.

mod config;
mod error;
mod receive;
mod router;
mod server;

pub use config::{DEFAULT_ROOT, ServerConfig};
pub use error::{ApiError, ServerError};
pub use router::router;
pub use server::{prepare_root, run, serve};
