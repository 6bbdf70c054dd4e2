//! URL construction for the server routes.

use cmdfiles_protocol::constants::{ROUTE_DELETE, ROUTE_FILES, ROUTE_LIST, ROUTE_UPLOAD};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Characters escaped inside a URL path. `/` is kept so remote paths keep
/// their structure.
const PATH_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Base address of a file server, e.g. `http://localhost:8081`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base: String,
}

impl Endpoint {
    pub fn new(host: &str, port: &str) -> Self {
        Self {
            base: format!("http://{host}:{port}"),
        }
    }

    /// Uses `base` verbatim (minus any trailing `/`).
    pub fn from_base(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn upload_url(&self, dir: &str) -> String {
        self.route_url(ROUTE_UPLOAD, dir)
    }

    pub fn files_url(&self, path: &str) -> String {
        self.route_url(ROUTE_FILES, path)
    }

    pub fn delete_url(&self, path: &str) -> String {
        self.route_url(ROUTE_DELETE, path)
    }

    pub fn list_url(&self, path: &str) -> String {
        self.route_url(ROUTE_LIST, path)
    }

    fn route_url(&self, route: &str, path: &str) -> String {
        let encoded = utf8_percent_encode(path, PATH_ESCAPE).to_string();
        append_path(&append_path(&self.base, route), &encoded)
    }
}

/// Joins two URL pieces, inserting `/` only when `second` is non-empty and
/// does not already start with one.
pub fn append_path(first: &str, second: &str) -> String {
    if !second.is_empty() && !second.starts_with('/') {
        format!("{first}/{second}")
    } else {
        format!("{first}{second}")
    }
}
