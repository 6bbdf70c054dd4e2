/// Largest file the client sends in one request, and the size of each chunk
/// once a file is split (5 MiB).
pub const CLIENT_MAX_UPLOAD_SIZE: usize = 5 * 1024 * 1024;

/// Request body cap enforced by the server (10 MiB).
///
/// Leaves room for a full client chunk plus multipart framing.
pub const SERVER_MAX_REQUEST_SIZE: usize = 10 * 1024 * 1024;

/// Capacity of each chunk read from a download body (half the upload size).
pub const DOWNLOAD_CHUNK_SIZE: usize = CLIENT_MAX_UPLOAD_SIZE / 2;

/// Default depth of the bounded reader/writer channel.
pub const PIPELINE_DEPTH: usize = 5;

/// Default port of the file server.
pub const DEFAULT_PORT: u16 = 8081;

/// Default host written by `config` when none is given.
pub const DEFAULT_HOST: &str = "localhost";

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

/// `POST /upload/{dir}`: multipart upload of a whole file or one chunk.
pub const ROUTE_UPLOAD: &str = "upload";

/// `GET /files/{path}`: raw file bytes.
pub const ROUTE_FILES: &str = "files";

/// `GET /delete/{path}`: recursive delete (a mutation behind GET).
pub const ROUTE_DELETE: &str = "delete";

/// `GET /list/{path}`: plain-text directory table.
pub const ROUTE_LIST: &str = "list";

// ---------------------------------------------------------------------------
// Multipart fields
// ---------------------------------------------------------------------------

/// Leaf name of the destination file.
pub const FIELD_FILENAME: &str = "filename";

/// Destination directory relative to the server root (may be empty).
pub const FIELD_DIR: &str = "dir";

/// Decimal 1-based chunk index; omitted for whole-file uploads.
pub const FIELD_MULTI_INDEX: &str = "multiindex";

/// File part carrying the payload.
pub const FIELD_UPLOAD_FILE: &str = "uploadFile";
