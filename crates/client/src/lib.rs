//! Client side of cmdfiles.
//!
//! Every component takes an explicit [`Endpoint`] built from the persisted
//! [`ClientConfig`]; nothing reads global state.

mod config;
mod download;
mod endpoint;
mod error;
mod remote;
mod upload;

pub use config::ClientConfig;
pub use download::{DownloadReport, Downloader, local_target};
pub use endpoint::{Endpoint, append_path};
pub use error::ClientError;
pub use remote::RemoteFiles;
pub use upload::{UploadMode, UploadPlan, UploadReceipt, Uploader};

pub use cmdfiles_transfer::{ScratchArea, TransferOptions, TransferProgress};
