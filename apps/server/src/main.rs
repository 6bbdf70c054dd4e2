use std::path::PathBuf;

use clap::Parser;
use cmdfiles_protocol::constants::{DEFAULT_PORT, SERVER_MAX_REQUEST_SIZE};
use cmdfiles_server::{DEFAULT_ROOT, ServerConfig};
use tracing_subscriber::EnvFilter;

/// Serve a directory for upload, download, delete and listing.
#[derive(Parser, Debug)]
#[command(name = "cmdfiles-server", version)]
struct Args {
    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Directory to serve.
    #[arg(long, default_value = DEFAULT_ROOT)]
    root: PathBuf,

    /// Upload request body cap in bytes.
    #[arg(long, default_value_t = SERVER_MAX_REQUEST_SIZE)]
    max_upload_size: usize,

    /// Reject duplicate or skipped chunk indices.
    #[arg(long)]
    strict_sequence: bool,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            port: args.port,
            root: args.root,
            max_upload_size: args.max_upload_size,
            strict_sequence: args.strict_sequence,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from(Args::parse());
    cmdfiles_server::run(config).await?;
    Ok(())
}
