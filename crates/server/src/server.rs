use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::router::router;

/// Creates the served root if it does not exist yet.
pub fn prepare_root(config: &ServerConfig) -> Result<(), ServerError> {
    std::fs::create_dir_all(&config.root).map_err(|source| ServerError::Root {
        path: config.root.display().to_string(),
        source,
    })
}

/// Serves requests on an already bound listener until the task is dropped.
pub async fn serve(listener: TcpListener, config: ServerConfig) -> Result<(), ServerError> {
    prepare_root(&config)?;
    let addr = listener.local_addr()?;
    info!(
        %addr,
        root = %config.root.display(),
        max_upload_size = config.max_upload_size,
        strict_sequence = config.strict_sequence,
        "file server listening"
    );
    axum::serve(listener, router(&config)).await?;
    Ok(())
}

/// Binds `0.0.0.0:{port}` and serves until the process exits.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    serve(listener, config).await
}
