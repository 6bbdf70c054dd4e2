//! Persisted endpoint configuration.
//!
//! Stored as `{"host": "...", "port": "..."}` in the scratch area. The port
//! is kept as a string so files written by older clients load unchanged.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::endpoint::Endpoint;
use crate::error::ClientError;

/// Host and port of the file server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: String,
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: port.into(),
        }
    }

    /// Loads the configuration at `path`.
    ///
    /// A missing file yields an empty configuration. So does an unparsable
    /// one, with a warning; [`endpoint`](Self::endpoint) then reports it.
    pub fn load(path: &Path) -> Result<Self, ClientError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse client config, ignoring it"
                );
                Ok(Self::default())
            }
        }
    }

    /// Writes the configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ClientError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)?;
        tracing::debug!(path = %path.display(), "client configuration saved");
        Ok(())
    }

    /// Checks that both host and port are set.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.host.trim().is_empty() || self.port.trim().is_empty() {
            return Err(ClientError::Config(
                "host and port are not set, run `cmdfiles config --host <HOST> --port <PORT>`"
                    .into(),
            ));
        }
        Ok(())
    }

    /// Builds the endpoint every request is addressed to.
    pub fn endpoint(&self) -> Result<Endpoint, ClientError> {
        self.validate()?;
        Ok(Endpoint::new(self.host.trim(), self.port.trim()))
    }
}
