//! Pass-through remote operations: delete and list.

use crate::endpoint::Endpoint;
use crate::error::{ClientError, check_reply};

/// Issues delete and list requests against the server.
pub struct RemoteFiles {
    http: reqwest::Client,
    endpoint: Endpoint,
}

impl RemoteFiles {
    pub fn new(http: reqwest::Client, endpoint: Endpoint) -> Self {
        Self { http, endpoint }
    }

    /// Deletes `remote` (file or directory tree). Returns the server's reply.
    pub async fn delete(&self, remote: &str) -> Result<String, ClientError> {
        if remote.is_empty() {
            return Err(ClientError::InvalidRemotePath(
                "remote path to delete is empty".into(),
            ));
        }
        self.get_text(&self.endpoint.delete_url(remote)).await
    }

    /// Lists `remote` (the server root when empty) as a plain-text table.
    pub async fn list(&self, remote: &str) -> Result<String, ClientError> {
        let remote = if remote.is_empty() { "/" } else { remote };
        self.get_text(&self.endpoint.list_url(remote)).await
    }

    async fn get_text(&self, url: &str) -> Result<String, ClientError> {
        tracing::debug!(url, "GET");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        check_reply(status.as_u16(), body)
    }
}
