use serde::Deserialize;
use thiserror::Error;

use crate::config::UploadConfig;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Upload host is not configured")]
    NotConfigured,
    #[error("Upload request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Upload host returned status {0}")]
    Status(u16),
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

/// Client for the cloud image/file host. Takes a base64/data-URL payload and
/// returns the public URL the host serves it from.
#[derive(Clone)]
pub struct UploadClient {
    client: reqwest::Client,
    config: Option<UploadConfig>,
}

impl UploadClient {
    pub fn new(config: Option<UploadConfig>) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub async fn upload(&self, file: &str, folder: &str) -> Result<String, UploadError> {
        let config = self.config.as_ref().ok_or(UploadError::NotConfigured)?;

        let response = self
            .client
            .post(&config.api_url)
            .bearer_auth(&config.api_key)
            .json(&serde_json::json!({ "file": file, "folder": folder }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(UploadError::Status(response.status().as_u16()));
        }

        let body: UploadResponse = response.json().await?;
        Ok(body.url)
    }
}
