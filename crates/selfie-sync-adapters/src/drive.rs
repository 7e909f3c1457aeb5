//! Google Drive download client.
//!
//! Resolves a file id to the direct-download URL
//! `{base}/uc?export=download&id={id}` and retrieves the body in one blocking
//! request.

use anyhow::{Context, Result};
use selfie_sync_core::domain::DriveFileId;
use selfie_sync_core::ports::{DriveClient, DriveFetch};
use tracing::debug;

/// Public drive host.
pub const DRIVE_BASE_URL: &str = "https://drive.google.com";

/// Drive client over blocking HTTP.
pub struct HttpDriveClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpDriveClient {
    /// Creates a client against the public drive host.
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(DRIVE_BASE_URL)
    }

    /// Creates a client against a custom base URL. Used by tests.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for HttpDriveClient {
    fn default() -> Self {
        Self::new()
    }
}

impl DriveClient for HttpDriveClient {
    fn fetch(&self, id: &DriveFileId) -> Result<DriveFetch> {
        let url = format!("{}/uc?export=download&id={id}", self.base_url);
        debug!("Downloading {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("request to {url} failed"))?;

        let status = response.status();
        if !status.is_success() {
            return Ok(DriveFetch::Failed {
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .bytes()
            .with_context(|| format!("failed to read body from {url}"))?
            .to_vec();

        Ok(DriveFetch::Success {
            content_type,
            bytes,
        })
    }
}
