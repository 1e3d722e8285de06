//! Google Drive destination client.
//!
//! One bearer-authenticated multipart POST per upload: a JSON metadata
//! part plus the payload bytes as the media part. No retry, no chunking;
//! HTTP and network failures propagate verbatim.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::transform::UploadData;

// ============================================================================
// Constants
// ============================================================================

/// The multipart upload endpoint.
pub const DEFAULT_UPLOAD_URL: &str = "https://www.googleapis.com/upload/drive/v3/files";

/// Request timeout for the upload call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// DriveClient
// ============================================================================

/// Client for the Drive multipart upload endpoint.
pub struct DriveClient {
    /// Underlying HTTP client.
    http: Client,
    /// Upload endpoint URL (injectable for tests).
    upload_url: String,
}

impl DriveClient {
    /// Creates a client against the production endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Self::with_upload_url(DEFAULT_UPLOAD_URL)
    }

    /// Creates a client against a custom endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the HTTP client cannot be built.
    pub fn with_upload_url(upload_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http,
            upload_url: upload_url.into(),
        })
    }

    /// Uploads a payload as a new Drive file.
    ///
    /// Returns the parsed JSON response of the created file.
    ///
    /// # Errors
    ///
    /// - [`Error::HttpUploadFailed`] for non-2xx responses
    /// - [`Error::Http`] for network failures
    pub async fn upload(&self, token: &str, upload: &UploadData) -> Result<Value> {
        let file_name = upload.file_name();
        info!(file = %file_name, mime = %upload.mime_type, "Uploading to Drive");

        let metadata = Part::text(serde_json::to_string(&Self::metadata(upload))?)
            .mime_str("application/json")?;
        let media = Part::bytes(upload.data.clone())
            .file_name(file_name)
            .mime_str(&upload.mime_type)?;

        let form = Form::new().part("metadata", metadata).part("file", media);

        let response = self
            .http
            .post(&self.upload_url)
            .query(&[("uploadType", "multipart")])
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_upload_failed(status.as_u16(), body));
        }

        let created: Value = response.json().await?;
        debug!(id = ?created.get("id"), "Drive file created");
        Ok(created)
    }

    /// Builds the metadata part for a payload.
    fn metadata(upload: &UploadData) -> Value {
        json!({
            "name": upload.file_name(),
            "mimeType": upload.mime_type,
            "description": format!("Captured from {}", upload.page_data.url),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
