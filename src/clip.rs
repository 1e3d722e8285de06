//! Clip pipeline.
//!
//! Ties the flow together: extract the active page, run exactly one
//! transformer, dispatch the payload to the selected destination.
//!
//! ```text
//! caller → extract_page → Format::transform → { DriveClient | RelayHandle }
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::auth::{TokenProvider, TokenStore};
use crate::browser::Browser;
use crate::drive::DriveClient;
use crate::error::{Error, Result};
use crate::notebook::NotebookInfo;
use crate::page::extract_page;
use crate::relay::RelayHandle;
use crate::transform::Format;

// ============================================================================
// Destination
// ============================================================================

/// Upload destination selector.
///
/// A pure dispatch key: picks which client and data flow a clip uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Destination {
    /// Google Drive (single multipart POST).
    GoogleDrive,
    /// NotebookLM (DOM automation through the relay).
    NotebookLm,
}

// ============================================================================
// ClipRequest
// ============================================================================

/// One clip order: where to send the page and in which format.
#[derive(Debug, Clone)]
pub struct ClipRequest {
    /// Upload destination.
    pub destination: Destination,
    /// Output format.
    pub format: Format,
    /// Target notebook, required for [`Destination::NotebookLm`].
    pub notebook_id: Option<String>,
}

impl ClipRequest {
    /// Validates the request before any browser work happens.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the notebook destination is missing
    /// its notebook id.
    pub fn validate(&self) -> Result<()> {
        if self.destination == Destination::NotebookLm && self.notebook_id.is_none() {
            return Err(Error::config(
                "the notebook destination requires a notebook id",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// ClipOutcome
// ============================================================================

/// Result of a clip, per destination.
#[derive(Debug, Clone)]
pub enum ClipOutcome {
    /// Drive response for the created file.
    Drive(Value),
    /// Notebook success envelope (JSON string naming the notebook).
    Notebook(String),
}

// ============================================================================
// Clipper
// ============================================================================

/// Destination dispatcher over the shared clients.
pub struct Clipper {
    /// Relay handle to the automation service.
    relay: RelayHandle,
    /// Drive client.
    drive: DriveClient,
    /// Token cache for Drive auth.
    tokens: TokenStore,
}

impl Clipper {
    /// Creates a clipper over the given clients.
    #[must_use]
    pub fn new(relay: RelayHandle, drive: DriveClient, tokens: TokenStore) -> Self {
        Self {
            relay,
            drive,
            tokens,
        }
    }

    /// Lists the notebooks available as upload targets.
    ///
    /// # Errors
    ///
    /// Propagates relay and engine failures, e.g.
    /// [`Error::SignInRequired`] stringified across the relay.
    pub async fn notebooks(&self) -> Result<Vec<NotebookInfo>> {
        self.relay.fetch_notebooks().await
    }

    /// Clips the active page to the requested destination.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] for invalid requests
    /// - [`Error::NoActiveTab`] when there is nothing to extract
    /// - destination-specific failures ([`Error::AuthFailed`],
    ///   [`Error::HttpUploadFailed`], upload failures across the relay)
    pub async fn clip(
        &self,
        browser: &Browser,
        provider: &dyn TokenProvider,
        request: &ClipRequest,
    ) -> Result<ClipOutcome> {
        request.validate()?;

        let page = extract_page(browser).await?;
        let upload = request.format.transform(&page);

        info!(
            destination = ?request.destination,
            format = ?request.format,
            title = %page.title,
            "Clipping page"
        );

        match request.destination {
            Destination::GoogleDrive => {
                let token = self.tokens.token(provider).await?;
                let created = self.drive.upload(&token, &upload).await?;
                Ok(ClipOutcome::Drive(created))
            }
            Destination::NotebookLm => {
                let notebook_id = request
                    .notebook_id
                    .as_deref()
                    .ok_or_else(|| Error::config("the notebook destination requires a notebook id"))?;
                let envelope = self.relay.upload_to_notebook(notebook_id, &upload).await?;
                Ok(ClipOutcome::Notebook(envelope))
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
