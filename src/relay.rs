//! Message relay.
//!
//! Callers do not drive the automation engine directly: only the
//! background service task owns the browser connection and may create
//! and control tabs. The relay bridges that boundary with tagged JSON
//! request/response messages, mirroring the contract the UI context
//! speaks:
//!
//! | Request | Response |
//! |---------|----------|
//! | `{"action": "fetchNotebooks"}` | `{"success": true, "notebooks": [...]}` |
//! | `{"action": "uploadToNotebook", "notebookId": ..., "uploadData": ...}` | `{"success": true, "result": "..."}` |
//! | any failure | `{"success": false, "error": "..."}` |
//! | unrecognized action | no response |
//!
//! Every recognized request gets exactly one response, produced
//! asynchronously: the service loop hands each request to its own task so
//! a slow automation operation never blocks the next request (concurrent
//! operations each open their own tab). Correlation is explicit, one
//! oneshot channel per request, so concurrent in-flight requests cannot
//! cross wires. Unrecognized actions are left unanswered for other
//! potential handlers.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use serde_json::{Value, json};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::browser::Browser;
use crate::error::{Error, Result};
use crate::notebook::{EnginePolicy, NotebookInfo, list_notebooks, upload_to_notebook};
use crate::transform::UploadData;

// ============================================================================
// Constants
// ============================================================================

/// Action tag for notebook enumeration.
pub const ACTION_FETCH_NOTEBOOKS: &str = "fetchNotebooks";

/// Action tag for notebook upload.
pub const ACTION_UPLOAD_TO_NOTEBOOK: &str = "uploadToNotebook";

// ============================================================================
// Types
// ============================================================================

/// One queued relay request with its reply channel.
struct Envelope {
    /// The tagged request message.
    message: Value,
    /// Reply channel; `None` means "no response from this handler".
    reply: oneshot::Sender<Option<Value>>,
}

// ============================================================================
// Relay
// ============================================================================

/// The background automation service.
pub struct Relay;

impl Relay {
    /// Spawns the service task and returns a handle for callers.
    ///
    /// The service owns the browser handle; the caller keeps (or clones)
    /// its own for page extraction.
    #[must_use]
    pub fn spawn(browser: Browser, policy: EnginePolicy) -> RelayHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_service(browser, policy, rx));
        RelayHandle { tx }
    }
}

/// Service loop: receives envelopes, answers each from its own task.
async fn run_service(
    browser: Browser,
    policy: EnginePolicy,
    mut rx: mpsc::UnboundedReceiver<Envelope>,
) {
    let policy = Arc::new(policy);

    while let Some(envelope) = rx.recv().await {
        let browser = browser.clone();
        let policy = Arc::clone(&policy);

        tokio::spawn(async move {
            let Envelope { message, reply } = envelope;
            let response = handle_message(&browser, &policy, &message).await;
            if reply.send(response).is_err() {
                warn!("Relay caller went away before the response");
            }
        });
    }

    debug!("Relay service stopped");
}

/// Routes one tagged message; `None` leaves it for other handlers.
async fn handle_message(
    browser: &Browser,
    policy: &EnginePolicy,
    message: &Value,
) -> Option<Value> {
    match message.get("action").and_then(|v| v.as_str()) {
        Some(ACTION_FETCH_NOTEBOOKS) => Some(match list_notebooks(browser, policy).await {
            Ok(notebooks) => json!({ "success": true, "notebooks": notebooks }),
            Err(err) => json!({ "success": false, "error": err.to_string() }),
        }),

        Some(ACTION_UPLOAD_TO_NOTEBOOK) => {
            let notebook_id = message.get("notebookId").and_then(|v| v.as_str());
            let upload = message
                .get("uploadData")
                .cloned()
                .and_then(|v| serde_json::from_value::<UploadData>(v).ok());

            let (Some(notebook_id), Some(upload)) = (notebook_id, upload) else {
                return Some(json!({
                    "success": false,
                    "error": "Missing notebookId or uploadData",
                }));
            };

            Some(
                match upload_to_notebook(browser, policy, notebook_id, &upload).await {
                    Ok(result) => json!({ "success": true, "result": result }),
                    Err(err) => json!({ "success": false, "error": err.to_string() }),
                },
            )
        }

        other => {
            debug!(action = ?other, "Unrecognized action left for other handlers");
            None
        }
    }
}

// ============================================================================
// RelayHandle
// ============================================================================

/// Caller-side handle to the relay.
///
/// Cloneable; every clone talks to the same service task.
#[derive(Clone)]
pub struct RelayHandle {
    tx: mpsc::UnboundedSender<Envelope>,
}

impl RelayHandle {
    /// Sends a raw tagged message and awaits the single response.
    ///
    /// Returns `None` when this handler does not recognize the action.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionClosed`] if the service task is gone.
    pub async fn request(&self, message: Value) -> Result<Option<Value>> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.tx
            .send(Envelope {
                message,
                reply: reply_tx,
            })
            .map_err(|_| Error::ConnectionClosed)?;

        Ok(reply_rx.await?)
    }

    /// Fetches the notebook list through the relay.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Relay`] carrying the service's error string, or
    /// [`Error::Protocol`] if the service produced no response.
    pub async fn fetch_notebooks(&self) -> Result<Vec<NotebookInfo>> {
        let response = self
            .request(json!({ "action": ACTION_FETCH_NOTEBOOKS }))
            .await?
            .ok_or_else(|| Error::protocol("No response from automation service"))?;

        if response["success"].as_bool() == Some(true) {
            Ok(serde_json::from_value(response["notebooks"].clone())?)
        } else {
            let message = response["error"]
                .as_str()
                .unwrap_or("Unknown error fetching notebooks");
            Err(Error::relay(message))
        }
    }

    /// Uploads a payload into a notebook through the relay.
    ///
    /// On success, returns a JSON envelope string naming the notebook:
    /// `{"success": true, "notebookId": "...", "message": "..."}`.
    ///
    /// # Errors
    ///
    /// Every failure surfaces as an error whose display contains
    /// `Failed`: engine failures cross the relay verbatim as
    /// [`Error::Relay`], plumbing failures are wrapped as
    /// [`Error::UploadFailed`].
    pub async fn upload_to_notebook(
        &self,
        notebook_id: &str,
        upload: &UploadData,
    ) -> Result<String> {
        let message = json!({
            "action": ACTION_UPLOAD_TO_NOTEBOOK,
            "notebookId": notebook_id,
            "uploadData": upload,
        });

        let response = self
            .request(message)
            .await
            .map_err(|e| Error::upload_failed(e.to_string()))?
            .ok_or_else(|| Error::upload_failed("no response from automation service"))?;

        if response["success"].as_bool() == Some(true) {
            let result = response["result"]
                .as_str()
                .unwrap_or("Content uploaded successfully");

            Ok(serde_json::to_string(&json!({
                "success": true,
                "notebookId": notebook_id,
                "message": result,
            }))?)
        } else {
            let message = response["error"]
                .as_str()
                .unwrap_or("Unknown error uploading to notebook");
            Err(Error::relay(message))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
