//! Error types for clipship.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use clipship::{Result, Error};
//!
//! async fn example(tab: &Tab) -> Result<()> {
//!     tab.navigate("https://example.com").await?;
//!     tab.wait_for_load(20, Duration::from_millis(500)).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`] |
//! | Connection | [`Error::Connection`], [`Error::ConnectionTimeout`], [`Error::ConnectionClosed`] |
//! | Protocol | [`Error::Protocol`], [`Error::RequestTimeout`] |
//! | Automation | [`Error::NoActiveTab`], [`Error::TabNotFound`], [`Error::ScriptError`], [`Error::ElementNotFound`], [`Error::Timeout`] |
//! | Notebook engine | [`Error::SignInRequired`], [`Error::ShellNotFound`], [`Error::UploadFailed`] |
//! | Destinations | [`Error::HttpUploadFailed`], [`Error::AuthFailed`] |
//! | External | [`Error::Io`], [`Error::Json`], [`Error::WebSocket`], [`Error::Http`] |

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::result::Result as StdResult;

use thiserror::Error;
use tokio::sync::oneshot::error::RecvError;
use tokio_tungstenite::tungstenite::Error as WsError;

use crate::identifiers::{RequestId, TabId};

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when policy or client configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // Connection Errors
    // ========================================================================
    /// WebSocket connection failed.
    #[error("Connection failed: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// Connection timeout waiting for the companion extension.
    #[error("Connection timeout after {timeout_ms}ms")]
    ConnectionTimeout {
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// WebSocket connection closed unexpectedly.
    #[error("Connection closed")]
    ConnectionClosed,

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// Protocol violation or unexpected response.
    #[error("Protocol error: {message}")]
    Protocol {
        /// Description of the protocol violation.
        message: String,
    },

    /// Command request timeout.
    ///
    /// Returned when the bridge does not answer a request in time.
    #[error("Request {request_id} timed out after {timeout_ms}ms")]
    RequestTimeout {
        /// The request ID that timed out.
        request_id: RequestId,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    // ========================================================================
    // Automation Errors
    // ========================================================================
    /// No active tab in the controlled browser.
    ///
    /// Returned when page extraction finds nothing to extract from.
    #[error("No active tab found")]
    NoActiveTab,

    /// Tab not found.
    #[error("Tab not found: {tab_id}")]
    TabNotFound {
        /// The missing tab ID.
        tab_id: TabId,
    },

    /// JavaScript evaluation failed in the controlled page.
    #[error("Script error: {message}")]
    ScriptError {
        /// Error message from script evaluation.
        message: String,
    },

    /// An expected control or input was absent from the page.
    #[error("Element not found: {description}")]
    ElementNotFound {
        /// Description of the missing element.
        description: String,
    },

    /// Operation timeout.
    ///
    /// Returned when a bounded wait exhausts its window.
    #[error("Timeout after {timeout_ms}ms: {operation}")]
    Timeout {
        /// Description of the operation that timed out.
        operation: String,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    // ========================================================================
    // Notebook Engine Errors
    // ========================================================================
    /// The notebook landing page never rendered its notebook titles.
    ///
    /// Most often this means the browser is not signed in to NotebookLM.
    #[error(
        "Sign-in required: no notebooks found after {attempts} attempts; \
         the browser may not be signed in to NotebookLM"
    )]
    SignInRequired {
        /// Number of polling attempts made.
        attempts: u32,
    },

    /// The notebook page never reached its rendered editor shell.
    #[error("Notebook editor shell not found after {attempts} attempts")]
    ShellNotFound {
        /// Number of polling attempts made.
        attempts: u32,
    },

    /// Upload into a notebook failed.
    ///
    /// Wraps any automation failure with the phase it occurred in.
    #[error("Failed to upload to notebook: {message}")]
    UploadFailed {
        /// Contextual description of the failure.
        message: String,
    },

    // ========================================================================
    // Destination Errors
    // ========================================================================
    /// The storage-service upload returned a non-success status.
    #[error("HTTP upload failed with status {status}: {body}")]
    HttpUploadFailed {
        /// HTTP status code.
        status: u16,
        /// Response body (possibly truncated).
        body: String,
    },

    /// Token retrieval was denied or failed.
    #[error("Authentication failed: {message}")]
    AuthFailed {
        /// Description of the auth failure.
        message: String,
    },

    // ========================================================================
    // Relay Errors
    // ========================================================================
    /// Failure reported by the automation service across the relay.
    ///
    /// Carries the service's error string verbatim, the way the UI
    /// surfaces it.
    #[error("{message}")]
    Relay {
        /// The service's error string.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),

    /// HTTP client error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Channel receive error.
    #[error("Channel closed")]
    ChannelClosed(#[from] RecvError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a connection timeout error.
    #[inline]
    pub fn connection_timeout(timeout_ms: u64) -> Self {
        Self::ConnectionTimeout { timeout_ms }
    }

    /// Creates a protocol error.
    #[inline]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates a request timeout error.
    #[inline]
    pub fn request_timeout(request_id: RequestId, timeout_ms: u64) -> Self {
        Self::RequestTimeout {
            request_id,
            timeout_ms,
        }
    }

    /// Creates a tab not found error.
    #[inline]
    pub fn tab_not_found(tab_id: TabId) -> Self {
        Self::TabNotFound { tab_id }
    }

    /// Creates a script error.
    #[inline]
    pub fn script_error(message: impl Into<String>) -> Self {
        Self::ScriptError {
            message: message.into(),
        }
    }

    /// Creates an element not found error.
    #[inline]
    pub fn element_not_found(description: impl Into<String>) -> Self {
        Self::ElementNotFound {
            description: description.into(),
        }
    }

    /// Creates a timeout error.
    #[inline]
    pub fn timeout(operation: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_ms,
        }
    }

    /// Creates a sign-in required error.
    #[inline]
    pub fn sign_in_required(attempts: u32) -> Self {
        Self::SignInRequired { attempts }
    }

    /// Creates a shell not found error.
    #[inline]
    pub fn shell_not_found(attempts: u32) -> Self {
        Self::ShellNotFound { attempts }
    }

    /// Creates an upload failed error.
    #[inline]
    pub fn upload_failed(message: impl Into<String>) -> Self {
        Self::UploadFailed {
            message: message.into(),
        }
    }

    /// Creates an HTTP upload failed error.
    #[inline]
    pub fn http_upload_failed(status: u16, body: impl Into<String>) -> Self {
        Self::HttpUploadFailed {
            status,
            body: body.into(),
        }
    }

    /// Creates an authentication failed error.
    #[inline]
    pub fn auth_failed(message: impl Into<String>) -> Self {
        Self::AuthFailed {
            message: message.into(),
        }
    }

    /// Creates a relay error.
    #[inline]
    pub fn relay(message: impl Into<String>) -> Self {
        Self::Relay {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a timeout error.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::ConnectionTimeout { .. } | Self::Timeout { .. } | Self::RequestTimeout { .. }
        )
    }

    /// Returns `true` if this is a connection error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. }
                | Self::ConnectionTimeout { .. }
                | Self::ConnectionClosed
                | Self::WebSocket(_)
        )
    }

    /// Returns `true` if this error came out of the automation engine.
    #[inline]
    #[must_use]
    pub fn is_automation_error(&self) -> bool {
        matches!(
            self,
            Self::NoActiveTab
                | Self::TabNotFound { .. }
                | Self::ScriptError { .. }
                | Self::ElementNotFound { .. }
                | Self::SignInRequired { .. }
                | Self::ShellNotFound { .. }
                | Self::UploadFailed { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
