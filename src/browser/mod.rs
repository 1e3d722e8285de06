//! Browser entities module.
//!
//! This module provides the core browser automation types:
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Browser`] | Handle to the controlled browser (owns the bridge connection) |
//! | [`Tab`] | Handle to a single browser tab |
//! | [`Key`] | Synthetic keyboard keys |
//!
//! # Example
//!
//! ```ignore
//! let tab = browser.create_tab("https://example.com", false).await?;
//! tab.wait_for_load(20, Duration::from_millis(500)).await?;
//! let title = tab.evaluate("return document.title").await?;
//! tab.close().await?;
//! ```

// ============================================================================
// Submodules
// ============================================================================

mod keyboard;
mod tab;

// ============================================================================
// Re-exports
// ============================================================================

pub use keyboard::Key;
pub use tab::{LoadState, Tab, TabStatus};

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use tracing::debug;

use crate::error::{Error, Result};
use crate::identifiers::{SessionId, TabId};
use crate::protocol::{Command, Request, TabsCommand};
use crate::transport::Connection;

// ============================================================================
// Browser
// ============================================================================

/// A handle to the controlled browser.
///
/// The browser owns the bridge connection to the companion extension and
/// acts as the tab factory. Cloning is cheap; all clones share the same
/// connection.
#[derive(Clone)]
pub struct Browser {
    /// Bridge connection.
    connection: Connection,
    /// Session ID from the READY handshake.
    session_id: SessionId,
}

impl fmt::Debug for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Browser")
            .field("session_id", &self.session_id)
            .finish_non_exhaustive()
    }
}

impl Browser {
    /// Creates a browser handle from an established bridge connection.
    #[must_use]
    pub fn new(connection: Connection, session_id: SessionId) -> Self {
        Self {
            connection,
            session_id,
        }
    }

    /// Returns the bridge session ID.
    #[inline]
    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Creates a new tab.
    ///
    /// # Arguments
    ///
    /// * `url` - URL to open in the new tab
    /// * `active` - whether the tab is foregrounded on creation
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`] if the remote end reports no tab ID.
    pub async fn create_tab(&self, url: &str, active: bool) -> Result<Tab> {
        debug!(url = %url, active, "Creating tab");

        let request = Request::for_browser(Command::Tabs(TabsCommand::Create {
            url: url.to_string(),
            active,
        }));

        let result = self.connection.send(request).await?.into_result()?;

        let raw = result
            .get("tabId")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| Error::protocol("tabs.create response missing tabId"))?;

        let tab_id = TabId::new(raw as u32)?;
        debug!(%tab_id, "Tab created");

        Ok(Tab::new(self.connection.clone(), tab_id))
    }

    /// Returns a handle to the currently active tab.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoActiveTab`] if the browser reports no active tab.
    pub async fn active_tab(&self) -> Result<Tab> {
        let request = Request::for_browser(Command::Tabs(TabsCommand::QueryActive));
        let result = self.connection.send(request).await?.into_result()?;

        let raw = result
            .get("tabId")
            .and_then(|v| v.as_u64())
            .ok_or(Error::NoActiveTab)?;

        let tab_id = TabId::new(raw as u32).map_err(|_| Error::NoActiveTab)?;
        Ok(Tab::new(self.connection.clone(), tab_id))
    }

    /// Shuts down the bridge connection.
    pub fn shutdown(&self) {
        self.connection.shutdown();
    }
}

// ============================================================================
// Tests
// ============================================================================
