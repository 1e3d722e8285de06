//! Automation session guard.
//!
//! An [`AutomationSession`] owns one tab for the duration of one engine
//! operation. The tab is released on every exit path: explicitly through
//! [`AutomationSession::dispose`], or by the `Drop` backstop issuing a
//! detached close if an error unwound past the explicit call. Every
//! caller must uphold this; a leaked tab is visible to the user.

// ============================================================================
// Imports
// ============================================================================

use tracing::debug;

use crate::browser::{Browser, Tab};
use crate::error::Result;

// ============================================================================
// TabDisposal
// ============================================================================

/// What happens to the session's tab when the operation ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabDisposal {
    /// Close the tab.
    Close,
    /// Leave the tab open (successful uploads, per policy).
    Keep,
}

// ============================================================================
// AutomationSession
// ============================================================================

/// Exclusive ownership of one tab for one automation operation.
pub(crate) struct AutomationSession {
    /// The controlled tab.
    tab: Tab,
    /// Set once the session has been explicitly disposed.
    disposed: bool,
}

impl AutomationSession {
    /// Opens a new tab and binds the session to it.
    pub(crate) async fn open(browser: &Browser, url: &str, active: bool) -> Result<Self> {
        let tab = browser.create_tab(url, active).await?;
        debug!(tab_id = %tab.id(), "Automation session attached");
        Ok(Self {
            tab,
            disposed: false,
        })
    }

    /// Returns the session's tab.
    #[inline]
    pub(crate) fn tab(&self) -> &Tab {
        &self.tab
    }

    /// Releases the session, disposing of the tab as requested.
    ///
    /// Consumes the session; the `Drop` backstop is disarmed before the
    /// close is awaited, so the tab is never closed twice.
    pub(crate) async fn dispose(mut self, disposal: TabDisposal) -> Result<()> {
        self.disposed = true;

        match disposal {
            TabDisposal::Close => {
                debug!(tab_id = %self.tab.id(), "Session released, closing tab");
                self.tab.close().await
            }
            TabDisposal::Keep => {
                debug!(tab_id = %self.tab.id(), "Session released, tab kept open");
                Ok(())
            }
        }
    }
}

impl Drop for AutomationSession {
    fn drop(&mut self) {
        if !self.disposed {
            debug!(tab_id = %self.tab.id(), "Session dropped without dispose, closing tab");
            self.tab.close_detached();
        }
    }
}
