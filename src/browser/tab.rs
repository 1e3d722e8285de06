//! Browser tab handle.
//!
//! Each [`Tab`] is a cloneable handle addressing one tab through the
//! bridge connection. Tab methods cover the automation surface this crate
//! needs: navigation, load polling, script evaluation, key dispatch, and
//! closing.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::identifiers::TabId;
use crate::protocol::{Command, InputCommand, Request, ScriptCommand, TabsCommand};
use crate::transport::Connection;

use super::Key;

// ============================================================================
// LoadState
// ============================================================================

/// Load status of a tab as reported by the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// The tab is still loading.
    Loading,
    /// The tab has finished loading.
    Complete,
}

impl LoadState {
    /// Parses the browser's status string.
    ///
    /// Anything other than `"complete"` counts as loading.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw == "complete" {
            Self::Complete
        } else {
            Self::Loading
        }
    }
}

/// Snapshot of a tab's status.
#[derive(Debug, Clone)]
pub struct TabStatus {
    /// Load state.
    pub state: LoadState,
    /// Current URL.
    pub url: String,
}

// ============================================================================
// Tab
// ============================================================================

/// A handle to a browser tab.
///
/// Tabs provide navigation, script evaluation, and key dispatch. Cloning
/// is cheap; clones address the same tab.
#[derive(Clone)]
pub struct Tab {
    /// Bridge connection.
    connection: Connection,
    /// Tab ID.
    id: TabId,
}

impl fmt::Debug for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tab").field("id", &self.id).finish()
    }
}

impl Tab {
    /// Creates a new tab handle.
    pub(crate) fn new(connection: Connection, id: TabId) -> Self {
        Self { connection, id }
    }

    /// Returns the tab ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> TabId {
        self.id
    }

    /// Sends a command scoped to this tab and unwraps the result payload.
    async fn send_command(&self, command: Command) -> Result<Value> {
        let request = Request::for_tab(self.id, command);
        self.connection.send(request).await?.into_result()
    }
}

// ============================================================================
// Tab - Navigation
// ============================================================================

impl Tab {
    /// Navigates to a URL.
    pub async fn navigate(&self, url: &str) -> Result<()> {
        debug!(url = %url, tab_id = %self.id, "Navigating");

        self.send_command(Command::Tabs(TabsCommand::Navigate {
            url: url.to_string(),
        }))
        .await?;
        Ok(())
    }

    /// Makes this tab the active (foreground) tab.
    ///
    /// Some page controls ignore synthetic events while their tab is
    /// backgrounded, so automation foregrounds the tab before interacting.
    pub async fn activate(&self) -> Result<()> {
        debug!(tab_id = %self.id, "Activating tab");
        self.send_command(Command::Tabs(TabsCommand::Activate))
            .await?;
        Ok(())
    }

    /// Reports the tab's load status.
    pub async fn status(&self) -> Result<TabStatus> {
        let result = self.send_command(Command::Tabs(TabsCommand::Status)).await?;

        let state = LoadState::parse(
            result
                .get("status")
                .and_then(|v| v.as_str())
                .unwrap_or("loading"),
        );
        let url = result
            .get("url")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        Ok(TabStatus { state, url })
    }

    /// Waits for the tab to finish loading.
    ///
    /// Polls [`Tab::status`] up to `attempts` times, `interval` apart.
    /// The browser pushes no load-completion signal over the bridge, so
    /// readiness is polled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`] when the attempts are exhausted.
    pub async fn wait_for_load(&self, attempts: u32, interval: Duration) -> Result<()> {
        for attempt in 1..=attempts {
            let status = self.status().await?;
            if status.state == LoadState::Complete {
                debug!(tab_id = %self.id, attempt, "Tab load complete");
                return Ok(());
            }

            trace!(tab_id = %self.id, attempt, "Tab still loading");
            sleep(interval).await;
        }

        Err(Error::timeout(
            format!("load of tab {}", self.id),
            u64::from(attempts) * interval.as_millis() as u64,
        ))
    }

    /// Closes this tab.
    pub async fn close(&self) -> Result<()> {
        debug!(tab_id = %self.id, "Closing tab");
        self.send_command(Command::Tabs(TabsCommand::Close)).await?;
        Ok(())
    }

    /// Issues a close for this tab without waiting for the response.
    ///
    /// Used by teardown backstops (e.g. `Drop`) that cannot await.
    pub fn close_detached(&self) {
        debug!(tab_id = %self.id, "Closing tab (detached)");
        let request = Request::for_tab(self.id, Command::Tabs(TabsCommand::Close));
        self.connection.post(request);
    }
}

// ============================================================================
// Tab - Script Execution
// ============================================================================

impl Tab {
    /// Evaluates JavaScript in the page context.
    ///
    /// The script should use `return` to produce a value.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let title = tab.evaluate("return document.title").await?;
    /// ```
    pub async fn evaluate(&self, script: &str) -> Result<Value> {
        self.evaluate_with_args(script, vec![]).await
    }

    /// Evaluates JavaScript with positional arguments.
    pub async fn evaluate_with_args(&self, script: &str, args: Vec<Value>) -> Result<Value> {
        debug!(tab_id = %self.id, script_len = script.len(), "Evaluating script");

        let result = self
            .send_command(Command::Script(ScriptCommand::Evaluate {
                script: script.to_string(),
                args,
            }))
            .await?;

        Ok(result.get("value").cloned().unwrap_or(Value::Null))
    }
}

// ============================================================================
// Tab - Input
// ============================================================================

impl Tab {
    /// Dispatches a keydown/keyup pair to the page.
    pub async fn send_key(&self, key: Key) -> Result<()> {
        debug!(tab_id = %self.id, key = key.key(), "Sending key");

        self.send_command(Command::Input(InputCommand::SendKey {
            key: key.key().to_string(),
            code: key.code().to_string(),
            key_code: key.key_code(),
        }))
        .await?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_state_parse() {
        assert_eq!(LoadState::parse("complete"), LoadState::Complete);
        assert_eq!(LoadState::parse("loading"), LoadState::Loading);
        assert_eq!(LoadState::parse(""), LoadState::Loading);
    }

    #[test]
    fn test_tab_is_clone_and_debug() {
        fn assert_clone<T: Clone>() {}
        fn assert_debug<T: std::fmt::Debug>() {}
        assert_clone::<Tab>();
        assert_debug::<Tab>();
    }
}
