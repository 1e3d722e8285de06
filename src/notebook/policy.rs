//! Engine timing and disposal policy.
//!
//! Every poll interval, attempt cap, and step delay the engine uses is a
//! tunable policy value, not a contract. The defaults mirror how long the
//! target page takes to render in practice.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Root URL of the notes application.
const ROOT_URL: &str = "https://notebooklm.google.com/";

// ============================================================================
// EnginePolicy
// ============================================================================

/// Tunable policy for the notebook automation engine.
///
/// # Defaults
///
/// | Field | Default | Used for |
/// |-------|---------|----------|
/// | `poll_interval` | 500 ms | spacing between poll attempts |
/// | `load_attempts` | 20 | navigation-complete poll |
/// | `list_attempts` | 10 | landing-page notebook poll |
/// | `shell_attempts` | 20 | editor-shell readiness poll |
/// | `settle_delay` | 2 s | after navigation completes |
/// | `editor_delay` | 1.5 s | editor render after opening it |
/// | `save_delay` | 1 s | before scanning for the save control |
/// | `submit_delay` | 2 s | letting the save land |
/// | `keep_tab_on_success` | `true` | tab disposal after success |
#[derive(Debug, Clone)]
pub struct EnginePolicy {
    /// Root URL of the notes application.
    pub root_url: Url,
    /// Spacing between poll attempts.
    pub poll_interval: Duration,
    /// Attempts for the navigation-complete poll.
    pub load_attempts: u32,
    /// Attempts for the landing-page notebook poll.
    pub list_attempts: u32,
    /// Attempts for the editor-shell readiness poll.
    pub shell_attempts: u32,
    /// Delay after navigation completes, before probing the page.
    pub settle_delay: Duration,
    /// Delay for the editor to render after invoking the add control.
    pub editor_delay: Duration,
    /// Delay before scanning for the save control.
    pub save_delay: Duration,
    /// Delay after clicking save, letting the save land.
    pub submit_delay: Duration,
    /// Whether a successfully used tab stays open for user review.
    ///
    /// Failure always closes the tab; this flag only governs success.
    pub keep_tab_on_success: bool,
}

impl Default for EnginePolicy {
    fn default() -> Self {
        Self {
            root_url: Url::parse(ROOT_URL).expect("static root URL"),
            poll_interval: Duration::from_millis(500),
            load_attempts: 20,
            list_attempts: 10,
            shell_attempts: 20,
            settle_delay: Duration::from_secs(2),
            editor_delay: Duration::from_millis(1500),
            save_delay: Duration::from_secs(1),
            submit_delay: Duration::from_secs(2),
            keep_tab_on_success: true,
        }
    }
}

impl EnginePolicy {
    /// Returns the URL of a specific notebook page.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the notebook id does not form a valid
    /// URL path segment.
    pub fn notebook_url(&self, notebook_id: &str) -> Result<Url> {
        self.root_url
            .join(&format!("notebook/{notebook_id}"))
            .map_err(|e| Error::config(format!("invalid notebook URL: {e}")))
    }

    /// Sets the root URL (used by tests pointing at fixtures).
    #[must_use]
    pub fn with_root_url(mut self, root_url: Url) -> Self {
        self.root_url = root_url;
        self
    }

    /// Sets the tab disposal flag for successful uploads.
    #[must_use]
    pub fn with_keep_tab_on_success(mut self, keep: bool) -> Self {
        self.keep_tab_on_success = keep;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
