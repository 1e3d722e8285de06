//! Command definitions organized by module.
//!
//! Commands follow `module.methodName` format.
//!
//! # Command Modules
//!
//! | Module | Commands |
//! |--------|----------|
//! | `tabs` | Tab lifecycle: create, navigate, activate, status, query, close |
//! | `script` | JavaScript evaluation in the page |
//! | `input` | Synthetic keyboard dispatch |

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Command Wrapper
// ============================================================================

/// All protocol commands organized by module.
///
/// This enum wraps module-specific command enums for unified serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Command {
    /// Tabs module commands.
    Tabs(TabsCommand),
    /// Script module commands.
    Script(ScriptCommand),
    /// Input module commands.
    Input(InputCommand),
}

// ============================================================================
// Tabs Commands
// ============================================================================

/// Tabs module commands for tab lifecycle management.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum TabsCommand {
    /// Create a new tab.
    ///
    /// Responds with `{"tabId": u32}`.
    #[serde(rename = "tabs.create")]
    Create {
        /// URL to open in the new tab.
        url: String,
        /// Whether the tab should be foregrounded on creation.
        active: bool,
    },

    /// Navigate the target tab to a URL.
    #[serde(rename = "tabs.navigate")]
    Navigate {
        /// URL to navigate to.
        url: String,
    },

    /// Make the target tab the active (foreground) tab.
    #[serde(rename = "tabs.activate")]
    Activate,

    /// Report the target tab's load status.
    ///
    /// Responds with `{"status": "loading"|"complete", "url": "..."}`.
    #[serde(rename = "tabs.status")]
    Status,

    /// Report the currently active tab.
    ///
    /// Responds with `{"tabId": u32|null, "url": "...", "title": "..."}`.
    #[serde(rename = "tabs.queryActive")]
    QueryActive,

    /// Close the target tab.
    #[serde(rename = "tabs.close")]
    Close,
}

// ============================================================================
// Script Commands
// ============================================================================

/// Script module commands for JavaScript evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum ScriptCommand {
    /// Evaluate JavaScript in the target tab's page context.
    ///
    /// The script should use `return` to produce a value. Responds with
    /// `{"value": <json>}`.
    #[serde(rename = "script.evaluate")]
    Evaluate {
        /// Script source.
        script: String,
        /// Positional arguments exposed to the script.
        args: Vec<Value>,
    },
}

// ============================================================================
// Input Commands
// ============================================================================

/// Input module commands for synthetic keyboard dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum InputCommand {
    /// Dispatch a keydown/keyup pair to the target tab.
    #[serde(rename = "input.sendKey")]
    SendKey {
        /// DOM `key` value (e.g. "Escape").
        key: String,
        /// DOM `code` value (e.g. "Escape").
        code: String,
        /// Legacy `keyCode` value.
        #[serde(rename = "keyCode")]
        key_code: u32,
    },
}

// ============================================================================
// Tests
// ============================================================================
