//! Notebook automation engine.
//!
//! NotebookLM exposes no API, so this engine drives its live web UI
//! through the bridge: it opens a tab, attaches to it for the duration of
//! exactly one operation, and walks the page through a scripted
//! interaction sequence using bounded polls and fixed delays.
//!
//! # Operations
//!
//! | Operation | Module | Tab on exit |
//! |-----------|--------|-------------|
//! | [`list_notebooks`] | `listing` | always closed |
//! | [`upload_to_notebook`] | `upload` | success: per policy; failure: closed |
//!
//! # Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | `policy` | Timing, attempt caps, tab disposal |
//! | `dom` | Selector/probe/injection scripts (the third-party seam) |
//! | `session` | Tab ownership with guaranteed release |
//! | `listing` | Notebook enumeration |
//! | `upload` | Upload state machine |
//!
//! The one invariant every path preserves: the session's tab and the
//! bridge attachment are released on success, failure, and timeout alike.

// ============================================================================
// Submodules
// ============================================================================

/// Selector and script adapter for the notes application.
pub mod dom;

/// Notebook enumeration.
mod listing;

/// Engine timing and disposal policy.
mod policy;

/// Tab-owning session guard.
mod session;

/// Upload state machine.
mod upload;

// ============================================================================
// Re-exports
// ============================================================================

pub use dom::NotebookDom;
pub use listing::list_notebooks;
pub use policy::EnginePolicy;
pub use session::TabDisposal;
pub use upload::upload_to_notebook;

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

// ============================================================================
// Constants
// ============================================================================

/// Suffix the landing page appends to notebook title element ids.
pub const TITLE_SUFFIX: &str = "-title";

// ============================================================================
// NotebookInfo
// ============================================================================

/// One notebook discovered on the landing page.
///
/// The `id` is derived by stripping [`TITLE_SUFFIX`] from a DOM element
/// id. That derivation is a structural assumption about the target page,
/// not a guaranteed contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotebookInfo {
    /// Notebook identifier.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// Strips every trailing [`TITLE_SUFFIX`] from an element id.
///
/// Total over all inputs and idempotent: applying it to its own output
/// changes nothing.
#[must_use]
pub fn strip_title_suffix(id: &str) -> &str {
    let mut id = id;
    while let Some(stripped) = id.strip_suffix(TITLE_SUFFIX) {
        id = stripped;
    }
    id
}

// ============================================================================
// Tests
// ============================================================================
