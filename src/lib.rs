//! clipship - clip web pages to Google Drive or NotebookLM.
//!
//! This library captures the content of a page open in a
//! remotely-controlled browser and relays it to one of two destinations:
//! Google Drive (one authenticated multipart POST) or NotebookLM, which
//! exposes no API and is driven through its live web UI instead.
//!
//! # Architecture
//!
//! The crate follows a client-server model:
//!
//! - **Local End (Rust)**: sends tab/script/input commands over WebSocket
//! - **Remote End (companion extension)**: executes them in the browser
//!
//! On top of that bridge sit the page extractor, the content
//! transformers, and the two destination clients. The notebook client is
//! the interesting one: a state machine that opens a background tab,
//! waits out the page's asynchronous rendering with bounded polls, and
//! walks its DOM through an editor interaction, releasing the tab and
//! session on every exit path.
//!
//! Callers reach the engine through the [`relay`]: a tagged
//! request/response bridge to the background service task that owns the
//! browser connection.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::net::{IpAddr, Ipv4Addr};
//!
//! use clipship::transport::BridgeServer;
//! use clipship::{Browser, EnginePolicy, Relay, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Wait for the companion extension to dial in
//!     let server = BridgeServer::bind(IpAddr::V4(Ipv4Addr::LOCALHOST), 4580).await?;
//!     let (connection, ready) = server.accept().await?;
//!     let browser = Browser::new(connection, ready.session_id);
//!
//!     // The service task owns the automation; we keep a handle
//!     let relay = Relay::spawn(browser.clone(), EnginePolicy::default());
//!
//!     for notebook in relay.fetch_notebooks().await? {
//!         println!("{}: {}", notebook.id, notebook.name);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`auth`] | Bearer-token cache with soft expiration |
//! | [`browser`] | Browser entities: [`Browser`], [`Tab`] |
//! | [`clip`] | Extract → transform → destination pipeline |
//! | [`drive`] | Google Drive multipart upload client |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`notebook`] | Notebook automation engine (the core) |
//! | [`page`] | Page extraction |
//! | [`protocol`] | Bridge message types (internal) |
//! | [`relay`] | Request/response bridge to the service task |
//! | [`transform`] | Text and Markdown transformers |
//! | [`transport`] | WebSocket transport layer (internal) |

// ============================================================================
// Modules
// ============================================================================

/// Bearer-token cache with soft expiration.
pub mod auth;

/// Browser entities: [`Browser`], [`Tab`], [`Key`].
pub mod browser;

/// Extract → transform → destination pipeline.
pub mod clip;

/// Google Drive multipart upload client.
pub mod drive;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers for browser entities.
pub mod identifiers;

/// Notebook automation engine.
///
/// Drives the notes application's live web UI: listing notebooks and
/// injecting captured content, with guaranteed tab/session release.
pub mod notebook;

/// Page extraction.
pub mod page;

/// Bridge protocol message types.
pub mod protocol;

/// Request/response bridge between callers and the service task.
pub mod relay;

/// Content transformers.
pub mod transform;

/// WebSocket transport layer.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Browser types
pub use browser::{Browser, Key, LoadState, Tab, TabStatus};

// Pipeline types
pub use clip::{ClipOutcome, ClipRequest, Clipper, Destination};

// Destination clients
pub use auth::{GrantedToken, TokenProvider, TokenStore};
pub use drive::DriveClient;

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{RequestId, SessionId, TabId};

// Engine types
pub use notebook::{EnginePolicy, NotebookInfo, list_notebooks, upload_to_notebook};

// Page and transform types
pub use page::{PageData, extract_page};
pub use transform::{Format, UploadData};

// Relay types
pub use relay::{Relay, RelayHandle};
