//! WebSocket transport layer.
//!
//! This module handles communication between the local end (Rust) and
//! the remote end (the companion extension) via WebSocket.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  Browser (Rust) │                              │  Companion      │
//! │                 │         WebSocket            │  Extension      │
//! │  BridgeServer   │◄────────────────────────────►│                 │
//! │  → Connection   │      localhost:PORT          │  WebSocket      │
//! │                 │                              │  Client         │
//! └─────────────────┘                              └─────────────────┘
//! ```
//!
//! # Connection Lifecycle
//!
//! 1. `BridgeServer::bind` - Bind to localhost
//! 2. The companion extension dials the WebSocket URL
//! 3. `BridgeServer::accept` - Wait for the extension, READY handshake
//! 4. `Connection` - Send commands, receive correlated responses
//! 5. `Connection::shutdown` - Close connection explicitly
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `connection` | WebSocket connection and correlation loop |
//! | `server` | WebSocket server binding and acceptance |

// ============================================================================
// Submodules
// ============================================================================

/// WebSocket connection and correlation loop.
pub mod connection;

/// WebSocket server the companion extension connects to.
pub mod server;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::{Connection, ReadyData};
pub use server::BridgeServer;
