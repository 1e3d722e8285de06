//! WebSocket server the companion extension connects to.
//!
//! # Connection Flow
//!
//! 1. Rust binds a WebSocket server to localhost
//! 2. The companion extension inside the browser dials the WebSocket URL
//! 3. The extension sends a READY message carrying its session ID
//! 4. Connection established, ready for commands

// ============================================================================
// Imports
// ============================================================================

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::time::timeout;
use tracing::{debug, info};

use crate::error::{Error, Result};

use super::Connection;
use super::connection::ReadyData;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for waiting for the extension to connect.
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// BridgeServer
// ============================================================================

/// A WebSocket server that is bound but not yet connected.
///
/// Represents the state between binding to a port and accepting the
/// companion extension's connection.
///
/// # Example
///
/// ```ignore
/// use std::net::{IpAddr, Ipv4Addr};
/// use clipship::transport::BridgeServer;
///
/// let server = BridgeServer::bind(IpAddr::V4(Ipv4Addr::LOCALHOST), 0).await?;
/// let ws_url = server.ws_url();
///
/// // Point the companion extension at ws_url...
///
/// let (connection, ready) = server.accept().await?;
/// ```
pub struct BridgeServer {
    /// TCP listener for the incoming connection.
    listener: TcpListener,
    /// Port the server is bound to.
    port: u16,
}

impl BridgeServer {
    /// Binds a WebSocket server to the specified address and port.
    ///
    /// Use port 0 to let the OS assign a random available port.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if binding fails.
    pub async fn bind(ip: IpAddr, port: u16) -> Result<Self> {
        let addr = SocketAddr::new(ip, port);
        let listener = TcpListener::bind(addr).await?;
        let actual_port = listener.local_addr()?.port();

        debug!(port = actual_port, "Bridge server bound");

        Ok(Self {
            listener,
            port: actual_port,
        })
    }

    /// Returns the port the server is bound to.
    #[inline]
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Returns the WebSocket URL for this server.
    ///
    /// Format: `ws://127.0.0.1:{port}`
    #[inline]
    #[must_use]
    pub fn ws_url(&self) -> String {
        format!("ws://127.0.0.1:{}", self.port)
    }

    /// Accepts the companion extension's connection and completes the
    /// handshake.
    ///
    /// This method:
    /// 1. Waits for the TCP connection (with timeout)
    /// 2. Upgrades to WebSocket
    /// 3. Waits for the READY handshake message
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionTimeout`] if the extension does not connect in time
    /// - [`Error::Connection`] if the WebSocket upgrade fails
    /// - [`Error::Protocol`] if the READY handshake fails
    pub async fn accept(self) -> Result<(Connection, ReadyData)> {
        let accept_result = timeout(CONNECTION_TIMEOUT, self.listener.accept()).await;

        let (stream, addr) = accept_result
            .map_err(|_| Error::connection_timeout(CONNECTION_TIMEOUT.as_millis() as u64))??;

        debug!(?addr, "TCP connection accepted");

        let ws_stream = tokio_tungstenite::accept_async(stream)
            .await
            .map_err(|e| Error::connection(format!("WebSocket upgrade failed: {e}")))?;

        info!(port = self.port, "Bridge connection established");

        let connection = Connection::new(ws_stream);
        let ready = connection.wait_ready().await?;

        Ok((connection, ready))
    }
}

// ============================================================================
// Tests
// ============================================================================
