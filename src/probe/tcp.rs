//! Port probing via plain TCP connect.
//!
//! Uses the operating system's socket API through tokio. A completed
//! handshake within the timeout means open; everything else means closed.
//! No special privileges required.

use crate::probe::{PortProbe, PortState};
use async_trait::async_trait;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

/// TCP connect port probe.
///
/// Stateless; each probe owns its socket exclusively and releases it
/// before returning.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnectProbe;

impl TcpConnectProbe {
    /// Create a new TCP connect probe.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PortProbe for TcpConnectProbe {
    async fn probe(&self, addr: Ipv4Addr, port: u16, limit: Duration) -> PortState {
        let socket_addr = SocketAddr::new(IpAddr::V4(addr), port);

        let state = match timeout(limit, TcpStream::connect(socket_addr)).await {
            Ok(Ok(stream)) => {
                drop(stream);
                PortState::Open
            }
            // Refused, unreachable, or timed out: closed either way.
            Ok(Err(_)) | Err(_) => PortState::Closed,
        };

        trace!(%addr, port, ?state, "port probe finished");
        state
    }
}
