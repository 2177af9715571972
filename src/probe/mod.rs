//! Probe primitives - reachability and port-liveness checks.
//!
//! Both probes are deliberately infallible: every failure mode (timeout,
//! refused connection, unreachable network, missing permissions) collapses
//! into the negative outcome. The sweep reports binary liveness/openness,
//! not diagnostics.

mod ping;
mod tcp;

pub use ping::SystemPing;
pub use tcp::TcpConnectProbe;

use crate::types::Liveness;
use async_trait::async_trait;
use std::fmt;
use std::net::Ipv4Addr;
use std::time::Duration;

/// The fixed set of service ports checked on every online host,
/// in canonical probe order: SSH, HTTP, HTTPS.
pub const PROBE_PORTS: [u16; 3] = [22, 80, 443];

/// State of a probed TCP port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortState {
    /// A connection was accepted within the timeout.
    Open,
    /// Refused, timed out, or errored. The cases are conflated by design.
    Closed,
}

impl PortState {
    /// Check if the port accepted a connection.
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

impl fmt::Display for PortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Determines whether a host answers a liveness check.
///
/// Implementations must be safe to call concurrently from many worker
/// tasks; any per-probe state is created and released within one call.
#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    /// Probe a single address, resolving within roughly `timeout`.
    /// Never fails; "cannot determine" is reported as [`Liveness::Offline`].
    async fn probe(&self, addr: Ipv4Addr, timeout: Duration) -> Liveness;
}

/// Checks whether a TCP port on a live host accepts connections.
#[async_trait]
pub trait PortProbe: Send + Sync {
    /// Probe one (address, port) pair, resolving within roughly `timeout`.
    /// Never fails; any socket error is reported as [`PortState::Closed`].
    async fn probe(&self, addr: Ipv4Addr, port: u16, timeout: Duration) -> PortState;
}
