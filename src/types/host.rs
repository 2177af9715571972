//! Per-host scan results and the accumulated session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;

/// Whether a host answered the reachability probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Liveness {
    /// Host answered within the timeout.
    Online,
    /// No answer, or the probe could not be performed. The two are
    /// indistinguishable by design.
    Offline,
}

impl Liveness {
    /// Check if the host was reachable.
    pub const fn is_online(self) -> bool {
        matches!(self, Self::Online)
    }
}

impl fmt::Display for Liveness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Online => write!(f, "Online"),
            Self::Offline => write!(f, "Offline"),
        }
    }
}

/// The outcome of probing a single host.
///
/// Created exactly once per enumerated address and immutable afterwards.
/// `open_ports` is always an order-preserving subset of the fixed probe
/// list and is empty whenever the host is offline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostResult {
    /// The probed address.
    pub addr: Ipv4Addr,
    /// Reachability outcome.
    pub liveness: Liveness,
    /// Open TCP ports, in canonical probe order.
    pub open_ports: Vec<u16>,
}

impl HostResult {
    /// Result for a host that did not answer the reachability probe.
    pub fn offline(addr: Ipv4Addr) -> Self {
        Self {
            addr,
            liveness: Liveness::Offline,
            open_ports: Vec::new(),
        }
    }

    /// Result for a reachable host with the given open ports.
    pub fn online(addr: Ipv4Addr, open_ports: Vec<u16>) -> Self {
        Self {
            addr,
            liveness: Liveness::Online,
            open_ports,
        }
    }

    /// Check if the host was reachable.
    pub fn is_online(&self) -> bool {
        self.liveness.is_online()
    }

    /// Open ports joined for display, e.g. `"22, 80"`.
    pub fn ports_display(&self) -> String {
        self.open_ports
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for HostResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.open_ports.is_empty() {
            write!(f, "{} {}", self.addr, self.liveness)
        } else {
            write!(f, "{} {} [{}]", self.addr, self.liveness, self.ports_display())
        }
    }
}

/// The accumulated results of one complete (or cancelled) sweep.
///
/// The coordinator owns results while a sweep runs; a session is the
/// immutable snapshot handed to the caller afterwards, suitable for
/// export or serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSession {
    /// When the sweep started.
    pub started_at: DateTime<Utc>,
    /// When the sweep finished or was cancelled.
    pub completed_at: DateTime<Utc>,
    /// Per-host results in completion order.
    pub results: Vec<HostResult>,
}

impl ScanSession {
    /// Snapshot a finished sweep.
    pub fn new(started_at: DateTime<Utc>, results: Vec<HostResult>) -> Self {
        Self {
            started_at,
            completed_at: Utc::now(),
            results,
        }
    }

    /// Number of hosts probed.
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Number of hosts found online.
    pub fn online_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_online()).count()
    }

    /// Wall-clock duration of the sweep in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        (self.completed_at - self.started_at)
            .num_milliseconds()
            .max(0) as u64
    }

    /// One-line summary of the sweep.
    pub fn summary(&self) -> String {
        format!(
            "{} hosts probed, {} online [{:.2}s]",
            self.total(),
            self.online_count(),
            self.duration_ms() as f64 / 1000.0
        )
    }
}
