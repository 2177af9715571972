//! Reachability probing via the platform's `ping` utility.
//!
//! A single echo request is sent per probe by spawning the system `ping`
//! binary. This needs no raw-socket privileges and works identically for
//! every caller; the trade-off is a subprocess per probe, which the
//! coordinator's concurrency bound keeps manageable.

use crate::probe::ReachabilityProbe;
use crate::types::Liveness;
use async_trait::async_trait;
use std::net::Ipv4Addr;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::trace;

/// Grace period on top of the caller's timeout before the subprocess is
/// abandoned outright.
const HARD_TIMEOUT_GRACE: Duration = Duration::from_millis(500);

/// Reachability probe backed by the system `ping` command.
///
/// Stateless; a single instance can serve any number of concurrent probes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPing;

impl SystemPing {
    /// Create a new system ping probe.
    pub fn new() -> Self {
        Self
    }

    async fn run_ping(addr: Ipv4Addr, limit: Duration) -> bool {
        let target = addr.to_string();

        #[cfg(target_os = "windows")]
        let mut command = {
            let mut cmd = Command::new("ping");
            cmd.args(["-n", "1", "-w", &limit.as_millis().to_string(), &target]);
            cmd
        };

        // `-W` takes whole seconds on Linux; round sub-second timeouts up
        // so the hard timeout is what actually enforces them.
        #[cfg(not(target_os = "windows"))]
        let mut command = {
            let secs = limit.as_secs().max(1).to_string();
            let mut cmd = Command::new("ping");
            cmd.args(["-c", "1", "-W", &secs, &target]);
            cmd
        };

        command
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await
            .map(|status| status.success())
            .unwrap_or(false)
    }
}

#[async_trait]
impl ReachabilityProbe for SystemPing {
    async fn probe(&self, addr: Ipv4Addr, limit: Duration) -> Liveness {
        let hard_limit = limit + HARD_TIMEOUT_GRACE;

        let liveness = match timeout(hard_limit, Self::run_ping(addr, limit)).await {
            Ok(true) => Liveness::Online,
            // Non-zero exit, spawn failure, or hard timeout: all offline.
            Ok(false) | Err(_) => Liveness::Offline,
        };

        trace!(%addr, ?liveness, "reachability probe finished");
        liveness
    }
}
