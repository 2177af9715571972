//! Sweep coordination - bounded worker pool, result stream, cancellation.
//!
//! The coordinator enumerates the full address list up front, then spawns a
//! fixed pool of worker tasks that pull the next address from a shared
//! cursor. Each worker runs the reachability probe and, for online hosts,
//! the port probes, then publishes exactly one [`HostResult`] on the result
//! channel the moment it is ready. Results therefore arrive in completion
//! order; a slow or unreachable host never stalls the rest of the sweep.

use crate::error::RangeResult;
use crate::probe::{
    PortProbe, ReachabilityProbe, SystemPing, TcpConnectProbe, PROBE_PORTS,
};
use crate::types::{HostResult, Liveness, ScanSession, ScanTarget};
use chrono::{DateTime, Utc};
use futures::Stream;
use std::net::Ipv4Addr;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

/// Tuning knobs for a sweep.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Maximum number of hosts probed at the same instant.
    ///
    /// Unbounded sweeps exhaust file descriptors and process limits on
    /// large ranges, so this is a hard cap, not a hint.
    pub concurrency: usize,
    /// Timeout for the reachability probe of one host.
    pub reachability_timeout: Duration,
    /// Timeout for each individual port probe.
    pub port_timeout: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            concurrency: 50,
            reachability_timeout: Duration::from_secs(1),
            port_timeout: Duration::from_secs(1),
        }
    }
}

impl ScanConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the concurrency cap (clamped to at least 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Set the reachability probe timeout.
    pub fn with_reachability_timeout(mut self, timeout: Duration) -> Self {
        self.reachability_timeout = timeout;
        self
    }

    /// Set the per-port probe timeout.
    pub fn with_port_timeout(mut self, timeout: Duration) -> Self {
        self.port_timeout = timeout;
        self
    }
}

/// Orchestrates a sweep across many hosts concurrently.
///
/// Holds the probe implementations behind trait objects so tests can
/// substitute scripted doubles for the real network probes.
pub struct ScanCoordinator {
    config: ScanConfig,
    reachability: Arc<dyn ReachabilityProbe>,
    port_probe: Arc<dyn PortProbe>,
}

impl ScanCoordinator {
    /// Create a coordinator using the real network probes.
    pub fn new(config: ScanConfig) -> Self {
        Self::with_probes(
            config,
            Arc::new(SystemPing::new()),
            Arc::new(TcpConnectProbe::new()),
        )
    }

    /// Create a coordinator with injected probe implementations.
    pub fn with_probes(
        config: ScanConfig,
        reachability: Arc<dyn ReachabilityProbe>,
        port_probe: Arc<dyn PortProbe>,
    ) -> Self {
        Self {
            config,
            reachability,
            port_probe,
        }
    }

    /// Validate range strings and start a sweep.
    ///
    /// Fails fast with a [`crate::error::RangeError`] before any task is
    /// launched if a range is malformed; no partial sweep ever begins.
    pub fn scan<S: AsRef<str>>(&self, ranges: &[S]) -> RangeResult<ScanStream> {
        let target = ScanTarget::parse(ranges)?;
        Ok(self.start(&target))
    }

    /// Start a sweep over an already-validated target.
    ///
    /// Spawns `min(concurrency, host_count)` long-lived workers pulling
    /// addresses from a shared cursor. The returned stream yields one
    /// result per enumerated address and ends once every worker has
    /// drained its share.
    pub fn start(&self, target: &ScanTarget) -> ScanStream {
        let addrs: Arc<Vec<Ipv4Addr>> = Arc::new(target.addresses().collect());
        let total = addrs.len();

        let (tx, rx) = mpsc::unbounded_channel();
        let cancelled = Arc::new(AtomicBool::new(false));
        let cursor = Arc::new(AtomicUsize::new(0));

        let workers = self.config.concurrency.min(total).max(1);
        debug!(total, workers, "starting sweep");

        for worker_id in 0..workers {
            let addrs = Arc::clone(&addrs);
            let cursor = Arc::clone(&cursor);
            let cancelled = Arc::clone(&cancelled);
            let tx = tx.clone();
            let reachability = Arc::clone(&self.reachability);
            let port_probe = Arc::clone(&self.port_probe);
            let config = self.config.clone();

            tokio::spawn(async move {
                loop {
                    if cancelled.load(Ordering::Acquire) {
                        debug!(worker_id, "worker stopping: sweep cancelled");
                        break;
                    }

                    let index = cursor.fetch_add(1, Ordering::Relaxed);
                    let Some(&addr) = addrs.get(index) else {
                        break;
                    };

                    let result =
                        probe_host(addr, &*reachability, &*port_probe, &config).await;

                    // Send fails only when the consumer dropped the stream;
                    // nothing left to report to in that case.
                    if tx.send(result).is_err() {
                        break;
                    }
                }
            });
        }

        // Workers hold the only remaining senders; the stream closes when
        // the last of them exits.
        drop(tx);

        ScanStream {
            rx,
            cancelled,
            total,
            started_at: Utc::now(),
        }
    }
}

/// Probe a single host: reachability first, then the fixed port list.
///
/// Port probes run sequentially in canonical order, so the reported set
/// needs no reordering.
async fn probe_host(
    addr: Ipv4Addr,
    reachability: &dyn ReachabilityProbe,
    port_probe: &dyn PortProbe,
    config: &ScanConfig,
) -> HostResult {
    match reachability.probe(addr, config.reachability_timeout).await {
        Liveness::Offline => HostResult::offline(addr),
        Liveness::Online => {
            let mut open_ports = Vec::new();
            for &port in &PROBE_PORTS {
                let state = port_probe.probe(addr, port, config.port_timeout).await;
                if state.is_open() {
                    open_ports.push(port);
                }
            }
            HostResult::online(addr, open_ports)
        }
    }
}

/// Requests cooperative cancellation of a running sweep.
///
/// Cancelling prevents workers from starting any further host; probes
/// already in flight run to their own timeout and their results are still
/// delivered. Results emitted before cancellation remain valid.
#[derive(Debug, Clone)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// The live result stream of one sweep.
///
/// Yields [`HostResult`]s in completion order and ends once every
/// dispatched host has reported (or, after cancellation, once the
/// in-flight hosts have drained).
#[derive(Debug)]
pub struct ScanStream {
    rx: mpsc::UnboundedReceiver<HostResult>,
    cancelled: Arc<AtomicBool>,
    total: usize,
    started_at: DateTime<Utc>,
}

impl ScanStream {
    /// Receive the next completed result, or `None` at end of stream.
    pub async fn recv(&mut self) -> Option<HostResult> {
        self.rx.recv().await
    }

    /// Number of addresses dispatched for this sweep.
    pub fn total_hosts(&self) -> usize {
        self.total
    }

    /// When the sweep started.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Get a handle that can cancel this sweep from another task.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle(Arc::clone(&self.cancelled))
    }

    /// Drain the stream to completion and snapshot it as a session.
    pub async fn collect_session(mut self) -> ScanSession {
        let mut results = Vec::with_capacity(self.total);
        while let Some(result) = self.rx.recv().await {
            results.push(result);
        }
        ScanSession::new(self.started_at, results)
    }
}

impl Stream for ScanStream {
    type Item = HostResult;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::PortState;
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};

    /// Scripted reachability probe that tracks concurrency high-water mark.
    struct ScriptedPing {
        online: HashSet<Ipv4Addr>,
        delay: Duration,
        calls: Arc<AtomicUsize>,
        active: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
    }

    impl ScriptedPing {
        fn new(online: impl IntoIterator<Item = &'static str>) -> Self {
            Self {
                online: online.into_iter().map(|s| s.parse().unwrap()).collect(),
                delay: Duration::ZERO,
                calls: Arc::new(AtomicUsize::new(0)),
                active: Arc::new(AtomicUsize::new(0)),
                peak: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    #[async_trait]
    impl ReachabilityProbe for ScriptedPing {
        async fn probe(&self, addr: Ipv4Addr, _timeout: Duration) -> Liveness {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            self.active.fetch_sub(1, Ordering::SeqCst);
            if self.online.contains(&addr) {
                Liveness::Online
            } else {
                Liveness::Offline
            }
        }
    }

    /// Scripted port probe answering from a fixed table.
    struct ScriptedPorts {
        open: HashMap<Ipv4Addr, Vec<u16>>,
    }

    impl ScriptedPorts {
        fn new(open: impl IntoIterator<Item = (&'static str, Vec<u16>)>) -> Self {
            Self {
                open: open
                    .into_iter()
                    .map(|(addr, ports)| (addr.parse().unwrap(), ports))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl PortProbe for ScriptedPorts {
        async fn probe(&self, addr: Ipv4Addr, port: u16, _timeout: Duration) -> PortState {
            if self.open.get(&addr).is_some_and(|ports| ports.contains(&port)) {
                PortState::Open
            } else {
                PortState::Closed
            }
        }
    }

    fn coordinator(ping: ScriptedPing, ports: ScriptedPorts, config: ScanConfig) -> ScanCoordinator {
        ScanCoordinator::with_probes(config, Arc::new(ping), Arc::new(ports))
    }

    #[test]
    fn default_config() {
        let config = ScanConfig::default();
        assert_eq!(config.concurrency, 50);
        assert_eq!(config.reachability_timeout, Duration::from_secs(1));
        assert_eq!(config.port_timeout, Duration::from_secs(1));
    }

    #[test]
    fn concurrency_is_clamped_to_one() {
        let config = ScanConfig::new().with_concurrency(0);
        assert_eq!(config.concurrency, 1);
    }

    #[tokio::test]
    async fn slash_30_scenario() {
        let ping = ScriptedPing::new(["10.0.0.1", "10.0.0.2"]);
        let ports = ScriptedPorts::new([
            ("10.0.0.1", vec![80]),
            ("10.0.0.2", vec![80]),
        ]);
        let coord = coordinator(ping, ports, ScanConfig::default());

        let stream = coord.scan(&["10.0.0.0/30"]).unwrap();
        let session = stream.collect_session().await;

        assert_eq!(session.total(), 4);
        assert_eq!(session.online_count(), 2);
        for result in &session.results {
            if result.is_online() {
                assert_eq!(result.open_ports, vec![80]);
            } else {
                assert!(result.open_ports.is_empty());
            }
        }
    }

    #[tokio::test]
    async fn every_address_appears_exactly_once() {
        let ping = ScriptedPing::new(["192.168.0.5"]);
        let ports = ScriptedPorts::new([]);
        let coord = coordinator(ping, ports, ScanConfig::new().with_concurrency(8));

        let target = ScanTarget::parse(["192.168.0.0/27"]).unwrap();
        let expected: HashSet<Ipv4Addr> = target.addresses().collect();

        let session = coord.start(&target).collect_session().await;
        let seen: HashSet<Ipv4Addr> = session.results.iter().map(|r| r.addr).collect();

        assert_eq!(session.total(), 32);
        assert_eq!(seen, expected);
    }

    #[tokio::test]
    async fn offline_hosts_never_have_open_ports() {
        // Port table claims ports open even for hosts the ping marks
        // offline; the coordinator must never ask about them.
        let ping = ScriptedPing::new(["10.1.0.1"]);
        let ports = ScriptedPorts::new([
            ("10.1.0.1", vec![22]),
            ("10.1.0.2", vec![22, 80, 443]),
        ]);
        let coord = coordinator(ping, ports, ScanConfig::default());

        let session = coord.scan(&["10.1.0.0/30"]).unwrap().collect_session().await;
        for result in &session.results {
            if !result.is_online() {
                assert!(result.open_ports.is_empty(), "offline host {result}");
            }
        }
    }

    #[tokio::test]
    async fn open_ports_preserve_canonical_order() {
        let ping = ScriptedPing::new(["10.2.0.1"]);
        // Table order deliberately scrambled.
        let ports = ScriptedPorts::new([("10.2.0.1", vec![443, 22])]);
        let coord = coordinator(ping, ports, ScanConfig::default());

        let session = coord.scan(&["10.2.0.1/32"]).unwrap().collect_session().await;
        assert_eq!(session.results[0].open_ports, vec![22, 443]);
    }

    #[tokio::test]
    async fn concurrency_bound_is_respected() {
        let ping = ScriptedPing::new([]).with_delay(Duration::from_millis(10));
        let peak = Arc::clone(&ping.peak);
        let ports = ScriptedPorts::new([]);
        let coord = coordinator(ping, ports, ScanConfig::new().with_concurrency(8));

        let session = coord.scan(&["10.3.0.0/26"]).unwrap().collect_session().await;

        assert_eq!(session.total(), 64);
        assert!(
            peak.load(Ordering::SeqCst) <= 8,
            "peak concurrency {} exceeded the cap",
            peak.load(Ordering::SeqCst)
        );
    }

    #[tokio::test]
    async fn repeated_sweeps_yield_identical_results() {
        let make = || {
            let ping = ScriptedPing::new(["10.4.0.1", "10.4.0.3"]);
            let ports = ScriptedPorts::new([("10.4.0.1", vec![22, 443])]);
            coordinator(ping, ports, ScanConfig::new().with_concurrency(4))
        };

        let mut first = make().scan(&["10.4.0.0/29"]).unwrap().collect_session().await.results;
        let mut second = make().scan(&["10.4.0.0/29"]).unwrap().collect_session().await.results;

        first.sort_by_key(|r| r.addr);
        second.sort_by_key(|r| r.addr);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn invalid_range_fails_before_any_probe() {
        let ping = ScriptedPing::new([]);
        let calls = Arc::clone(&ping.calls);
        let ports = ScriptedPorts::new([]);
        let coord = coordinator(ping, ports, ScanConfig::default());

        let err = coord.scan(&["10.0.0.0/abc"]).unwrap_err();
        assert!(matches!(err, crate::error::RangeError::InvalidCidr(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn cancellation_stops_new_hosts_but_keeps_emitted_results() {
        let ping = ScriptedPing::new([]).with_delay(Duration::from_millis(20));
        let ports = ScriptedPorts::new([]);
        let coord = coordinator(ping, ports, ScanConfig::new().with_concurrency(4));

        let mut stream = coord.scan(&["10.5.0.0/24"]).unwrap();
        assert_eq!(stream.total_hosts(), 256);
        let handle = stream.cancel_handle();

        let mut received = Vec::new();
        for _ in 0..2 {
            received.push(stream.recv().await.unwrap());
        }
        handle.cancel();
        assert!(handle.is_cancelled());

        // In-flight hosts drain, then the stream ends well short of 256.
        while let Some(result) = stream.recv().await {
            received.push(result);
        }

        assert!(received.len() >= 2);
        assert!(
            received.len() < 64,
            "cancellation left {} results",
            received.len()
        );
        let unique: HashSet<Ipv4Addr> = received.iter().map(|r| r.addr).collect();
        assert_eq!(unique.len(), received.len(), "duplicate results after cancel");
    }

    #[tokio::test]
    async fn stream_impl_yields_all_results() {
        use futures::StreamExt;

        let ping = ScriptedPing::new(["10.6.0.2"]);
        let ports = ScriptedPorts::new([("10.6.0.2", vec![80])]);
        let coord = coordinator(ping, ports, ScanConfig::default());

        let stream = coord.scan(&["10.6.0.0/30"]).unwrap();
        let results: Vec<HostResult> = stream.collect().await;
        assert_eq!(results.len(), 4);
    }
}
