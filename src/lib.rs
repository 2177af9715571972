//! # lansweep - Concurrent LAN Host Discovery
//!
//! lansweep sweeps one or more IPv4 CIDR ranges, pings every address with a
//! bounded worker pool, and checks ports 22, 80 and 443 on each reachable
//! host. Results stream out in completion order, so slow or silent hosts
//! never hold up the rest of the sweep.
//!
//! ## Features
//!
//! - **Bounded concurrency**: a fixed worker pool (default 50) pulls hosts
//!   from a shared queue, keeping socket and process usage predictable
//! - **Incremental results**: per-host records are published the instant
//!   they complete, over a channel-backed stream
//! - **Infallible probes**: timeouts, refusals, and permission problems all
//!   collapse into `Offline`/closed outcomes by design
//! - **Cooperative cancellation**: stop launching new hosts while in-flight
//!   probes drain cleanly
//! - **CSV export and JSON output** of the accumulated session
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use lansweep::scanner::{ScanConfig, ScanCoordinator};
//!
//! #[tokio::main]
//! async fn main() {
//!     let coordinator = ScanCoordinator::new(ScanConfig::default());
//!     let mut stream = coordinator.scan(&["192.168.1.0/24"]).unwrap();
//!
//!     while let Some(result) = stream.recv().await {
//!         println!("{result}");
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - target ranges, liveness, per-host results, sessions
//! - [`probe`] - reachability and port probe traits plus the real
//!   ping/TCP-connect implementations
//! - [`scanner`] - the coordinator, worker pool, result stream, and
//!   cancellation handle
//! - [`export`] - CSV export of a finished session
//! - [`output`] - plain and JSON formatting for consumers
//! - [`interface`] - local subnet auto-detection helper
//! - [`error`] - error types

pub mod cli;
pub mod error;
pub mod export;
pub mod interface;
pub mod output;
pub mod probe;
pub mod scanner;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, ExportError, RangeError};
pub use probe::{PortProbe, PortState, ReachabilityProbe, PROBE_PORTS};
pub use scanner::{CancelHandle, ScanConfig, ScanCoordinator, ScanStream};
pub use types::{HostResult, Liveness, ScanSession, ScanTarget};
