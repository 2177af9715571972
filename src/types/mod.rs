//! Core domain types.
//!
//! `ScanTarget` handles CIDR validation and address enumeration; `HostResult`
//! and `ScanSession` carry scan outcomes from the coordinator to consumers.

mod host;
mod range;

pub use host::{HostResult, Liveness, ScanSession};
pub use range::ScanTarget;
