//! Local subnet auto-detection.
//!
//! Walks the machine's network interfaces and derives a `/24` CIDR string
//! from the first usable IPv4 address. This is a convenience for callers
//! that do not know their subnet; the scanner core only ever receives
//! already-resolved ranges.

use ipnetwork::IpNetwork;
use pnet::datalink;
use tracing::debug;

/// Fallback range used when no suitable interface is found.
pub const FALLBACK_CIDR: &str = "192.168.1.0/24";

/// Detect the local `/24` subnet, falling back to [`FALLBACK_CIDR`].
pub fn local_cidr_or_default() -> String {
    detect_local_cidr().unwrap_or_else(|| FALLBACK_CIDR.to_string())
}

/// Detect the local `/24` subnet from the first up, non-loopback
/// interface carrying an IPv4 address. Returns `None` when the machine
/// has no such interface.
pub fn detect_local_cidr() -> Option<String> {
    for iface in datalink::interfaces() {
        if iface.is_loopback() || !iface.is_up() {
            continue;
        }

        for ip in &iface.ips {
            if let IpNetwork::V4(network) = ip {
                let octets = network.ip().octets();
                let cidr = format!("{}.{}.{}.0/24", octets[0], octets[1], octets[2]);
                debug!(interface = %iface.name, %cidr, "detected local subnet");
                return Some(cidr);
            }
        }
    }

    None
}
