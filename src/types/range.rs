//! Target range parsing and address enumeration.
//!
//! A `ScanTarget` is an ordered list of IPv4 CIDR ranges. All ranges are
//! validated up front; enumeration never fails once a target exists.

use crate::error::{RangeError, RangeResult};
use ipnetwork::Ipv4Network;
use std::fmt;
use std::net::Ipv4Addr;

/// One or more validated IPv4 CIDR ranges to sweep.
///
/// Ranges may overlap or be disjoint. Enumeration visits ranges in the order
/// supplied, each in ascending numeric address order, and includes the
/// network and broadcast addresses (a `/30` yields 4 addresses). A bare IP
/// without a prefix parses as a `/32`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTarget {
    ranges: Vec<Ipv4Network>,
}

impl ScanTarget {
    /// Maximum number of addresses allowed in a single range (a /16).
    pub const MAX_RANGE_HOSTS: u64 = 65536;

    /// Parse and validate a list of CIDR range strings.
    ///
    /// Fails on the first malformed or oversized range; nothing is
    /// enumerated until every range validates.
    pub fn parse<I, S>(ranges: I) -> RangeResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed = Vec::new();

        for raw in ranges {
            let s = raw.as_ref().trim();
            let network: Ipv4Network = s
                .parse()
                .map_err(|_| RangeError::InvalidCidr(s.to_string()))?;

            let size = range_size(&network);
            if size > Self::MAX_RANGE_HOSTS {
                return Err(RangeError::TooLarge(
                    s.to_string(),
                    size,
                    Self::MAX_RANGE_HOSTS,
                ));
            }

            parsed.push(network);
        }

        if parsed.is_empty() {
            return Err(RangeError::Empty);
        }

        Ok(Self { ranges: parsed })
    }

    /// Construct a target from already-parsed networks.
    pub fn from_networks(ranges: Vec<Ipv4Network>) -> RangeResult<Self> {
        if ranges.is_empty() {
            return Err(RangeError::Empty);
        }
        Ok(Self { ranges })
    }

    /// Lazily enumerate every address in every range.
    ///
    /// The iterator is restartable; calling this again yields the same
    /// sequence. Overlapping ranges yield their addresses once per range.
    pub fn addresses(&self) -> impl Iterator<Item = Ipv4Addr> + '_ {
        self.ranges.iter().flat_map(|net| net.iter())
    }

    /// Exact number of addresses `addresses()` will yield.
    pub fn host_count(&self) -> u64 {
        self.ranges.iter().map(range_size).sum()
    }

    /// The validated ranges, in supplied order.
    pub fn ranges(&self) -> &[Ipv4Network] {
        &self.ranges
    }
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.ranges.iter().map(|r| r.to_string()).collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Number of addresses covered by a network, network/broadcast included.
fn range_size(network: &Ipv4Network) -> u64 {
    1u64 << (32 - u32::from(network.prefix()))
}
