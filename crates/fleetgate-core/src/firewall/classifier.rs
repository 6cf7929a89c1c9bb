//! Address-family classification for CIDR ranges.
//!
//! Firewall rule evaluation needs to know whether a stored range is IPv4 or
//! IPv6. The family is a derived, unstored property: [`classify`] re-parses
//! the text on every read, so a later edit of the stored string is always
//! reflected and no stale cached family can exist. Parsing is O(length of
//! the string), which is acceptable for a per-read cost.
//!
//! Both compressed (`::/0`) and uncompressed
//! (`0:0:0:0:0:0:0:0/0`) IPv6 textual forms classify as V6; dotted-quad
//! forms classify as V4. IPv4-mapped IPv6 literals (`::ffff:10.0.0.1/104`)
//! carry IPv6 syntax and classify as V6.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use super::error::CidrError;

/// IP address family of a classified CIDR range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressFamily {
    /// IPv4 (RFC 4632 textual form).
    V4,
    /// IPv6 (RFC 4291 textual forms, compressed or uncompressed).
    V6,
}

impl AddressFamily {
    /// Returns the conventional lowercase name (`"ipv4"` / `"ipv6"`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::V4 => "ipv4",
            Self::V6 => "ipv6",
        }
    }
}

impl std::fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classifies a CIDR-notation string into its address family.
///
/// Pure and idempotent: the same unchanged input always yields the same
/// family, and no result is cached anywhere.
///
/// # Errors
///
/// Returns [`CidrError::InvalidFormat`] when the text is not `address/prefix`
/// with a parseable address and an in-range prefix length.
pub fn classify(cidr: &str) -> Result<AddressFamily, CidrError> {
    let invalid = |reason: &str| CidrError::InvalidFormat {
        cidr: cidr.to_string(),
        reason: reason.to_string(),
    };

    let (address_part, prefix_part) = cidr
        .split_once('/')
        .ok_or_else(|| invalid("missing '/' prefix separator"))?;

    let address: IpAddr = address_part
        .parse()
        .map_err(|_| invalid("address portion is not a valid IPv4 or IPv6 address"))?;

    let prefix: u8 = prefix_part
        .parse()
        .map_err(|_| invalid("prefix length is not an integer"))?;

    let (family, width) = match address {
        IpAddr::V4(_) => (AddressFamily::V4, 32),
        IpAddr::V6(_) => (AddressFamily::V6, 128),
    };
    if prefix > width {
        return Err(invalid("prefix length exceeds address width"));
    }

    Ok(family)
}
