//! Firewall rule classification.
//!
//! Only the address-family classification rule lives here; the firewall
//! subsystem as a whole (rule storage, evaluation order, provisioning) is
//! owned elsewhere. Entitlement and network-policy decisions share the same
//! "derive a classification from stored state" pattern, which is why the
//! rule sits alongside the entitlement engine.

pub mod classifier;
pub mod error;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use classifier::{AddressFamily, classify};
pub use error::CidrError;

/// A stored firewall rule covering one address range.
///
/// The rule is created and mutated by upstream configuration flows; this
/// layer only reads it. The address family is deliberately not a field:
/// it is recomputed from `cidr` on every read so that a mutation of the
/// stored text can never leave a stale cached family behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallRule {
    /// Opaque unique id.
    pub id: Uuid,
    /// The covered range in CIDR notation. Always non-null; syntactic
    /// validity is enforced upstream at write time.
    pub cidr: String,
}

impl FirewallRule {
    /// Creates a rule over the given CIDR text.
    #[must_use]
    pub fn new(cidr: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            cidr: cidr.into(),
        }
    }

    /// Returns the address family of the covered range, derived from the
    /// current `cidr` text.
    ///
    /// # Errors
    ///
    /// Returns [`CidrError::InvalidFormat`] if the stored text is malformed.
    pub fn address_family(&self) -> Result<AddressFamily, CidrError> {
        classifier::classify(&self.cidr)
    }

    /// Returns `true` if the covered range is IPv6.
    ///
    /// # Errors
    ///
    /// Returns [`CidrError::InvalidFormat`] if the stored text is malformed.
    pub fn is_ipv6(&self) -> Result<bool, CidrError> {
        Ok(self.address_family()? == AddressFamily::V6)
    }
}
