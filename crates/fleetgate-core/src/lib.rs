//! Entitlement and policy evaluation for a CI/CD runner fleet.
//!
//! This crate computes the resource entitlements an admission-control layer
//! consumes when deciding whether to accept runner launch requests and how
//! to bound cache usage:
//!
//! - **Quota resolution** ([`quota`]): tiered limits per resource kind, with
//!   project-level overrides taking precedence over global defaults.
//! - **Promotion windows** ([`entitlement::window`]): time-boxed free-upgrade
//!   benefits resolved as the latest of all layered promotion candidates.
//! - **Capability gating** ([`entitlement::capability`]): feature eligibility
//!   derived from tenant-editable allocator preferences.
//! - **Entitlement snapshots** ([`entitlement::engine`]): the composed,
//!   immutable decision record handed to admission control.
//! - **Address-family classification** ([`firewall`]): the CIDR rule shared
//!   with firewall evaluation, kept here because it follows the same
//!   "derive a classification from stored state" pattern.
//!
//! # Design
//!
//! Every evaluation is a pure function of the inputs supplied at call time:
//! an installation snapshot, a read-only project reference, a live usage
//! aggregate, and a `now` timestamp. No component carries state across
//! calls, so entitlements are reproducible for audit ("what would the
//! entitlement have been at time T") and safe to evaluate from many
//! concurrent admission-control requests without coordination.
//!
//! # Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use fleetgate_core::entitlement::{
//!     AllocatorPreferences, EntitlementEngine, Installation, ProjectRef,
//! };
//! use fleetgate_core::quota::QuotaTable;
//!
//! struct Project;
//!
//! impl ProjectRef for Project {
//!     fn effective_quota_value(&self, _resource_kind: &str) -> Option<u64> {
//!         Some(20)
//!     }
//!     fn free_runner_upgrade_until(&self) -> Option<String> {
//!         None
//!     }
//! }
//!
//! let installation = Installation::new(
//!     "acme",
//!     Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
//! );
//!
//! let engine = EntitlementEngine::new(QuotaTable::default());
//! let now = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();
//! let snapshot = engine.evaluate(&installation, &Project, 8, now).unwrap();
//!
//! assert!(snapshot.has_free_upgrade); // within the 7-day introductory window
//! assert_eq!(snapshot.total_active_vcpus, 8);
//! assert_eq!(snapshot.cache_storage_gib, 20);
//! ```

pub mod entitlement;
pub mod firewall;
pub mod quota;

pub use entitlement::{
    AllocatorPreferences, EntitlementEngine, EntitlementError, EntitlementSnapshot, FleetAggregate,
    Installation, ProjectRef,
};
pub use firewall::{AddressFamily, CidrError, FirewallRule};
pub use quota::{QuotaError, QuotaTable};
