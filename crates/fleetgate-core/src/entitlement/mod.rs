//! Entitlement evaluation: data model, collaborator interfaces, and engine.
//!
//! The entitlement layer turns persisted account state (creation time,
//! feature flags, allocator preferences, quota rows) plus a live usage
//! aggregate into the derived decisions admission control consumes. It is a
//! stateless function library: collaborators materialize their inputs first,
//! and evaluation is a pure derivation over those inputs and a `now`
//! timestamp.
//!
//! # Collaborator Interfaces
//!
//! The engine never traverses an object graph. Its two collaborators are
//! explicit, read-only interfaces passed into every call:
//!
//! - [`ProjectRef`] supplies resolved quota overrides and the raw
//!   free-runner-upgrade feature flag.
//! - [`FleetAggregate`] supplies the current sum of vCPUs across active
//!   runners. The engine takes the materialized number; staleness is the
//!   caller's contract.
//!
//! This keeps the engine's dependencies visible in its signature and makes
//! it unit-testable with fakes.

pub mod capability;
pub mod engine;
pub mod error;
pub mod window;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use capability::{
    AllocatorPreferences, CapabilityKey, PREMIUM_FAMILY, has_capability, premium_runners_enabled,
};
pub use engine::{EntitlementEngine, EntitlementSnapshot, PREMIUM_CACHE_FLOOR_GIB};
pub use error::EntitlementError;
pub use window::{INTRODUCTORY_UPGRADE_DAYS, effective_upgrade_expiry, is_upgrade_active};

/// Read-only view of the project an installation belongs to.
///
/// The project subsystem owns quota tables and feature-flag storage; the
/// engine only reads two accessors. Both are expected to be cheap and
/// already merged with whatever tiering the project subsystem performs.
pub trait ProjectRef {
    /// Returns the project-level resolved quota for `resource_kind`, or
    /// `None` when the project carries no row for that kind.
    fn effective_quota_value(&self, resource_kind: &str) -> Option<u64>;

    /// Returns the raw `free_runner_upgrade_until` feature-flag value: an
    /// RFC 3339 timestamp string, or `None` when the flag is unset.
    ///
    /// Parsing is the entitlement layer's job; a present-but-unparseable
    /// value surfaces as [`EntitlementError::InvalidFlagValue`] rather than
    /// silently shortening the tenant's benefit window.
    fn free_runner_upgrade_until(&self) -> Option<String>;
}

/// Read-only view of the runner fleet owned by an installation.
///
/// Implementations may be eventually consistent; the engine makes no
/// freshness promise beyond deterministic combination of whatever value the
/// caller supplies.
pub trait FleetAggregate {
    /// Current sum of `vcpu_count` across this installation's active
    /// runners.
    fn total_active_vcpus(&self, installation_id: Uuid) -> u32;
}

/// A tenant's connected account unit, scoping runners, repositories, and
/// cache usage.
///
/// Installations are created by upstream provisioning flows and torn down
/// out of band; the entitlement layer only ever reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installation {
    /// Opaque unique id.
    pub id: Uuid,
    /// Upstream provider's numeric installation id.
    pub installation_id: i64,
    /// Display name of the installed account.
    pub name: String,
    /// Upstream account type (`"User"` or `"Organization"`).
    pub installation_type: String,
    /// Whether the dependency cache is enabled for this installation.
    pub cache_enabled: bool,
    /// Whether runner images pull through the platform's Docker mirror.
    pub use_docker_mirror: bool,
    /// Tenant-editable runner-class preferences. Read-only to the engine.
    pub allocator_preferences: AllocatorPreferences,
    /// Creation timestamp. Immutable after creation and never null; anchors
    /// the universal introductory promotion window.
    pub created_at: DateTime<Utc>,
}

impl Installation {
    /// Creates an installation with the given name and creation time.
    ///
    /// Remaining fields take the provisioning defaults: cache enabled,
    /// Docker mirror off, empty allocator preferences.
    #[must_use]
    pub fn new(name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            installation_id: 0,
            name: name.into(),
            installation_type: "Organization".to_string(),
            cache_enabled: true,
            use_docker_mirror: false,
            allocator_preferences: AllocatorPreferences::default(),
            created_at,
        }
    }

    /// Replaces the allocator preferences.
    #[must_use]
    pub fn with_allocator_preferences(mut self, preferences: AllocatorPreferences) -> Self {
        self.allocator_preferences = preferences;
        self
    }

    /// Sets whether the dependency cache is enabled.
    #[must_use]
    pub const fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }
}
