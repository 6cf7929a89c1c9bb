//! Capability gating from tenant allocator preferences.
//!
//! Tenants describe their requested runner-class filters in a free-form
//! JSON document (e.g. `{"family_filter": ["premium"]}`). This module
//! projects that document into the typed [`AllocatorPreferences`] structure
//! and answers "is capability X enabled for this tenant".
//!
//! # Default Semantics
//!
//! Gating is boolean and total. A missing key, a missing value inside the
//! key, or a differently-typed value at the key all resolve to `false`:
//! "unconfigured" is the overwhelmingly common case and must never surface
//! as an error.
//!
//! # Example
//!
//! ```rust
//! use fleetgate_core::entitlement::capability::{
//!     AllocatorPreferences, CapabilityKey, PREMIUM_FAMILY, has_capability,
//! };
//! use serde_json::json;
//!
//! let prefs = AllocatorPreferences::from_json(&json!({
//!     "family_filter": ["standard", "premium"],
//! }));
//! assert!(has_capability(&prefs, CapabilityKey::FamilyFilter, PREMIUM_FAMILY));
//!
//! // Unconfigured tenants gate false, never error.
//! let empty = AllocatorPreferences::default();
//! assert!(!has_capability(&empty, CapabilityKey::FamilyFilter, PREMIUM_FAMILY));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Runner family tag that marks premium runner-class eligibility.
pub const PREMIUM_FAMILY: &str = "premium";

/// Known capability keys inside the allocator preference document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum CapabilityKey {
    /// Ordered list of runner family tags the tenant has opted into.
    FamilyFilter,
}

impl CapabilityKey {
    /// Returns the document key this capability is stored under.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FamilyFilter => "family_filter",
        }
    }
}

impl std::fmt::Display for CapabilityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Typed projection of the tenant's free-form allocator preference
/// document.
///
/// Each field is optional; `None` means the tenant never configured that
/// preference, which gates the corresponding capabilities off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocatorPreferences {
    /// Runner family tags from the `family_filter` key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_filter: Option<Vec<String>>,
}

impl AllocatorPreferences {
    /// Projects a raw preference document into typed preferences.
    ///
    /// Lenient by contract: keys that are absent or hold a value of the
    /// wrong type project to `None`, and non-string elements inside an
    /// otherwise valid list are skipped. Tenant-editable documents must
    /// never make gating throw.
    #[must_use]
    pub fn from_json(document: &Value) -> Self {
        let family_filter = document
            .get(CapabilityKey::FamilyFilter.as_str())
            .and_then(Value::as_array)
            .map(|tags| {
                tags.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_owned)
                    .collect()
            });
        Self { family_filter }
    }

    /// Returns `true` if the given family tag appears in `family_filter`.
    #[must_use]
    pub fn family_filter_contains(&self, family: &str) -> bool {
        self.family_filter
            .as_deref()
            .is_some_and(|tags| tags.iter().any(|tag| tag == family))
    }
}

/// Returns `true` iff `value` appears in the sequence stored under `key`.
///
/// Total over all inputs: unconfigured or malformed preferences resolve to
/// `false`.
#[must_use]
pub fn has_capability(
    preferences: &AllocatorPreferences,
    key: CapabilityKey,
    value: &str,
) -> bool {
    match key {
        CapabilityKey::FamilyFilter => preferences.family_filter_contains(value),
    }
}

/// Returns `true` if the tenant has opted into the premium runner family.
#[must_use]
pub fn premium_runners_enabled(preferences: &AllocatorPreferences) -> bool {
    has_capability(preferences, CapabilityKey::FamilyFilter, PREMIUM_FAMILY)
}
