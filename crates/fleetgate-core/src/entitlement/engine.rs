//! Entitlement engine: composes quota, window, and capability results into
//! the snapshot admission control consumes.
//!
//! The engine introduces no new algorithm; it orders the sub-results.
//! Premium capability must be resolved before the cache-storage floor is
//! applied, because premium eligibility guarantees a minimum cache allowance
//! regardless of the tenant's configured quota row — a quota mistakenly set
//! low never silently regresses a premium tenant below the promised floor.
//!
//! # Reproducibility
//!
//! `evaluate` is referentially transparent: the same installation, project
//! state, usage aggregate, and `now` always produce the same snapshot. That
//! makes entitlements auditable after the fact and safe to compute from many
//! concurrent admission-control requests without locks.
//!
//! # Error Propagation
//!
//! Quota and flag errors propagate unchanged. The engine never downgrades
//! them into default entitlements; a caller that cannot determine an
//! entitlement must reject the admission request rather than act on a
//! guessed one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::capability;
use super::error::EntitlementError;
use super::window;
use super::{Installation, ProjectRef};
use crate::quota::{GITHUB_RUNNER_CACHE_STORAGE, QuotaTable};

/// Minimum cache storage (GiB) guaranteed to premium-eligible tenants.
pub const PREMIUM_CACHE_FLOOR_GIB: u64 = 100;

/// Immutable entitlement decision record for one installation at one
/// instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementSnapshot {
    /// Sum of vCPUs across the installation's active runners, passed through
    /// verbatim from the fleet aggregate supplied by the caller.
    pub total_active_vcpus: u32,
    /// Whether the free runner upgrade window is open at `evaluated_at`.
    pub has_free_upgrade: bool,
    /// Whether the tenant has opted into the premium runner family.
    pub has_premium_runners: bool,
    /// Effective cache storage ceiling in GiB, after the premium floor.
    pub cache_storage_gib: u64,
    /// Whether the dependency cache is enabled for this installation.
    pub cache_enabled: bool,
    /// The `now` this snapshot was evaluated against.
    pub evaluated_at: DateTime<Utc>,
}

/// Stateless entitlement evaluator.
///
/// Holds only the configured [`QuotaTable`]; all tenant state arrives as
/// call arguments.
#[derive(Debug, Clone, Default)]
pub struct EntitlementEngine {
    quotas: QuotaTable,
}

impl EntitlementEngine {
    /// Creates an engine over the given quota table.
    #[must_use]
    pub const fn new(quotas: QuotaTable) -> Self {
        Self { quotas }
    }

    /// Returns the engine's quota table.
    #[must_use]
    pub const fn quotas(&self) -> &QuotaTable {
        &self.quotas
    }

    /// Evaluates the entitlement snapshot for one installation.
    ///
    /// `live_active_vcpus` is the fleet collaborator's materialized
    /// aggregate; the engine does not recompute or refresh it.
    ///
    /// # Errors
    ///
    /// Propagates [`EntitlementError::InvalidFlagValue`] from promotion-flag
    /// parsing and [`EntitlementError::Quota`] from cache-quota resolution.
    pub fn evaluate<P: ProjectRef>(
        &self,
        installation: &Installation,
        project: &P,
        live_active_vcpus: u32,
        now: DateTime<Utc>,
    ) -> Result<EntitlementSnapshot, EntitlementError> {
        // Premium eligibility first: the cache floor depends on it.
        let has_premium_runners =
            capability::premium_runners_enabled(&installation.allocator_preferences);
        let has_free_upgrade = window::is_upgrade_active(installation, project, now)?;

        let configured_gib = self.quotas.resolve(GITHUB_RUNNER_CACHE_STORAGE, project)?;
        let floor_gib = if has_premium_runners {
            PREMIUM_CACHE_FLOOR_GIB
        } else {
            0
        };
        let cache_storage_gib = configured_gib.max(floor_gib);

        debug!(
            installation = %installation.id,
            total_active_vcpus = live_active_vcpus,
            has_free_upgrade,
            has_premium_runners,
            cache_storage_gib,
            "evaluated entitlement snapshot"
        );

        Ok(EntitlementSnapshot {
            total_active_vcpus: live_active_vcpus,
            has_free_upgrade,
            has_premium_runners,
            cache_storage_gib,
            cache_enabled: installation.cache_enabled,
            evaluated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;
    use crate::entitlement::AllocatorPreferences;
    use crate::quota::QuotaError;

    struct FakeProject {
        cache_quota_gib: Option<u64>,
        upgrade_until: Option<String>,
    }

    impl FakeProject {
        fn with_cache_quota(gib: u64) -> Self {
            Self {
                cache_quota_gib: Some(gib),
                upgrade_until: None,
            }
        }
    }

    impl ProjectRef for FakeProject {
        fn effective_quota_value(&self, resource_kind: &str) -> Option<u64> {
            match resource_kind {
                GITHUB_RUNNER_CACHE_STORAGE => self.cache_quota_gib,
                _ => None,
            }
        }

        fn free_runner_upgrade_until(&self) -> Option<String> {
            self.upgrade_until.clone()
        }
    }

    fn premium_installation(created_at: DateTime<Utc>) -> Installation {
        Installation::new("premium-tenant", created_at).with_allocator_preferences(
            AllocatorPreferences::from_json(&json!({"family_filter": ["premium"]})),
        )
    }

    #[test]
    fn test_premium_floor_lifts_low_quota() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let engine = EntitlementEngine::new(QuotaTable::default());
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        let snapshot = engine
            .evaluate(
                &premium_installation(created),
                &FakeProject::with_cache_quota(20),
                0,
                now,
            )
            .unwrap();
        assert!(snapshot.has_premium_runners);
        assert_eq!(snapshot.cache_storage_gib, PREMIUM_CACHE_FLOOR_GIB);
    }

    #[test]
    fn test_no_premium_means_no_floor() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let engine = EntitlementEngine::new(QuotaTable::default());
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        let snapshot = engine
            .evaluate(
                &Installation::new("standard-tenant", created),
                &FakeProject::with_cache_quota(20),
                0,
                now,
            )
            .unwrap();
        assert!(!snapshot.has_premium_runners);
        assert_eq!(snapshot.cache_storage_gib, 20);
    }

    #[test]
    fn test_floor_does_not_cap_generous_quota() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let engine = EntitlementEngine::new(QuotaTable::default());
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        let snapshot = engine
            .evaluate(
                &premium_installation(created),
                &FakeProject::with_cache_quota(150),
                0,
                now,
            )
            .unwrap();
        assert_eq!(snapshot.cache_storage_gib, 150);
    }

    #[test]
    fn test_vcpu_aggregate_passes_through_verbatim() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let engine = EntitlementEngine::new(QuotaTable::default());
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        let snapshot = engine
            .evaluate(
                &Installation::new("tenant", created),
                &FakeProject::with_cache_quota(20),
                48,
                now,
            )
            .unwrap();
        assert_eq!(snapshot.total_active_vcpus, 48);
    }

    #[test]
    fn test_free_upgrade_window_scenario() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let engine = EntitlementEngine::new(QuotaTable::default());
        let installation = Installation::new("tenant", created);
        let project = FakeProject::with_cache_quota(20);

        let within = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();
        let snapshot = engine.evaluate(&installation, &project, 0, within).unwrap();
        assert!(snapshot.has_free_upgrade);

        let after = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let snapshot = engine.evaluate(&installation, &project, 0, after).unwrap();
        assert!(!snapshot.has_free_upgrade);
    }

    #[test]
    fn test_invalid_flag_propagates() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let engine = EntitlementEngine::new(QuotaTable::default());
        let project = FakeProject {
            cache_quota_gib: Some(20),
            upgrade_until: Some("not-a-timestamp".to_string()),
        };
        let now = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();

        let err = engine
            .evaluate(&Installation::new("tenant", created), &project, 0, now)
            .unwrap_err();
        assert!(matches!(err, EntitlementError::InvalidFlagValue { .. }));
    }

    #[test]
    fn test_quota_error_propagates_undowngraded() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        // Empty table and a project with no rows: cache storage is
        // unresolvable, which must surface rather than default.
        let engine = EntitlementEngine::new(QuotaTable::with_defaults(Default::default()));
        let project = FakeProject {
            cache_quota_gib: None,
            upgrade_until: None,
        };
        let now = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();

        let err = engine
            .evaluate(&Installation::new("tenant", created), &project, 0, now)
            .unwrap_err();
        assert_eq!(
            err,
            EntitlementError::Quota(QuotaError::UnknownResourceKind {
                kind: GITHUB_RUNNER_CACHE_STORAGE.to_string(),
            })
        );
    }

    #[test]
    fn test_evaluation_is_referentially_transparent() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let engine = EntitlementEngine::new(QuotaTable::default());
        let installation = premium_installation(created);
        let project = FakeProject::with_cache_quota(20);
        let now = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();

        let first = engine.evaluate(&installation, &project, 16, now).unwrap();
        let second = engine.evaluate(&installation, &project, 16, now).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_snapshot_records_evaluation_time_and_cache_flag() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let engine = EntitlementEngine::new(QuotaTable::default());
        let installation = Installation::new("tenant", created).with_cache_enabled(false);
        let now = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();

        let snapshot = engine
            .evaluate(&installation, &FakeProject::with_cache_quota(20), 0, now)
            .unwrap();
        assert_eq!(snapshot.evaluated_at, now);
        assert!(!snapshot.cache_enabled);
    }
}
