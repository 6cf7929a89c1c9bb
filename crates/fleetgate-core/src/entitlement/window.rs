//! Time-boxed promotion windows for free runner upgrades.
//!
//! Multiple independent promotions may be layered on the same tenant. Each
//! contributes a candidate expiry timestamp, and the effective expiry is the
//! latest of all candidates present: the tenant receives the most generous
//! combination, and an earlier-expiring rule never masks a later one.
//!
//! Current candidates:
//!
//! 1. `created_at + 7 days` — the universal introductory benefit every
//!    installation receives, regardless of flags.
//! 2. The project's `free_runner_upgrade_until` feature flag, when set,
//!    parsed as an RFC 3339 timestamp.
//!
//! Additional promotion sources fold into the same max-of-candidates rule
//! without changing the resolution policy.
//!
//! # Invariants
//!
//! - The effective expiry is monotonically non-decreasing as promotions are
//!   layered on; a new candidate can only extend the window.
//! - The boundary is strict: at `now == effective expiry` the upgrade is
//!   already expired.
//! - A present-but-unparseable flag value is a surfaced error, never a
//!   silently dropped candidate.

use chrono::{DateTime, Duration, Utc};

use super::error::EntitlementError;
use super::{Installation, ProjectRef};

/// Length in days of the universal introductory upgrade window.
pub const INTRODUCTORY_UPGRADE_DAYS: i64 = 7;

/// Resolves the effective expiry of the installation's free upgrade window.
///
/// Returns the latest of all promotion candidates.
///
/// # Errors
///
/// Returns [`EntitlementError::InvalidFlagValue`] when the project's
/// `free_runner_upgrade_until` flag is set but does not parse as RFC 3339.
pub fn effective_upgrade_expiry<P: ProjectRef>(
    installation: &Installation,
    project: &P,
) -> Result<DateTime<Utc>, EntitlementError> {
    let mut expiry = installation.created_at + Duration::days(INTRODUCTORY_UPGRADE_DAYS);

    if let Some(raw) = project.free_runner_upgrade_until() {
        let flagged = DateTime::parse_from_rfc3339(&raw)
            .map(|parsed| parsed.with_timezone(&Utc))
            .map_err(|err| EntitlementError::InvalidFlagValue {
                value: raw,
                reason: err.to_string(),
            })?;
        expiry = expiry.max(flagged);
    }

    Ok(expiry)
}

/// Returns `true` if the free upgrade window is still open at `now`.
///
/// Strict comparison: the exact expiry instant is already expired.
///
/// # Errors
///
/// Propagates [`EntitlementError::InvalidFlagValue`] from
/// [`effective_upgrade_expiry`].
pub fn is_upgrade_active<P: ProjectRef>(
    installation: &Installation,
    project: &P,
    now: DateTime<Utc>,
) -> Result<bool, EntitlementError> {
    Ok(effective_upgrade_expiry(installation, project)? > now)
}
