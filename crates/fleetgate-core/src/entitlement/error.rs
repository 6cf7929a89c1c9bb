//! Entitlement-specific error types.

use thiserror::Error;

use crate::quota::QuotaError;

/// Errors that can occur while evaluating an entitlement.
///
/// Every variant here is a configuration defect surfaced loudly. The engine
/// never downgrades one into a default entitlement: guessing could either
/// over- or under-grant a benefit, and masking the defect as a
/// tenant-visible capacity decision makes it invisible to operators. An
/// admission-control request that hits one of these should be rejected with
/// an "entitlement could not be determined" outcome.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EntitlementError {
    /// The `free_runner_upgrade_until` flag is set but does not parse as an
    /// RFC 3339 timestamp.
    #[error("invalid free_runner_upgrade_until flag value {value:?}: {reason}")]
    InvalidFlagValue {
        /// The raw flag value that failed to parse.
        value: String,
        /// Why parsing failed.
        reason: String,
    },

    /// Quota resolution failed.
    #[error("quota resolution failed: {0}")]
    Quota(#[from] QuotaError),
}
