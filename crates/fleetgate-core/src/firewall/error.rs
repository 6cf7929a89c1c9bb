//! Firewall classification error types.

use thiserror::Error;

/// Errors from CIDR classification.
///
/// Classification assumes upstream validation; malformed text reaching the
/// classifier is surfaced, never retried, since re-parsing malformed static
/// data cannot succeed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CidrError {
    /// The CIDR text is not syntactically valid.
    #[error("invalid CIDR {cidr:?}: {reason}")]
    InvalidFormat {
        /// The offending CIDR text.
        cidr: String,
        /// What is wrong with it.
        reason: String,
    },
}
