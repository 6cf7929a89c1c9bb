//! Tiered quota resolution with project-level overrides.
//!
//! A [`QuotaTable`] maps resource kinds to global default limits. Resolution
//! consults the project first: a project-specific value always wins, and the
//! table's default is the fallback. A kind with neither is a deployment
//! defect and resolves to [`QuotaError::UnknownResourceKind`] — silently
//! returning zero would wrongly deny all capacity, and silently returning
//! "unlimited" would breach tenant limits, so neither is ever substituted.
//!
//! Resolved values are non-negative by construction (`u64`).
//!
//! # Example
//!
//! ```rust
//! use fleetgate_core::entitlement::ProjectRef;
//! use fleetgate_core::quota::{GITHUB_RUNNER_CACHE_STORAGE, QuotaTable};
//!
//! struct Project;
//!
//! impl ProjectRef for Project {
//!     fn effective_quota_value(&self, _resource_kind: &str) -> Option<u64> {
//!         None // no override rows; defaults apply
//!     }
//!     fn free_runner_upgrade_until(&self) -> Option<String> {
//!         None
//!     }
//! }
//!
//! let table = QuotaTable::default();
//! let limit = table.resolve(GITHUB_RUNNER_CACHE_STORAGE, &Project).unwrap();
//! assert_eq!(limit, 10);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::entitlement::ProjectRef;

/// Resource kind for runner dependency-cache storage, in GiB.
pub const GITHUB_RUNNER_CACHE_STORAGE: &str = "GithubRunnerCacheStorage";

/// Resource kind for concurrently active runner vCPUs.
pub const GITHUB_RUNNER_VCPUS: &str = "GithubRunnerVCpus";

/// Global default cache storage limit, in GiB.
pub const DEFAULT_CACHE_STORAGE_GIB: u64 = 10;

/// Global default concurrent vCPU limit.
pub const DEFAULT_RUNNER_VCPUS: u64 = 64;

/// Errors that can occur during quota resolution.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuotaError {
    /// The resource kind has neither a project override nor a configured
    /// global default.
    #[error("unknown resource kind {kind:?}: no project override and no configured default")]
    UnknownResourceKind {
        /// The resource kind that could not be resolved.
        kind: String,
    },
}

/// Static mapping from resource kind to its global default limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaTable {
    defaults: BTreeMap<String, u64>,
}

impl QuotaTable {
    /// Creates a table from an explicit set of global defaults.
    #[must_use]
    pub fn with_defaults(defaults: BTreeMap<String, u64>) -> Self {
        Self { defaults }
    }

    /// Returns the global default for `resource_kind`, if configured.
    #[must_use]
    pub fn default_value(&self, resource_kind: &str) -> Option<u64> {
        self.defaults.get(resource_kind).copied()
    }

    /// Resolves the effective limit for `resource_kind` under `project`.
    ///
    /// A project-specific value wins over the global default.
    ///
    /// # Errors
    ///
    /// Returns [`QuotaError::UnknownResourceKind`] when the kind has neither
    /// an override nor a default.
    pub fn resolve<P: ProjectRef>(
        &self,
        resource_kind: &str,
        project: &P,
    ) -> Result<u64, QuotaError> {
        if let Some(value) = project.effective_quota_value(resource_kind) {
            return Ok(value);
        }
        self.default_value(resource_kind).ok_or_else(|| {
            warn!(resource_kind, "quota resolution hit unconfigured resource kind");
            QuotaError::UnknownResourceKind {
                kind: resource_kind.to_string(),
            }
        })
    }
}

impl Default for QuotaTable {
    /// Builds the built-in default table for the runner platform.
    fn default() -> Self {
        let mut defaults = BTreeMap::new();
        defaults.insert(
            GITHUB_RUNNER_CACHE_STORAGE.to_string(),
            DEFAULT_CACHE_STORAGE_GIB,
        );
        defaults.insert(GITHUB_RUNNER_VCPUS.to_string(), DEFAULT_RUNNER_VCPUS);
        Self { defaults }
    }
}
