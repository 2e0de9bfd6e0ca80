//! # Closeable Resource Registry
//!
//! Registry specialization with no per-resource metadata, for callers that
//! only need presence tracking and exactly-once teardown.
//!
//! Two release paths with deliberately different failure contracts:
//!
//! - [`CloseableRegistry::close_all`] is quiet: every tracked resource is
//!   released in reverse registration order and failures are logged, never
//!   surfaced. Kept for callers that must not treat release failures as
//!   fatal.
//! - [`CloseableRegistry::release_some`] aggregates: every requested
//!   release is attempted, and failures are combined into one
//!   [`AggregateCloseError`] with a primary and suppressed causes.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use resource_registry::{CloseError, CloseableRegistry, CloseableResource};
//!
//! struct Connection;
//!
//! impl CloseableResource for Connection {
//!     fn close(&self) -> Result<(), CloseError> {
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = CloseableRegistry::for_scope("session-42");
//!
//! let conn = Arc::new(Connection);
//! registry.register(Arc::clone(&conn) as _).expect("scope is open");
//!
//! // hand one resource off early, surfacing any release failure
//! registry.release_some([Arc::clone(&conn) as _])?;
//!
//! // quiet teardown of whatever is still tracked
//! registry.close_all();
//! # Ok(())
//! # }
//! ```

use std::convert::Infallible;
use std::fmt;

use tracing::{debug, warn};

use crate::config::RegistryConfig;
use crate::error::{AggregateCloseError, AlreadyClosing};
use crate::registry::core::{
    RegistryCore, RegistryPhase, RegistryStats, ReleasePolicy, TrackedEntry,
};
use crate::resource::{CloseError, ResourceRef};

/// Quiet bulk-release policy: failures are logged and discarded.
struct QuietRelease {
    scope: String,
}

impl ReleasePolicy for QuietRelease {
    type Meta = ();
    type Error = Infallible;

    fn release_all(&self, drained: Vec<TrackedEntry<()>>) -> Result<(), Infallible> {
        for entry in drained {
            if let Err(error) = entry.resource.close() {
                // Backward-compatible contract: close_all never reports failures.
                warn!(
                    scope = %self.scope,
                    resource = entry.resource.describe(),
                    error = %error,
                    "swallowed release failure during scope close"
                );
            }
        }
        Ok(())
    }
}

/// Tracks closeable resources for an owning scope and releases each exactly
/// once when the scope ends.
pub struct CloseableRegistry {
    core: RegistryCore<QuietRelease>,
}

impl CloseableRegistry {
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn for_scope(scope: impl Into<String>) -> Self {
        Self::with_config(RegistryConfig::for_scope(scope))
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        let policy = QuietRelease {
            scope: config.scope.clone(),
        };
        Self {
            core: RegistryCore::with_config(policy, config),
        }
    }

    /// Track a resource for release at scope close.
    ///
    /// Once the scope has begun closing, the rejection hands the resource
    /// back and the caller must release it itself.
    pub fn register(&self, resource: ResourceRef) -> Result<(), AlreadyClosing> {
        self.core.register(resource, ())
    }

    /// Stop tracking a resource without releasing it.
    pub fn unregister(&self, resource: &ResourceRef) -> bool {
        self.core.unregister(resource)
    }

    /// Release every tracked resource in reverse registration order.
    ///
    /// Quiet by contract: release failures are logged and never surfaced.
    /// Idempotent; only the first call performs release work.
    pub fn close_all(&self) {
        match self.core.close() {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }

    /// Unregister and release the given resources in caller order.
    ///
    /// Resources no longer tracked (already swept by `close_all` or removed
    /// by a prior `unregister`) are silently skipped. Every requested
    /// release is attempted regardless of earlier failures; if any fail,
    /// the combined failure is returned with the first as primary and the
    /// rest suppressed.
    pub fn release_some<I>(&self, resources: I) -> Result<(), AggregateCloseError>
    where
        I: IntoIterator<Item = ResourceRef>,
    {
        let mut failures: Vec<CloseError> = Vec::new();

        for resource in resources {
            if !self.core.unregister(&resource) {
                debug!(
                    scope = %self.core.scope(),
                    resource = resource.describe(),
                    "selective release skipped untracked resource"
                );
                continue;
            }

            if let Err(error) = resource.close() {
                warn!(
                    scope = %self.core.scope(),
                    resource = resource.describe(),
                    error = %error,
                    "release failed during selective release"
                );
                failures.push(error);
            }
        }

        match AggregateCloseError::from_failures(failures) {
            None => Ok(()),
            Some(aggregate) => Err(aggregate),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.core.is_closed()
    }

    pub fn phase(&self) -> RegistryPhase {
        self.core.phase()
    }

    /// Number of currently tracked resources.
    pub fn len(&self) -> usize {
        self.core.len()
    }

    pub fn is_empty(&self) -> bool {
        self.core.is_empty()
    }

    pub fn contains(&self, resource: &ResourceRef) -> bool {
        self.core.contains(resource)
    }

    pub fn scope(&self) -> &str {
        self.core.scope()
    }

    pub fn stats(&self) -> RegistryStats {
        self.core.stats()
    }
}

impl Default for CloseableRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CloseableRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloseableRegistry")
            .field("scope", &self.scope())
            .field("phase", &self.phase())
            .field("tracked", &self.len())
            .finish()
    }
}
