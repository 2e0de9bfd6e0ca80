//! # Resource Capability Contract
//!
//! The single capability a tracked resource must provide, plus the identity
//! key the registry uses to address it.
//!
//! Resources are shared as `Arc<dyn CloseableResource>` and addressed by
//! pointer identity, so the same allocation registered through different
//! clones of the handle resolves to the same tracked entry.

use std::fmt;
use std::sync::Arc;

/// Error produced by a failed [`CloseableResource::close`] call.
pub type CloseError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A short-lived resource owned by a scope for the duration of its lifetime.
///
/// The registry invokes [`close`](CloseableResource::close) at most once per
/// successful registration. Implementations are not required to be
/// idempotent; callers that release a resource themselves must not register
/// it again afterwards.
pub trait CloseableResource: Send + Sync {
    /// Release the resource.
    fn close(&self) -> Result<(), CloseError>;

    /// Short label used in structured log fields.
    fn describe(&self) -> &str {
        "closeable resource"
    }
}

/// Shared handle to a tracked resource.
pub type ResourceRef = Arc<dyn CloseableResource>;

/// Identity of a tracked resource.
///
/// Derived from the `Arc` allocation address, so identity survives trait
/// object coercion and handle cloning but is only meaningful while the
/// caller still holds a clone of the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceKey(usize);

impl ResourceKey {
    pub fn of(resource: &ResourceRef) -> Self {
        Self(Arc::as_ptr(resource) as *const () as usize)
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
