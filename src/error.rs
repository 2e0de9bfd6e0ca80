use std::fmt;

use crate::resource::{CloseError, ResourceRef};

/// Rejection returned by `register` once the owning scope has begun closing.
///
/// Carries the resource and its metadata back to the caller, which is now the
/// sole party responsible for releasing the resource.
pub struct AlreadyClosing<M = ()> {
    pub resource: ResourceRef,
    pub meta: M,
}

impl<M> AlreadyClosing<M> {
    /// Recover the rejected resource for caller-side release.
    pub fn into_resource(self) -> ResourceRef {
        self.resource
    }

    pub fn into_parts(self) -> (ResourceRef, M) {
        (self.resource, self.meta)
    }
}

impl<M> fmt::Debug for AlreadyClosing<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlreadyClosing")
            .field("resource", &self.resource.describe())
            .finish_non_exhaustive()
    }
}

impl<M> fmt::Display for AlreadyClosing<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "registry is closing; registration rejected and the resource returned to the caller"
        )
    }
}

impl<M> std::error::Error for AlreadyClosing<M> {}

/// Combined failure raised by selective release when one or more resources
/// fail to close.
///
/// The first failure becomes the primary; every later failure is attached as
/// a suppressed cause. All requested releases were still attempted.
#[derive(Debug, thiserror::Error)]
#[error("{} resource release failure(s); primary: {}", .suppressed.len() + 1, .primary)]
pub struct AggregateCloseError {
    primary: CloseError,
    suppressed: Vec<CloseError>,
}

impl AggregateCloseError {
    /// `None` when no failures occurred, otherwise the combined failure with
    /// the first entry promoted to primary.
    pub(crate) fn from_failures(mut failures: Vec<CloseError>) -> Option<Self> {
        if failures.is_empty() {
            return None;
        }
        let primary = failures.remove(0);
        Some(Self {
            primary,
            suppressed: failures,
        })
    }

    pub fn primary(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.primary.as_ref()
    }

    pub fn suppressed(&self) -> &[CloseError] {
        &self.suppressed
    }

    pub fn total_failures(&self) -> usize {
        self.suppressed.len() + 1
    }
}

/// Invalid registry configuration, typically from environment overrides.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("configuration error: {0}")]
pub struct ConfigError(pub String);
