//! # Generic Registry Core
//!
//! Concurrency-disciplined tracking of closeable resources for an owning
//! scope, generic over a pluggable release policy.
//!
//! ## Overview
//!
//! The core owns an insertion-ordered map of tracked resources, an
//! irreversible `Open -> Closing` phase flag, and the mutex guarding both as
//! one atomic unit. The mechanics of insert, remove, and bulk release are
//! delegated to a [`ReleasePolicy`] supplied by composition, so
//! specializations can attach different metadata or different bulk-release
//! behavior without re-deriving the concurrency protocol.
//!
//! ## Concurrency Discipline
//!
//! The guard is held only for O(1) map mutation. `close` flips the phase and
//! takes the entry map while locked, then releases the guard *before* any
//! resource teardown runs. A slow release therefore never blocks a
//! concurrent `register` or `unregister`; late registrations observe
//! `Closing`, are rejected, and the resource is handed back to the caller.
//!
//! An accepted resource is released by exactly one party: the registry's own
//! `close` if it was captured in the drain, or the caller if registration
//! was rejected. No interleaving produces zero or two registry-driven
//! releases.
//!
//! ## Usage
//!
//! ```rust
//! use std::convert::Infallible;
//! use std::sync::Arc;
//!
//! use resource_registry::{
//!     CloseError, CloseableResource, RegistryCore, ReleasePolicy, TrackedEntry,
//! };
//!
//! struct DrainingRelease;
//!
//! impl ReleasePolicy for DrainingRelease {
//!     type Meta = &'static str;
//!     type Error = Infallible;
//!
//!     fn release_all(&self, drained: Vec<TrackedEntry<&'static str>>) -> Result<(), Infallible> {
//!         for entry in drained {
//!             let _ = entry.resource.close();
//!         }
//!         Ok(())
//!     }
//! }
//!
//! struct SpillStream;
//!
//! impl CloseableResource for SpillStream {
//!     fn close(&self) -> Result<(), CloseError> {
//!         Ok(())
//!     }
//! }
//!
//! let registry = RegistryCore::new(DrainingRelease);
//! registry
//!     .register(Arc::new(SpillStream), "spill stream")
//!     .expect("scope is open");
//! registry.close().expect("draining policy never fails");
//! assert!(registry.is_closed());
//! ```

use std::mem;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::RegistryConfig;
use crate::error::AlreadyClosing;
use crate::resource::{ResourceKey, ResourceRef};

/// Registry lifecycle phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegistryPhase {
    /// Accepting registrations.
    Open,
    /// Shutdown has begun; all further registrations are rejected.
    Closing,
}

/// A resource tracked by the registry together with its policy metadata.
pub struct TrackedEntry<M> {
    pub resource: ResourceRef,
    pub meta: M,
}

/// Insertion-ordered map of tracked entries, keyed by resource identity.
pub type EntryMap<M> = IndexMap<ResourceKey, TrackedEntry<M>>;

/// Hooks specializing the registry core.
///
/// `insert` and `remove` run under the registry guard and default to plain
/// ordered-map operations. `release_all` runs outside the guard and defines
/// the bulk-release behavior of `close`.
pub trait ReleasePolicy: Send + Sync {
    /// Per-resource metadata attached at registration.
    type Meta: Send;
    /// Failure surfaced by [`release_all`](ReleasePolicy::release_all).
    type Error;

    /// Insert hook. A duplicate key overwrites the prior entry while keeping
    /// its original insertion position.
    fn insert(&self, entry: TrackedEntry<Self::Meta>, entries: &mut EntryMap<Self::Meta>) {
        entries.insert(ResourceKey::of(&entry.resource), entry);
    }

    /// Remove hook. Reports whether the key was present.
    fn remove(&self, key: ResourceKey, entries: &mut EntryMap<Self::Meta>) -> bool {
        entries.shift_remove(&key).is_some()
    }

    /// Bulk-release hook, invoked once per registry lifetime with the
    /// drained entries in teardown order (most recently registered first).
    fn release_all(&self, drained: Vec<TrackedEntry<Self::Meta>>) -> Result<(), Self::Error>;
}

/// Point-in-time snapshot of registry activity.
#[derive(Debug, Clone, Serialize)]
pub struct RegistryStats {
    pub scope: String,
    pub phase: RegistryPhase,
    pub tracked: usize,
    pub registered_total: u64,
    pub rejected_total: u64,
    pub opened_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

/// The guarded `(entries, phase)` pair plus counters, mutated only while the
/// registry mutex is held.
struct RegistryState<M> {
    entries: EntryMap<M>,
    phase: RegistryPhase,
    registered_total: u64,
    rejected_total: u64,
    closed_at: Option<DateTime<Utc>>,
}

/// Generic registry core.
///
/// All public operations are safe to call from multiple threads without
/// external synchronization.
pub struct RegistryCore<P: ReleasePolicy> {
    policy: P,
    config: RegistryConfig,
    opened_at: DateTime<Utc>,
    state: Mutex<RegistryState<P::Meta>>,
}

impl<P: ReleasePolicy> RegistryCore<P> {
    pub fn new(policy: P) -> Self {
        Self::with_config(policy, RegistryConfig::default())
    }

    pub fn with_config(policy: P, config: RegistryConfig) -> Self {
        debug!(
            scope = %config.scope,
            initial_capacity = config.initial_capacity,
            "registry created"
        );

        Self {
            state: Mutex::new(RegistryState {
                entries: EntryMap::with_capacity(config.initial_capacity),
                phase: RegistryPhase::Open,
                registered_total: 0,
                rejected_total: 0,
                closed_at: None,
            }),
            policy,
            config,
            opened_at: Utc::now(),
        }
    }

    /// Track a resource for release at scope close.
    ///
    /// Rejected once the registry is `Closing`; the rejection carries the
    /// resource and metadata back, and the caller must release the resource
    /// itself. Registering a handle that is already tracked overwrites its
    /// metadata and keeps a single logical entry.
    pub fn register(
        &self,
        resource: ResourceRef,
        meta: P::Meta,
    ) -> Result<(), AlreadyClosing<P::Meta>> {
        let mut state = self.state.lock();

        if state.phase == RegistryPhase::Closing {
            state.rejected_total += 1;
            drop(state);
            debug!(
                scope = %self.config.scope,
                resource = resource.describe(),
                "registration rejected, scope is closing"
            );
            return Err(AlreadyClosing { resource, meta });
        }

        debug!(
            scope = %self.config.scope,
            resource = resource.describe(),
            "resource registered"
        );
        self.policy
            .insert(TrackedEntry { resource, meta }, &mut state.entries);
        state.registered_total += 1;
        Ok(())
    }

    /// Stop tracking a resource without releasing it.
    ///
    /// Returns whether it was still tracked. Responsibility for releasing
    /// the resource transfers back to the caller on `true`. Always legal,
    /// even after close (removes nothing once the registry was swept).
    pub fn unregister(&self, resource: &ResourceRef) -> bool {
        let key = ResourceKey::of(resource);
        let mut state = self.state.lock();
        self.policy.remove(key, &mut state.entries)
    }

    /// Transition to `Closing` and release every tracked resource through
    /// the policy's bulk-release hook.
    ///
    /// Idempotent: only the first call performs the release work; later
    /// calls return `Ok` immediately. The guard is released before any
    /// resource teardown runs.
    pub fn close(&self) -> Result<(), P::Error> {
        let drained = {
            let mut state = self.state.lock();
            if state.phase == RegistryPhase::Closing {
                return Ok(());
            }
            state.phase = RegistryPhase::Closing;
            state.closed_at = Some(Utc::now());
            mem::take(&mut state.entries)
        };

        let mut teardown: Vec<TrackedEntry<P::Meta>> = drained.into_values().collect();
        teardown.reverse();

        info!(
            scope = %self.config.scope,
            resources = teardown.len(),
            "🧹 scope closing, releasing tracked resources"
        );
        self.policy.release_all(teardown)
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().phase == RegistryPhase::Closing
    }

    pub fn phase(&self) -> RegistryPhase {
        self.state.lock().phase
    }

    /// Number of currently tracked resources.
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    pub fn contains(&self, resource: &ResourceRef) -> bool {
        self.state
            .lock()
            .entries
            .contains_key(&ResourceKey::of(resource))
    }

    pub fn scope(&self) -> &str {
        &self.config.scope
    }

    pub fn stats(&self) -> RegistryStats {
        let state = self.state.lock();
        RegistryStats {
            scope: self.config.scope.clone(),
            phase: state.phase,
            tracked: state.entries.len(),
            registered_total: state.registered_total,
            rejected_total: state.rejected_total,
            opened_at: self.opened_at,
            closed_at: state.closed_at,
        }
    }
}
