#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Resource Registry
//!
//! Concurrency-safe closeable-resource registry for scoped teardown of
//! short-lived resources.
//!
//! ## Overview
//!
//! An owning scope (a task, an operator, a session) opens short-lived
//! resources - handles, streams, connections, sub-components - while it
//! runs. This crate tracks those resources and guarantees that every one of
//! them is released exactly once when the scope ends, even while other
//! threads are still registering new resources concurrently with shutdown.
//!
//! The hard part is the race between "a new resource is being registered"
//! and "the owner is closing everything down": the registry resolves it
//! without leaking a resource, without releasing one twice, and without
//! making registration block on slow release operations.
//!
//! ## Architecture
//!
//! - [`registry::core`] - generic registry core: the guarded
//!   `(entries, phase)` pair, insertion-ordered tracking, and the
//!   [`ReleasePolicy`] hook trait for specializations.
//! - [`registry::closeable`] - [`CloseableRegistry`], the metadata-free
//!   specialization with a quiet `close_all` and an aggregating
//!   `release_some`.
//! - [`resource`] - the [`CloseableResource`] capability contract and
//!   pointer-identity keys.
//! - [`error`] - rejection and aggregated-failure types.
//! - [`config`] - scope naming and capacity configuration.
//! - [`logging`] - structured logging initialization for embedding hosts.
//!
//! ## Concurrency Guarantees
//!
//! - All operations are safe from multiple threads with no external locking.
//! - The internal guard is held only for O(1) map work, never across a
//!   resource release; a slow teardown cannot stall registration.
//! - An accepted resource is released by exactly one party: the registry if
//!   it was captured at close, otherwise the caller via the returned
//!   rejection.
//! - Bulk release runs in reverse registration order, one resource at a
//!   time.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use resource_registry::{CloseError, CloseableRegistry, CloseableResource};
//!
//! struct SpillFile;
//!
//! impl CloseableResource for SpillFile {
//!     fn close(&self) -> Result<(), CloseError> {
//!         Ok(())
//!     }
//!
//!     fn describe(&self) -> &str {
//!         "spill file"
//!     }
//! }
//!
//! let registry = CloseableRegistry::for_scope("task-7");
//!
//! let spill = Arc::new(SpillFile);
//! registry.register(Arc::clone(&spill) as _).expect("scope is open");
//!
//! // scope ends: everything still tracked is released exactly once
//! registry.close_all();
//! assert!(registry.is_closed());
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod registry;
pub mod resource;

pub use config::RegistryConfig;
pub use error::{AggregateCloseError, AlreadyClosing, ConfigError};
pub use registry::{
    CloseableRegistry, EntryMap, RegistryCore, RegistryPhase, RegistryStats, ReleasePolicy,
    TrackedEntry,
};
pub use resource::{CloseError, CloseableResource, ResourceKey, ResourceRef};
