//! Versioned offline asset cache with cache-first request interception.
//!
//! This crate provides the [`CacheLifecycleManager`], which sits between a
//! client application and the network. At deploy time it installs a named
//! cache generation from a fixed manifest of resources, activates that
//! generation (pruning the generations left behind by prior deployments),
//! and from then on answers intercepted requests from the cache, falling
//! back to a live network fetch on a miss.
//!
//! The manager depends on three injected boundaries:
//! - [`CacheStorage`] for persistent partitioned storage
//! - [`NetworkFetcher`] for live fetches
//! - [`ClientClaimer`] for taking over already-connected clients
//!
//! Reference implementations ([`MemoryStorage`], [`HttpFetcher`],
//! [`ClientRegistry`]) are included; hosts may substitute their own.

pub mod clients;
pub mod config;
pub mod error;
pub mod fetch;
pub mod lifecycle;
pub mod models;
pub mod storage;

pub use clients::{ClientClaimer, ClientRegistry};
pub use config::DeploymentConfig;
pub use error::{CacheError, FetchError, StorageError};
pub use fetch::{HttpFetcher, NetworkFetcher};
pub use lifecycle::{CacheLifecycleManager, LifecycleHandler, LifecycleState};
pub use models::{CacheKey, Manifest, StoredResponse};
pub use storage::{CacheStorage, MemoryStorage};
