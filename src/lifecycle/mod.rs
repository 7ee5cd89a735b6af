//! Cache-generation lifecycle.
//!
//! This module provides the [`CacheLifecycleManager`], the event-driven
//! object at the heart of the crate. One manager instance exists per
//! deployed generation; the host dispatches its three hooks:
//!
//! - install: precache the manifest into this generation's partition
//! - activate: prune stale generations and claim open clients
//! - fetch: answer an intercepted request, cache-first
//!
//! The host dispatch loop itself is external to this crate.

pub mod manager;

use futures::future::BoxFuture;

use crate::error::CacheError;
use crate::models::StoredResponse;

pub use manager::{CacheLifecycleManager, LifecycleState};

/// The hook interface a host registers once per manager instance. The host
/// awaits each returned future to completion before considering the hook
/// done; install and activate for the same generation are never dispatched
/// concurrently.
pub trait LifecycleHandler: Send + Sync {
    fn on_install(&self) -> BoxFuture<'_, Result<(), CacheError>>;

    fn on_activate(&self) -> BoxFuture<'_, Result<(), CacheError>>;

    fn on_fetch<'a>(
        &'a self,
        method: &'a str,
        url: &'a str,
    ) -> BoxFuture<'a, Result<StoredResponse, CacheError>>;
}

impl LifecycleHandler for CacheLifecycleManager {
    fn on_install(&self) -> BoxFuture<'_, Result<(), CacheError>> {
        Box::pin(self.install())
    }

    fn on_activate(&self) -> BoxFuture<'_, Result<(), CacheError>> {
        Box::pin(self.activate())
    }

    fn on_fetch<'a>(
        &'a self,
        method: &'a str,
        url: &'a str,
    ) -> BoxFuture<'a, Result<StoredResponse, CacheError>> {
        Box::pin(self.intercept(method, url))
    }
}
