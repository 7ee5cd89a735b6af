use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::clients::ClientClaimer;
use crate::error::{CacheError, FetchError};
use crate::fetch::NetworkFetcher;
use crate::models::{CacheKey, Manifest, StoredResponse};
use crate::storage::CacheStorage;

/// Where a manager instance stands in its generation's lifecycle.
///
/// `Installing` is the starting state. A successful install moves to
/// `Ready`, any manifest fetch failure to `Failed` (the host may retry the
/// install hook). Activation moves `Ready` to `Active`; `Active` is
/// terminal until a new generation's manager replaces this instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Installing,
    Ready,
    Failed,
    Active,
}

/// Manages one cache generation: installs it from the manifest, activates
/// it (pruning stale generations and claiming open clients), and answers
/// intercepted requests cache-first with network fallback.
///
/// Storage, network, and client-claim facilities are injected; the manager
/// holds no ambient global state.
pub struct CacheLifecycleManager {
    storage: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn NetworkFetcher>,
    clients: Arc<dyn ClientClaimer>,
    generation: String,
    manifest: Manifest,
    state: RwLock<LifecycleState>,
}

impl CacheLifecycleManager {
    /// Create a manager for `generation`. The generation id is an opaque
    /// tag chosen by the deployer; the manager never generates one itself.
    pub fn new(
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn NetworkFetcher>,
        clients: Arc<dyn ClientClaimer>,
        generation: impl Into<String>,
        manifest: Manifest,
    ) -> Self {
        Self {
            storage,
            fetcher,
            clients,
            generation: generation.into(),
            manifest,
            state: RwLock::new(LifecycleState::Installing),
        }
    }

    pub fn generation(&self) -> &str {
        &self.generation
    }

    pub async fn state(&self) -> LifecycleState {
        *self.state.read().await
    }

    async fn set_state(&self, next: LifecycleState) {
        *self.state.write().await = next;
    }

    /// Populate this generation's partition from the manifest.
    ///
    /// All-or-nothing from the caller's view: any transport failure,
    /// non-success status, or storage failure aborts the install, leaves
    /// the manager in `Failed`, and propagates the error so the host can
    /// retry the hook. A partially-written partition is harmless because it
    /// never becomes current without a successful install.
    pub async fn install(&self) -> Result<(), CacheError> {
        match self.state().await {
            // Already fully installed; nothing to redo.
            LifecycleState::Ready | LifecycleState::Active => return Ok(()),
            LifecycleState::Installing | LifecycleState::Failed => {}
        }

        info!(generation = %self.generation, resources = self.manifest.len(), "installing generation");

        if let Err(e) = self.storage.open_partition(&self.generation).await {
            self.set_state(LifecycleState::Failed).await;
            return Err(e.into());
        }

        for resource in self.manifest.iter() {
            let response = match self.fetcher.fetch(resource).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(generation = %self.generation, url = %resource, error = %e, "install fetch failed");
                    self.set_state(LifecycleState::Failed).await;
                    return Err(CacheError::InstallFetch {
                        generation: self.generation.clone(),
                        source: e,
                    });
                }
            };

            if !response.is_success() {
                warn!(generation = %self.generation, url = %resource, status = response.status, "install fetch returned error status");
                self.set_state(LifecycleState::Failed).await;
                return Err(CacheError::InstallFetch {
                    generation: self.generation.clone(),
                    source: FetchError::status(response.status, resource),
                });
            }

            let key = CacheKey::get(resource);
            if let Err(e) = self
                .storage
                .write_entry(&self.generation, key.as_str(), response)
                .await
            {
                self.set_state(LifecycleState::Failed).await;
                return Err(e.into());
            }
            debug!(generation = %self.generation, key = %key, "precached resource");
        }

        self.set_state(LifecycleState::Ready).await;
        info!(generation = %self.generation, "install complete");
        Ok(())
    }

    /// Make this generation authoritative: delete every partition whose
    /// name does not match it, then claim currently-open clients.
    ///
    /// Deletions are best-effort and independent; a failure on one stale
    /// partition never blocks the others or the claim step, but any failure
    /// is still reported once everything has run. Calling activate again on
    /// an already-active generation is a no-op.
    pub async fn activate(&self) -> Result<(), CacheError> {
        match self.state().await {
            LifecycleState::Ready | LifecycleState::Active => {}
            LifecycleState::Installing | LifecycleState::Failed => {
                return Err(CacheError::NotReady {
                    generation: self.generation.clone(),
                });
            }
        }

        let names = self.storage.list_partitions().await?;
        let mut failed: Vec<String> = Vec::new();

        for name in names {
            if name == self.generation {
                continue;
            }
            match self.storage.delete_partition(&name).await {
                Ok(_) => debug!(partition = %name, "pruned stale generation"),
                Err(e) => {
                    warn!(partition = %name, error = %e, "failed to delete stale generation");
                    failed.push(name);
                }
            }
        }

        self.clients.claim(&self.generation).await;
        self.set_state(LifecycleState::Active).await;
        info!(generation = %self.generation, "generation active");

        if failed.is_empty() {
            Ok(())
        } else {
            Err(CacheError::PartitionDeletion { partitions: failed })
        }
    }

    /// Answer an intercepted request, cache-first.
    ///
    /// On a hit the stored response is returned without touching the
    /// network. On a miss, exactly one live fetch is issued and its result
    /// returned unmodified, success or error status alike; nothing is
    /// written back to the cache. A transport failure on the live fetch is
    /// surfaced to the requester as-is, with no synthesized fallback.
    ///
    /// Only a fully installed generation is servable: until the state is
    /// `Ready` or `Active` the partition may be partially written, so the
    /// lookup is skipped and the request goes straight to the network.
    pub async fn intercept(&self, method: &str, url: &str) -> Result<StoredResponse, CacheError> {
        let key = CacheKey::new(method, url);

        let servable = matches!(
            self.state().await,
            LifecycleState::Ready | LifecycleState::Active
        );
        if servable {
            if let Some(hit) = self
                .storage
                .read_entry(&self.generation, key.as_str())
                .await?
            {
                debug!(key = %key, "cache hit");
                return Ok(hit);
            }
        }

        debug!(key = %key, "cache miss, fetching from network");
        self.fetcher
            .fetch(url)
            .await
            .map_err(CacheError::InterceptNetwork)
    }
}
