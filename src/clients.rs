//! Client-claim boundary.
//!
//! When a new generation activates, already-connected clients must be taken
//! over so their next request is intercepted by the new manager instance,
//! without requiring a reload. [`ClientClaimer`] is the host call that does
//! this; [`ClientRegistry`] is an in-process implementation for hosts that
//! model clients themselves (and for tests).

use std::collections::HashMap;

use futures::future::BoxFuture;
use tokio::sync::RwLock;
use tracing::debug;

pub trait ClientClaimer: Send + Sync {
    /// Place every currently-connected client under the control of
    /// `generation`. Idempotent; the platform call always settles.
    fn claim<'a>(&'a self, generation: &'a str) -> BoxFuture<'a, ()>;
}

/// Tracks connected clients and the generation controlling each.
#[derive(Debug, Default)]
pub struct ClientRegistry {
    // client id -> controlling generation, None until first claim
    clients: RwLock<HashMap<String, Option<String>>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a newly connected client. It stays uncontrolled until the
    /// next claim.
    pub async fn connect(&self, client_id: &str) {
        self.clients
            .write()
            .await
            .insert(client_id.to_string(), None);
    }

    pub async fn disconnect(&self, client_id: &str) {
        self.clients.write().await.remove(client_id);
    }

    /// Generation currently controlling a client, if any.
    pub async fn controller_of(&self, client_id: &str) -> Option<String> {
        self.clients.read().await.get(client_id).cloned().flatten()
    }

    pub async fn client_count(&self) -> usize {
        self.clients.read().await.len()
    }
}

impl ClientClaimer for ClientRegistry {
    fn claim<'a>(&'a self, generation: &'a str) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let mut clients = self.clients.write().await;
            for controller in clients.values_mut() {
                *controller = Some(generation.to_string());
            }
            debug!(generation = %generation, clients = clients.len(), "claimed clients");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_claim_takes_over_all_clients() {
        let registry = ClientRegistry::new();
        registry.connect("tab-1").await;
        registry.connect("tab-2").await;
        assert_eq!(registry.controller_of("tab-1").await, None);

        registry.claim("v1").await;
        assert_eq!(registry.controller_of("tab-1").await, Some("v1".to_string()));
        assert_eq!(registry.controller_of("tab-2").await, Some("v1".to_string()));
    }

    #[tokio::test]
    async fn test_claim_is_idempotent() {
        let registry = ClientRegistry::new();
        registry.connect("tab-1").await;

        registry.claim("v1").await;
        registry.claim("v1").await;
        assert_eq!(registry.controller_of("tab-1").await, Some("v1".to_string()));
        assert_eq!(registry.client_count().await, 1);
    }

    #[tokio::test]
    async fn test_newer_generation_supersedes() {
        let registry = ClientRegistry::new();
        registry.connect("tab-1").await;

        registry.claim("v1").await;
        registry.claim("v2").await;
        assert_eq!(registry.controller_of("tab-1").await, Some("v2".to_string()));
    }
}
