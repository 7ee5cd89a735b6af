//! In-memory [`CacheStorage`] backend.

use std::collections::HashMap;

use futures::future::BoxFuture;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::StorageError;
use crate::models::StoredResponse;

use super::CacheStorage;

/// Partitioned in-memory store. The reference backend for hosts without a
/// persistent storage facility, and the backend the lifecycle tests run
/// against.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    partitions: RwLock<HashMap<String, HashMap<String, StoredResponse>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries in a partition, or `None` if it does not exist.
    pub async fn entry_count(&self, partition: &str) -> Option<usize> {
        self.partitions
            .read()
            .await
            .get(partition)
            .map(HashMap::len)
    }

    pub async fn partition_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.partitions.read().await.keys().cloned().collect();
        names.sort();
        names
    }
}

impl CacheStorage for MemoryStorage {
    fn open_partition<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            let mut partitions = self.partitions.write().await;
            if !partitions.contains_key(name) {
                debug!(partition = %name, "creating partition");
                partitions.insert(name.to_string(), HashMap::new());
            }
            Ok(())
        })
    }

    fn write_entry<'a>(
        &'a self,
        partition: &'a str,
        key: &'a str,
        response: StoredResponse,
    ) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            let mut partitions = self.partitions.write().await;
            let entries = partitions
                .get_mut(partition)
                .ok_or_else(|| StorageError::new(partition, "partition not open"))?;
            entries.insert(key.to_string(), response);
            Ok(())
        })
    }

    fn read_entry<'a>(
        &'a self,
        partition: &'a str,
        key: &'a str,
    ) -> BoxFuture<'a, Result<Option<StoredResponse>, StorageError>> {
        Box::pin(async move {
            let partitions = self.partitions.read().await;
            Ok(partitions
                .get(partition)
                .and_then(|entries| entries.get(key))
                .cloned())
        })
    }

    fn list_partitions(&self) -> BoxFuture<'_, Result<Vec<String>, StorageError>> {
        Box::pin(async move { Ok(self.partition_names().await) })
    }

    fn delete_partition<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<bool, StorageError>> {
        Box::pin(async move {
            let existed = self.partitions.write().await.remove(name).is_some();
            if existed {
                debug!(partition = %name, "deleted partition");
            }
            Ok(existed)
        })
    }
}
