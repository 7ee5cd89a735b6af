//! Cache storage boundary.
//!
//! The manager depends on five operations from the host's persistent
//! storage facility: open a named partition, write an entry, read an entry,
//! list partition names, and delete a partition. [`CacheStorage`] is that
//! boundary; [`MemoryStorage`] is the in-process reference backend.
//!
//! Storage is partitioned by generation: each generation's entries live in
//! their own partition, written by exactly one install and read by any
//! number of concurrent intercepts. Backends must isolate reads of one
//! partition from concurrent creation of another.

pub mod memory;

use futures::future::BoxFuture;

use crate::error::StorageError;
use crate::models::StoredResponse;

pub use memory::MemoryStorage;

pub trait CacheStorage: Send + Sync {
    /// Open the named partition, creating it if absent. Idempotent.
    fn open_partition<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<(), StorageError>>;

    /// Write one entry into a partition, replacing any previous value for
    /// the same key.
    fn write_entry<'a>(
        &'a self,
        partition: &'a str,
        key: &'a str,
        response: StoredResponse,
    ) -> BoxFuture<'a, Result<(), StorageError>>;

    /// Read one entry from a partition. `Ok(None)` on a miss, including
    /// when the partition itself does not exist.
    fn read_entry<'a>(
        &'a self,
        partition: &'a str,
        key: &'a str,
    ) -> BoxFuture<'a, Result<Option<StoredResponse>, StorageError>>;

    /// Names of every partition currently present.
    fn list_partitions(&self) -> BoxFuture<'_, Result<Vec<String>, StorageError>>;

    /// Delete a partition and all its entries. Returns whether the
    /// partition existed.
    fn delete_partition<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<bool, StorageError>>;
}
