use std::time::Duration;

use async_trait::async_trait;

use super::Result;

/// Key-value store behind the list, set and detail caches.
///
/// Values are opaque blobs produced by the wire codec.
#[async_trait]
pub trait Store: Send + Sync {
    /// Replaces the whole list at `key` with `values` and sets its TTL.
    async fn replace_list(&self, key: &str, values: &[Vec<u8>], ttl: Duration) -> Result<()>;

    /// Reads the whole list at `key`. A missing key is an empty list.
    async fn read_list(&self, key: &str) -> Result<Vec<Vec<u8>>>;

    /// Returns one random member of the set at `key`.
    async fn random_member(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Adds `value` to the set at `key` and refreshes its TTL.
    async fn add_member(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()>;

    /// Removes up to `count` random members and returns how many were removed.
    async fn pop_random(&self, key: &str, count: usize) -> Result<usize>;

    /// Number of members of the set at `key`.
    async fn cardinality(&self, key: &str) -> Result<usize>;

    /// Reads several plain values at once, in key order.
    async fn get_many(&self, keys: &[String]) -> Result<Vec<Option<Vec<u8>>>>;

    /// Writes several plain values, each with the same TTL.
    async fn set_many(&self, entries: &[(String, Vec<u8>)], ttl: Duration) -> Result<()>;
}
