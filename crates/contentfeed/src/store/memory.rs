//! In-memory store with LRU eviction and lazy TTL expiry.
//!
//! Mirrors the Redis data types the caches rely on: plain values, lists and
//! sets. Using a key with the wrong operation family fails like Redis does.

use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use rand::seq::IteratorRandom;
use tokio::sync::RwLock;

use contentfeed_core::cache::{CacheError, Result, Store};

#[derive(Debug, Clone)]
enum StoredValue {
    Bytes(Vec<u8>),
    List(Vec<Vec<u8>>),
    Set(HashSet<Vec<u8>>),
}

/// A single store entry with optional expiration.
#[derive(Debug, Clone)]
struct StoreEntry {
    value: StoredValue,
    expires_at: Option<Instant>,
}

impl StoreEntry {
    fn new(value: StoredValue, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Some(Instant::now() + ttl),
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Instant::now() > exp)
    }
}

fn wrong_type(key: &str) -> CacheError {
    CacheError::OperationFailed(format!(
        "WRONGTYPE Operation against a key holding the wrong kind of value: {key}"
    ))
}

/// Returns the live entry at `key`, dropping it first if it expired.
fn live<'a>(entries: &'a mut LruCache<String, StoreEntry>, key: &str) -> Option<&'a mut StoreEntry> {
    if entries.peek(key).is_some_and(StoreEntry::is_expired) {
        entries.pop(key);
        return None;
    }
    entries.get_mut(key)
}

/// In-memory store implementation.
///
/// Thread-safe store using `Arc<RwLock<LruCache>>` for concurrent access.
/// Evicts the least recently used key once `max_entries` is reached.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    entries: Arc<RwLock<LruCache<String, StoreEntry>>>,
}

impl MemoryStore {
    /// Creates a new in-memory store holding at most `max_entries` keys.
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Arc::new(RwLock::new(LruCache::new(capacity))),
        }
    }

    /// Number of live keys.
    pub async fn len(&self) -> usize {
        let entries = self.entries.read().await;
        entries.iter().filter(|(_, e)| !e.is_expired()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn replace_list(&self, key: &str, values: &[Vec<u8>], ttl: Duration) -> Result<()> {
        let mut entries = self.entries.write().await;
        if values.is_empty() {
            entries.pop(key);
        } else {
            let entry = StoreEntry::new(StoredValue::List(values.to_vec()), ttl);
            entries.put(key.to_string(), entry);
        }
        Ok(())
    }

    async fn read_list(&self, key: &str) -> Result<Vec<Vec<u8>>> {
        let mut entries = self.entries.write().await;
        match live(&mut entries, key).map(|e| &e.value) {
            Some(StoredValue::List(values)) => Ok(values.clone()),
            Some(_) => Err(wrong_type(key)),
            None => Ok(Vec::new()),
        }
    }

    async fn random_member(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut entries = self.entries.write().await;
        match live(&mut entries, key).map(|e| &e.value) {
            Some(StoredValue::Set(members)) => {
                Ok(members.iter().choose(&mut rand::rng()).cloned())
            }
            Some(_) => Err(wrong_type(key)),
            None => Ok(None),
        }
    }

    async fn add_member(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        let mut entries = self.entries.write().await;
        match live(&mut entries, key) {
            Some(entry) => match &mut entry.value {
                StoredValue::Set(members) => {
                    members.insert(value.to_vec());
                    entry.expires_at = Some(Instant::now() + ttl);
                    Ok(())
                }
                _ => Err(wrong_type(key)),
            },
            None => {
                let members = HashSet::from([value.to_vec()]);
                entries.put(key.to_string(), StoreEntry::new(StoredValue::Set(members), ttl));
                Ok(())
            }
        }
    }

    async fn pop_random(&self, key: &str, count: usize) -> Result<usize> {
        let mut entries = self.entries.write().await;
        let (popped, emptied) = match live(&mut entries, key).map(|e| &mut e.value) {
            Some(StoredValue::Set(members)) => {
                let victims = members
                    .iter()
                    .cloned()
                    .choose_multiple(&mut rand::rng(), count);
                for victim in &victims {
                    members.remove(victim);
                }
                (victims.len(), members.is_empty())
            }
            Some(_) => return Err(wrong_type(key)),
            None => return Ok(0),
        };
        if emptied {
            entries.pop(key);
        }
        Ok(popped)
    }

    async fn cardinality(&self, key: &str) -> Result<usize> {
        let mut entries = self.entries.write().await;
        match live(&mut entries, key).map(|e| &e.value) {
            Some(StoredValue::Set(members)) => Ok(members.len()),
            Some(_) => Err(wrong_type(key)),
            None => Ok(0),
        }
    }

    async fn get_many(&self, keys: &[String]) -> Result<Vec<Option<Vec<u8>>>> {
        let mut entries = self.entries.write().await;
        Ok(keys
            .iter()
            .map(|key| match live(&mut entries, key).map(|e| &e.value) {
                Some(StoredValue::Bytes(value)) => Some(value.clone()),
                _ => None,
            })
            .collect())
    }

    async fn set_many(&self, pairs: &[(String, Vec<u8>)], ttl: Duration) -> Result<()> {
        let mut entries = self.entries.write().await;
        for (key, value) in pairs {
            let entry = StoreEntry::new(StoredValue::Bytes(value.clone()), ttl);
            entries.put(key.clone(), entry);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    fn blob(s: &str) -> Vec<u8> {
        s.as_bytes().to_vec()
    }

    #[tokio::test]
    async fn test_replace_list_drops_old_tail() {
        let store = MemoryStore::new(100);
        store
            .replace_list("k", &[blob("a"), blob("b"), blob("c")], TTL)
            .await
            .unwrap();
        store.replace_list("k", &[blob("d")], TTL).await.unwrap();

        assert_eq!(store.read_list("k").await.unwrap(), vec![blob("d")]);
    }

    #[tokio::test]
    async fn test_read_missing_list_is_empty() {
        let store = MemoryStore::new(100);
        assert!(store.read_list("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ttl_expiration() {
        let store = MemoryStore::new(100);
        store
            .set_many(&[("k".to_string(), blob("v"))], Duration::from_millis(50))
            .await
            .unwrap();
        assert!(store.get_many(&["k".to_string()]).await.unwrap()[0].is_some());

        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(store.get_many(&["k".to_string()]).await.unwrap(), vec![None]);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_set_members() {
        let store = MemoryStore::new(100);
        assert_eq!(store.random_member("s").await.unwrap(), None);

        store.add_member("s", b"a", TTL).await.unwrap();
        store.add_member("s", b"b", TTL).await.unwrap();
        store.add_member("s", b"b", TTL).await.unwrap();

        assert_eq!(store.cardinality("s").await.unwrap(), 2);
        let member = store.random_member("s").await.unwrap().unwrap();
        assert!(member == blob("a") || member == blob("b"));
    }

    #[tokio::test]
    async fn test_pop_random_removes_count() {
        let store = MemoryStore::new(100);
        for i in 0..10 {
            store.add_member("s", format!("m{i}").as_bytes(), TTL).await.unwrap();
        }
        assert_eq!(store.pop_random("s", 4).await.unwrap(), 4);
        assert_eq!(store.cardinality("s").await.unwrap(), 6);

        assert_eq!(store.pop_random("s", 100).await.unwrap(), 6);
        assert_eq!(store.cardinality("s").await.unwrap(), 0);
        assert_eq!(store.pop_random("missing", 3).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_many_keeps_key_order() {
        let store = MemoryStore::new(100);
        store
            .set_many(
                &[("a".to_string(), blob("1")), ("c".to_string(), blob("3"))],
                TTL,
            )
            .await
            .unwrap();
        let keys = ["a", "b", "c"].map(String::from);
        assert_eq!(
            store.get_many(&keys).await.unwrap(),
            vec![Some(blob("1")), None, Some(blob("3"))]
        );
    }

    #[tokio::test]
    async fn test_wrong_type_fails() {
        let store = MemoryStore::new(100);
        store.add_member("s", b"a", TTL).await.unwrap();
        assert!(matches!(
            store.read_list("s").await,
            Err(CacheError::OperationFailed(_))
        ));
        assert_eq!(store.get_many(&["s".to_string()]).await.unwrap(), vec![None]);
    }

    #[tokio::test]
    async fn test_lru_eviction() {
        let store = MemoryStore::new(2);
        let pairs = |k: &str| vec![(k.to_string(), blob(k))];
        store.set_many(&pairs("a"), TTL).await.unwrap();
        store.set_many(&pairs("b"), TTL).await.unwrap();
        store.set_many(&pairs("c"), TTL).await.unwrap();
        assert_eq!(store.get_many(&["a".to_string()]).await.unwrap(), vec![None]);
        assert_eq!(store.len().await, 2);
    }
}
