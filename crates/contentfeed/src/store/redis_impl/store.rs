use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use contentfeed_core::cache::{CacheError, Result, Store};

use super::error::map_redis_error;

fn ttl_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

/// Redis store over one connection manager per address.
pub struct RedisStore {
    primary: ConnectionManager,
    readers: Vec<ConnectionManager>,
    next_reader: AtomicUsize,
}

impl RedisStore {
    /// Connects to every address. The first address is the write primary.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::ConnectionFailed` if any connection cannot be
    /// established, or if `urls` is empty.
    pub async fn new(urls: &[String]) -> Result<Self> {
        let mut readers = Vec::with_capacity(urls.len());
        for url in urls {
            let client = redis::Client::open(url.as_str()).map_err(map_redis_error)?;
            let conn = ConnectionManager::new(client)
                .await
                .map_err(map_redis_error)?;
            readers.push(conn);
        }
        let primary = readers
            .first()
            .cloned()
            .ok_or_else(|| CacheError::ConnectionFailed("no store address".to_string()))?;
        tracing::info!(addresses = urls.len(), "Redis store connected");
        Ok(Self {
            primary,
            readers,
            next_reader: AtomicUsize::new(0),
        })
    }

    fn writer(&self) -> ConnectionManager {
        self.primary.clone()
    }

    fn reader(&self) -> ConnectionManager {
        let index = self.next_reader.fetch_add(1, Ordering::Relaxed) % self.readers.len();
        self.readers[index].clone()
    }
}

#[async_trait]
impl Store for RedisStore {
    async fn replace_list(&self, key: &str, values: &[Vec<u8>], ttl: Duration) -> Result<()> {
        let mut conn = self.writer();
        if values.is_empty() {
            conn.del::<_, ()>(key).await.map_err(map_redis_error)?;
            return Ok(());
        }
        let mut pipe = redis::pipe();
        pipe.atomic()
            .ltrim(key, 1, 0)
            .ignore()
            .rpush(key, values)
            .ignore()
            .expire(key, ttl_seconds(ttl) as i64)
            .ignore();
        let (): () = pipe.query_async(&mut conn).await.map_err(map_redis_error)?;
        Ok(())
    }

    async fn read_list(&self, key: &str) -> Result<Vec<Vec<u8>>> {
        let mut conn = self.reader();
        let values: Vec<Vec<u8>> = conn.lrange(key, 0, -1).await.map_err(map_redis_error)?;
        Ok(values)
    }

    async fn random_member(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.reader();
        let member: Option<Vec<u8>> = conn.srandmember(key).await.map_err(map_redis_error)?;
        Ok(member)
    }

    async fn add_member(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        let mut conn = self.writer();
        let mut pipe = redis::pipe();
        pipe.atomic()
            .sadd(key, value)
            .ignore()
            .expire(key, ttl_seconds(ttl) as i64)
            .ignore();
        let (): () = pipe.query_async(&mut conn).await.map_err(map_redis_error)?;
        Ok(())
    }

    async fn pop_random(&self, key: &str, count: usize) -> Result<usize> {
        if count == 0 {
            return Ok(0);
        }
        let mut conn = self.writer();
        let popped: Vec<Vec<u8>> = redis::cmd("SPOP")
            .arg(key)
            .arg(count)
            .query_async(&mut conn)
            .await
            .map_err(map_redis_error)?;
        Ok(popped.len())
    }

    async fn cardinality(&self, key: &str) -> Result<usize> {
        let mut conn = self.writer();
        let total: usize = conn.scard(key).await.map_err(map_redis_error)?;
        Ok(total)
    }

    async fn get_many(&self, keys: &[String]) -> Result<Vec<Option<Vec<u8>>>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.reader();
        let values: Vec<Option<Vec<u8>>> = redis::cmd("MGET")
            .arg(keys)
            .query_async(&mut conn)
            .await
            .map_err(map_redis_error)?;
        Ok(values)
    }

    async fn set_many(&self, entries: &[(String, Vec<u8>)], ttl: Duration) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let mut conn = self.writer();
        let mut pipe = redis::pipe();
        pipe.atomic();
        for (key, value) in entries {
            pipe.set_ex(key, value, ttl_seconds(ttl)).ignore();
        }
        let (): () = pipe.query_async(&mut conn).await.map_err(map_redis_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    const TTL: Duration = Duration::from_secs(30);

    /// Helper to get Redis URL from environment.
    fn redis_url() -> String {
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
    }

    /// Skip test if Redis not available.
    async fn get_test_store() -> Option<RedisStore> {
        RedisStore::new(&[redis_url(), redis_url()]).await.ok()
    }

    /// Generate a unique test key to avoid conflicts.
    fn test_key(suffix: &str) -> String {
        format!("test:redis_store:{}:{}", Uuid::new_v4(), suffix)
    }

    #[tokio::test]
    async fn test_redis_replace_list() {
        let Some(store) = get_test_store().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let key = test_key("list");
        store
            .replace_list(&key, &[b"a".to_vec(), b"b".to_vec()], TTL)
            .await
            .unwrap();
        store.replace_list(&key, &[b"c".to_vec()], TTL).await.unwrap();

        assert_eq!(store.read_list(&key).await.unwrap(), vec![b"c".to_vec()]);
    }

    #[tokio::test]
    async fn test_redis_set_eviction() {
        let Some(store) = get_test_store().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let key = test_key("set");
        for i in 0..8 {
            store
                .add_member(&key, format!("m{i}").as_bytes(), TTL)
                .await
                .unwrap();
        }
        assert_eq!(store.cardinality(&key).await.unwrap(), 8);
        assert_eq!(store.pop_random(&key, 3).await.unwrap(), 3);
        assert_eq!(store.cardinality(&key).await.unwrap(), 5);
        assert!(store.random_member(&key).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_redis_get_many() {
        let Some(store) = get_test_store().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let a = test_key("a");
        let b = test_key("b");
        store
            .set_many(&[(a.clone(), b"1".to_vec())], TTL)
            .await
            .unwrap();

        assert_eq!(
            store.get_many(&[a, b]).await.unwrap(),
            vec![Some(b"1".to_vec()), None]
        );
    }
}
