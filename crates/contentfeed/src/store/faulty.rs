//! Store that fails or stalls on every operation.

use std::time::Duration;

use async_trait::async_trait;

use contentfeed_core::cache::{CacheError, Result, Store};

#[derive(Debug, Clone, Copy)]
pub(crate) enum Fault {
    /// Every operation fails with `ConnectionFailed`.
    Down,
    /// Every operation sleeps this long, then fails.
    Stall(Duration),
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct FaultyStore(pub Fault);

impl FaultyStore {
    pub fn down() -> Self {
        Self(Fault::Down)
    }

    pub fn stalling(delay: Duration) -> Self {
        Self(Fault::Stall(delay))
    }

    async fn fail<T>(&self) -> Result<T> {
        if let Fault::Stall(delay) = self.0 {
            tokio::time::sleep(delay).await;
        }
        Err(CacheError::ConnectionFailed("connection refused".to_string()))
    }
}

#[async_trait]
impl Store for FaultyStore {
    async fn replace_list(&self, _key: &str, _values: &[Vec<u8>], _ttl: Duration) -> Result<()> {
        self.fail().await
    }

    async fn read_list(&self, _key: &str) -> Result<Vec<Vec<u8>>> {
        self.fail().await
    }

    async fn random_member(&self, _key: &str) -> Result<Option<Vec<u8>>> {
        self.fail().await
    }

    async fn add_member(&self, _key: &str, _value: &[u8], _ttl: Duration) -> Result<()> {
        self.fail().await
    }

    async fn pop_random(&self, _key: &str, _count: usize) -> Result<usize> {
        self.fail().await
    }

    async fn cardinality(&self, _key: &str) -> Result<usize> {
        self.fail().await
    }

    async fn get_many(&self, _keys: &[String]) -> Result<Vec<Option<Vec<u8>>>> {
        self.fail().await
    }

    async fn set_many(&self, _entries: &[(String, Vec<u8>)], _ttl: Duration) -> Result<()> {
        self.fail().await
    }
}
