use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;

use contentfeed_core::memo::{memo_key, MemoArgs, MemoField, MemoKey};
use contentfeed_core::{Fetched, RequestContext};

use super::Service;

/// Bounded, time-expiring process-local memo.
///
/// The key is built from the declared `fields` only. Only `Fetched::Ok`
/// results are remembered, so degraded and opted-out answers are recomputed
/// on the next call.
pub struct Memoized<S, T> {
    inner: S,
    fields: &'static [MemoField],
    ttl: Duration,
    entries: Mutex<LruCache<MemoKey, (Instant, T)>>,
}

impl<S, T> Memoized<S, T> {
    pub fn new(inner: S, fields: &'static [MemoField], capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            fields,
            ttl,
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn lookup(&self, key: &MemoKey) -> Option<T>
    where
        T: Clone,
    {
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        let fresh = entries.get(key)?.0.elapsed() < self.ttl;
        if !fresh {
            entries.pop(key);
            return None;
        }
        entries.peek(key).map(|(_, value)| value.clone())
    }

    fn remember(&self, key: MemoKey, value: T) {
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.put(key, (Instant::now(), value));
    }
}

#[async_trait]
impl<A, T, S> Service<A, T> for Memoized<S, T>
where
    A: MemoArgs + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
    S: Service<A, T>,
{
    async fn call(&self, ctx: &RequestContext, args: &A) -> Fetched<T> {
        let key = memo_key(self.fields, ctx, args);
        if let Some(value) = self.lookup(&key) {
            return Fetched::Ok(value);
        }
        let fetched = self.inner.call(ctx, args).await;
        if let Fetched::Ok(value) = &fetched {
            self.remember(key, value.clone());
        }
        fetched
    }
}
