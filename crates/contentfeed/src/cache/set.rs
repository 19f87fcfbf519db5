use async_trait::async_trait;
use prost::Message;

use contentfeed_core::cache::{set_key, SetCapacity};
use contentfeed_core::codec;
use contentfeed_core::{Fetched, NoCacheMarker, RequestContext};

use crate::origin::OriginError;
use crate::pipeline::{Endpoint, Handler};

use super::CacheBackend;

/// Set-shaped cache-aside: `prefix:interface:version[:id]`.
///
/// Each live result becomes one member of a bounded random set. A degraded
/// call answers with one random member. Once the set outgrows its soft
/// capacity, a write evicts random members instead of inserting.
pub struct SetCached<E> {
    prefix: &'static str,
    endpoint: E,
    backend: CacheBackend,
    capacity: SetCapacity,
}

impl<E> SetCached<E> {
    pub fn new(prefix: &'static str, endpoint: E, backend: CacheBackend, capacity: SetCapacity) -> Self {
        Self {
            prefix,
            endpoint,
            backend,
            capacity,
        }
    }

    async fn read<M: Message + Default>(&self, key: &str) -> Fetched<M> {
        match self.backend.store.random_member(key).await {
            Ok(Some(blob)) => match codec::unpack::<M>(&blob) {
                Ok(value) => {
                    tracing::debug!(key = %key, "Set cache hit");
                    Fetched::Ok(value)
                }
                Err(err) => {
                    tracing::warn!(key = %key, error = %err, "Undecodable set member");
                    Fetched::Unavailable
                }
            },
            Ok(None) => Fetched::Unavailable,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "Failed to read set from cache");
                Fetched::Unavailable
            }
        }
    }

    async fn write<M: Message>(&self, key: &str, value: &M) {
        let store = &self.backend.store;
        let population = match store.cardinality(key).await {
            Ok(population) => population,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "Failed to size cached set");
                return;
            }
        };

        if let Some(count) = self.capacity.overflow(population) {
            match store.pop_random(key, count).await {
                Ok(popped) => tracing::debug!(key = %key, popped, population, "Set cache evicted"),
                Err(err) => tracing::warn!(key = %key, error = %err, "Failed to evict from cached set"),
            }
            return;
        }

        let blob = match codec::pack(value) {
            Ok(blob) => blob,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "Failed to encode set member");
                return;
            }
        };
        match store.add_member(key, &blob, self.backend.ttl).await {
            Ok(()) => tracing::debug!(key = %key, "Set cache add"),
            Err(err) => tracing::warn!(key = %key, error = %err, "Failed to add set member"),
        }
    }
}

#[async_trait]
impl<C, E, M> Handler<C> for SetCached<E>
where
    C: Send + Sync,
    E: Endpoint<C, Output = Option<M>>,
    M: Message + Default + NoCacheMarker + Sync,
{
    type Args = E::Args;
    type Output = M;

    async fn handle(
        &self,
        client: Option<&C>,
        ctx: &RequestContext,
        args: &E::Args,
    ) -> Result<Fetched<M>, OriginError> {
        let interface = self.endpoint.interface(args);
        let key = set_key(
            self.prefix,
            interface,
            self.backend.versions.get(interface),
            self.endpoint.key_id(args).as_deref(),
        );

        let Some(client) = client else {
            return Ok(self.read(&key).await);
        };

        let Some(value) = self.endpoint.fetch(client, ctx, args).await? else {
            return Ok(Fetched::Unavailable);
        };
        let fetched = Fetched::from_origin(value);
        if let Fetched::Ok(value) = &fetched {
            if self.backend.sampler.lucky() {
                self.write(&key, value).await;
            }
        }
        Ok(fetched)
    }
}
