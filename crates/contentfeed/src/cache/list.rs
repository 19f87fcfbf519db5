use async_trait::async_trait;
use prost::Message;

use contentfeed_core::cache::list_key;
use contentfeed_core::codec;
use contentfeed_core::model::{Banner, BannerList, Tabs, TabsList};
use contentfeed_core::{Fetched, NoCacheMarker, RequestContext};

use crate::origin::OriginError;
use crate::pipeline::{Endpoint, Handler};

use super::CacheBackend;

/// Responses stored as an ordered list of items.
pub trait ListShape: Sized {
    type Item: Message + Default;

    fn items(&self) -> &[Self::Item];

    fn from_items(items: Vec<Self::Item>) -> Self;
}

impl ListShape for TabsList {
    type Item = Tabs;

    fn items(&self) -> &[Tabs] {
        &self.items
    }

    fn from_items(items: Vec<Tabs>) -> Self {
        Self { items }
    }
}

impl ListShape for BannerList {
    type Item = Banner;

    fn items(&self) -> &[Banner] {
        &self.items
    }

    fn from_items(items: Vec<Banner>) -> Self {
        Self { items }
    }
}

/// List-shaped cache-aside: `interface:version[:id]`.
///
/// A live result replaces the whole list. A degraded call reads the whole
/// list back.
pub struct ListCached<E> {
    endpoint: E,
    backend: CacheBackend,
}

impl<E> ListCached<E> {
    pub fn new(endpoint: E, backend: CacheBackend) -> Self {
        Self { endpoint, backend }
    }

    async fn read<L: ListShape>(&self, key: &str) -> Fetched<L> {
        let blobs = match self.backend.store.read_list(key).await {
            Ok(blobs) => blobs,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "Failed to read list from cache");
                return Fetched::Unavailable;
            }
        };
        let mut items = Vec::with_capacity(blobs.len());
        for blob in blobs {
            match codec::unpack::<L::Item>(&blob) {
                Ok(item) => items.push(item),
                Err(err) => tracing::warn!(key = %key, error = %err, "Dropping undecodable list item"),
            }
        }
        if items.is_empty() {
            return Fetched::Unavailable;
        }
        tracing::debug!(key = %key, count = items.len(), "List cache hit");
        Fetched::Ok(L::from_items(items))
    }

    async fn write<L: ListShape>(&self, key: &str, value: &L) {
        if value.items().is_empty() {
            return;
        }
        let blobs = match value
            .items()
            .iter()
            .map(codec::pack)
            .collect::<codec::Result<Vec<_>>>()
        {
            Ok(blobs) => blobs,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "Failed to encode list for cache");
                return;
            }
        };
        match self
            .backend
            .store
            .replace_list(key, &blobs, self.backend.ttl)
            .await
        {
            Ok(()) => tracing::debug!(key = %key, count = blobs.len(), "List cache set"),
            Err(err) => tracing::warn!(key = %key, error = %err, "Failed to write list to cache"),
        }
    }
}

#[async_trait]
impl<C, E> Handler<C> for ListCached<E>
where
    C: Send + Sync,
    E: Endpoint<C>,
    E::Output: ListShape + NoCacheMarker + Sync,
{
    type Args = E::Args;
    type Output = E::Output;

    async fn handle(
        &self,
        client: Option<&C>,
        ctx: &RequestContext,
        args: &E::Args,
    ) -> Result<Fetched<E::Output>, OriginError> {
        let interface = self.endpoint.interface(args);
        let key = list_key(
            interface,
            self.backend.versions.get(interface),
            self.endpoint.key_id(args).as_deref(),
        );

        let Some(client) = client else {
            return Ok(self.read(&key).await);
        };

        let fetched = Fetched::from_origin(self.endpoint.fetch(client, ctx, args).await?);
        if let Fetched::Ok(value) = &fetched {
            if self.backend.sampler.lucky() {
                self.write(&key, value).await;
            }
        }
        Ok(fetched)
    }
}
