//! Process-scoped application state.
//!
//! Built once at startup: validates the type registry against the detail
//! service schema, connects the store and composes every pipeline. Passed
//! explicitly to whatever serves requests.

use std::sync::Arc;

use anyhow::Context;

use contentfeed_core::cache::{Store, Versions};
use contentfeed_core::model::DI_SCHEMA;
use contentfeed_core::registry::validate_schema;

use crate::builder::ResourceBuilder;
use crate::config::Config;
use crate::content::{ContentService, ContentSettings};
use crate::origin::{DiClient, RecoClient, TcpConnector};
use crate::pipeline::FailoverSwitch;
use crate::store::MemoryStore;
use crate::user_actions::{StaticUserActions, UserActionService};

/// Keys held by the in-memory store before LRU eviction.
const MEMORY_STORE_ENTRIES: usize = 100_000;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn Store>,
    pub versions: Arc<Versions>,
    pub failover: FailoverSwitch,
    pub content: Arc<ContentService>,
    pub builder: Arc<ResourceBuilder>,
}

impl AppState {
    fn build(
        config: Config,
        store: Arc<dyn Store>,
        user_actions: Arc<dyn UserActionService>,
    ) -> anyhow::Result<Self> {
        validate_schema(DI_SCHEMA).context("Type registry does not match the detail schema")?;

        let versions = Arc::new(Versions::from_pairs(config.cache_versions.iter().cloned()));
        let failover = FailoverSwitch::new(config.failover_mode);
        let reco = Arc::new(TcpConnector::<RecoClient>::new(
            config.reco_addr.clone(),
            config.connect_timeout(),
        ));
        let di = Arc::new(TcpConnector::<DiClient>::new(
            config.di_addr.clone(),
            config.connect_timeout(),
        ));
        let content = Arc::new(ContentService::new(
            reco,
            di,
            store.clone(),
            versions.clone(),
            failover.clone(),
            ContentSettings::from_config(&config),
        ));
        let builder = Arc::new(ResourceBuilder::new(content.clone(), user_actions));

        tracing::info!(
            reco = %config.reco_addr,
            di = %config.di_addr,
            prod = config.is_prod,
            failover = config.failover_mode,
            "Application state initialized"
        );

        Ok(Self {
            config: Arc::new(config),
            store,
            versions,
            failover,
            content,
            builder,
        })
    }

    /// Builds the state over an already constructed store.
    pub fn with_store(
        config: Config,
        store: Arc<dyn Store>,
        user_actions: Arc<dyn UserActionService>,
    ) -> anyhow::Result<Self> {
        Self::build(config, store, user_actions)
    }

    /// Builds the state over a fresh in-memory store.
    pub fn in_memory(config: Config) -> anyhow::Result<Self> {
        Self::build(
            config,
            Arc::new(MemoryStore::new(MEMORY_STORE_ENTRIES)),
            Arc::new(StaticUserActions::new()),
        )
    }

    /// Releases the store connections. Pipelines hold no other resources.
    pub async fn shutdown(self) {
        let failover = self.failover.is_engaged();
        drop(self);
        tracing::info!(failover, "Application state shut down");
    }
}

#[cfg(feature = "redis")]
mod redis_store {
    use super::*;
    use crate::store::RedisStore;

    impl AppState {
        /// Connects to every configured Redis address and builds the state.
        pub async fn init(config: Config) -> anyhow::Result<Self> {
            let store = RedisStore::new(&config.redis_addresses)
                .await
                .context("Failed to connect to the cache store")?;
            Self::build(config, Arc::new(store), Arc::new(StaticUserActions::new()))
        }
    }
}

#[cfg(not(feature = "redis"))]
impl AppState {
    /// Without the `redis` feature the store is in-process.
    pub async fn init(config: Config) -> anyhow::Result<Self> {
        Self::in_memory(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_state_starts_and_stops() {
        let config = Config {
            failover_mode: true,
            cache_versions: vec![("banner".to_string(), 3)],
            ..Config::default()
        };
        let state = AppState::in_memory(config).unwrap();

        assert!(state.failover.is_engaged());
        assert_eq!(state.versions.get("banner"), 3);

        state.shutdown().await;
    }

    #[tokio::test]
    async fn test_failover_state_never_dials_origin() {
        let config = Config {
            failover_mode: true,
            reco_addr: "127.0.0.1:1".to_string(),
            ..Config::default()
        };
        let state = AppState::in_memory(config).unwrap();
        let ctx = contentfeed_core::RequestContext::default();

        let fetched = state.content.banner(&ctx, "home").await;

        assert!(fetched.is_unavailable());
    }
}
