//! Cache-aside layers over the store.
//!
//! `ListCached` and `SetCached` are [`Handler`](crate::pipeline::Handler)s run
//! inside the origin guard: with a client they fetch and write back, without
//! one they answer from the store. `DetailMerged` is a full service that
//! reads the store first and only sends the misses through its own guard.
//!
//! Store failures are logged and treated as misses. They never fail a call.

mod detail;
mod list;
mod set;

use std::sync::Arc;
use std::time::Duration;

use contentfeed_core::cache::{Store, Versions};

use crate::pipeline::WriteSampler;

pub use detail::{DetailArgs, DetailMerged};
pub use list::{ListCached, ListShape};
pub use set::SetCached;

/// Store access shared by the list and set layers.
#[derive(Clone)]
pub struct CacheBackend {
    pub store: Arc<dyn Store>,
    pub versions: Arc<Versions>,
    pub ttl: Duration,
    pub sampler: WriteSampler,
}

impl CacheBackend {
    pub fn new(store: Arc<dyn Store>, versions: Arc<Versions>, ttl: Duration) -> Self {
        Self {
            store,
            versions,
            ttl,
            sampler: WriteSampler::always(),
        }
    }

    pub fn with_sampler(self, sampler: WriteSampler) -> Self {
        Self { sampler, ..self }
    }
}
