use std::time::Instant;

use async_trait::async_trait;

use contentfeed_core::registry::normalize_app_version;
use contentfeed_core::{Fetched, RequestContext};

use super::Service;

/// Logs the wall time of every call at debug level.
pub struct Timed<S> {
    name: &'static str,
    inner: S,
}

impl<S> Timed<S> {
    pub fn new(name: &'static str, inner: S) -> Self {
        Self { name, inner }
    }
}

#[async_trait]
impl<A, T, S> Service<A, T> for Timed<S>
where
    A: Send + Sync + 'static,
    T: Send + 'static,
    S: Service<A, T>,
{
    async fn call(&self, ctx: &RequestContext, args: &A) -> Fetched<T> {
        let started = Instant::now();
        let fetched = self.inner.call(ctx, args).await;
        tracing::debug!(
            endpoint = self.name,
            log_id = %ctx.log_id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            unavailable = fetched.is_unavailable(),
            "Endpoint call finished"
        );
        fetched
    }
}

/// Replaces the caller's app version with the release it belongs to.
pub struct NormalizeVersion<S> {
    releases: &'static [u32],
    inner: S,
}

impl<S> NormalizeVersion<S> {
    pub fn new(releases: &'static [u32], inner: S) -> Self {
        Self { releases, inner }
    }
}

#[async_trait]
impl<A, T, S> Service<A, T> for NormalizeVersion<S>
where
    A: Send + Sync + 'static,
    T: Send + 'static,
    S: Service<A, T>,
{
    async fn call(&self, ctx: &RequestContext, args: &A) -> Fetched<T> {
        let normalized = normalize_app_version(self.releases, ctx.app_version);
        if normalized == ctx.app_version {
            return self.inner.call(ctx, args).await;
        }
        let ctx = ctx.with_app_version(normalized);
        self.inner.call(&ctx, args).await
    }
}
