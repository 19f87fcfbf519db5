//! Request pipeline.
//!
//! Every content endpoint is a stack of layers composed once at startup,
//! outermost first:
//!
//! ```text
//! Timed -> NormalizeVersion -> Memoized -> OriginGuard -> cache layer -> endpoint
//! ```
//!
//! Layers above the guard implement [`Service`]. The guard owns the origin
//! connection and hands it (or `None` when degraded) to a [`Handler`], which
//! is either a cache layer or a direct passthrough over an [`Endpoint`].

mod guard;
mod layers;
mod memo;
mod sampler;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use contentfeed_core::{Fetched, RequestContext};

use crate::origin::OriginError;

pub use guard::{GuardPolicy, OriginGuard};
pub use layers::{NormalizeVersion, Timed};
pub use memo::Memoized;
pub use sampler::WriteSampler;

/// One composed operation: `(context, args) -> Fetched`.
#[async_trait]
pub trait Service<A, T>: Send + Sync
where
    A: Send + Sync,
    T: Send,
{
    async fn call(&self, ctx: &RequestContext, args: &A) -> Fetched<T>;
}

#[async_trait]
impl<A, T, S> Service<A, T> for Arc<S>
where
    A: Send + Sync + 'static,
    T: Send + 'static,
    S: Service<A, T> + ?Sized,
{
    async fn call(&self, ctx: &RequestContext, args: &A) -> Fetched<T> {
        (**self).call(ctx, args).await
    }
}

/// Work run by the origin guard.
///
/// `client` is `None` when the guard runs the degraded path. Errors are
/// origin failures; store failures are absorbed by the handler itself.
#[async_trait]
pub trait Handler<C>: Send + Sync
where
    C: Send + Sync,
{
    type Args: Send + Sync;
    type Output: Send;

    async fn handle(
        &self,
        client: Option<&C>,
        ctx: &RequestContext,
        args: &Self::Args,
    ) -> Result<Fetched<Self::Output>, OriginError>;
}

/// One origin operation.
#[async_trait]
pub trait Endpoint<C>: Send + Sync
where
    C: Send + Sync,
{
    type Args: Send + Sync;
    type Output: Send;

    /// Interface name sent to the origin. Also names the cache namespace.
    fn interface(&self, args: &Self::Args) -> &'static str;

    /// Request-specific component of the cache key.
    fn key_id(&self, _args: &Self::Args) -> Option<String> {
        None
    }

    async fn fetch(
        &self,
        client: &C,
        ctx: &RequestContext,
        args: &Self::Args,
    ) -> Result<Self::Output, OriginError>;
}

/// Process-wide kill switch sending every guarded call to the cache.
#[derive(Debug, Clone, Default)]
pub struct FailoverSwitch(Arc<AtomicBool>);

impl FailoverSwitch {
    pub fn new(engaged: bool) -> Self {
        Self(Arc::new(AtomicBool::new(engaged)))
    }

    pub fn engage(&self) {
        self.0.store(true, Ordering::SeqCst);
        tracing::warn!("Failover mode engaged");
    }

    pub fn release(&self) {
        self.0.store(false, Ordering::SeqCst);
        tracing::info!("Failover mode released");
    }

    pub fn is_engaged(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Passes live calls straight to the endpoint. Has no degraded path.
pub struct Direct<E> {
    endpoint: E,
}

impl<E> Direct<E> {
    pub fn new(endpoint: E) -> Self {
        Self { endpoint }
    }
}

#[async_trait]
impl<C, E> Handler<C> for Direct<E>
where
    C: Send + Sync,
    E: Endpoint<C>,
    E::Output: contentfeed_core::NoCacheMarker,
{
    type Args = E::Args;
    type Output = E::Output;

    async fn handle(
        &self,
        client: Option<&C>,
        ctx: &RequestContext,
        args: &E::Args,
    ) -> Result<Fetched<E::Output>, OriginError> {
        match client {
            Some(client) => Ok(Fetched::from_origin(
                self.endpoint.fetch(client, ctx, args).await?,
            )),
            None => Ok(Fetched::Unavailable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failover_switch_is_shared() {
        let switch = FailoverSwitch::new(false);
        let clone = switch.clone();
        clone.engage();
        assert!(switch.is_engaged());
        switch.release();
        assert!(!clone.is_engaged());
    }
}
