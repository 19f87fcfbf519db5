use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use contentfeed_core::{Fetched, RequestContext};

use crate::origin::{Connector, OriginClient, OriginError};

use super::{FailoverSwitch, Handler, Service};

/// How a guarded call reacts to an origin failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardPolicy {
    /// Re-run the handler without a client so it can answer from the cache.
    pub allow_downgrade: bool,
    /// Deadline of the live call. `None` is unbounded.
    pub timeout: Option<Duration>,
    /// Deadline of the degraded call.
    pub degraded_timeout: Duration,
}

impl Default for GuardPolicy {
    fn default() -> Self {
        Self {
            allow_downgrade: true,
            timeout: None,
            degraded_timeout: Duration::from_secs(1),
        }
    }
}

impl GuardPolicy {
    pub fn no_downgrade(self) -> Self {
        Self {
            allow_downgrade: false,
            ..self
        }
    }
}

/// Owns the origin connection of one call.
///
/// Opens a fresh connection, runs the handler under the live deadline and
/// closes the connection on every exit path. Origin failures never leave the
/// guard: they turn into a degraded handler run or `Fetched::Unavailable`.
pub struct OriginGuard<K, H> {
    name: &'static str,
    connector: Arc<K>,
    handler: H,
    policy: GuardPolicy,
    failover: FailoverSwitch,
}

impl<K, H> OriginGuard<K, H>
where
    K: Connector,
    H: Handler<K::Client>,
{
    pub fn new(
        name: &'static str,
        connector: Arc<K>,
        handler: H,
        policy: GuardPolicy,
        failover: FailoverSwitch,
    ) -> Self {
        Self {
            name,
            connector,
            handler,
            policy,
            failover,
        }
    }

    async fn live(
        &self,
        ctx: &RequestContext,
        args: &H::Args,
    ) -> Result<Fetched<H::Output>, OriginError> {
        let mut client = self.connector.connect().await?;
        let result = {
            let call = self.handler.handle(Some(&client), ctx, args);
            match self.policy.timeout {
                Some(limit) => tokio::time::timeout(limit, call)
                    .await
                    .unwrap_or(Err(OriginError::Timeout)),
                None => call.await,
            }
        };
        client.close().await;
        result
    }

    async fn degraded(&self, ctx: &RequestContext, args: &H::Args) -> Fetched<H::Output> {
        if !self.policy.allow_downgrade {
            return Fetched::Unavailable;
        }
        match tokio::time::timeout(self.policy.degraded_timeout, self.handler.handle(None, ctx, args))
            .await
        {
            Ok(Ok(fetched)) => fetched.no_cache(),
            Ok(Err(err)) => {
                tracing::warn!(service = self.name, log_id = %ctx.log_id, error = %err, "Degraded call failed");
                Fetched::Unavailable
            }
            Err(_) => {
                tracing::warn!(service = self.name, log_id = %ctx.log_id, "Degraded call timed out");
                Fetched::Unavailable
            }
        }
    }
}

#[async_trait]
impl<K, H> Service<H::Args, H::Output> for OriginGuard<K, H>
where
    K: Connector,
    H: Handler<K::Client>,
{
    async fn call(&self, ctx: &RequestContext, args: &H::Args) -> Fetched<H::Output> {
        if self.failover.is_engaged() {
            return self.degraded(ctx, args).await;
        }
        match self.live(ctx, args).await {
            Ok(fetched) => fetched,
            Err(err) => {
                tracing::error!(service = self.name, log_id = %ctx.log_id, error = %err, "Origin call failed");
                self.degraded(ctx, args).await
            }
        }
    }
}
