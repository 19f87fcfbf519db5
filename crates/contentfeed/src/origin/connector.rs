use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;

use super::rpc::RpcConnection;
use super::{OriginClient, OriginError};

/// Opens one fresh connection per guarded call.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    type Client: OriginClient;

    async fn connect(&self) -> Result<Self::Client, OriginError>;
}

/// Typed clients built over a raw RPC connection.
pub trait FromConnection {
    fn from_connection(conn: RpcConnection) -> Self;
}

/// Connects over TCP with a bounded connect time.
pub struct TcpConnector<C> {
    addr: String,
    connect_timeout: Duration,
    _client: PhantomData<fn() -> C>,
}

impl<C> TcpConnector<C> {
    pub fn new(addr: impl Into<String>, connect_timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            connect_timeout,
            _client: PhantomData,
        }
    }
}

#[async_trait]
impl<C> Connector for TcpConnector<C>
where
    C: FromConnection + OriginClient + 'static,
{
    type Client = C;

    async fn connect(&self) -> Result<C, OriginError> {
        let conn = RpcConnection::connect(&self.addr, self.connect_timeout).await?;
        Ok(C::from_connection(conn))
    }
}
