use async_trait::async_trait;

use contentfeed_core::model::rpc::methods;
use contentfeed_core::model::{
    BannerList, DiOneRequest, DiRequest, DiResponse, RecoRequest, RecoResponse, TabsList,
};

use super::connector::FromConnection;
use super::rpc::RpcConnection;
use super::OriginError;

/// A live handle to one origin connection.
#[async_trait]
pub trait OriginClient: Send + Sync {
    /// Releases the connection. Called on every exit path of a guarded call.
    async fn close(&mut self);
}

/// Operations of the recommendation/listing service.
#[async_trait]
pub trait RecoService: Send + Sync {
    async fn fetch_tabs(&self, request: RecoRequest) -> Result<TabsList, OriginError>;

    async fn fetch_banner(&self, request: RecoRequest) -> Result<BannerList, OriginError>;

    async fn recommend(&self, request: RecoRequest) -> Result<RecoResponse, OriginError>;
}

/// Operations of the detail-information service.
#[async_trait]
pub trait DiService: Send + Sync {
    async fn get_detail(&self, request: DiRequest) -> Result<DiResponse, OriginError>;

    async fn get_one_detail(&self, request: DiOneRequest) -> Result<DiResponse, OriginError>;
}

pub struct RecoClient {
    conn: RpcConnection,
}

impl FromConnection for RecoClient {
    fn from_connection(conn: RpcConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl OriginClient for RecoClient {
    async fn close(&mut self) {
        self.conn.close().await;
    }
}

#[async_trait]
impl RecoService for RecoClient {
    async fn fetch_tabs(&self, request: RecoRequest) -> Result<TabsList, OriginError> {
        self.conn.call(methods::FETCH_TABS, &request).await
    }

    async fn fetch_banner(&self, request: RecoRequest) -> Result<BannerList, OriginError> {
        self.conn.call(methods::FETCH_BANNER, &request).await
    }

    async fn recommend(&self, request: RecoRequest) -> Result<RecoResponse, OriginError> {
        self.conn.call(methods::RECOMMEND, &request).await
    }
}

pub struct DiClient {
    conn: RpcConnection,
}

impl FromConnection for DiClient {
    fn from_connection(conn: RpcConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl OriginClient for DiClient {
    async fn close(&mut self) {
        self.conn.close().await;
    }
}

#[async_trait]
impl DiService for DiClient {
    async fn get_detail(&self, request: DiRequest) -> Result<DiResponse, OriginError> {
        self.conn.call(methods::GET_DETAIL, &request).await
    }

    async fn get_one_detail(&self, request: DiOneRequest) -> Result<DiResponse, OriginError> {
        self.conn.call(methods::GET_ONE_DETAIL, &request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::origin::rpc::{frame_codec, next_envelope, send_envelope};
    use crate::origin::{Connector, TcpConnector};
    use contentfeed_core::model::{IdsWithType, Publisher, RpcEnvelope};
    use prost::Message;
    use std::time::Duration;
    use tokio::net::TcpListener;
    use tokio_util::codec::Framed;

    #[tokio::test]
    async fn test_di_client_over_tcp() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut frames = Framed::new(socket, frame_codec());
            let request = next_envelope(&mut frames).await.unwrap().unwrap();
            let query = DiRequest::decode(request.payload.as_slice()).unwrap();
            let mut response = DiResponse::with_types(vec![2]);
            for id in &query.ids_with_types[0].ids {
                response.publishers.push(Publisher {
                    id: id.clone(),
                    ..Default::default()
                });
            }
            let reply = RpcEnvelope::reply(request.seq, response.encode_to_vec());
            send_envelope(&mut frames, &reply).await.unwrap();
        });

        let connector = TcpConnector::<DiClient>::new(addr, Duration::from_secs(1));
        let mut client = connector.connect().await.unwrap();
        let response = client
            .get_detail(DiRequest {
                ids_with_types: vec![IdsWithType::new(2, vec!["p1".to_string()])],
                ..Default::default()
            })
            .await
            .unwrap();
        client.close().await;

        assert_eq!(response.type_list, vec![2]);
        assert_eq!(response.publishers[0].id, "p1");
    }
}
