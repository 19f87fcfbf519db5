//! Length-prefixed protobuf framing over TCP.
//!
//! Each frame is a 4-byte big-endian body length followed by an encoded
//! [`RpcEnvelope`].

use std::io;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use prost::Message;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_util::bytes::{Bytes, BytesMut};
use tokio_util::codec::{Framed, LengthDelimitedCodec};

use contentfeed_core::model::rpc::MAX_FRAME_LEN;
use contentfeed_core::model::RpcEnvelope;

use super::OriginError;

/// Codec of the origin wire: 4-byte big-endian length, bounded body.
pub fn frame_codec() -> LengthDelimitedCodec {
    LengthDelimitedCodec::builder()
        .length_field_length(4)
        .big_endian()
        .max_frame_length(MAX_FRAME_LEN)
        .new_codec()
}

/// Oversized or malformed frames surface from the codec as `InvalidData` or
/// `InvalidInput`.
fn frame_error(err: io::Error) -> OriginError {
    match err.kind() {
        io::ErrorKind::InvalidData | io::ErrorKind::InvalidInput => {
            OriginError::Protocol(err.to_string())
        }
        _ => OriginError::Transport(err.to_string()),
    }
}

/// Reads the next envelope. `None` once the peer has closed the stream.
pub async fn next_envelope<S>(frames: &mut S) -> Result<Option<RpcEnvelope>, OriginError>
where
    S: Stream<Item = io::Result<BytesMut>> + Unpin,
{
    match frames.next().await {
        None => Ok(None),
        Some(frame) => Ok(Some(RpcEnvelope::decode(frame.map_err(frame_error)?)?)),
    }
}

pub async fn send_envelope<S>(frames: &mut S, envelope: &RpcEnvelope) -> Result<(), OriginError>
where
    S: Sink<Bytes, Error = io::Error> + Unpin,
{
    frames
        .send(Bytes::from(envelope.encode_to_vec()))
        .await
        .map_err(frame_error)
}

/// One open connection to an origin service.
///
/// Calls are serialized over the stream; every reply must echo the request
/// sequence number.
#[derive(Debug)]
pub struct RpcConnection {
    addr: String,
    frames: Mutex<Framed<TcpStream, LengthDelimitedCodec>>,
    seq: AtomicU32,
}

impl RpcConnection {
    pub async fn connect(addr: &str, timeout: Duration) -> Result<Self, OriginError> {
        let connect_error = |reason: String| OriginError::Connect {
            addr: addr.to_string(),
            reason,
        };
        let stream = tokio::time::timeout(timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| connect_error("timed out".to_string()))?
            .map_err(|e| connect_error(e.to_string()))?;
        stream.set_nodelay(true)?;
        Ok(Self {
            addr: addr.to_string(),
            frames: Mutex::new(Framed::new(stream, frame_codec())),
            seq: AtomicU32::new(1),
        })
    }

    /// Sends `request` as `method` and decodes the reply payload.
    pub async fn call<Req, Resp>(&self, method: &str, request: &Req) -> Result<Resp, OriginError>
    where
        Req: Message,
        Resp: Message + Default,
    {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let envelope = RpcEnvelope::request(method, seq, request.encode_to_vec());

        let mut frames = self.frames.lock().await;
        send_envelope(&mut *frames, &envelope).await?;
        let reply = next_envelope(&mut *frames).await?;
        drop(frames);

        let Some(reply) = reply else {
            return Err(OriginError::Transport(format!(
                "{} closed the connection before replying",
                self.addr
            )));
        };
        if reply.seq != seq {
            return Err(OriginError::Protocol(format!(
                "reply seq {} does not match request seq {seq}",
                reply.seq
            )));
        }
        if let Some(error) = reply.error {
            return Err(OriginError::Remote(error));
        }
        Ok(Resp::decode(reply.payload.as_slice())?)
    }

    /// Flushes and shuts the write half down. Errors are logged, never returned.
    pub async fn close(&self) {
        let mut frames = self.frames.lock().await;
        if let Err(err) = SinkExt::<Bytes>::close(&mut *frames).await {
            tracing::debug!(addr = %self.addr, error = %err, "Origin connection shutdown failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contentfeed_core::model::{Banner, BannerList, RecoRequest};
    use tokio::net::TcpListener;
    use tokio_util::codec::FramedRead;

    /// Accepts one connection and answers every request with `respond`.
    async fn serve_once<F>(respond: F) -> String
    where
        F: Fn(RpcEnvelope) -> RpcEnvelope + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut frames = Framed::new(socket, frame_codec());
            while let Ok(Some(request)) = next_envelope(&mut frames).await {
                let reply = respond(request);
                if send_envelope(&mut frames, &reply).await.is_err() {
                    break;
                }
            }
        });
        addr
    }

    #[tokio::test]
    async fn test_call_round_trip() {
        let addr = serve_once(|request| {
            assert_eq!(request.method, "fetchBannerData");
            let query = RecoRequest::decode(request.payload.as_slice()).unwrap();
            let banners = BannerList {
                items: vec![Banner {
                    id: "b1".to_string(),
                    title: query.tab_id.unwrap_or_default(),
                    ..Default::default()
                }],
            };
            RpcEnvelope::reply(request.seq, banners.encode_to_vec())
        })
        .await;

        let conn = RpcConnection::connect(&addr, Duration::from_secs(1)).await.unwrap();
        let request = RecoRequest {
            tab_id: Some("home".to_string()),
            ..Default::default()
        };
        let first: BannerList = conn.call("fetchBannerData", &request).await.unwrap();
        let second: BannerList = conn.call("fetchBannerData", &request).await.unwrap();
        assert_eq!(first.items[0].title, "home");
        assert_eq!(first, second);
        conn.close().await;
    }

    #[tokio::test]
    async fn test_remote_error_is_reported() {
        let addr = serve_once(|request| RpcEnvelope::failure(request.seq, "no such tab")).await;
        let conn = RpcConnection::connect(&addr, Duration::from_secs(1)).await.unwrap();
        let result: Result<BannerList, _> = conn.call("fetchBannerData", &RecoRequest::default()).await;
        assert_eq!(result, Err(OriginError::Remote("no such tab".to_string())));
    }

    #[tokio::test]
    async fn test_mismatched_seq_is_protocol_error() {
        let addr = serve_once(|request| RpcEnvelope::reply(request.seq + 7, Vec::new())).await;
        let conn = RpcConnection::connect(&addr, Duration::from_secs(1)).await.unwrap();
        let result: Result<BannerList, _> = conn.call("fetchBannerData", &RecoRequest::default()).await;
        assert!(matches!(result, Err(OriginError::Protocol(_))));
    }

    #[tokio::test]
    async fn test_connect_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);
        let result = RpcConnection::connect(&addr, Duration::from_secs(1)).await;
        assert!(matches!(result, Err(OriginError::Connect { .. })));
    }

    #[tokio::test]
    async fn test_oversized_frame_is_rejected() {
        let bytes: &[u8] = &[0xff, 0xff, 0xff, 0xff];
        let mut frames = FramedRead::new(bytes, frame_codec());
        let result = next_envelope(&mut frames).await;
        assert!(matches!(result, Err(OriginError::Protocol(_))));
    }

    #[tokio::test]
    async fn test_peer_closing_before_reply_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut frames = Framed::new(socket, frame_codec());
            let _ = next_envelope(&mut frames).await;
        });

        let conn = RpcConnection::connect(&addr, Duration::from_secs(1)).await.unwrap();
        let result: Result<BannerList, _> = conn.call("fetchBannerData", &RecoRequest::default()).await;
        assert!(matches!(result, Err(OriginError::Transport(_))));
    }
}
