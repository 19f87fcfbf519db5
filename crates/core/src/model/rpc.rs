/// Frame body exchanged with both origin services.
///
/// Requests carry `method` and an encoded request message in `payload`.
/// Responses echo `seq` and carry either a payload or an `error` string.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RpcEnvelope {
    #[prost(string, tag = "1")]
    pub method: String,
    #[prost(uint32, tag = "2")]
    pub seq: u32,
    #[prost(bytes = "vec", tag = "3")]
    pub payload: Vec<u8>,
    #[prost(string, optional, tag = "4")]
    pub error: Option<String>,
}

impl RpcEnvelope {
    pub fn request(method: &str, seq: u32, payload: Vec<u8>) -> Self {
        Self {
            method: method.to_string(),
            seq,
            payload,
            error: None,
        }
    }

    pub fn reply(seq: u32, payload: Vec<u8>) -> Self {
        Self {
            method: String::new(),
            seq,
            payload,
            error: None,
        }
    }

    pub fn failure(seq: u32, error: impl Into<String>) -> Self {
        Self {
            method: String::new(),
            seq,
            payload: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// Method names understood by the origin services.
pub mod methods {
    pub const FETCH_TABS: &str = "fetchTabs";
    pub const FETCH_BANNER: &str = "fetchBannerData";
    pub const RECOMMEND: &str = "recommend";
    pub const GET_DETAIL: &str = "getDetail";
    pub const GET_ONE_DETAIL: &str = "getOneDetailByObj";
}

/// Largest frame body either side accepts.
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;
