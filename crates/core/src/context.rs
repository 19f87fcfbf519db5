use serde::{Deserialize, Serialize};

use crate::model::RecoRequest;

/// Platform id sent with every recommendation request.
pub const PLATFORM_ID: &str = "1";
/// Network status sent with every recommendation request.
pub const NETWORK_STATUS: &str = "3G";

/// Caller identity and client headers of one request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RequestContext {
    pub user_id: String,
    pub country: String,
    pub lang: String,
    pub prefer_langs: Vec<String>,
    pub app_version: u32,
    /// Client build code, forwarded verbatim as `client_version`.
    pub app_code: String,
    pub log_id: String,
}

impl RequestContext {
    pub fn with_app_version(&self, app_version: u32) -> Self {
        Self {
            app_version,
            ..self.clone()
        }
    }

    /// A recommendation request pre-filled with the caller identity.
    pub fn reco_request(&self, interface: &str) -> RecoRequest {
        RecoRequest {
            interface_name: interface.to_string(),
            time_sign: time_sign(),
            log_id: self.log_id.clone(),
            user_id: self.user_id.clone(),
            country: self.country.clone(),
            language: self.lang.clone(),
            language_list: self.prefer_langs.clone(),
            platform_id: PLATFORM_ID.to_string(),
            client_version: self.app_code.clone(),
            network_status: NETWORK_STATUS.to_string(),
            ..Default::default()
        }
    }
}

/// Client-side timestamp in epoch milliseconds.
pub fn time_sign() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}
