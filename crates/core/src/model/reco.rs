//! Messages of the recommendation/listing service.

/// A request to the recommendation service.
///
/// Every request carries the interface name, a client timestamp, the
/// correlation id and the caller identity. The remaining fields are set by
/// individual endpoints.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RecoRequest {
    #[prost(string, tag = "1")]
    pub interface_name: String,
    #[prost(string, tag = "2")]
    pub time_sign: String,
    #[prost(string, tag = "3")]
    pub log_id: String,
    #[prost(string, tag = "4")]
    pub user_id: String,
    #[prost(string, tag = "5")]
    pub country: String,
    #[prost(string, tag = "6")]
    pub language: String,
    #[prost(string, repeated, tag = "7")]
    pub language_list: Vec<String>,
    #[prost(string, tag = "8")]
    pub platform_id: String,
    #[prost(string, tag = "9")]
    pub client_version: String,
    #[prost(string, tag = "10")]
    pub network_status: String,
    #[prost(string, optional, tag = "11")]
    pub tab_id: Option<String>,
    #[prost(string, optional, tag = "12")]
    pub card_id: Option<String>,
    #[prost(int32, optional, tag = "13")]
    pub num: Option<i32>,
    #[prost(string, optional, tag = "14")]
    pub final_id: Option<String>,
    /// Paging type: 0 for the first page, 1 afterwards.
    #[prost(int32, optional, tag = "15")]
    pub r#type: Option<i32>,
    #[prost(string, optional, tag = "16")]
    pub next_token: Option<String>,
    #[prost(string, optional, tag = "17")]
    pub resource_id: Option<String>,
    #[prost(string, optional, tag = "18")]
    pub resource_type: Option<String>,
    #[prost(string, optional, tag = "19")]
    pub filter_id: Option<String>,
    #[prost(string, repeated, tag = "20")]
    pub genres: Vec<String>,
    #[prost(string, repeated, tag = "21")]
    pub browse_langs: Vec<String>,
    #[prost(string, repeated, tag = "22")]
    pub singers: Vec<String>,
    #[prost(string, repeated, tag = "23")]
    pub actors: Vec<String>,
    #[prost(string, repeated, tag = "24")]
    pub directors: Vec<String>,
    #[prost(string, repeated, tag = "25")]
    pub release_years: Vec<String>,
    #[prost(string, optional, tag = "26")]
    pub sort_opt: Option<String>,
}

/// One tab of the home feed.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TabInfo {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, repeated, tag = "3")]
    pub card_ids: Vec<String>,
}

/// A page of tabs as returned by `fetchTabs`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Tabs {
    #[prost(message, repeated, tag = "1")]
    pub tabs: Vec<TabInfo>,
    #[prost(string, optional, tag = "2")]
    pub next_token: Option<String>,
    #[prost(bool, tag = "3")]
    pub disable_cache: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TabsList {
    #[prost(message, repeated, tag = "1")]
    pub items: Vec<Tabs>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Banner {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub title: String,
    #[prost(string, tag = "3")]
    pub image: String,
    #[prost(string, tag = "4")]
    pub resource_id: String,
    #[prost(int32, tag = "5")]
    pub resource_type: i32,
    #[prost(string, optional, tag = "6")]
    pub link: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BannerList {
    #[prost(message, repeated, tag = "1")]
    pub items: Vec<Banner>,
}

/// One recommended item: an id, its numeric type and ranking metadata.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RecoResult {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(int32, tag = "2")]
    pub result_type: i32,
    #[prost(string, optional, tag = "3")]
    pub reason: Option<String>,
    #[prost(double, optional, tag = "4")]
    pub score: Option<f64>,
}

/// Card list response of the `recommend` operation.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RecoResponse {
    #[prost(string, tag = "1")]
    pub card_id: String,
    #[prost(message, repeated, tag = "2")]
    pub results: Vec<RecoResult>,
    #[prost(string, optional, tag = "3")]
    pub final_id: Option<String>,
    #[prost(string, optional, tag = "4")]
    pub next_token: Option<String>,
    /// Set by the origin when this response must not be cached anywhere.
    #[prost(bool, tag = "5")]
    pub disable_cache: bool,
}
