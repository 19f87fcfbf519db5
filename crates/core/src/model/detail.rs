//! Messages of the detail-information (DI) service.

/// A batch of identifiers sharing one type code.
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct IdsWithType {
    #[prost(string, repeated, tag = "1")]
    pub ids: Vec<String>,
    #[prost(int32, tag = "2")]
    pub r#type: i32,
}

impl IdsWithType {
    pub fn new(r#type: i32, ids: Vec<String>) -> Self {
        Self { ids, r#type }
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DiRequest {
    #[prost(message, repeated, tag = "1")]
    pub ids_with_types: Vec<IdsWithType>,
    #[prost(string, optional, tag = "2")]
    pub service_name: Option<String>,
    #[prost(string, tag = "3")]
    pub time_sign: String,
    #[prost(string, tag = "4")]
    pub log_id: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DiOneRequest {
    #[prost(int32, tag = "1")]
    pub r#type: i32,
    #[prost(string, tag = "2")]
    pub id: String,
    #[prost(string, tag = "3")]
    pub language_id: String,
    #[prost(string, optional, tag = "4")]
    pub service_name: Option<String>,
    #[prost(string, tag = "5")]
    pub time_sign: String,
    #[prost(string, tag = "6")]
    pub log_id: String,
}

/// Detail response: one list per resource family plus the list of type
/// codes the response covers.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DiResponse {
    #[prost(int32, repeated, tag = "1")]
    pub type_list: Vec<i32>,
    #[prost(message, repeated, tag = "2")]
    pub short_videos: Vec<ShortVideo>,
    #[prost(message, repeated, tag = "3")]
    pub publishers: Vec<Publisher>,
    #[prost(message, repeated, tag = "4")]
    pub movies: Vec<MovieFilm>,
    #[prost(message, repeated, tag = "5")]
    pub music_artists: Vec<MusicArtist>,
    #[prost(message, repeated, tag = "6")]
    pub music_albums: Vec<MusicAlbum>,
    #[prost(message, repeated, tag = "7")]
    pub music_playlists: Vec<MusicPlaylist>,
    #[prost(message, repeated, tag = "8")]
    pub music_videos: Vec<MusicVideo>,
    #[prost(message, repeated, tag = "9")]
    pub tv_shows: Vec<TvShow>,
    #[prost(message, repeated, tag = "10")]
    pub tv_episodes: Vec<TvEpisode>,
    #[prost(message, repeated, tag = "11")]
    pub tv_seasons: Vec<TvSeason>,
    #[prost(message, repeated, tag = "12")]
    pub live_channels: Vec<LiveChannel>,
    #[prost(message, repeated, tag = "13")]
    pub live_programmes: Vec<LiveProgramme>,
}

impl DiResponse {
    /// An empty response covering the given type codes.
    pub fn with_types(type_list: Vec<i32>) -> Self {
        Self {
            type_list,
            ..Default::default()
        }
    }
}

/// Fields shared by every video-like record. The record identity lives here.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BaseVideo {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub title: String,
    #[prost(string, tag = "3")]
    pub description: String,
    /// JSON encoded poster list, passed through untouched.
    #[prost(string, tag = "4")]
    pub poster_list: String,
    #[prost(int64, tag = "5")]
    pub duration: i64,
    #[prost(string, optional, tag = "6")]
    pub publisher_id: Option<String>,
    #[prost(int64, optional, tag = "7")]
    pub release_time: Option<i64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ShortVideo {
    #[prost(message, optional, tag = "1")]
    pub base_video: Option<BaseVideo>,
    #[prost(int64, tag = "2")]
    pub view_count: i64,
    #[prost(string, repeated, tag = "3")]
    pub tags: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MovieFilm {
    #[prost(message, optional, tag = "1")]
    pub base_video: Option<BaseVideo>,
    #[prost(string, repeated, tag = "2")]
    pub genres: Vec<String>,
    #[prost(string, repeated, tag = "3")]
    pub directors: Vec<String>,
    #[prost(string, repeated, tag = "4")]
    pub actors: Vec<String>,
    #[prost(double, optional, tag = "5")]
    pub rating: Option<f64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MusicVideo {
    #[prost(message, optional, tag = "1")]
    pub base_video: Option<BaseVideo>,
    #[prost(string, repeated, tag = "2")]
    pub artist_ids: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TvEpisode {
    #[prost(message, optional, tag = "1")]
    pub base_video: Option<BaseVideo>,
    #[prost(string, tag = "2")]
    pub season_id: String,
    #[prost(int32, tag = "3")]
    pub episode_number: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LiveProgramme {
    #[prost(message, optional, tag = "1")]
    pub base_video: Option<BaseVideo>,
    #[prost(string, tag = "2")]
    pub channel_id: String,
    #[prost(int64, tag = "3")]
    pub start_time: i64,
    #[prost(int64, tag = "4")]
    pub end_time: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Publisher {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub description: String,
    #[prost(string, tag = "4")]
    pub icon: String,
    #[prost(int64, tag = "5")]
    pub subscriber_count: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MusicArtist {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub description: String,
    #[prost(string, tag = "4")]
    pub poster_list: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MusicAlbum {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub title: String,
    #[prost(string, repeated, tag = "3")]
    pub artist_ids: Vec<String>,
    #[prost(string, tag = "4")]
    pub poster_list: String,
    #[prost(string, repeated, tag = "5")]
    pub song_ids: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MusicPlaylist {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub title: String,
    #[prost(string, tag = "3")]
    pub description: String,
    #[prost(string, tag = "4")]
    pub poster_list: String,
    #[prost(string, repeated, tag = "5")]
    pub song_ids: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TvShow {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub title: String,
    #[prost(string, tag = "3")]
    pub description: String,
    #[prost(string, tag = "4")]
    pub poster_list: String,
    #[prost(string, repeated, tag = "5")]
    pub season_ids: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TvSeason {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub title: String,
    #[prost(string, tag = "3")]
    pub tv_show_id: String,
    #[prost(int32, tag = "4")]
    pub season_number: i32,
    #[prost(string, tag = "5")]
    pub poster_list: String,
    #[prost(string, repeated, tag = "6")]
    pub episode_ids: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LiveChannel {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub logo: String,
    #[prost(string, tag = "4")]
    pub stream_url: String,
    #[prost(string, repeated, tag = "5")]
    pub programme_ids: Vec<String>,
}

/// Type codes and record class names published by the DI service.
///
/// Must be kept in sync with the service schema. The registry is validated
/// against this table at startup.
pub const DI_SCHEMA: &[(i32, &str)] = &[
    (1, "ShortVideo"),
    (2, "Publisher"),
    (3, "MovieFilm"),
    (4, "MusicArtist"),
    (5, "MusicAlbum"),
    (6, "MusicPlaylist"),
    (7, "MusicVideo"),
    (8, "TvShow"),
    (9, "TvEpisode"),
    (10, "TvSeason"),
    (11, "LiveChannel"),
    (12, "LiveProgramme"),
];
