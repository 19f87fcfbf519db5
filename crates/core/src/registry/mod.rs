//! Closed registry of the resource kinds served by the detail service.
//!
//! Each kind maps a numeric type code to its API name, the detail-service
//! class and list-field names, the identity rule of its record and the
//! per-user actions a profile page resolves for it. The registry is checked
//! against the detail-service schema once at startup.

mod variant;

use thiserror::Error;

use crate::codec::{self, CodecError};
use crate::model::{
    DiResponse, LiveChannel, LiveProgramme, MovieFilm, MusicAlbum, MusicArtist, MusicPlaylist,
    MusicVideo, Publisher, ShortVideo, TvEpisode, TvSeason, TvShow,
};
use crate::resource::UaKind;

pub use variant::{
    normalize_app_version, ResourceVariant, RELEASED_VERSIONS, VERSION_BASE, VERSION_NEWEST,
    VERSION_QUEUE_PAGING,
};

/// Where a record keeps its identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityRule {
    /// `record.id`
    Direct,
    /// `record.base_video.id`
    BaseVideo,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Type code {0} ({1}) has no registered resource kind")]
    Unmapped(i32, String),
    #[error("Type code {code} is {registered} locally but {published} in the schema")]
    ClassMismatch {
        code: i32,
        registered: &'static str,
        published: String,
    },
}

macro_rules! detail_id {
    (Direct, $record:expr) => {
        $record.id.clone()
    };
    (BaseVideo, $record:expr) => {
        $record
            .base_video
            .as_ref()
            .map(|base| base.id.clone())
            .unwrap_or_default()
    };
}

macro_rules! resource_kinds {
    ($(
        $kind:ident {
            code: $code:literal,
            api: $api:literal,
            list: $list:ident,
            identity: $identity:ident,
            actions: [$($ua:ident),*],
        }
    )*) => {
        /// A resource kind known to the detail service.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum ResourceKind {
            $($kind,)*
        }

        impl ResourceKind {
            pub const ALL: &'static [ResourceKind] = &[$(ResourceKind::$kind,)*];

            /// Numeric type code on the detail-service wire.
            pub fn code(self) -> i32 {
                match self {
                    $(ResourceKind::$kind => $code,)*
                }
            }

            pub fn from_code(code: i32) -> Option<Self> {
                match code {
                    $($code => Some(ResourceKind::$kind),)*
                    _ => None,
                }
            }

            /// Name used by callers to address the kind.
            pub fn api_type(self) -> &'static str {
                match self {
                    $(ResourceKind::$kind => $api,)*
                }
            }

            pub fn from_api_type(api_type: &str) -> Option<Self> {
                match api_type {
                    $($api => Some(ResourceKind::$kind),)*
                    _ => None,
                }
            }

            /// Record class name in the detail-service schema. Also names the
            /// version slot of the kind's detail cache entries.
            pub fn di_class_name(self) -> &'static str {
                match self {
                    $(ResourceKind::$kind => stringify!($kind),)*
                }
            }

            /// Field of [`DiResponse`] holding records of this kind.
            pub fn di_list_name(self) -> &'static str {
                match self {
                    $(ResourceKind::$kind => stringify!($list),)*
                }
            }

            pub fn identity(self) -> IdentityRule {
                match self {
                    $(ResourceKind::$kind => IdentityRule::$identity,)*
                }
            }

            /// User actions a profile page resolves for this kind.
            pub fn detail_user_actions(self) -> &'static [UaKind] {
                match self {
                    $(ResourceKind::$kind => &[$(UaKind::$ua),*],)*
                }
            }
        }

        /// One detail record of any registered kind.
        #[derive(Debug, Clone, PartialEq)]
        pub enum DetailItem {
            $($kind($kind),)*
        }

        impl DetailItem {
            pub fn kind(&self) -> ResourceKind {
                match self {
                    $(DetailItem::$kind(_) => ResourceKind::$kind,)*
                }
            }

            /// Identifier extracted with the kind's identity rule.
            pub fn id(&self) -> String {
                match self {
                    $(DetailItem::$kind(record) => detail_id!($identity, record),)*
                }
            }

            /// Encodes the record for the store.
            pub fn pack(&self) -> codec::Result<Vec<u8>> {
                match self {
                    $(DetailItem::$kind(record) => codec::pack(record),)*
                }
            }

            /// Decodes a stored record of the given kind.
            pub fn unpack(kind: ResourceKind, blob: &[u8]) -> Result<Self, CodecError> {
                match kind {
                    $(ResourceKind::$kind => codec::unpack::<$kind>(blob).map(DetailItem::$kind),)*
                }
            }
        }

        impl DiResponse {
            /// Records of one kind, in response order.
            pub fn items(&self, kind: ResourceKind) -> Vec<DetailItem> {
                match kind {
                    $(ResourceKind::$kind => self
                        .$list
                        .iter()
                        .cloned()
                        .map(DetailItem::$kind)
                        .collect(),)*
                }
            }

            /// Appends a record to the list of its kind.
            pub fn push(&mut self, item: DetailItem) {
                match item {
                    $(DetailItem::$kind(record) => self.$list.push(record),)*
                }
            }
        }
    };
}

resource_kinds! {
    ShortVideo {
        code: 1,
        api: "shortvideo",
        list: short_videos,
        identity: BaseVideo,
        actions: [History, Thumb],
    }
    Publisher {
        code: 2,
        api: "publisher",
        list: publishers,
        identity: Direct,
        actions: [Subscribe],
    }
    MovieFilm {
        code: 3,
        api: "movie",
        list: movies,
        identity: BaseVideo,
        actions: [History, Watchlist, Thumb],
    }
    MusicArtist {
        code: 4,
        api: "artist",
        list: music_artists,
        identity: Direct,
        actions: [Subscribe],
    }
    MusicAlbum {
        code: 5,
        api: "album",
        list: music_albums,
        identity: Direct,
        actions: [Watchlist],
    }
    MusicPlaylist {
        code: 6,
        api: "playlist",
        list: music_playlists,
        identity: Direct,
        actions: [Watchlist],
    }
    MusicVideo {
        code: 7,
        api: "musicvideo",
        list: music_videos,
        identity: BaseVideo,
        actions: [History, Thumb],
    }
    TvShow {
        code: 8,
        api: "tvshow",
        list: tv_shows,
        identity: Direct,
        actions: [History, Watchlist],
    }
    TvEpisode {
        code: 9,
        api: "tvepisode",
        list: tv_episodes,
        identity: BaseVideo,
        actions: [History],
    }
    TvSeason {
        code: 10,
        api: "tvseason",
        list: tv_seasons,
        identity: Direct,
        actions: [],
    }
    LiveChannel {
        code: 11,
        api: "livechannel",
        list: live_channels,
        identity: Direct,
        actions: [Watchlist],
    }
    LiveProgramme {
        code: 12,
        api: "liveprogramme",
        list: live_programmes,
        identity: BaseVideo,
        actions: [],
    }
}

/// Checks that every type code published by the detail service maps to a
/// registered kind with the same class name.
pub fn validate_schema(schema: &[(i32, &str)]) -> Result<(), RegistryError> {
    for &(code, class) in schema {
        let kind = ResourceKind::from_code(code)
            .ok_or_else(|| RegistryError::Unmapped(code, class.to_string()))?;
        if kind.di_class_name() != class {
            return Err(RegistryError::ClassMismatch {
                code,
                registered: kind.di_class_name(),
                published: class.to_string(),
            });
        }
    }
    Ok(())
}


#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::model::BaseVideo;

    /// A minimal record of `kind` whose identity is `id`.
    pub(crate) fn sample(kind: ResourceKind, id: &str) -> DetailItem {
        let base = || {
            Some(BaseVideo {
                id: id.to_string(),
                title: format!("title {id}"),
                ..Default::default()
            })
        };
        match kind {
            ResourceKind::ShortVideo => DetailItem::ShortVideo(ShortVideo {
                base_video: base(),
                view_count: 10,
                ..Default::default()
            }),
            ResourceKind::Publisher => DetailItem::Publisher(Publisher {
                id: id.to_string(),
                name: "pub".to_string(),
                ..Default::default()
            }),
            ResourceKind::MovieFilm => DetailItem::MovieFilm(MovieFilm {
                base_video: base(),
                rating: Some(7.5),
                ..Default::default()
            }),
            ResourceKind::MusicArtist => DetailItem::MusicArtist(MusicArtist {
                id: id.to_string(),
                ..Default::default()
            }),
            ResourceKind::MusicAlbum => DetailItem::MusicAlbum(MusicAlbum {
                id: id.to_string(),
                song_ids: vec!["s1".to_string()],
                ..Default::default()
            }),
            ResourceKind::MusicPlaylist => DetailItem::MusicPlaylist(MusicPlaylist {
                id: id.to_string(),
                song_ids: vec!["s1".to_string(), "s2".to_string()],
                ..Default::default()
            }),
            ResourceKind::MusicVideo => DetailItem::MusicVideo(MusicVideo {
                base_video: base(),
                artist_ids: vec!["a1".to_string()],
            }),
            ResourceKind::TvShow => DetailItem::TvShow(TvShow {
                id: id.to_string(),
                ..Default::default()
            }),
            ResourceKind::TvEpisode => DetailItem::TvEpisode(TvEpisode {
                base_video: base(),
                episode_number: 3,
                ..Default::default()
            }),
            ResourceKind::TvSeason => DetailItem::TvSeason(TvSeason {
                id: id.to_string(),
                season_number: 1,
                ..Default::default()
            }),
            ResourceKind::LiveChannel => DetailItem::LiveChannel(LiveChannel {
                id: id.to_string(),
                programme_ids: vec!["lp1".to_string()],
                ..Default::default()
            }),
            ResourceKind::LiveProgramme => DetailItem::LiveProgramme(LiveProgramme {
                base_video: base(),
                channel_id: "lc1".to_string(),
                ..Default::default()
            }),
        }
    }
}
