//! Wire types exchanged with the origin services.
//!
//! All messages are protobuf encoded. Fields are tagged, so adding an
//! optional field keeps previously cached blobs readable.

pub mod detail;
pub mod reco;
pub mod rpc;

pub use detail::{
    BaseVideo, DiOneRequest, DiRequest, DiResponse, IdsWithType, LiveChannel, LiveProgramme,
    MovieFilm, MusicAlbum, MusicArtist, MusicPlaylist, MusicVideo, Publisher, ShortVideo,
    TvEpisode, TvSeason, TvShow, DI_SCHEMA,
};
pub use reco::{Banner, BannerList, RecoRequest, RecoResponse, RecoResult, TabInfo, Tabs, TabsList};
pub use rpc::RpcEnvelope;
