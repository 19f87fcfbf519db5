/// Named "related content" interfaces of a detail page.
///
/// All of them share one request shape and are never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelatedInterface {
    VideoRelated,
    OtherShortVideosOfPublisher,
    SimilarPublishers,
    PopularVideosOfPublisher,
    RecentVideosOfPublisher,
    ShortVideoPopular,
    ShortVideoLatest,
    TvShowsOfPublisher,
    AlbumsOfPublisher,
    ArtistsOfPublisher,
    MoviesOfPublisher,
    EpisodesOfSeason,
    AroundPlayingEpisodes,
    SimilarTvShows,
    SimilarMovies,
    LatestSongsOfArtist,
    SongsOfOtherAlbum,
    SimilarSongs,
    SongsOfAlbum,
    SongsOfAlbumNoPaging,
    SimilarAlbums,
    PopularSongsOfArtist,
    AlbumsOfArtist,
    PopularAlbumsOfArtist,
    SimilarArtists,
    LatestSeasonsOfTvShow,
    FirstSeasonOfTvShow,
    SimilarPlaylists,
    SongsOfPlaylist,
    SongsOfPlaylistNoPaging,
    SearchRecommend,
    LocalRecommend,
}

impl RelatedInterface {
    pub const ALL: &'static [RelatedInterface] = &[
        RelatedInterface::VideoRelated,
        RelatedInterface::OtherShortVideosOfPublisher,
        RelatedInterface::SimilarPublishers,
        RelatedInterface::PopularVideosOfPublisher,
        RelatedInterface::RecentVideosOfPublisher,
        RelatedInterface::ShortVideoPopular,
        RelatedInterface::ShortVideoLatest,
        RelatedInterface::TvShowsOfPublisher,
        RelatedInterface::AlbumsOfPublisher,
        RelatedInterface::ArtistsOfPublisher,
        RelatedInterface::MoviesOfPublisher,
        RelatedInterface::EpisodesOfSeason,
        RelatedInterface::AroundPlayingEpisodes,
        RelatedInterface::SimilarTvShows,
        RelatedInterface::SimilarMovies,
        RelatedInterface::LatestSongsOfArtist,
        RelatedInterface::SongsOfOtherAlbum,
        RelatedInterface::SimilarSongs,
        RelatedInterface::SongsOfAlbum,
        RelatedInterface::SongsOfAlbumNoPaging,
        RelatedInterface::SimilarAlbums,
        RelatedInterface::PopularSongsOfArtist,
        RelatedInterface::AlbumsOfArtist,
        RelatedInterface::PopularAlbumsOfArtist,
        RelatedInterface::SimilarArtists,
        RelatedInterface::LatestSeasonsOfTvShow,
        RelatedInterface::FirstSeasonOfTvShow,
        RelatedInterface::SimilarPlaylists,
        RelatedInterface::SongsOfPlaylist,
        RelatedInterface::SongsOfPlaylistNoPaging,
        RelatedInterface::SearchRecommend,
        RelatedInterface::LocalRecommend,
    ];

    /// Interface name on the recommendation wire.
    pub fn name(self) -> &'static str {
        match self {
            RelatedInterface::VideoRelated => "general_video_related",
            RelatedInterface::OtherShortVideosOfPublisher => "other_shortvideo_of_publisher",
            RelatedInterface::SimilarPublishers => "similar_publisher",
            RelatedInterface::PopularVideosOfPublisher => "popular_videos_of_publisher",
            RelatedInterface::RecentVideosOfPublisher => "recent_videos_of_publisher",
            RelatedInterface::ShortVideoPopular => "shortvideo_popular",
            RelatedInterface::ShortVideoLatest => "shortvideo_latest",
            RelatedInterface::TvShowsOfPublisher => "tvshow_of_publisher",
            RelatedInterface::AlbumsOfPublisher => "albums_of_publisher",
            RelatedInterface::ArtistsOfPublisher => "artists_of_publisher",
            RelatedInterface::MoviesOfPublisher => "movies_of_publisher",
            RelatedInterface::EpisodesOfSeason => "episodes_of_season",
            RelatedInterface::AroundPlayingEpisodes => "around_playing_episodes_of_season",
            RelatedInterface::SimilarTvShows => "tvshows_similar",
            RelatedInterface::SimilarMovies => "movie_similar",
            RelatedInterface::LatestSongsOfArtist => "latest_songs_of_artist",
            RelatedInterface::SongsOfOtherAlbum => "songs_of_other_album",
            RelatedInterface::SimilarSongs => "similar_songs",
            RelatedInterface::SongsOfAlbum => "songs_of_album",
            RelatedInterface::SongsOfAlbumNoPaging => "songs_of_album_no_paging",
            RelatedInterface::SimilarAlbums => "albums_similar",
            RelatedInterface::PopularSongsOfArtist => "songs_popular_of_artist",
            RelatedInterface::AlbumsOfArtist => "albums_of_artist",
            RelatedInterface::PopularAlbumsOfArtist => "popular_albums_of_artist",
            RelatedInterface::SimilarArtists => "artists_similar",
            RelatedInterface::LatestSeasonsOfTvShow => "seasons_latest_of_tvshow",
            RelatedInterface::FirstSeasonOfTvShow => "first_season_of_tvshow",
            RelatedInterface::SimilarPlaylists => "similar_playlists",
            RelatedInterface::SongsOfPlaylist => "songs_of_playlist",
            RelatedInterface::SongsOfPlaylistNoPaging => "songs_of_playlist_no_paging",
            RelatedInterface::SearchRecommend => "search_content_recommend",
            RelatedInterface::LocalRecommend => "local_relevant_recommend",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|interface| interface.name() == name)
    }
}
