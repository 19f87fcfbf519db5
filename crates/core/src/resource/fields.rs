use std::collections::BTreeMap;

use serde_json::{json, Value};

use crate::model::BaseVideo;
use crate::registry::{DetailItem, ResourceVariant};

/// Presentation fields of one detail record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailFields {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub poster_list: Option<String>,
    pub publisher_id: Option<String>,
    pub duration: Option<i64>,
    pub attributes: BTreeMap<String, Value>,
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl DetailFields {
    fn from_base(base: Option<&BaseVideo>) -> Self {
        let Some(base) = base else {
            return Self::default();
        };
        let mut fields = Self {
            id: base.id.clone(),
            title: non_empty(&base.title),
            description: non_empty(&base.description),
            poster_list: non_empty(&base.poster_list),
            publisher_id: base.publisher_id.clone(),
            duration: Some(base.duration),
            attributes: BTreeMap::new(),
        };
        if let Some(release_time) = base.release_time {
            fields.attr("release_time", json!(release_time));
        }
        fields
    }

    fn direct(id: &str, title: &str, description: &str, poster_list: &str) -> Self {
        Self {
            id: id.to_string(),
            title: non_empty(title),
            description: non_empty(description),
            poster_list: non_empty(poster_list),
            ..Default::default()
        }
    }

    fn attr(&mut self, key: &str, value: Value) {
        self.attributes.insert(key.to_string(), value);
    }

    /// Extracts the fields the given variant exposes for `item`.
    pub fn extract(item: &DetailItem, variant: ResourceVariant) -> Self {
        match item {
            DetailItem::ShortVideo(v) => {
                let mut f = Self::from_base(v.base_video.as_ref());
                f.attr("view_count", json!(v.view_count));
                if !v.tags.is_empty() {
                    f.attr("tags", json!(v.tags));
                }
                f
            }
            DetailItem::MovieFilm(v) => {
                let mut f = Self::from_base(v.base_video.as_ref());
                f.attr("genres", json!(v.genres));
                f.attr("directors", json!(v.directors));
                f.attr("actors", json!(v.actors));
                if let Some(rating) = v.rating {
                    f.attr("rating", json!(rating));
                }
                f
            }
            DetailItem::MusicVideo(v) => {
                let mut f = Self::from_base(v.base_video.as_ref());
                f.attr("artist_ids", json!(v.artist_ids));
                f
            }
            DetailItem::TvEpisode(v) => {
                let mut f = Self::from_base(v.base_video.as_ref());
                f.attr("season_id", json!(v.season_id));
                f.attr("episode_number", json!(v.episode_number));
                f
            }
            DetailItem::LiveProgramme(v) => {
                let mut f = Self::from_base(v.base_video.as_ref());
                f.attr("channel_id", json!(v.channel_id));
                f.attr("start_time", json!(v.start_time));
                f.attr("end_time", json!(v.end_time));
                f
            }
            DetailItem::Publisher(v) => {
                let mut f = Self::direct(&v.id, &v.name, &v.description, "");
                f.poster_list = non_empty(&v.icon);
                f.attr("subscriber_count", json!(v.subscriber_count));
                f
            }
            DetailItem::MusicArtist(v) => {
                Self::direct(&v.id, &v.name, &v.description, &v.poster_list)
            }
            DetailItem::MusicAlbum(v) => {
                let mut f = Self::direct(&v.id, &v.title, "", &v.poster_list);
                f.attr("artist_ids", json!(v.artist_ids));
                f.song_list(&v.song_ids, variant);
                f
            }
            DetailItem::MusicPlaylist(v) => {
                let mut f = Self::direct(&v.id, &v.title, &v.description, &v.poster_list);
                f.song_list(&v.song_ids, variant);
                f
            }
            DetailItem::TvShow(v) => {
                let mut f = Self::direct(&v.id, &v.title, &v.description, &v.poster_list);
                f.attr("season_ids", json!(v.season_ids));
                f
            }
            DetailItem::TvSeason(v) => {
                let mut f = Self::direct(&v.id, &v.title, "", &v.poster_list);
                f.attr("tv_show_id", json!(v.tv_show_id));
                f.attr("season_number", json!(v.season_number));
                f.attr("episode_ids", json!(v.episode_ids));
                f
            }
            DetailItem::LiveChannel(v) => {
                let mut f = Self::direct(&v.id, &v.name, "", &v.logo);
                f.attr("stream_url", json!(v.stream_url));
                if variant == ResourceVariant::PagingPrograms {
                    f.attr("programme_ids", json!(v.programme_ids));
                }
                f
            }
        }
    }

    fn song_list(&mut self, song_ids: &[String], variant: ResourceVariant) {
        self.attr("song_count", json!(song_ids.len()));
        if variant == ResourceVariant::Queue {
            self.attr("queue", json!(song_ids));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LiveChannel, MusicPlaylist, ShortVideo};

    #[test]
    fn test_queue_variant_exposes_songs() {
        let item = DetailItem::MusicPlaylist(MusicPlaylist {
            id: "pl1".to_string(),
            title: "Focus".to_string(),
            song_ids: vec!["s1".to_string(), "s2".to_string()],
            ..Default::default()
        });

        let standard = DetailFields::extract(&item, ResourceVariant::Standard);
        assert_eq!(standard.attributes["song_count"], json!(2));
        assert!(!standard.attributes.contains_key("queue"));

        let queue = DetailFields::extract(&item, ResourceVariant::Queue);
        assert_eq!(queue.attributes["queue"], json!(["s1", "s2"]));
    }

    #[test]
    fn test_paging_programs_variant_exposes_programmes() {
        let item = DetailItem::LiveChannel(LiveChannel {
            id: "lc1".to_string(),
            name: "News".to_string(),
            programme_ids: vec!["lp1".to_string()],
            ..Default::default()
        });
        let standard = DetailFields::extract(&item, ResourceVariant::Standard);
        assert!(!standard.attributes.contains_key("programme_ids"));
        let paging = DetailFields::extract(&item, ResourceVariant::PagingPrograms);
        assert_eq!(paging.attributes["programme_ids"], json!(["lp1"]));
        assert_eq!(paging.title.as_deref(), Some("News"));
    }

    #[test]
    fn test_video_without_base_is_empty() {
        let item = DetailItem::ShortVideo(ShortVideo::default());
        let fields = DetailFields::extract(&item, ResourceVariant::Standard);
        assert_eq!(fields.id, "");
        assert_eq!(fields.title, None);
    }
}
