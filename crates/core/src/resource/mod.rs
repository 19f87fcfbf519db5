//! User-facing resource model assembled from detail records, ranking
//! metadata and per-user action flags.

mod fields;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::RecoResult;
use crate::registry::{DetailItem, ResourceKind, ResourceVariant};

pub use fields::DetailFields;

/// Per-user action families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UaKind {
    History,
    Watchlist,
    Subscribe,
    Thumb,
}

impl UaKind {
    pub const ALL: [UaKind; 4] = [
        UaKind::History,
        UaKind::Watchlist,
        UaKind::Subscribe,
        UaKind::Thumb,
    ];
}

/// State of one user action on one resource.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserAction {
    pub active: bool,
    /// Playback position in seconds, for history entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

/// How a record asks for one user action.
#[derive(Debug, Clone, PartialEq)]
pub enum UaRequest {
    /// Resolve it with the user-action service.
    Fetch,
    /// Already known to the caller.
    Known(UserAction),
}

/// One input record of a group build.
#[derive(Debug, Clone, PartialEq)]
pub struct RecRecord {
    pub id: String,
    pub kind_code: i32,
    pub result: Option<RecoResult>,
    pub user_actions: BTreeMap<UaKind, UaRequest>,
    pub extra: Map<String, Value>,
}

impl RecRecord {
    pub fn new(id: impl Into<String>, kind_code: i32) -> Self {
        Self {
            id: id.into(),
            kind_code,
            result: None,
            user_actions: BTreeMap::new(),
            extra: Map::new(),
        }
    }

    /// A record built from a recommendation result.
    pub fn from_result(result: RecoResult) -> Self {
        Self {
            id: result.id.clone(),
            kind_code: result.result_type,
            result: Some(result),
            user_actions: BTreeMap::new(),
            extra: Map::new(),
        }
    }

    pub fn with_action(mut self, kind: UaKind, request: UaRequest) -> Self {
        self.user_actions.insert(kind, request);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// The merged representation of one content item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceObject {
    pub id: String,
    #[serde(skip)]
    pub kind: ResourceKind,
    pub api_type: &'static str,
    pub variant: ResourceVariant,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_list: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub user_actions: BTreeMap<UaKind, UserAction>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResourceObject {
    pub fn new(kind: ResourceKind, variant: ResourceVariant) -> Self {
        Self {
            id: String::new(),
            kind,
            api_type: kind.api_type(),
            variant,
            title: None,
            description: None,
            poster_list: None,
            publisher_id: None,
            duration: None,
            attributes: BTreeMap::new(),
            reason: None,
            score: None,
            user_actions: BTreeMap::new(),
            extra: Map::new(),
        }
    }

    /// Populates identity and content fields from a detail record.
    pub fn fill_detail(&mut self, item: &DetailItem) {
        let fields = DetailFields::extract(item, self.variant);
        self.id = fields.id;
        self.title = fields.title;
        self.description = fields.description;
        self.poster_list = fields.poster_list;
        self.publisher_id = fields.publisher_id;
        self.duration = fields.duration;
        self.attributes = fields.attributes;
    }

    /// Adds the ranking metadata, user actions and caller extras.
    pub fn fill_context(
        &mut self,
        result: Option<&RecoResult>,
        user_actions: Option<&BTreeMap<UaKind, UserAction>>,
        extra: &Map<String, Value>,
    ) {
        if let Some(result) = result {
            self.reason = result.reason.clone();
            self.score = result.score;
        }
        if let Some(user_actions) = user_actions {
            self.user_actions = user_actions.clone();
        }
        for (key, value) in extra {
            self.extra.insert(key.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BaseVideo, MovieFilm};

    fn movie() -> DetailItem {
        DetailItem::MovieFilm(MovieFilm {
            base_video: Some(BaseVideo {
                id: "m1".to_string(),
                title: "Heat".to_string(),
                duration: 10_200,
                publisher_id: Some("p1".to_string()),
                ..Default::default()
            }),
            genres: vec!["crime".to_string()],
            rating: Some(8.3),
            ..Default::default()
        })
    }

    #[test]
    fn test_fill_detail_takes_identity_from_record() {
        let mut obj = ResourceObject::new(ResourceKind::MovieFilm, ResourceVariant::Standard);
        obj.fill_detail(&movie());
        assert_eq!(obj.id, "m1");
        assert_eq!(obj.title.as_deref(), Some("Heat"));
        assert_eq!(obj.publisher_id.as_deref(), Some("p1"));
        assert_eq!(obj.attributes["rating"], serde_json::json!(8.3));
    }

    #[test]
    fn test_fill_context_merges_actions_and_extra() {
        let mut obj = ResourceObject::new(ResourceKind::MovieFilm, ResourceVariant::Standard);
        obj.fill_detail(&movie());

        let result = RecoResult {
            id: "m1".to_string(),
            result_type: 3,
            reason: Some("trending".to_string()),
            score: Some(0.9),
        };
        let mut actions = BTreeMap::new();
        actions.insert(
            UaKind::Watchlist,
            UserAction {
                active: true,
                ..Default::default()
            },
        );
        let mut extra = Map::new();
        extra.insert("position".to_string(), serde_json::json!(4));

        obj.fill_context(Some(&result), Some(&actions), &extra);

        let json = serde_json::to_value(&obj).unwrap();
        assert_eq!(json["id"], "m1");
        assert_eq!(json["api_type"], "movie");
        assert_eq!(json["variant"], "standard");
        assert_eq!(json["reason"], "trending");
        assert_eq!(json["user_actions"]["watchlist"]["active"], true);
        assert_eq!(json["position"], 4);
    }

    #[test]
    fn test_record_builders() {
        let record = RecRecord::new("m1", 3)
            .with_action(UaKind::History, UaRequest::Fetch)
            .with_extra("slot", serde_json::json!("hero"));
        assert_eq!(record.user_actions[&UaKind::History], UaRequest::Fetch);
        assert_eq!(record.extra["slot"], "hero");

        let from_result = RecRecord::from_result(RecoResult {
            id: "s1".to_string(),
            result_type: 1,
            ..Default::default()
        });
        assert_eq!(from_result.kind_code, 1);
        assert_eq!(from_result.id, "s1");
    }
}
