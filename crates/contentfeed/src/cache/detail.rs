use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use contentfeed_core::cache::{
    detail_key, merge_details, partition_hits, request_keys, CacheError, DetailHits, Store, Versions,
};
use contentfeed_core::model::{DiResponse, IdsWithType};
use contentfeed_core::registry::ResourceKind;
use contentfeed_core::{Fetched, RequestContext};

use crate::pipeline::Service;

/// A detail lookup: one `(type, id)` or a batch of typed id lists.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailArgs {
    One { kind_code: i32, id: String },
    Group(Vec<IdsWithType>),
}

impl DetailArgs {
    /// The lookup as a list of typed id batches.
    pub fn requested(&self) -> Vec<IdsWithType> {
        match self {
            DetailArgs::One { kind_code, id } => vec![IdsWithType::new(*kind_code, vec![id.clone()])],
            DetailArgs::Group(idts) => idts.clone(),
        }
    }

    /// The origin lookup for the misses of this request. A single-id lookup
    /// that missed is itself the residual.
    fn residual(&self, missing: Vec<IdsWithType>) -> DetailArgs {
        match self {
            DetailArgs::One { .. } => self.clone(),
            DetailArgs::Group(_) => DetailArgs::Group(missing),
        }
    }
}

/// Detail merge cache.
///
/// Reads every requested `(type, id)` with one multi-get, sends only the
/// misses to `origin`, writes the fresh records back and returns the merged
/// response in request order. A full hit never reaches the origin. The
/// multi-get is bounded by `read_timeout`; a slow store counts as a miss.
pub struct DetailMerged<S> {
    origin: S,
    store: Arc<dyn Store>,
    versions: Arc<Versions>,
    ttl: Duration,
    read_timeout: Duration,
}

impl<S> DetailMerged<S>
where
    S: Service<DetailArgs, DiResponse>,
{
    pub fn new(
        origin: S,
        store: Arc<dyn Store>,
        versions: Arc<Versions>,
        ttl: Duration,
        read_timeout: Duration,
    ) -> Self {
        Self {
            origin,
            store,
            versions,
            ttl,
            read_timeout,
        }
    }

    fn version_of(&self, type_code: i32) -> u32 {
        ResourceKind::from_code(type_code)
            .map(|kind| self.versions.get(kind.di_class_name()))
            .unwrap_or(0)
    }

    async fn lookup(&self, requested: &[IdsWithType], log_id: &str) -> DetailHits {
        let keys = request_keys(requested, |code| self.version_of(code));
        let read = tokio::time::timeout(self.read_timeout, self.store.get_many(&keys))
            .await
            .unwrap_or(Err(CacheError::Timeout));
        let hits = match read {
            Ok(blobs) => partition_hits(requested, &keys, blobs),
            Err(err) => {
                tracing::warn!(log_id = %log_id, error = %err, "Failed to read details from cache");
                DetailHits::all_missing(requested)
            }
        };
        for key in &hits.corrupt {
            tracing::warn!(log_id = %log_id, key = %key, "Undecodable detail entry");
        }
        hits
    }

    async fn write_back(&self, fresh: &DiResponse, log_id: &str) {
        let mut entries = Vec::new();
        for kind in ResourceKind::ALL {
            let version = self.versions.get(kind.di_class_name());
            for item in fresh.items(*kind) {
                let id = item.id();
                if id.is_empty() {
                    continue;
                }
                match item.pack() {
                    Ok(blob) => entries.push((detail_key(kind.code(), version, &id), blob)),
                    Err(err) => {
                        tracing::warn!(log_id = %log_id, id = %id, error = %err, "Failed to encode detail")
                    }
                }
            }
        }
        if entries.is_empty() {
            return;
        }
        match self.store.set_many(&entries, self.ttl).await {
            Ok(()) => tracing::debug!(log_id = %log_id, count = entries.len(), "Detail cache set"),
            Err(err) => tracing::warn!(log_id = %log_id, error = %err, "Failed to write details to cache"),
        }
    }
}

#[async_trait]
impl<S> Service<DetailArgs, DiResponse> for DetailMerged<S>
where
    S: Service<DetailArgs, DiResponse>,
{
    async fn call(&self, ctx: &RequestContext, args: &DetailArgs) -> Fetched<DiResponse> {
        let requested = args.requested();
        let hits = self.lookup(&requested, &ctx.log_id).await;

        if hits.is_complete() {
            tracing::debug!(log_id = %ctx.log_id, count = hits.found.len(), "Detail cache full hit");
            return Fetched::Ok(merge_details(&requested, &hits.found, None));
        }

        let residual = args.residual(hits.residual);
        match self.origin.call(ctx, &residual).await {
            Fetched::Ok(fresh) => {
                self.write_back(&fresh, &ctx.log_id).await;
                Fetched::Ok(merge_details(&requested, &hits.found, Some(&fresh)))
            }
            Fetched::NoCache(fresh) => {
                Fetched::NoCache(merge_details(&requested, &hits.found, Some(&fresh)))
            }
            Fetched::Unavailable if hits.found.is_empty() => Fetched::Unavailable,
            Fetched::Unavailable => Fetched::NoCache(merge_details(&requested, &hits.found, None)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::GetDetail;
    use crate::origin::mock::{MockConnector, MockOrigin};
    use crate::pipeline::{Direct, FailoverSwitch, GuardPolicy, OriginGuard};
    use crate::store::faulty::FaultyStore;
    use crate::store::MemoryStore;
    use contentfeed_core::cache::response_ids;
    use contentfeed_core::model::rpc::methods;
    use contentfeed_core::model::{BaseVideo, MovieFilm, Publisher};
    use contentfeed_core::registry::DetailItem;

    const MOVIE: i32 = 3;
    const PUBLISHER: i32 = 2;
    const READ_TIMEOUT: Duration = Duration::from_millis(50);

    type Merged = DetailMerged<OriginGuard<MockConnector, Direct<GetDetail>>>;

    fn movie(id: &str) -> DetailItem {
        DetailItem::MovieFilm(MovieFilm {
            base_video: Some(BaseVideo {
                id: id.to_string(),
                title: format!("movie {id}"),
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    fn publisher(id: &str) -> DetailItem {
        DetailItem::Publisher(Publisher {
            id: id.to_string(),
            ..Default::default()
        })
    }

    fn merged_over(origin: &Arc<MockOrigin>, store: Arc<dyn Store>, failover: FailoverSwitch) -> Merged {
        build(origin, store, Arc::new(Versions::new()), failover)
    }

    fn merged(origin: &Arc<MockOrigin>, store: &Arc<MemoryStore>, versions: &Arc<Versions>) -> Merged {
        build(origin, store.clone(), versions.clone(), FailoverSwitch::default())
    }

    fn build(
        origin: &Arc<MockOrigin>,
        store: Arc<dyn Store>,
        versions: Arc<Versions>,
        failover: FailoverSwitch,
    ) -> Merged {
        let guard = OriginGuard::new(
            "di",
            Arc::new(MockConnector(origin.clone())),
            Direct::new(GetDetail),
            GuardPolicy::default().no_downgrade(),
            failover,
        );
        DetailMerged::new(guard, store, versions, Duration::from_secs(60), READ_TIMEOUT)
    }

    async fn seed(store: &MemoryStore, item: &DetailItem) {
        let key = detail_key(item.kind().code(), 0, &item.id());
        store
            .set_many(&[(key, item.pack().unwrap())], Duration::from_secs(60))
            .await
            .unwrap();
    }

    fn group(ids: &[&str]) -> DetailArgs {
        DetailArgs::Group(vec![IdsWithType::new(
            MOVIE,
            ids.iter().map(|id| id.to_string()).collect(),
        )])
    }

    #[tokio::test]
    async fn test_merge_preserves_request_order_and_sends_only_misses() {
        let origin = MockOrigin::new();
        let store = Arc::new(MemoryStore::default());
        let versions = Arc::new(Versions::new());
        seed(&store, &movie("a")).await;
        seed(&store, &movie("c")).await;
        origin.add_detail(movie("b"));
        origin.add_detail(movie("d"));

        let fetched = merged(&origin, &store, &versions)
            .call(&RequestContext::default(), &group(&["a", "b", "c", "d"]))
            .await;

        let response = fetched.into_value().unwrap();
        let ids: Vec<String> = response.movies.iter().map(|m| m.base_video.clone().unwrap().id).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
        assert_eq!(
            origin.detail_requests(),
            vec![(
                methods::GET_DETAIL,
                vec![IdsWithType::new(MOVIE, vec!["b".to_string(), "d".to_string()])]
            )]
        );
    }

    #[tokio::test]
    async fn test_full_hit_never_calls_origin() {
        let origin = MockOrigin::new();
        let store = Arc::new(MemoryStore::default());
        let versions = Arc::new(Versions::new());
        seed(&store, &movie("a")).await;
        seed(&store, &publisher("p1")).await;

        let args = DetailArgs::Group(vec![
            IdsWithType::new(PUBLISHER, vec!["p1".to_string()]),
            IdsWithType::new(MOVIE, vec!["a".to_string()]),
        ]);
        let fetched = merged(&origin, &store, &versions)
            .call(&RequestContext::default(), &args)
            .await;

        let response = fetched.into_value().unwrap();
        assert_eq!(response.type_list, vec![PUBLISHER, MOVIE]);
        assert_eq!(
            response_ids(&response),
            vec![(PUBLISHER, "p1".to_string()), (MOVIE, "a".to_string())]
        );
        assert_eq!(origin.connects(), 0);
    }

    #[tokio::test]
    async fn test_fresh_records_are_written_back() {
        let origin = MockOrigin::new();
        let store = Arc::new(MemoryStore::default());
        let versions = Arc::new(Versions::new());
        origin.add_detail(movie("m1"));
        let cache = merged(&origin, &store, &versions);
        let args = DetailArgs::One {
            kind_code: MOVIE,
            id: "m1".to_string(),
        };

        assert!(cache.call(&RequestContext::default(), &args).await.is_cacheable());
        assert!(cache.call(&RequestContext::default(), &args).await.is_cacheable());

        assert_eq!(origin.calls(), 1);
        let stored = store.get_many(&["di:3:0:m1".to_string()]).await.unwrap();
        assert!(stored[0].is_some());
    }

    #[tokio::test]
    async fn test_version_bump_forces_refetch() {
        let origin = MockOrigin::new();
        let store = Arc::new(MemoryStore::default());
        let versions = Arc::new(Versions::new());
        seed(&store, &movie("a")).await;
        origin.add_detail(movie("a"));

        versions.bump("MovieFilm");
        merged(&origin, &store, &versions)
            .call(&RequestContext::default(), &group(&["a"]))
            .await;

        assert_eq!(origin.calls(), 1);
        let stored = store.get_many(&["di:3:1:a".to_string()]).await.unwrap();
        assert!(stored[0].is_some());
    }

    #[tokio::test]
    async fn test_origin_down_returns_hits_only() {
        let origin = MockOrigin::new();
        origin.set_down(true);
        let store = Arc::new(MemoryStore::default());
        let versions = Arc::new(Versions::new());
        seed(&store, &movie("a")).await;
        let cache = merged(&origin, &store, &versions);

        let partial = cache.call(&RequestContext::default(), &group(&["a", "b"])).await;
        let Fetched::NoCache(response) = partial else {
            panic!("expected hits only, got {partial:?}");
        };
        assert_eq!(response.movies.len(), 1);

        let nothing = cache.call(&RequestContext::default(), &group(&["x"])).await;
        assert_eq!(nothing, Fetched::Unavailable);
    }

    #[tokio::test]
    async fn test_corrupt_entry_counts_as_miss() {
        let origin = MockOrigin::new();
        let store = Arc::new(MemoryStore::default());
        let versions = Arc::new(Versions::new());
        store
            .set_many(&[("di:3:0:a".to_string(), vec![1, 0xff])], Duration::from_secs(60))
            .await
            .unwrap();
        origin.add_detail(movie("a"));

        let fetched = merged(&origin, &store, &versions)
            .call(&RequestContext::default(), &group(&["a"]))
            .await;

        assert_eq!(fetched.into_value().unwrap().movies.len(), 1);
        assert_eq!(origin.calls(), 1);
    }

    #[tokio::test]
    async fn test_single_residual_of_a_group_uses_batched_call() {
        let origin = MockOrigin::new();
        let store = Arc::new(MemoryStore::default());
        let versions = Arc::new(Versions::new());
        seed(&store, &movie("a")).await;
        origin.add_detail(movie("b"));

        let fetched = merged(&origin, &store, &versions)
            .call(&RequestContext::default(), &group(&["a", "b"]))
            .await;

        assert_eq!(fetched.into_value().unwrap().movies.len(), 2);
        assert_eq!(
            origin.detail_requests(),
            vec![(methods::GET_DETAIL, vec![IdsWithType::new(MOVIE, vec!["b".to_string()])])]
        );
    }

    #[tokio::test]
    async fn test_single_lookup_uses_one_object_call() {
        let origin = MockOrigin::new();
        let store = Arc::new(MemoryStore::default());
        let versions = Arc::new(Versions::new());
        origin.add_detail(publisher("p1"));
        let args = DetailArgs::One {
            kind_code: PUBLISHER,
            id: "p1".to_string(),
        };

        merged(&origin, &store, &versions)
            .call(&RequestContext::default(), &args)
            .await;

        assert_eq!(
            origin.detail_requests(),
            vec![(methods::GET_ONE_DETAIL, vec![IdsWithType::new(PUBLISHER, vec!["p1".to_string()])])]
        );
    }

    #[tokio::test]
    async fn test_store_down_still_answers_from_origin() {
        let origin = MockOrigin::new();
        origin.add_detail(movie("a"));
        let cache = merged_over(&origin, Arc::new(FaultyStore::down()), FailoverSwitch::default());

        let fetched = cache.call(&RequestContext::default(), &group(&["a"])).await;

        assert!(fetched.is_cacheable());
        assert_eq!(fetched.into_value().unwrap().movies.len(), 1);
        assert_eq!(origin.calls(), 1);
    }

    #[tokio::test]
    async fn test_store_and_origin_down_is_unavailable() {
        let origin = MockOrigin::new();
        origin.set_down(true);
        let cache = merged_over(&origin, Arc::new(FaultyStore::down()), FailoverSwitch::default());

        let fetched = cache.call(&RequestContext::default(), &group(&["a", "b"])).await;

        assert_eq!(fetched, Fetched::Unavailable);
    }

    #[tokio::test]
    async fn test_stalled_store_read_is_bounded_during_failover() {
        let origin = MockOrigin::new();
        let cache = merged_over(
            &origin,
            Arc::new(FaultyStore::stalling(Duration::from_secs(30))),
            FailoverSwitch::new(true),
        );

        let fetched = tokio::time::timeout(
            Duration::from_secs(5),
            cache.call(&RequestContext::default(), &group(&["a"])),
        )
        .await
        .expect("detail read was not bounded");

        assert_eq!(fetched, Fetched::Unavailable);
        assert_eq!(origin.connects(), 0);
    }
}
