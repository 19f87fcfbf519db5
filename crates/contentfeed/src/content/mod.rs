//! The content service: every origin endpoint composed into its pipeline.

mod endpoints;
mod related;

use std::sync::Arc;
use std::time::Duration;

use contentfeed_core::cache::{SetCapacity, Store, Versions, CARD_PREFIX, TAB_PREFIX};
use contentfeed_core::memo::MemoField;
use contentfeed_core::model::{BannerList, DiResponse, IdsWithType, RecoResponse, Tabs, TabsList};
use contentfeed_core::registry::RELEASED_VERSIONS;
use contentfeed_core::{Fetched, RequestContext};

use crate::cache::{CacheBackend, DetailArgs, DetailMerged, ListCached, SetCached};
use crate::config::Config;
use crate::origin::{Connector, DiService, RecoService, DI_SERVICE_NAME, RECO_SERVICE_NAME};
use crate::pipeline::{
    Direct, FailoverSwitch, GuardPolicy, Handler, Memoized, NormalizeVersion, OriginGuard, Service, Timed,
    WriteSampler,
};

pub use endpoints::{
    AllLiveChannels, Banner, BrowseArgs, BrowseList, CardArgs, CardList, ChannelArgs, GetDetail,
    LiveArgs, LiveTvPrograms, Related, RelatedArgs, RelatedBanner, ResourceArgs, TabArgs,
    TabNames, TabsArgs, TabsPage, ALL_LIVE_CHANNELS_INTERFACE, BANNER_INTERFACE,
    BROWSE_ITEMS_INTERFACE, CARD_LIST_INTERFACE, LIVE_CARD_INTERFACE, NULL_CARD_LIST_INTERFACE,
    RELATED_BANNER_INTERFACE, TABS_INTERFACE, TABS_LIST_INTERFACE,
};
pub use related::RelatedInterface;

/// Tab whose cards come from the null-card interface.
pub const BUZZ_TAB_ID: &str = "buzz";
/// Card id sent for buzz tab requests.
pub const NULL_CARD_ID: &str = "null_card";

const TAB_NAMES_MEMO: &[MemoField] = &[MemoField::Lang];
const BANNER_MEMO: &[MemoField] = &[MemoField::Lang, MemoField::Arg(0)];
const TABS_MEMO: &[MemoField] = &[
    MemoField::AppVersion,
    MemoField::PreferLangs,
    MemoField::Arg(0),
    MemoField::Arg(1),
    MemoField::Arg(2),
];
const CARD_LIST_MEMO: &[MemoField] = &[
    MemoField::Lang,
    MemoField::Arg(0),
    MemoField::Arg(1),
    MemoField::Arg(2),
    MemoField::Arg(3),
];
const LIVE_MEMO: &[MemoField] = &[
    MemoField::Arg(0),
    MemoField::Arg(1),
    MemoField::Arg(2),
    MemoField::Arg(3),
    MemoField::Arg(4),
];
const ALL_CHANNELS_MEMO: &[MemoField] = &[MemoField::Arg(0)];

/// Tunables shared by every pipeline.
#[derive(Debug, Clone)]
pub struct ContentSettings {
    pub listing_ttl: Duration,
    pub detail_ttl: Duration,
    pub memo_ttl: Duration,
    pub policy: GuardPolicy,
    pub sampler: WriteSampler,
    pub set_capacity: SetCapacity,
}

impl ContentSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            listing_ttl: config.listing_ttl(),
            detail_ttl: config.detail_ttl(),
            memo_ttl: config.memo_ttl(),
            policy: GuardPolicy {
                allow_downgrade: true,
                timeout: config.origin_timeout(),
                degraded_timeout: config.degraded_timeout(),
            },
            sampler: WriteSampler::new(config.cache_write_probability),
            set_capacity: SetCapacity(config.set_capacity),
        }
    }
}

impl Default for ContentSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

type Pipeline<A, T> = Arc<dyn Service<A, T>>;

fn guard<K, H>(
    name: &'static str,
    connector: &Arc<K>,
    handler: H,
    policy: GuardPolicy,
    failover: &FailoverSwitch,
) -> OriginGuard<K, H>
where
    K: Connector,
    H: Handler<K::Client>,
{
    OriginGuard::new(name, connector.clone(), handler, policy, failover.clone())
}

/// Every content endpoint, each behind its own pipeline.
pub struct ContentService {
    tab_names: Pipeline<(), TabsList>,
    banner: Pipeline<TabArgs, BannerList>,
    related_banner: Pipeline<ResourceArgs, BannerList>,
    tabs: Pipeline<TabsArgs, Tabs>,
    card_list: Pipeline<CardArgs, RecoResponse>,
    null_card_list: Pipeline<CardArgs, RecoResponse>,
    live_tv_programs: Pipeline<LiveArgs, RecoResponse>,
    all_live_channels: Pipeline<ChannelArgs, RecoResponse>,
    browse_list: Pipeline<BrowseArgs, RecoResponse>,
    related: Pipeline<RelatedArgs, RecoResponse>,
    details: Pipeline<DetailArgs, DiResponse>,
}

impl ContentService {
    /// Composes every pipeline over the given origins and store.
    pub fn new<R, D>(
        reco: Arc<R>,
        di: Arc<D>,
        store: Arc<dyn Store>,
        versions: Arc<Versions>,
        failover: FailoverSwitch,
        settings: ContentSettings,
    ) -> Self
    where
        R: Connector,
        R::Client: RecoService,
        D: Connector,
        D::Client: DiService,
    {
        let listing = CacheBackend::new(store.clone(), versions.clone(), settings.listing_ttl)
            .with_sampler(settings.sampler);
        let live = settings.policy;
        let strict = settings.policy.no_downgrade();
        let memo_ttl = settings.memo_ttl;
        let capacity = settings.set_capacity;

        let tab_names = guard(
            RECO_SERVICE_NAME,
            &reco,
            ListCached::new(TabNames, listing.clone()),
            live,
            &failover,
        );
        let banner = guard(
            RECO_SERVICE_NAME,
            &reco,
            ListCached::new(Banner, listing.clone()),
            live,
            &failover,
        );
        let related_banner = guard(RECO_SERVICE_NAME, &reco, Direct::new(RelatedBanner), strict, &failover);
        let tabs = guard(
            RECO_SERVICE_NAME,
            &reco,
            SetCached::new(TAB_PREFIX, TabsPage, listing.clone(), capacity),
            live,
            &failover,
        );
        let card_list = guard(
            RECO_SERVICE_NAME,
            &reco,
            SetCached::new(CARD_PREFIX, CardList::normal(), listing.clone(), capacity),
            live,
            &failover,
        );
        let null_card_list = guard(
            RECO_SERVICE_NAME,
            &reco,
            SetCached::new(CARD_PREFIX, CardList::null_card(), listing.clone(), capacity),
            live,
            &failover,
        );
        let live_tv_programs = guard(
            RECO_SERVICE_NAME,
            &reco,
            SetCached::new(CARD_PREFIX, LiveTvPrograms, listing.clone(), capacity),
            live,
            &failover,
        );
        let all_live_channels = guard(
            RECO_SERVICE_NAME,
            &reco,
            SetCached::new(CARD_PREFIX, AllLiveChannels, listing.clone(), capacity),
            live,
            &failover,
        );
        let browse_list = guard(
            RECO_SERVICE_NAME,
            &reco,
            SetCached::new(CARD_PREFIX, BrowseList, listing, capacity),
            live,
            &failover,
        );
        let related = guard(RECO_SERVICE_NAME, &reco, Direct::new(Related), strict, &failover);
        let details = DetailMerged::new(
            guard(DI_SERVICE_NAME, &di, Direct::new(GetDetail), strict, &failover),
            store,
            versions,
            settings.detail_ttl,
            settings.policy.degraded_timeout,
        );

        Self {
            tab_names: Arc::new(Timed::new(
                TABS_LIST_INTERFACE,
                Memoized::<_, TabsList>::new(tab_names, TAB_NAMES_MEMO, 32, memo_ttl),
            )),
            banner: Arc::new(Timed::new(
                BANNER_INTERFACE,
                Memoized::<_, BannerList>::new(banner, BANNER_MEMO, 2048, memo_ttl),
            )),
            related_banner: Arc::new(Timed::new(RELATED_BANNER_INTERFACE, related_banner)),
            tabs: Arc::new(Timed::new(
                TABS_INTERFACE,
                NormalizeVersion::new(
                    RELEASED_VERSIONS,
                    Memoized::<_, Tabs>::new(tabs, TABS_MEMO, 16384, memo_ttl),
                ),
            )),
            card_list: Arc::new(Timed::new(
                CARD_LIST_INTERFACE,
                Memoized::<_, RecoResponse>::new(card_list, CARD_LIST_MEMO, 16384, memo_ttl),
            )),
            null_card_list: Arc::new(Timed::new(NULL_CARD_LIST_INTERFACE, null_card_list)),
            live_tv_programs: Arc::new(Timed::new(
                LIVE_CARD_INTERFACE,
                Memoized::<_, RecoResponse>::new(live_tv_programs, LIVE_MEMO, 1024, memo_ttl),
            )),
            all_live_channels: Arc::new(Timed::new(
                ALL_LIVE_CHANNELS_INTERFACE,
                Memoized::<_, RecoResponse>::new(all_live_channels, ALL_CHANNELS_MEMO, 8, memo_ttl),
            )),
            browse_list: Arc::new(Timed::new(BROWSE_ITEMS_INTERFACE, browse_list)),
            related: Arc::new(Timed::new("related", related)),
            details: Arc::new(Timed::new("details", details)),
        }
    }

    pub async fn tab_names(&self, ctx: &RequestContext) -> Fetched<TabsList> {
        self.tab_names.call(ctx, &()).await
    }

    pub async fn banner(&self, ctx: &RequestContext, tab_id: &str) -> Fetched<BannerList> {
        let args = TabArgs {
            tab_id: tab_id.to_string(),
        };
        self.banner.call(ctx, &args).await
    }

    pub async fn related_banner(&self, ctx: &RequestContext, args: &ResourceArgs) -> Fetched<BannerList> {
        self.related_banner.call(ctx, args).await
    }

    pub async fn tabs(&self, ctx: &RequestContext, args: &TabsArgs) -> Fetched<Tabs> {
        self.tabs.call(ctx, args).await
    }

    /// Cards of one slot. The buzz tab is served by the null-card interface.
    pub async fn card_list(&self, ctx: &RequestContext, args: &CardArgs) -> Fetched<RecoResponse> {
        if args.card_id == BUZZ_TAB_ID {
            let args = CardArgs {
                card_id: NULL_CARD_ID.to_string(),
                ..args.clone()
            };
            return self.null_card_list.call(ctx, &args).await;
        }
        self.card_list.call(ctx, args).await
    }

    pub async fn live_tv_programs(&self, ctx: &RequestContext, args: &LiveArgs) -> Fetched<RecoResponse> {
        self.live_tv_programs.call(ctx, args).await
    }

    pub async fn all_live_channels(&self, ctx: &RequestContext, num: i32) -> Fetched<RecoResponse> {
        self.all_live_channels.call(ctx, &ChannelArgs { num }).await
    }

    pub async fn browse_list(&self, ctx: &RequestContext, args: &BrowseArgs) -> Fetched<RecoResponse> {
        self.browse_list.call(ctx, args).await
    }

    pub async fn related(&self, ctx: &RequestContext, args: &RelatedArgs) -> Fetched<RecoResponse> {
        self.related.call(ctx, args).await
    }

    /// Detail records of several typed id batches, in request order.
    pub async fn details(&self, ctx: &RequestContext, idts: Vec<IdsWithType>) -> Fetched<DiResponse> {
        self.details.call(ctx, &DetailArgs::Group(idts)).await
    }

    pub async fn one_detail(&self, ctx: &RequestContext, kind_code: i32, id: &str) -> Fetched<DiResponse> {
        let args = DetailArgs::One {
            kind_code,
            id: id.to_string(),
        };
        self.details.call(ctx, &args).await
    }
}
