//! Origin operations of the content service.

use async_trait::async_trait;

use contentfeed_core::memo::{MemoArg, MemoArgs};
use contentfeed_core::model::rpc::methods;
use contentfeed_core::model::{
    BannerList, DiOneRequest, DiRequest, DiResponse, RecoRequest, RecoResponse, Tabs, TabsList,
};
use contentfeed_core::context::time_sign;
use contentfeed_core::RequestContext;

use crate::cache::DetailArgs;
use crate::origin::{DiService, OriginError, RecoService};
use crate::pipeline::Endpoint;

use super::related::RelatedInterface;

pub const TABS_LIST_INTERFACE: &str = "tabs_list";
pub const BANNER_INTERFACE: &str = "banner";
pub const RELATED_BANNER_INTERFACE: &str = "related_banner";
pub const TABS_INTERFACE: &str = "tabs_v1";
pub const CARD_LIST_INTERFACE: &str = "card_list";
pub const NULL_CARD_LIST_INTERFACE: &str = "card_list_null";
pub const LIVE_CARD_INTERFACE: &str = "live_card";
pub const ALL_LIVE_CHANNELS_INTERFACE: &str = "all_live_channels";
pub const BROWSE_ITEMS_INTERFACE: &str = "browse_items";

/// A recommend answer without results carries nothing worth keeping.
fn non_empty(response: RecoResponse) -> Option<RecoResponse> {
    Some(response).filter(|r| !r.results.is_empty())
}

// ============================================================================
// Arguments
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabArgs {
    pub tab_id: String,
}

impl MemoArgs for TabArgs {
    fn memo_arg(&self, index: usize) -> MemoArg {
        match index {
            0 => MemoArg::from(&self.tab_id),
            _ => MemoArg::Absent,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceArgs {
    pub resource_type: String,
    pub resource_id: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabsArgs {
    pub tab_id: String,
    pub num: i32,
    pub next_token: Option<String>,
}

impl MemoArgs for TabsArgs {
    fn memo_arg(&self, index: usize) -> MemoArg {
        match index {
            0 => MemoArg::from(&self.tab_id),
            1 => MemoArg::from(self.num),
            2 => MemoArg::from(self.next_token.as_ref()),
            _ => MemoArg::Absent,
        }
    }
}

/// Paging of a card list. `paging_type` is 0 for the first page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardArgs {
    pub card_id: String,
    pub tab_id: String,
    pub num: i32,
    pub next: Option<String>,
    pub paging_type: i32,
}

impl MemoArgs for CardArgs {
    fn memo_arg(&self, index: usize) -> MemoArg {
        match index {
            0 => MemoArg::from(&self.card_id),
            1 => MemoArg::from(self.num),
            2 => MemoArg::from(self.next.as_ref()),
            3 => MemoArg::from(self.paging_type),
            _ => MemoArg::Absent,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveArgs {
    pub num: i32,
    pub next: Option<String>,
    pub paging_type: i32,
    pub resource_id: String,
    pub resource_type: String,
    pub next_token: Option<String>,
}

impl MemoArgs for LiveArgs {
    fn memo_arg(&self, index: usize) -> MemoArg {
        match index {
            0 => MemoArg::from(self.num),
            1 => MemoArg::from(self.next.as_ref()),
            2 => MemoArg::from(self.paging_type),
            3 => MemoArg::from(&self.resource_id),
            4 => MemoArg::from(self.next_token.as_ref()),
            _ => MemoArg::Absent,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelArgs {
    pub num: i32,
}

impl MemoArgs for ChannelArgs {
    fn memo_arg(&self, index: usize) -> MemoArg {
        match index {
            0 => MemoArg::from(self.num),
            _ => MemoArg::Absent,
        }
    }
}

/// Filters of a browse page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrowseArgs {
    pub browse_type: String,
    pub tab_id: String,
    pub num: i32,
    pub paging_type: i32,
    pub next: Option<String>,
    pub genres: Vec<String>,
    pub langs: Vec<String>,
    pub singers: Vec<String>,
    pub actors: Vec<String>,
    pub directors: Vec<String>,
    pub release_years: Vec<String>,
    pub sort_opt: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelatedArgs {
    pub interface: RelatedInterface,
    pub num: i32,
    pub next: Option<String>,
    pub paging_type: i32,
    pub filter_id: Option<String>,
    pub resource_type: String,
    pub resource_id: String,
}

// ============================================================================
// Recommendation service
// ============================================================================

/// Names of every tab that has data.
pub struct TabNames;

#[async_trait]
impl<C: RecoService> Endpoint<C> for TabNames {
    type Args = ();
    type Output = TabsList;

    fn interface(&self, _args: &()) -> &'static str {
        TABS_LIST_INTERFACE
    }

    async fn fetch(&self, client: &C, ctx: &RequestContext, _args: &()) -> Result<TabsList, OriginError> {
        let mut request = ctx.reco_request(TABS_LIST_INTERFACE);
        request.language_list = Vec::new();
        client.fetch_tabs(request).await
    }
}

/// Banners of one tab.
pub struct Banner;

#[async_trait]
impl<C: RecoService> Endpoint<C> for Banner {
    type Args = TabArgs;
    type Output = BannerList;

    fn interface(&self, _args: &TabArgs) -> &'static str {
        BANNER_INTERFACE
    }

    fn key_id(&self, args: &TabArgs) -> Option<String> {
        Some(args.tab_id.clone())
    }

    async fn fetch(&self, client: &C, ctx: &RequestContext, args: &TabArgs) -> Result<BannerList, OriginError> {
        let request = RecoRequest {
            card_id: Some(String::new()),
            r#type: Some(0),
            tab_id: Some(args.tab_id.clone()),
            ..ctx.reco_request(BANNER_INTERFACE)
        };
        client.fetch_banner(request).await
    }
}

/// Banners of a publisher detail page.
pub struct RelatedBanner;

#[async_trait]
impl<C: RecoService> Endpoint<C> for RelatedBanner {
    type Args = ResourceArgs;
    type Output = BannerList;

    fn interface(&self, _args: &ResourceArgs) -> &'static str {
        RELATED_BANNER_INTERFACE
    }

    async fn fetch(
        &self,
        client: &C,
        ctx: &RequestContext,
        args: &ResourceArgs,
    ) -> Result<BannerList, OriginError> {
        let request = RecoRequest {
            card_id: Some(String::new()),
            r#type: Some(0),
            resource_type: Some(args.resource_type.clone()),
            resource_id: Some(args.resource_id.clone()),
            ..ctx.reco_request(RELATED_BANNER_INTERFACE)
        };
        client.fetch_banner(request).await
    }
}

/// One page of tabs.
pub struct TabsPage;

#[async_trait]
impl<C: RecoService> Endpoint<C> for TabsPage {
    type Args = TabsArgs;
    type Output = Option<Tabs>;

    fn interface(&self, _args: &TabsArgs) -> &'static str {
        TABS_INTERFACE
    }

    fn key_id(&self, args: &TabsArgs) -> Option<String> {
        Some(args.tab_id.clone())
    }

    async fn fetch(&self, client: &C, ctx: &RequestContext, args: &TabsArgs) -> Result<Option<Tabs>, OriginError> {
        let request = RecoRequest {
            tab_id: Some(args.tab_id.clone()),
            num: Some(args.num),
            next_token: args.next_token.clone(),
            ..ctx.reco_request(TABS_INTERFACE)
        };
        let list = client.fetch_tabs(request).await?;
        Ok(list.items.into_iter().next())
    }
}

/// Recommended cards of one card slot.
pub struct CardList {
    interface: &'static str,
}

impl CardList {
    pub fn normal() -> Self {
        Self {
            interface: CARD_LIST_INTERFACE,
        }
    }

    /// Cards of the buzz tab, served by the null-card interface.
    pub fn null_card() -> Self {
        Self {
            interface: NULL_CARD_LIST_INTERFACE,
        }
    }
}

#[async_trait]
impl<C: RecoService> Endpoint<C> for CardList {
    type Args = CardArgs;
    type Output = Option<RecoResponse>;

    fn interface(&self, _args: &CardArgs) -> &'static str {
        self.interface
    }

    fn key_id(&self, args: &CardArgs) -> Option<String> {
        Some(args.card_id.clone())
    }

    async fn fetch(
        &self,
        client: &C,
        ctx: &RequestContext,
        args: &CardArgs,
    ) -> Result<Option<RecoResponse>, OriginError> {
        let request = RecoRequest {
            card_id: Some(args.card_id.clone()),
            tab_id: Some(args.tab_id.clone()),
            num: Some(args.num),
            final_id: args.next.clone(),
            r#type: Some(args.paging_type),
            ..ctx.reco_request(self.interface)
        };
        Ok(non_empty(client.recommend(request).await?))
    }
}

/// Programmes of one live channel.
pub struct LiveTvPrograms;

#[async_trait]
impl<C: RecoService> Endpoint<C> for LiveTvPrograms {
    type Args = LiveArgs;
    type Output = Option<RecoResponse>;

    fn interface(&self, _args: &LiveArgs) -> &'static str {
        LIVE_CARD_INTERFACE
    }

    fn key_id(&self, args: &LiveArgs) -> Option<String> {
        Some(args.resource_id.clone())
    }

    async fn fetch(
        &self,
        client: &C,
        ctx: &RequestContext,
        args: &LiveArgs,
    ) -> Result<Option<RecoResponse>, OriginError> {
        let request = RecoRequest {
            num: Some(args.num),
            final_id: args.next.clone(),
            r#type: Some(args.paging_type),
            next_token: args.next_token.clone(),
            resource_id: Some(args.resource_id.clone()),
            resource_type: Some(args.resource_type.clone()),
            ..ctx.reco_request(LIVE_CARD_INTERFACE)
        };
        Ok(non_empty(client.recommend(request).await?))
    }
}

pub struct AllLiveChannels;

#[async_trait]
impl<C: RecoService> Endpoint<C> for AllLiveChannels {
    type Args = ChannelArgs;
    type Output = Option<RecoResponse>;

    fn interface(&self, _args: &ChannelArgs) -> &'static str {
        ALL_LIVE_CHANNELS_INTERFACE
    }

    async fn fetch(
        &self,
        client: &C,
        ctx: &RequestContext,
        args: &ChannelArgs,
    ) -> Result<Option<RecoResponse>, OriginError> {
        let request = RecoRequest {
            num: Some(args.num),
            r#type: Some(0),
            ..ctx.reco_request(ALL_LIVE_CHANNELS_INTERFACE)
        };
        Ok(non_empty(client.recommend(request).await?))
    }
}

pub struct BrowseList;

#[async_trait]
impl<C: RecoService> Endpoint<C> for BrowseList {
    type Args = BrowseArgs;
    type Output = Option<RecoResponse>;

    fn interface(&self, _args: &BrowseArgs) -> &'static str {
        BROWSE_ITEMS_INTERFACE
    }

    fn key_id(&self, args: &BrowseArgs) -> Option<String> {
        Some(args.browse_type.clone())
    }

    async fn fetch(
        &self,
        client: &C,
        ctx: &RequestContext,
        args: &BrowseArgs,
    ) -> Result<Option<RecoResponse>, OriginError> {
        let request = RecoRequest {
            tab_id: Some(args.tab_id.clone()),
            resource_type: Some(args.browse_type.clone()),
            num: Some(args.num),
            r#type: Some(args.paging_type),
            final_id: args.next.clone(),
            genres: args.genres.clone(),
            browse_langs: args.langs.clone(),
            singers: args.singers.clone(),
            actors: args.actors.clone(),
            directors: args.directors.clone(),
            release_years: args.release_years.clone(),
            sort_opt: args.sort_opt.clone(),
            ..ctx.reco_request(BROWSE_ITEMS_INTERFACE)
        };
        Ok(non_empty(client.recommend(request).await?))
    }
}

/// Any of the related-content interfaces.
pub struct Related;

#[async_trait]
impl<C: RecoService> Endpoint<C> for Related {
    type Args = RelatedArgs;
    type Output = RecoResponse;

    fn interface(&self, args: &RelatedArgs) -> &'static str {
        args.interface.name()
    }

    async fn fetch(
        &self,
        client: &C,
        ctx: &RequestContext,
        args: &RelatedArgs,
    ) -> Result<RecoResponse, OriginError> {
        let request = RecoRequest {
            num: Some(args.num),
            final_id: args.next.clone(),
            r#type: Some(args.paging_type),
            filter_id: args.filter_id.clone(),
            resource_type: Some(args.resource_type.clone()),
            resource_id: Some(args.resource_id.clone()),
            ..ctx.reco_request(args.interface.name())
        };
        client.recommend(request).await
    }
}

// ============================================================================
// Detail-information service
// ============================================================================

/// Residual detail fetch. The single-id entry point uses the one-object
/// call, every batch goes through `getDetail` whatever its size.
pub struct GetDetail;

#[async_trait]
impl<C: DiService> Endpoint<C> for GetDetail {
    type Args = DetailArgs;
    type Output = DiResponse;

    fn interface(&self, args: &DetailArgs) -> &'static str {
        match args {
            DetailArgs::One { .. } => methods::GET_ONE_DETAIL,
            DetailArgs::Group(_) => methods::GET_DETAIL,
        }
    }

    async fn fetch(
        &self,
        client: &C,
        ctx: &RequestContext,
        args: &DetailArgs,
    ) -> Result<DiResponse, OriginError> {
        match args {
            DetailArgs::One { kind_code, id } => {
                let request = DiOneRequest {
                    r#type: *kind_code,
                    id: id.clone(),
                    language_id: ctx.lang.clone(),
                    service_name: None,
                    time_sign: time_sign(),
                    log_id: ctx.log_id.clone(),
                };
                client.get_one_detail(request).await
            }
            DetailArgs::Group(idts) => {
                let request = DiRequest {
                    ids_with_types: idts.clone(),
                    service_name: None,
                    time_sign: time_sign(),
                    log_id: ctx.log_id.clone(),
                };
                client.get_detail(request).await
            }
        }
    }
}
