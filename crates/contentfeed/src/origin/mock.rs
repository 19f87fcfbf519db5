//! Counting in-process origin for tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use contentfeed_core::model::rpc::methods;
use contentfeed_core::model::{
    BannerList, DiOneRequest, DiRequest, DiResponse, IdsWithType, RecoRequest, RecoResponse,
    TabsList,
};
use contentfeed_core::registry::DetailItem;

use super::{Connector, DiService, OriginClient, OriginError, RecoService};

#[derive(Default)]
pub(crate) struct MockOrigin {
    pub connects: AtomicUsize,
    pub closes: AtomicUsize,
    pub calls: AtomicUsize,
    down: AtomicBool,
    fail_calls: AtomicBool,
    delay: Mutex<Option<Duration>>,
    tabs: Mutex<TabsList>,
    banners: Mutex<BannerList>,
    reco: Mutex<RecoResponse>,
    catalog: Mutex<Vec<DetailItem>>,
    reco_requests: Mutex<Vec<RecoRequest>>,
    detail_requests: Mutex<Vec<(&'static str, Vec<IdsWithType>)>>,
}

impl MockOrigin {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Refuses every connection.
    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    /// Accepts connections but fails every call.
    pub fn set_failing(&self, failing: bool) {
        self.fail_calls.store(failing, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn set_tabs(&self, tabs: TabsList) {
        *self.tabs.lock().unwrap() = tabs;
    }

    pub fn set_banners(&self, banners: BannerList) {
        *self.banners.lock().unwrap() = banners;
    }

    pub fn set_reco(&self, reco: RecoResponse) {
        *self.reco.lock().unwrap() = reco;
    }

    pub fn add_detail(&self, item: DetailItem) {
        self.catalog.lock().unwrap().push(item);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn reco_requests(&self) -> Vec<RecoRequest> {
        self.reco_requests.lock().unwrap().clone()
    }

    /// Every detail call as `(method, ids)`, in call order.
    pub fn detail_requests(&self) -> Vec<(&'static str, Vec<IdsWithType>)> {
        self.detail_requests.lock().unwrap().clone()
    }

    async fn enter(&self) -> Result<(), OriginError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_calls.load(Ordering::SeqCst) {
            return Err(OriginError::Remote("mock failure".to_string()));
        }
        Ok(())
    }

    fn lookup(&self, requested: &[IdsWithType]) -> DiResponse {
        let catalog = self.catalog.lock().unwrap();
        let mut response = DiResponse::with_types(requested.iter().map(|idt| idt.r#type).collect());
        for idt in requested {
            for id in &idt.ids {
                if let Some(item) = catalog
                    .iter()
                    .find(|item| item.kind().code() == idt.r#type && &item.id() == id)
                {
                    response.push(item.clone());
                }
            }
        }
        response
    }
}

pub(crate) struct MockConnector(pub Arc<MockOrigin>);

#[async_trait]
impl Connector for MockConnector {
    type Client = MockClient;

    async fn connect(&self) -> Result<MockClient, OriginError> {
        self.0.connects.fetch_add(1, Ordering::SeqCst);
        if self.0.down.load(Ordering::SeqCst) {
            return Err(OriginError::Connect {
                addr: "mock".to_string(),
                reason: "connection refused".to_string(),
            });
        }
        Ok(MockClient(self.0.clone()))
    }
}

pub(crate) struct MockClient(Arc<MockOrigin>);

#[async_trait]
impl OriginClient for MockClient {
    async fn close(&mut self) {
        self.0.closes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl RecoService for MockClient {
    async fn fetch_tabs(&self, request: RecoRequest) -> Result<TabsList, OriginError> {
        self.0.enter().await?;
        self.0.reco_requests.lock().unwrap().push(request);
        Ok(self.0.tabs.lock().unwrap().clone())
    }

    async fn fetch_banner(&self, request: RecoRequest) -> Result<BannerList, OriginError> {
        self.0.enter().await?;
        self.0.reco_requests.lock().unwrap().push(request);
        Ok(self.0.banners.lock().unwrap().clone())
    }

    async fn recommend(&self, request: RecoRequest) -> Result<RecoResponse, OriginError> {
        self.0.enter().await?;
        self.0.reco_requests.lock().unwrap().push(request);
        Ok(self.0.reco.lock().unwrap().clone())
    }
}

#[async_trait]
impl DiService for MockClient {
    async fn get_detail(&self, request: DiRequest) -> Result<DiResponse, OriginError> {
        self.0.enter().await?;
        self.0
            .detail_requests
            .lock()
            .unwrap()
            .push((methods::GET_DETAIL, request.ids_with_types.clone()));
        Ok(self.0.lookup(&request.ids_with_types))
    }

    async fn get_one_detail(&self, request: DiOneRequest) -> Result<DiResponse, OriginError> {
        self.0.enter().await?;
        let requested = vec![IdsWithType::new(request.r#type, vec![request.id])];
        self.0
            .detail_requests
            .lock()
            .unwrap()
            .push((methods::GET_ONE_DETAIL, requested.clone()));
        Ok(self.0.lookup(&requested))
    }
}
