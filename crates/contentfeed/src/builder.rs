//! Resource aggregation: detail records merged with ranking metadata and
//! per-user actions into user-facing resource objects.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use futures_util::future::join_all;
use serde_json::Map;

use contentfeed_core::model::IdsWithType;
use contentfeed_core::registry::{ResourceKind, ResourceVariant};
use contentfeed_core::resource::{RecRecord, ResourceObject, UaKind, UaRequest, UserAction};
use contentfeed_core::RequestContext;

use crate::content::ContentService;
use crate::user_actions::UserActionService;

type ActionMap = HashMap<(i32, String), BTreeMap<UaKind, UserAction>>;

/// Groups record ids by type, in first-seen order, without duplicates.
fn group_ids(records: &[RecRecord]) -> Vec<IdsWithType> {
    let mut idts: Vec<IdsWithType> = Vec::new();
    for record in records {
        match idts.iter_mut().find(|idt| idt.r#type == record.kind_code) {
            Some(idt) if idt.ids.contains(&record.id) => {}
            Some(idt) => idt.ids.push(record.id.clone()),
            None => idts.push(IdsWithType::new(record.kind_code, vec![record.id.clone()])),
        }
    }
    idts
}

pub struct ResourceBuilder {
    content: Arc<ContentService>,
    user_actions: Arc<dyn UserActionService>,
}

impl ResourceBuilder {
    pub fn new(content: Arc<ContentService>, user_actions: Arc<dyn UserActionService>) -> Self {
        Self {
            content,
            user_actions,
        }
    }

    /// Builds one resource per resolvable record, keyed by id.
    ///
    /// Records whose detail is missing from both the cache and the origin
    /// are left out.
    pub async fn group_build(
        &self,
        ctx: &RequestContext,
        records: &[RecRecord],
    ) -> HashMap<String, ResourceObject> {
        let idts = group_ids(records);
        if idts.is_empty() {
            return HashMap::new();
        }

        let (details, actions) = tokio::join!(
            self.content.details(ctx, idts),
            self.group_actions(ctx, records)
        );
        let Some(details) = details.into_value() else {
            tracing::warn!(log_id = %ctx.log_id, records = records.len(), "No details for group build");
            return HashMap::new();
        };

        let by_slot: HashMap<(i32, &str), &RecRecord> = records
            .iter()
            .map(|record| ((record.kind_code, record.id.as_str()), record))
            .collect();

        let mut resources = HashMap::new();
        for code in &details.type_list {
            let Some(kind) = ResourceKind::from_code(*code) else {
                continue;
            };
            let variant = ResourceVariant::select(kind, ctx.app_version);
            for item in details.items(kind) {
                let id = item.id();
                let Some(record) = by_slot.get(&(*code, id.as_str())) else {
                    continue;
                };
                let mut resource = ResourceObject::new(kind, variant);
                resource.fill_detail(&item);
                resource.fill_context(
                    record.result.as_ref(),
                    actions.get(&(*code, id.clone())),
                    &record.extra,
                );
                resources.insert(id, resource);
            }
        }
        resources
    }

    /// Builds the detail page resource of one item, or `None` if the api
    /// type is unknown or the detail cannot be resolved.
    pub async fn profile_build(
        &self,
        ctx: &RequestContext,
        api_type: &str,
        id: &str,
    ) -> Option<ResourceObject> {
        let Some(kind) = ResourceKind::from_api_type(api_type) else {
            tracing::debug!(log_id = %ctx.log_id, api_type = %api_type, "Unknown api type");
            return None;
        };

        let (detail, actions) = tokio::join!(
            self.content.one_detail(ctx, kind.code(), id),
            self.profile_actions(ctx, kind, id)
        );
        let item = detail
            .into_value()?
            .items(kind)
            .into_iter()
            .find(|item| item.id() == id)?;

        let mut resource = ResourceObject::new(kind, ResourceVariant::select(kind, ctx.app_version));
        resource.fill_detail(&item);
        resource.fill_context(None, Some(&actions), &Map::new());
        Some(resource)
    }

    /// Known actions are taken as given; the rest are looked up in one
    /// batch per action family.
    async fn group_actions(&self, ctx: &RequestContext, records: &[RecRecord]) -> ActionMap {
        let mut resolved = ActionMap::new();
        let mut pending: BTreeMap<UaKind, Vec<(i32, String)>> = BTreeMap::new();

        for record in records {
            for (kind, request) in &record.user_actions {
                match request {
                    UaRequest::Known(action) => {
                        resolved
                            .entry((record.kind_code, record.id.clone()))
                            .or_default()
                            .insert(*kind, action.clone());
                    }
                    UaRequest::Fetch => pending
                        .entry(*kind)
                        .or_default()
                        .push((record.kind_code, record.id.clone())),
                }
            }
        }
        if pending.is_empty() || ctx.user_id.is_empty() {
            return resolved;
        }

        let lookups = pending.into_iter().map(|(kind, slots)| async move {
            let ids: Vec<String> = slots.iter().map(|(_, id)| id.clone()).collect();
            let found = self.user_actions.lookup_many(&ctx.user_id, kind, &ids).await;
            (kind, slots, found)
        });
        for (kind, slots, found) in join_all(lookups).await {
            let found = match found {
                Ok(found) => found,
                Err(err) => {
                    tracing::warn!(log_id = %ctx.log_id, kind = ?kind, error = %err, "User action lookup failed");
                    continue;
                }
            };
            for (slot, action) in slots.into_iter().zip(found) {
                if let Some(action) = action {
                    resolved.entry(slot).or_default().insert(kind, action);
                }
            }
        }
        resolved
    }

    async fn profile_actions(
        &self,
        ctx: &RequestContext,
        kind: ResourceKind,
        id: &str,
    ) -> BTreeMap<UaKind, UserAction> {
        if ctx.user_id.is_empty() {
            return BTreeMap::new();
        }
        let lookups = kind.detail_user_actions().iter().map(|ua| async move {
            let found = self
                .user_actions
                .lookup_one(&ctx.user_id, *ua, kind.code(), id)
                .await;
            (*ua, found)
        });

        let mut actions = BTreeMap::new();
        for (ua, found) in join_all(lookups).await {
            match found {
                Ok(Some(action)) => {
                    actions.insert(ua, action);
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(log_id = %ctx.log_id, kind = ?ua, error = %err, "User action lookup failed")
                }
            }
        }
        actions
    }
}
