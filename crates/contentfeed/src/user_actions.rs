//! Per-user action lookups (history, watchlist, subscriptions, thumbs).

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use thiserror::Error;

use contentfeed_core::resource::{UaKind, UserAction};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UserActionError {
    #[error("User action service unavailable: {0}")]
    Unavailable(String),
}

/// Resolves the action state of one user on resources.
#[async_trait]
pub trait UserActionService: Send + Sync {
    /// One answer per id, in id order. `None` means no recorded action.
    async fn lookup_many(
        &self,
        user_id: &str,
        kind: UaKind,
        ids: &[String],
    ) -> Result<Vec<Option<UserAction>>, UserActionError>;

    async fn lookup_one(
        &self,
        user_id: &str,
        kind: UaKind,
        kind_code: i32,
        id: &str,
    ) -> Result<Option<UserAction>, UserActionError>;
}

type ActionKey = (String, UaKind, String);

/// In-process action table.
#[derive(Debug, Default)]
pub struct StaticUserActions {
    actions: RwLock<HashMap<ActionKey, UserAction>>,
    lookups: AtomicUsize,
}

impl StaticUserActions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, user_id: &str, kind: UaKind, id: &str, action: UserAction) {
        let mut actions = match self.actions.write() {
            Ok(actions) => actions,
            Err(poisoned) => poisoned.into_inner(),
        };
        actions.insert((user_id.to_string(), kind, id.to_string()), action);
    }

    /// Number of lookup calls served so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn get(&self, user_id: &str, kind: UaKind, id: &str) -> Option<UserAction> {
        let actions = match self.actions.read() {
            Ok(actions) => actions,
            Err(poisoned) => poisoned.into_inner(),
        };
        actions
            .get(&(user_id.to_string(), kind, id.to_string()))
            .cloned()
    }
}

#[async_trait]
impl UserActionService for StaticUserActions {
    async fn lookup_many(
        &self,
        user_id: &str,
        kind: UaKind,
        ids: &[String],
    ) -> Result<Vec<Option<UserAction>>, UserActionError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(ids.iter().map(|id| self.get(user_id, kind, id)).collect())
    }

    async fn lookup_one(
        &self,
        user_id: &str,
        kind: UaKind,
        _kind_code: i32,
        id: &str,
    ) -> Result<Option<UserAction>, UserActionError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.get(user_id, kind, id))
    }
}
