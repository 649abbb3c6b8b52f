//! In-process implementation of [`StorefrontStore`].
//!
//! Used by tests and local demos. Writes are staged on copies of the current
//! state and swapped in only when every step succeeds, which gives the same
//! all-or-nothing behaviour as the `PostgreSQL` transaction. Failures can be
//! injected at fixed points inside the order batch.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use greengrocer_core::UserId;

use super::{OrderBatch, RepositoryError, StorefrontStore};
use crate::models::{Order, UserProfile};

/// Where an injected failure interrupts [`StorefrontStore::place_order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    /// After the order insert is staged, before the address append.
    AfterOrderInsert,
    /// After both writes are staged, before they are committed.
    BeforeCommit,
}

#[derive(Default)]
struct State {
    profiles: HashMap<UserId, UserProfile>,
    orders: Vec<Order>,
    fail_next_order_write: Option<FailPoint>,
    deny_writes: bool,
}

/// Shared in-memory store. Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
}

impl MemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with profiles.
    #[must_use]
    pub fn with_profiles(profiles: impl IntoIterator<Item = UserProfile>) -> Self {
        let state = State {
            profiles: profiles
                .into_iter()
                .map(|profile| (profile.uid.clone(), profile))
                .collect(),
            ..State::default()
        };
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Make the next `place_order` call fail at `point`.
    pub async fn fail_next_order_write(&self, point: FailPoint) {
        self.state.write().await.fail_next_order_write = Some(point);
    }

    /// Reject every write with `PermissionDenied` until turned off.
    pub async fn deny_writes(&self, deny: bool) {
        self.state.write().await.deny_writes = deny;
    }

    /// Snapshot of every stored order.
    pub async fn orders(&self) -> Vec<Order> {
        self.state.read().await.orders.clone()
    }

    /// Snapshot of a stored profile.
    pub async fn profile(&self, uid: &UserId) -> Option<UserProfile> {
        self.state.read().await.profiles.get(uid).cloned()
    }
}

fn injected(point: FailPoint) -> RepositoryError {
    RepositoryError::Unavailable(format!("injected failure at {point:?}"))
}

fn denied() -> RepositoryError {
    RepositoryError::PermissionDenied("writes are denied for this store".to_owned())
}

#[async_trait]
impl StorefrontStore for MemoryStore {
    async fn get_profile(&self, uid: &UserId) -> Result<Option<UserProfile>, RepositoryError> {
        Ok(self.state.read().await.profiles.get(uid).cloned())
    }

    async fn create_profile(&self, profile: &UserProfile) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        if state.deny_writes {
            return Err(denied());
        }
        if state.profiles.contains_key(&profile.uid) {
            return Err(RepositoryError::Conflict(format!(
                "profile {} already exists",
                profile.uid
            )));
        }
        state.profiles.insert(profile.uid.clone(), profile.clone());
        Ok(())
    }

    async fn update_display_name(
        &self,
        uid: &UserId,
        display_name: &str,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        if state.deny_writes {
            return Err(denied());
        }
        let profile = state
            .profiles
            .get_mut(uid)
            .ok_or(RepositoryError::NotFound)?;
        display_name.clone_into(&mut profile.display_name);
        Ok(())
    }

    async fn place_order(&self, batch: OrderBatch) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        if state.deny_writes {
            return Err(denied());
        }
        let fail_at = state.fail_next_order_write.take();
        let OrderBatch { order, new_address } = batch;
        let owner = order.user_id.clone();

        let mut staged_orders = state.orders.clone();
        staged_orders.push(order);
        if fail_at == Some(FailPoint::AfterOrderInsert) {
            return Err(injected(FailPoint::AfterOrderInsert));
        }

        let staged_profile = match new_address {
            Some(address) => {
                let mut profile = state
                    .profiles
                    .get(&owner)
                    .cloned()
                    .ok_or(RepositoryError::NotFound)?;
                profile.addresses.push(address);
                Some(profile)
            }
            None => None,
        };
        if fail_at == Some(FailPoint::BeforeCommit) {
            return Err(injected(FailPoint::BeforeCommit));
        }

        state.orders = staged_orders;
        if let Some(profile) = staged_profile {
            state.profiles.insert(owner, profile);
        }
        Ok(())
    }

    async fn list_orders(&self, uid: &UserId) -> Result<Vec<Order>, RepositoryError> {
        Ok(self
            .state
            .read()
            .await
            .orders
            .iter()
            .filter(|order| &order.user_id == uid)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
