//! In-memory adapters for the storefront.
//!
//! This crate provides in-memory implementations of the `OrderStore` and
//! `SessionProvider` traits from the storefront crate, useful for testing
//! and development scenarios where the real backend is not available.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use storefront::errors::OrderStoreResult;
use storefront::order::OrderAggregate;
use storefront::session::{ListenerRegistry, Session, SessionListener, SessionProvider, SubscriptionId};
use storefront::store::OrderStore;
use storefront::types::{OrderId, UserId};

/// Thread-safe in-memory order store for testing.
///
/// Rows are keyed by order id and tagged with their owner; reads reproduce
/// the production store's behavior of never distinguishing a missing order
/// from one owned by another user.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<OrderId, (UserId, OrderAggregate)>>>,
}

impl InMemoryOrderStore {
    /// Create a new empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an order aggregate owned by `user_id`.
    ///
    /// Replaces any existing row with the same order id.
    pub fn insert(&self, user_id: UserId, aggregate: OrderAggregate) {
        let mut orders = self.orders.write().expect("RwLock poisoned");
        orders.insert(aggregate.order.id, (user_id, aggregate));
    }

    /// Number of stored orders across all users.
    pub fn len(&self) -> usize {
        self.orders.read().expect("RwLock poisoned").len()
    }

    /// Whether the store holds no orders.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn load_order(
        &self,
        order_id: OrderId,
        user_id: UserId,
    ) -> OrderStoreResult<Option<OrderAggregate>> {
        let orders = self.orders.read().expect("RwLock poisoned");
        let found = orders
            .get(&order_id)
            .filter(|(owner, _)| *owner == user_id)
            .map(|(_, aggregate)| aggregate.clone());
        tracing::debug!(%order_id, found = found.is_some(), "order lookup");
        Ok(found)
    }

    async fn list_orders(&self, user_id: UserId) -> OrderStoreResult<Vec<OrderAggregate>> {
        let orders = self.orders.read().expect("RwLock poisoned");
        let mut owned: Vec<OrderAggregate> = orders
            .values()
            .filter(|(owner, _)| *owner == user_id)
            .map(|(_, aggregate)| aggregate.clone())
            .collect();
        OrderAggregate::sort_newest_first(&mut owned);
        Ok(owned)
    }
}

/// In-memory session provider for testing.
///
/// Holds at most one session and fans change notifications out to
/// registered listeners, the way the real auth client's state listener
/// behaves.
#[derive(Default)]
pub struct InMemorySessionProvider {
    session: RwLock<Option<Session>>,
    listeners: ListenerRegistry,
}

impl InMemorySessionProvider {
    /// Create a provider with no established session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Establish or clear the session, notifying listeners.
    pub fn set_session(&self, session: Option<Session>) {
        *self.session.write().expect("RwLock poisoned") = session.clone();
        self.listeners.notify(session.as_ref());
    }
}

impl SessionProvider for InMemorySessionProvider {
    fn current_session(&self) -> Option<Session> {
        self.session.read().expect("RwLock poisoned").clone()
    }

    fn subscribe(&self, listener: SessionListener) -> SubscriptionId {
        self.listeners.register(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners.remove(id);
    }
}
