//! Order storage boundary.
//!
//! The production store lives in an external backend-as-a-service; this
//! trait is the seam the core reads through. The single-order read is keyed
//! by `(order_id, user_id)` so that ownership is enforced by the read
//! itself; callers downstream of a successful load never re-check
//! authorization.

use async_trait::async_trait;

use crate::errors::OrderStoreResult;
use crate::order::OrderAggregate;
use crate::types::{OrderId, UserId};

/// Read access to assembled order aggregates.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Load one order, including its items and shipments, if it exists and
    /// belongs to `user_id`.
    ///
    /// A missing order and an order owned by someone else are
    /// indistinguishable to the caller: both are `Ok(None)`.
    async fn load_order(
        &self,
        order_id: OrderId,
        user_id: UserId,
    ) -> OrderStoreResult<Option<OrderAggregate>>;

    /// List all orders belonging to `user_id`, newest first.
    async fn list_orders(&self, user_id: UserId) -> OrderStoreResult<Vec<OrderAggregate>>;
}
