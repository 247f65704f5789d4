//! The order aggregate: an `Order` together with its owned `OrderItem` and
//! `Shipment` records, read as a unit.
//!
//! Orders and their items are created once at checkout by an external system
//! and are read-only here; only `Shipment::status` moves afterwards, written
//! by the external fulfillment process. Ownership is by foreign key in
//! storage; the fetch boundary hands this module an already-assembled
//! [`OrderAggregate`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{Money, OrderId, OrderNumber, ProductId, ProductName, Quantity};

/// Lifecycle status of an order.
///
/// A finite, non-cyclic progression. `Cancelled` is reachable from any
/// non-terminal state; nothing leaves `Delivered` or `Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order placed, awaiting confirmation
    Pending,
    /// Order confirmed by the vendor
    Confirmed,
    /// Order is being prepared
    Processing,
    /// Order handed to a carrier
    Shipped,
    /// Order received by the customer
    Delivered,
    /// Order cancelled before delivery
    Cancelled,
}

impl OrderStatus {
    /// Stored wire form of the status (snake_case, matching the order rows).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether the status admits no further transitions.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether `next` is a legal successor of this status.
    pub fn can_transition_to(self, next: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        if next == Self::Cancelled {
            return true;
        }
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed)
                | (Self::Confirmed, Self::Processing)
                | (Self::Processing, Self::Shipped)
                | (Self::Shipped, Self::Delivered)
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fulfillment stage of a shipment, driving the five-step progress
/// indicator in the order history view.
///
/// The data model does not enforce forward-only transitions; this type
/// renders whatever the fulfillment process last wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    /// Shipment is being packed
    Preparing,
    /// Handed over to the carrier
    Dispatched,
    /// Moving through the carrier network
    InTransit,
    /// On the delivery vehicle
    OutForDelivery,
    /// Delivered to the customer
    Delivered,
}

impl ShipmentStatus {
    /// All stages in progression order.
    pub const STAGES: [Self; 5] = [
        Self::Preparing,
        Self::Dispatched,
        Self::InTransit,
        Self::OutForDelivery,
        Self::Delivered,
    ];

    /// Zero-based position of this stage in [`Self::STAGES`].
    pub fn progress_index(self) -> usize {
        Self::STAGES
            .iter()
            .position(|stage| *stage == self)
            .unwrap_or(0)
    }

    /// Human-readable stage label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Preparing => "Preparing",
            Self::Dispatched => "Dispatched",
            Self::InTransit => "In Transit",
            Self::OutForDelivery => "Out for Delivery",
            Self::Delivered => "Delivered",
        }
    }
}

/// Free-text shipping address captured at checkout.
///
/// Every field is end-user-supplied and untrusted; each must be escaped
/// independently before embedding in markup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    /// Recipient name
    #[serde(default)]
    pub name: Option<String>,
    /// Street address
    #[serde(default)]
    pub address: Option<String>,
    /// City
    #[serde(default)]
    pub city: Option<String>,
    /// State
    #[serde(default)]
    pub state: Option<String>,
    /// Postal code
    #[serde(default)]
    pub pincode: Option<String>,
    /// Contact phone number
    #[serde(default)]
    pub phone: Option<String>,
}

/// One purchased line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Row identifier
    pub id: Uuid,
    /// Catalogue product this line refers to
    pub product_id: ProductId,
    /// Product name at time of purchase (untrusted text)
    pub product_name: ProductName,
    /// Units purchased
    pub quantity: Quantity,
    /// Price per unit at time of purchase
    pub unit_price: Money,
    /// Stored line total. Callers expect `quantity × unit_price` but the
    /// invariant is not enforced here; [`Self::line_total`] recomputes it.
    pub total_price: Money,
}

impl OrderItem {
    /// Recompute the line total from quantity and unit price.
    pub fn line_total(&self) -> Result<Money, crate::types::DomainError> {
        self.unit_price.multiply_by_quantity(self.quantity)
    }
}

/// A shipment attached to an order; zero or one per order in current scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    /// Row identifier
    pub id: Uuid,
    /// Carrier name, if assigned
    #[serde(default)]
    pub carrier: Option<String>,
    /// Carrier tracking number, if assigned
    #[serde(default)]
    pub tracking_number: Option<String>,
    /// Current fulfillment stage
    pub status: ShipmentStatus,
    /// When the shipment left the warehouse
    #[serde(default)]
    pub shipped_at: Option<DateTime<Utc>>,
    /// Carrier's delivery estimate
    #[serde(default)]
    pub estimated_delivery: Option<NaiveDate>,
    /// When the shipment was delivered
    #[serde(default)]
    pub delivered_at: Option<DateTime<Utc>>,
}

/// A completed purchase as stored by the external checkout system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Unique identifier
    pub id: OrderId,
    /// Human-readable order number, e.g. `SA-1001`
    pub order_number: OrderNumber,
    /// Current lifecycle status
    pub status: OrderStatus,
    /// Sum of line totals
    #[serde(default)]
    pub subtotal: Money,
    /// Shipping cost
    #[serde(default)]
    pub shipping_cost: Money,
    /// Tax (GST)
    #[serde(default)]
    pub tax: Money,
    /// Grand total
    #[serde(default)]
    pub total: Money,
    /// Shipping address captured at checkout
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    /// Promised delivery date, if any
    #[serde(default)]
    pub expected_delivery: Option<NaiveDate>,
    /// When the order was placed
    pub created_at: DateTime<Utc>,
}

/// An [`Order`] joined with its owned items and shipments.
///
/// The aggregate is assembled by the fetch boundary in a single read keyed
/// by `(order_id, requesting_user_id)`; by the time a value of this type
/// exists, ownership has already been verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAggregate {
    /// The order row
    pub order: Order,
    /// Purchased lines, created atomically with the order
    pub items: Vec<OrderItem>,
    /// Attached shipments
    pub shipments: Vec<Shipment>,
}

impl OrderAggregate {
    /// Number of purchased lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Sort aggregates newest-first for the order history listing.
    pub fn sort_newest_first(orders: &mut [Self]) {
        orders.sort_by(|a, b| b.order.created_at.cmp(&a.order.created_at));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn order_with(created_at: DateTime<Utc>, number: &str) -> OrderAggregate {
        OrderAggregate {
            order: Order {
                id: OrderId::new(),
                order_number: OrderNumber::try_new(number.to_string()).unwrap(),
                status: OrderStatus::Pending,
                subtotal: Money::default(),
                shipping_cost: Money::default(),
                tax: Money::default(),
                total: Money::default(),
                shipping_address: None,
                expected_delivery: None,
                created_at,
            },
            items: vec![],
            shipments: vec![],
        }
    }

    #[test]
    fn test_forward_progression_is_legal() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Confirmed));
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::Processing));
        assert!(OrderStatus::Processing.can_transition_to(OrderStatus::Shipped));
        assert!(OrderStatus::Shipped.can_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn test_no_skipping_or_reversing_states() {
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Shipped));
        assert!(!OrderStatus::Shipped.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Confirmed.can_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn test_cancel_reachable_from_any_non_terminal_state() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Processing,
            OrderStatus::Shipped,
        ] {
            assert!(status.can_transition_to(OrderStatus::Cancelled));
        }
    }

    #[test]
    fn test_terminal_states_admit_nothing() {
        for next in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert!(!OrderStatus::Delivered.can_transition_to(next));
            assert!(!OrderStatus::Cancelled.can_transition_to(next));
        }
    }

    #[test]
    fn test_status_wire_form_is_snake_case() {
        let json = serde_json::to_string(&OrderStatus::Processing).unwrap();
        assert_eq!(json, "\"processing\"");
        let back: OrderStatus = serde_json::from_str("\"shipped\"").unwrap();
        assert_eq!(back, OrderStatus::Shipped);
        let stage: ShipmentStatus = serde_json::from_str("\"out_for_delivery\"").unwrap();
        assert_eq!(stage, ShipmentStatus::OutForDelivery);
    }

    #[test]
    fn test_shipment_progress_index_follows_stage_order() {
        assert_eq!(ShipmentStatus::Preparing.progress_index(), 0);
        assert_eq!(ShipmentStatus::Dispatched.progress_index(), 1);
        assert_eq!(ShipmentStatus::InTransit.progress_index(), 2);
        assert_eq!(ShipmentStatus::OutForDelivery.progress_index(), 3);
        assert_eq!(ShipmentStatus::Delivered.progress_index(), 4);
    }

    #[test]
    fn test_line_total_recomputes_from_parts() {
        let item = OrderItem {
            id: Uuid::now_v7(),
            product_id: ProductId::try_new("truenav-pro".to_string()).unwrap(),
            product_name: ProductName::try_new("TrueNav-Pro".to_string()).unwrap(),
            quantity: Quantity::new(3).unwrap(),
            unit_price: Money::from_paise(1000).unwrap(),
            total_price: Money::from_paise(3000).unwrap(),
        };
        assert_eq!(item.line_total().unwrap(), item.total_price);
    }

    #[test]
    fn test_history_listing_is_newest_first() {
        let older = Utc.with_ymd_and_hms(2025, 1, 10, 9, 0, 0).unwrap();
        let newer = Utc.with_ymd_and_hms(2025, 3, 2, 16, 30, 0).unwrap();
        let mut orders = vec![order_with(older, "SA-1001"), order_with(newer, "SA-1002")];

        OrderAggregate::sort_newest_first(&mut orders);

        assert_eq!(orders[0].order.order_number.as_ref(), "SA-1002");
        assert_eq!(orders[1].order.order_number.as_ref(), "SA-1001");
    }
}
