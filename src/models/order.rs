use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle stage of an order. The delivery chain runs
/// `pending -> confirmed -> picked_up -> delivered`; `expired` is the
/// terminal branch for orders no dasher ever claimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    PickedUp,
    Delivered,
    Expired,
}

impl OrderStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(OrderStatus::Pending),
            "confirmed" => Some(OrderStatus::Confirmed),
            "picked_up" => Some(OrderStatus::PickedUp),
            "delivered" => Some(OrderStatus::Delivered),
            "expired" => Some(OrderStatus::Expired),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::PickedUp => "picked_up",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Expired => "expired",
        }
    }

    /// Statuses a dasher may report through the update endpoints.
    pub fn dasher_reportable(&self) -> bool {
        matches!(
            self,
            OrderStatus::Confirmed | OrderStatus::PickedUp | OrderStatus::Delivered
        )
    }

    /// Whether moving to `next` strictly advances the delivery chain.
    /// `delivered` and `expired` are terminal.
    pub fn can_advance_to(&self, next: OrderStatus) -> bool {
        match (self.chain_position(), next.chain_position()) {
            (Some(current), Some(next)) => next > current,
            _ => false,
        }
    }

    fn chain_position(&self) -> Option<u8> {
        match self {
            OrderStatus::Pending => Some(0),
            OrderStatus::Confirmed => Some(1),
            OrderStatus::PickedUp => Some(2),
            OrderStatus::Delivered => Some(3),
            OrderStatus::Expired => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A line item owned by exactly one order; persisted atomically with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub category: Option<String>,
    pub quantity: u32,
    pub price: f64,
    pub special_instructions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub delivery_address: String,
    pub pickup_location: String,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub special_instructions: Option<String>,
    pub status: OrderStatus,
    /// The single assignee reference; dasher contact details are resolved
    /// through the dasher record, never denormalized onto the order.
    pub dasher_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
}

/// Row shape returned when a dasher lists their orders.
#[derive(Debug, Clone, Serialize)]
pub struct OrderSummary {
    pub order_number: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub delivery_address: String,
    pub pickup_location: String,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
}

impl From<&Order> for OrderSummary {
    fn from(order: &Order) -> Self {
        Self {
            order_number: order.order_number.clone(),
            customer_name: order.customer_name.clone(),
            customer_phone: order.customer_phone.clone(),
            delivery_address: order.delivery_address.clone(),
            pickup_location: order.pickup_location.clone(),
            total_amount: order.total_amount,
            status: order.status,
            created_at: order.created_at,
            accepted_at: order.accepted_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::OrderStatus;

    #[test]
    fn parse_round_trips_every_status() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::PickedUp,
            OrderStatus::Delivered,
            OrderStatus::Expired,
        ] {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::parse("on_the_way"), None);
    }

    #[test]
    fn chain_only_moves_forward() {
        assert!(OrderStatus::Pending.can_advance_to(OrderStatus::Confirmed));
        assert!(OrderStatus::Confirmed.can_advance_to(OrderStatus::PickedUp));
        assert!(OrderStatus::Confirmed.can_advance_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Delivered.can_advance_to(OrderStatus::Confirmed));
        assert!(!OrderStatus::Confirmed.can_advance_to(OrderStatus::Confirmed));
        assert!(!OrderStatus::Expired.can_advance_to(OrderStatus::Confirmed));
        assert!(!OrderStatus::PickedUp.can_advance_to(OrderStatus::Expired));
    }
}
