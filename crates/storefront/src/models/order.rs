//! Order domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use greengrocer_core::{OrderId, OrderStatus, PaymentMethod, Price, Quantity, UserId};

use super::{Address, CartItem};

/// A persisted line item. Price and product id are not kept on the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub name: String,
    pub quantity: Quantity,
}

impl From<&CartItem> for OrderLine {
    fn from(item: &CartItem) -> Self {
        Self {
            name: item.name.clone(),
            quantity: item.quantity,
        }
    }
}

/// A placed order.
///
/// Written exactly once by the checkout workflow and never mutated by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    /// Creation timestamp.
    pub date: DateTime<Utc>,
    pub status: OrderStatus,
    pub items: Vec<OrderLine>,
    /// Σ price × quantity at placement time.
    pub total: Price,
    /// Embedded copy of the address, not a reference.
    pub shipping_address: Address,
    pub payment_method: PaymentMethod,
}

impl Order {
    /// Sort orders newest first.
    pub fn sort_newest_first(orders: &mut [Self]) {
        orders.sort_by(|a, b| b.date.cmp(&a.date));
    }
}
