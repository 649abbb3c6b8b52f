//! Order history read model.

use serde::Serialize;
use tracing::instrument;

use greengrocer_core::{OrderId, UserId};

use crate::db::{RepositoryError, StorefrontStore};
use crate::models::Order;

/// A shopper's past orders, newest first.
///
/// Serializes as `{"state":"empty"}` or `{"state":"orders","orders":[...]}`
/// so clients can tell "no orders yet" apart from a list still loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "orders", rename_all = "lowercase")]
pub enum OrderHistory {
    Empty,
    Orders(Vec<Order>),
}

impl OrderHistory {
    /// Sort and wrap a set of orders.
    #[must_use]
    pub fn from_orders(mut orders: Vec<Order>) -> Self {
        if orders.is_empty() {
            return Self::Empty;
        }
        Order::sort_newest_first(&mut orders);
        Self::Orders(orders)
    }

    #[must_use]
    pub fn orders(&self) -> &[Order] {
        match self {
            Self::Empty => &[],
            Self::Orders(orders) => orders,
        }
    }
}

/// Fetch every order owned by `uid`.
///
/// # Errors
///
/// Returns `RepositoryError` if the store query fails.
#[instrument(skip(store))]
pub async fn order_history(
    store: &dyn StorefrontStore,
    uid: &UserId,
) -> Result<OrderHistory, RepositoryError> {
    let orders = store.list_orders(uid).await?;
    Ok(OrderHistory::from_orders(orders))
}

/// Fetch one of `uid`'s orders, e.g. for an order confirmation.
///
/// Orders owned by anyone else are reported as absent.
///
/// # Errors
///
/// Returns `RepositoryError` if the store query fails.
#[instrument(skip(store))]
pub async fn find_order(
    store: &dyn StorefrontStore,
    uid: &UserId,
    order_id: &OrderId,
) -> Result<Option<Order>, RepositoryError> {
    let orders = store.list_orders(uid).await?;
    Ok(orders
        .into_iter()
        .find(|order| &order.id == order_id && &order.user_id == uid))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use greengrocer_core::{AddressId, OrderId, OrderStatus, PaymentMethod, Price, ZipCode};

    use super::*;
    use crate::db::{MemoryStore, OrderBatch};
    use crate::models::Address;

    fn order(id: &str, days_ago: i64) -> Order {
        let base = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        Order {
            id: OrderId::new(id),
            user_id: UserId::new("u1"),
            date: base - Duration::days(days_ago),
            status: OrderStatus::Processing,
            items: Vec::new(),
            total: Price::from_cents(1000),
            shipping_address: Address {
                id: AddressId::new("addr1"),
                street: "123 Market St".to_owned(),
                city: "Greenfield".to_owned(),
                state: "CA".to_owned(),
                zip: ZipCode::parse("90210").unwrap(),
                is_default: true,
            },
            payment_method: PaymentMethod::CashOnDelivery,
        }
    }

    #[test]
    fn test_empty_history_serializes_distinctly() {
        let json = serde_json::to_value(OrderHistory::from_orders(Vec::new())).unwrap();
        assert_eq!(json, serde_json::json!({ "state": "empty" }));
    }

    #[tokio::test]
    async fn test_history_is_newest_first() {
        let store = MemoryStore::new();
        for (id, days_ago) in [("o-old", 10), ("o-new", 1), ("o-mid", 5)] {
            store
                .place_order(OrderBatch {
                    order: order(id, days_ago),
                    new_address: None,
                })
                .await
                .unwrap();
        }

        let history = order_history(&store, &UserId::new("u1")).await.unwrap();
        let ids: Vec<_> = history.orders().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["o-new", "o-mid", "o-old"]);

        let json = serde_json::to_value(&history).unwrap();
        assert_eq!(json["state"], "orders");
        assert_eq!(json["orders"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_find_order_is_scoped_to_owner() {
        let store = MemoryStore::new();
        store
            .place_order(OrderBatch {
                order: order("o1", 1),
                new_address: None,
            })
            .await
            .unwrap();

        let owner = UserId::new("u1");
        let found = find_order(&store, &owner, &OrderId::new("o1"))
            .await
            .unwrap();
        assert_eq!(found.map(|o| o.id), Some(OrderId::new("o1")));

        assert!(
            find_order(&store, &UserId::new("u2"), &OrderId::new("o1"))
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            find_order(&store, &owner, &OrderId::new("missing"))
                .await
                .unwrap()
                .is_none()
        );
    }
}
