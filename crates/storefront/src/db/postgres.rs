//! `PostgreSQL` implementation of [`StorefrontStore`].
//!
//! Queries use the runtime `sqlx::query*` API with `FromRow` row types, and
//! rows are converted into validated domain types before leaving this module.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use greengrocer_core::{AddressId, OrderId, OrderStatus, PaymentMethod, Price, UserId, ZipCode};

use super::{OrderBatch, RepositoryError, StorefrontStore};
use crate::models::{Address, Order, OrderLine, UserProfile};

#[derive(sqlx::FromRow)]
struct ProfileRow {
    uid: String,
    email: String,
    display_name: String,
}

#[derive(sqlx::FromRow)]
struct AddressRow {
    id: String,
    street: String,
    city: String,
    state: String,
    zip: String,
    is_default: bool,
}

impl TryFrom<AddressRow> for Address {
    type Error = RepositoryError;

    fn try_from(row: AddressRow) -> Result<Self, Self::Error> {
        let zip = ZipCode::parse(&row.zip).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid zip for address {}: {e}", row.id))
        })?;
        Ok(Self {
            id: AddressId::new(row.id),
            street: row.street,
            city: row.city,
            state: row.state,
            zip,
            is_default: row.is_default,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: String,
    user_id: String,
    created_at: DateTime<Utc>,
    status: String,
    items: Json<Vec<OrderLine>>,
    total: Decimal,
    shipping_address: Json<Address>,
    payment_method: String,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<OrderStatus>()
            .map_err(RepositoryError::DataCorruption)?;
        let payment_method = row
            .payment_method
            .parse::<PaymentMethod>()
            .map_err(RepositoryError::DataCorruption)?;
        let total = Price::new(row.total).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid total for order {}: {e}", row.id))
        })?;

        Ok(Self {
            id: OrderId::new(row.id),
            user_id: UserId::new(row.user_id),
            date: row.created_at,
            status,
            items: row.items.0,
            total,
            shipping_address: row.shipping_address.0,
            payment_method,
        })
    }
}

/// Store backed by the storefront `PostgreSQL` database.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a new store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying connection pool (shared with the session store).
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Append an address to a profile inside an open transaction.
async fn insert_address(
    tx: &mut Transaction<'_, Postgres>,
    uid: &UserId,
    address: &Address,
) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        INSERT INTO storefront.address (id, user_id, street, city, state, zip, is_default)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ",
    )
    .bind(&address.id)
    .bind(uid)
    .bind(&address.street)
    .bind(&address.city)
    .bind(&address.state)
    .bind(address.zip.as_str())
    .bind(address.is_default)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

#[async_trait]
impl StorefrontStore for PgStore {
    #[instrument(skip(self))]
    async fn get_profile(&self, uid: &UserId) -> Result<Option<UserProfile>, RepositoryError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r"
            SELECT uid, email, display_name
            FROM storefront.user_profile
            WHERE uid = $1
            ",
        )
        .bind(uid)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let addresses = sqlx::query_as::<_, AddressRow>(
            r"
            SELECT id, street, city, state, zip, is_default
            FROM storefront.address
            WHERE user_id = $1
            ORDER BY position
            ",
        )
        .bind(uid)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Address::try_from)
        .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(UserProfile {
            uid: UserId::new(row.uid),
            email: row.email,
            display_name: row.display_name,
            addresses,
        }))
    }

    #[instrument(skip(self, profile), fields(uid = %profile.uid))]
    async fn create_profile(&self, profile: &UserProfile) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            INSERT INTO storefront.user_profile (uid, email, display_name)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(&profile.uid)
        .bind(&profile.email)
        .bind(&profile.display_name)
        .execute(&mut *tx)
        .await?;

        for address in &profile.addresses {
            insert_address(&mut tx, &profile.uid, address).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_display_name(
        &self,
        uid: &UserId,
        display_name: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE storefront.user_profile
            SET display_name = $2, updated_at = NOW()
            WHERE uid = $1
            ",
        )
        .bind(uid)
        .bind(display_name)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    #[instrument(
        skip(self, batch),
        fields(order_id = %batch.order.id, new_address = batch.new_address.is_some())
    )]
    async fn place_order(&self, batch: OrderBatch) -> Result<(), RepositoryError> {
        let OrderBatch { order, new_address } = batch;
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            INSERT INTO storefront.customer_order
                (id, user_id, created_at, status, items, total, shipping_address, payment_method)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(&order.id)
        .bind(&order.user_id)
        .bind(order.date)
        .bind(order.status.as_str())
        .bind(Json(&order.items))
        .bind(order.total)
        .bind(Json(&order.shipping_address))
        .bind(order.payment_method.label())
        .execute(&mut *tx)
        .await?;

        if let Some(address) = &new_address {
            insert_address(&mut tx, &order.user_id, address).await?;
        }

        // Dropping `tx` on any error above rolls both writes back.
        tx.commit().await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_orders(&self, uid: &UserId) -> Result<Vec<Order>, RepositoryError> {
        sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, user_id, created_at, status, items, total, shipping_address, payment_method
            FROM storefront.customer_order
            WHERE user_id = $1
            ",
        )
        .bind(uid)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Order::try_from)
        .collect()
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
