//! Persistence for the storefront.
//!
//! # Database: `greengrocer`
//!
//! ## Tables
//!
//! - `storefront.user_profile` - Shopper profiles keyed by provider uid
//! - `storefront.address` - Saved shipping addresses (appended, insertion ordered)
//! - `storefront.customer_order` - Placed orders (items and address as JSONB)
//! - `tower_sessions.session` - Tower-sessions storage (carts)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p greengrocer-cli -- migrate
//! ```
//!
//! Handlers and services never talk to `sqlx` directly; they go through the
//! [`StorefrontStore`] trait so the checkout workflow can run against
//! [`MemoryStore`] in tests.

pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use greengrocer_core::UserId;

use crate::models::{Address, Order, UserProfile};

pub use memory::{FailPoint, MemoryStore};
pub use postgres::PgStore;

/// `SQLSTATE` for `insufficient_privilege`.
const PG_INSUFFICIENT_PRIVILEGE: &str = "42501";

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// The store refused the operation for lack of privileges.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The store could not be reached or aborted the write.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate profile).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.code().as_deref() == Some(PG_INSUFFICIENT_PRIVILEGE) {
                return Self::PermissionDenied(db_err.message().to_owned());
            }
            if db_err.is_unique_violation() {
                return Self::Conflict(db_err.message().to_owned());
            }
        }
        Self::Database(e)
    }
}

/// Everything the checkout workflow persists for one order.
///
/// Applied as a single atomic batch: the order and the optional new address
/// are either both written or neither is.
#[derive(Debug, Clone)]
pub struct OrderBatch {
    /// The order document to create.
    pub order: Order,
    /// A newly entered address to append to the owner's profile.
    pub new_address: Option<Address>,
}

/// Persistence interface used by services and handlers.
#[async_trait]
pub trait StorefrontStore: Send + Sync {
    /// Load a profile with its saved addresses.
    async fn get_profile(&self, uid: &UserId) -> Result<Option<UserProfile>, RepositoryError>;

    /// Create a profile. Returns `Conflict` if one already exists.
    async fn create_profile(&self, profile: &UserProfile) -> Result<(), RepositoryError>;

    /// Change a profile's display name. Returns `NotFound` if there is no profile.
    async fn update_display_name(
        &self,
        uid: &UserId,
        display_name: &str,
    ) -> Result<(), RepositoryError>;

    /// Atomically create the order and append the optional new address.
    async fn place_order(&self, batch: OrderBatch) -> Result<(), RepositoryError>;

    /// All orders owned by `uid`, in no particular order.
    async fn list_orders(&self, uid: &UserId) -> Result<Vec<Order>, RepositoryError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
