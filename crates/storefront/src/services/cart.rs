//! Session-backed cart persistence.

use async_trait::async_trait;
use tower_sessions::Session;

use super::checkout::{CartStorage, CartStorageError};
use crate::models::{Cart, CartItem, session_keys};

/// The shopper's cart as stored in their session.
#[derive(Clone)]
pub struct SessionCart {
    session: Session,
}

impl SessionCart {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    /// Load the cart. A missing or unreadable entry is an empty cart.
    pub async fn load(&self) -> Cart {
        match self
            .session
            .get::<Vec<CartItem>>(session_keys::CART_ITEMS)
            .await
        {
            Ok(items) => Cart::from_items(items.unwrap_or_default()),
            Err(e) => {
                tracing::warn!("Discarding unreadable cart: {e}");
                Cart::default()
            }
        }
    }

    /// Persist the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn save(&self, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
        self.session
            .insert(session_keys::CART_ITEMS, cart.items())
            .await
    }
}

#[async_trait]
impl CartStorage for SessionCart {
    async fn clear_cart(&self) -> Result<(), CartStorageError> {
        self.save(&Cart::default()).await?;
        Ok(())
    }
}
