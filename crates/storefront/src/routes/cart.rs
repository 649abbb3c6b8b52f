//! Cart route handlers.
//!
//! The cart is kept in the session (see [`SessionCart`]). Every mutation
//! responds with the updated cart so clients can re-render in place.

use axum::{Form, Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use greengrocer_core::{Price, PriceError, ProductId, Quantity};

use crate::error::{AppError, Result};
use crate::models::{Cart, CartItem};
use crate::services::cart::SessionCart;
use crate::state::AppState;

/// Cart as returned to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub total: Price,
    pub item_count: u32,
}

impl TryFrom<Cart> for CartView {
    type Error = PriceError;

    fn try_from(cart: Cart) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            total: cart.total()?,
            item_count: cart.item_count(),
            items: cart.into_items(),
        })
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartForm {
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

/// Update quantity form data. Zero removes the line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartForm {
    pub product_id: String,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

// =============================================================================
// Session Helpers
// =============================================================================

async fn save(cart: &SessionCart, updated: Cart) -> Result<Json<CartView>> {
    let view = CartView::try_from(updated.clone())
        .map_err(|_| AppError::BadRequest("Cart total is too large.".to_string()))?;
    cart.save(&updated).await.map_err(|e| {
        tracing::error!("Failed to save cart to session: {e}");
        AppError::Internal("Failed to save cart".to_string())
    })?;
    Ok(Json(view))
}

// =============================================================================
// Route Handlers
// =============================================================================

/// Display cart contents.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CartView>> {
    let cart = SessionCart::new(session).load().await;
    let view = CartView::try_from(cart).map_err(|e| {
        tracing::error!("Stored cart total is out of range: {e}");
        AppError::Internal("Failed to load cart".to_string())
    })?;
    Ok(Json(view))
}

/// Add item to cart.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Json<CartView>> {
    let product = state
        .catalog()
        .product(&ProductId::new(form.product_id.as_str()))
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?;
    let quantity = Quantity::new(form.quantity)
        .map_err(|_| AppError::BadRequest("Quantity must be at least 1.".to_string()))?;

    let session_cart = SessionCart::new(session);
    let mut cart = session_cart.load().await;
    cart.add(product, quantity);
    save(&session_cart, cart).await
}

/// Update cart item quantity.
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Result<Json<CartView>> {
    let session_cart = SessionCart::new(session);
    let mut cart = session_cart.load().await;
    if !cart.set_quantity(&ProductId::new(form.product_id.as_str()), form.quantity) {
        return Err(AppError::NotFound(format!(
            "cart item {}",
            form.product_id
        )));
    }
    save(&session_cart, cart).await
}

/// Remove item from cart.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Json<CartView>> {
    let session_cart = SessionCart::new(session);
    let mut cart = session_cart.load().await;
    // Removing a line that is already gone is not an error.
    cart.remove(&ProductId::new(form.product_id.as_str()));
    save(&session_cart, cart).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn test_cart_view_totals() {
        let catalog = Catalog::builtin();
        let mut cart = Cart::default();
        let apple = catalog.product(&ProductId::new("1")).unwrap();
        cart.add(apple, Quantity::new(3).unwrap());

        let view = CartView::try_from(cart).unwrap();
        assert_eq!(view.item_count, 3);
        assert_eq!(
            view.total,
            apple.price.times(Quantity::new(3).unwrap()).unwrap()
        );
        assert_eq!(view.items.len(), 1);
    }

    #[test]
    fn test_cart_view_rejects_unstorable_total() {
        let catalog = Catalog::builtin();
        let mut cart = Cart::default();
        let apple = catalog.product(&ProductId::new("1")).unwrap();
        cart.add(apple, Quantity::new(u32::MAX).unwrap());
        cart.add(apple, Quantity::new(u32::MAX).unwrap());

        assert_eq!(
            CartView::try_from(cart).unwrap_err(),
            PriceError::OutOfRange
        );
    }
}
