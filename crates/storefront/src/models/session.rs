//! Session and identity types.

use serde::{Deserialize, Serialize};

use greengrocer_core::UserId;

/// Identity of the signed-in shopper.
///
/// Forwarded by the authentication provider's gateway on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Provider-issued user id.
    pub uid: UserId,
    /// Email address, when the provider shares it.
    pub email: Option<String>,
    /// Display name, when the provider shares it.
    pub display_name: Option<String>,
}

/// Session keys.
pub mod keys {
    /// Key for the shopper's cart (JSON array of cart items).
    pub const CART_ITEMS: &str = "cartItems";
}
