//! Shopping cart domain types.
//!
//! The cart lives in the shopper's session under
//! [`session_keys::CART_ITEMS`](super::session_keys::CART_ITEMS) as a JSON
//! array of [`CartItem`]s, and is posted back verbatim as the `cartItems`
//! checkout field.

use serde::{Deserialize, Serialize};

use greengrocer_core::{Price, PriceError, ProductId, Quantity};

use super::Product;

/// A line in the cart.
///
/// `price` is a snapshot taken when the product was added and does not follow
/// later catalog price changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub image_url: String,
    pub quantity: Quantity,
}

impl CartItem {
    /// Snapshot a product into a cart line.
    #[must_use]
    pub fn from_product(product: &Product, quantity: Quantity) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image_url: product.image_url.clone(),
            quantity,
        }
    }

    /// `price × quantity` for this line.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::OutOfRange` if the line total is not storable.
    pub fn line_total(&self) -> Result<Price, PriceError> {
        self.price.times(self.quantity)
    }
}

/// The shopper's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Build a cart from existing lines.
    #[must_use]
    pub const fn from_items(items: Vec<CartItem>) -> Self {
        Self { items }
    }

    /// Parse the JSON array stored in the session or posted by the client.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the input is not an array of valid
    /// cart items.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Encode as the JSON array used by the session and the checkout form.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.items).unwrap_or_else(|_| "[]".to_owned())
    }

    /// Add `quantity` units of a product, merging with an existing line.
    pub fn add(&mut self, product: &Product, quantity: Quantity) {
        if let Some(line) = self.items.iter_mut().find(|line| line.id == product.id) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.items.push(CartItem::from_product(product, quantity));
        }
    }

    /// Set the quantity of a line; zero removes it.
    ///
    /// Returns `false` if the product is not in the cart.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) -> bool {
        let Ok(quantity) = Quantity::new(quantity) else {
            return self.remove(product_id);
        };
        match self.items.iter_mut().find(|line| &line.id == product_id) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove a line. Returns `false` if the product is not in the cart.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|line| &line.id != product_id);
        self.items.len() != before
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Consume the cart and return its lines.
    #[must_use]
    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of `price × quantity` over all lines.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::OutOfRange` if any line or the sum is not
    /// storable.
    pub fn total(&self) -> Result<Price, PriceError> {
        self.items
            .iter()
            .try_fold(Price::ZERO, |total, line| total.checked_add(line.line_total()?))
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |count, line| count.saturating_add(line.quantity.get()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn product(id: &str, cents: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: String::new(),
            price: Price::from_cents(cents),
            image_url: format!("https://img.example/{id}.jpg"),
            image_hint: String::new(),
            category: "fruits".to_owned(),
            subcategory: None,
            stock: 10,
        }
    }

    fn qty(n: u32) -> Quantity {
        Quantity::new(n).unwrap()
    }

    #[test]
    fn test_add_merges_existing_line() {
        let mut cart = Cart::default();
        let apple = product("1", 250);
        cart.add(&apple, qty(1));
        cart.add(&apple, qty(3));
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity.get(), 4);
        assert_eq!(cart.total().unwrap().rounded(), Decimal::new(1000, 2));
    }

    #[test]
    fn test_price_snapshot_is_independent_of_catalog() {
        let mut cart = Cart::default();
        let mut apple = product("1", 250);
        cart.add(&apple, qty(1));
        apple.price = Price::from_cents(999);
        assert_eq!(cart.items()[0].price, Price::from_cents(250));
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut cart = Cart::default();
        cart.add(&product("1", 100), qty(2));
        cart.add(&product("2", 100), qty(1));
        assert!(cart.set_quantity(&ProductId::new("1"), 0));
        assert_eq!(cart.items().len(), 1);
        assert!(!cart.set_quantity(&ProductId::new("9"), 3));
        assert!(cart.set_quantity(&ProductId::new("2"), 5));
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn test_json_shape_matches_checkout_field() {
        let mut cart = Cart::default();
        cart.add(&product("1", 250), qty(4));
        let json = cart.to_json();
        assert!(json.starts_with('['));
        assert!(json.contains("\"imageUrl\""));
        assert_eq!(Cart::from_json(&json).unwrap(), cart);
    }

    #[test]
    fn test_from_json_accepts_numeric_prices() {
        let cart =
            Cart::from_json(r#"[{"id":"1","name":"Apple","price":2.5,"imageUrl":"","quantity":4}]"#)
                .unwrap();
        assert_eq!(cart.total().unwrap().rounded(), Decimal::new(1000, 2));
    }

    #[test]
    fn test_total_overflow_is_an_error() {
        let cart = Cart::from_json(
            r#"[{"id":"1","name":"Gold","price":"79228162514264337593543950335","quantity":2}]"#,
        )
        .unwrap();
        assert_eq!(cart.total(), Err(PriceError::OutOfRange));
    }

    #[test]
    fn test_from_json_rejects_zero_quantity() {
        assert!(
            Cart::from_json(r#"[{"id":"1","name":"Apple","price":2.5,"quantity":0}]"#).is_err()
        );
    }
}
