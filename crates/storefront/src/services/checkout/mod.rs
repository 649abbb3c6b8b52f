//! Order placement.
//!
//! [`CheckoutService::place_order`] runs the whole checkout for one
//! submission:
//!
//! ```text
//! Draft ─validate─▶ Validated ─pay (card only)─▶ Authorized ─resolve address,
//! total─▶ Priced ─atomic write─▶ Placed ─▶ clear cart
//! ```
//!
//! Any failure returns before `Placed` and leaves the store untouched. The
//! cart is only cleared once the order batch has committed.

pub mod error;
pub mod form;
pub mod validation;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::instrument;

use greengrocer_core::{AddressId, OrderId, OrderStatus, UserId};

pub use error::{CheckoutError, MissingResource};
pub use form::{AddressFields, CheckoutForm};
pub use validation::{
    CardDetails, CheckoutField, NEW_ADDRESS, NewAddress, OrderIntent, PaymentDetails,
    ShippingChoice, ValidationError, ValidationErrorKind, validate,
};

use crate::db::{OrderBatch, StorefrontStore};
use crate::models::{Address, Cart, Order, OrderLine, UserProfile};
use crate::services::payment::PaymentProcessor;

/// Error returned when the persisted cart could not be cleared.
pub type CartStorageError = Box<dyn std::error::Error + Send + Sync>;

/// Where the shopper's cart is persisted between requests.
#[async_trait]
pub trait CartStorage: Send + Sync {
    /// Empty the persisted cart.
    async fn clear_cart(&self) -> Result<(), CartStorageError>;
}

/// How far a checkout got before it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CheckoutStage {
    Draft,
    Validated,
    Authorized,
    Priced,
    Placed,
}

impl CheckoutStage {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Validated => "validated",
            Self::Authorized => "authorized",
            Self::Priced => "priced",
            Self::Placed => "placed",
        }
    }
}

/// The checkout workflow and its collaborators.
#[derive(Clone)]
pub struct CheckoutService {
    store: Arc<dyn StorefrontStore>,
    payments: Arc<dyn PaymentProcessor>,
}

impl CheckoutService {
    #[must_use]
    pub fn new(store: Arc<dyn StorefrontStore>, payments: Arc<dyn PaymentProcessor>) -> Self {
        Self { store, payments }
    }

    /// Place an order from a checkout submission.
    ///
    /// `authenticated` is the identity established for this request, never
    /// the `userId` form field; the two must match.
    ///
    /// # Errors
    ///
    /// Returns the first [`CheckoutError`] hit along the workflow. Nothing is
    /// persisted unless `Ok` is returned.
    #[instrument(skip_all, fields(uid = authenticated.map(UserId::as_str)))]
    pub async fn place_order(
        &self,
        form: &CheckoutForm,
        authenticated: Option<&UserId>,
        cart: &dyn CartStorage,
    ) -> Result<OrderId, CheckoutError> {
        let mut stage = CheckoutStage::Draft;
        let result = self.run(form, authenticated, cart, &mut stage).await;

        match &result {
            Ok(order_id) => tracing::info!(%order_id, "order placed"),
            Err(err) if err.is_server_fault() => {
                tracing::error!(error = %err, stage = stage.as_str(), "checkout failed");
            }
            Err(err) => tracing::info!(error = %err, stage = stage.as_str(), "checkout rejected"),
        }
        result
    }

    async fn run(
        &self,
        form: &CheckoutForm,
        authenticated: Option<&UserId>,
        cart: &dyn CartStorage,
        stage: &mut CheckoutStage,
    ) -> Result<OrderId, CheckoutError> {
        let intent = validate(form)?;
        *stage = CheckoutStage::Validated;

        if authenticated != Some(&intent.user_id) {
            return Err(CheckoutError::Authentication);
        }

        if let PaymentDetails::CreditCard(card) = &intent.payment {
            let authorization = self.payments.authorize(card).await?;
            tracing::debug!(reference = %authorization.reference, "payment authorized");
        }
        *stage = CheckoutStage::Authorized;

        let OrderIntent {
            user_id,
            cart_items,
            shipping,
            payment,
        } = intent;
        let cart_items = Cart::from_items(cart_items);
        if cart_items.is_empty() {
            return Err(CheckoutError::NotFound(MissingResource::CartEmpty));
        }

        let profile = self
            .store
            .get_profile(&user_id)
            .await?
            .ok_or(CheckoutError::NotFound(MissingResource::Profile))?;
        let (shipping_address, new_address) = resolve_address(&profile, shipping)?;
        let total = cart_items
            .total()
            .map_err(|e| CheckoutError::Unexpected(format!("order total: {e}")))?;
        *stage = CheckoutStage::Priced;

        let order = Order {
            id: OrderId::generate(),
            user_id,
            date: Utc::now(),
            status: OrderStatus::Processing,
            items: cart_items.items().iter().map(OrderLine::from).collect(),
            total,
            shipping_address,
            payment_method: payment.method(),
        };
        let order_id = order.id.clone();
        self.store
            .place_order(OrderBatch { order, new_address })
            .await?;
        *stage = CheckoutStage::Placed;

        if let Err(err) = cart.clear_cart().await {
            tracing::warn!(error = %err, %order_id, "order placed but cart was not cleared");
        }

        Ok(order_id)
    }
}

/// Pick the shipping address, synthesizing a new one when requested.
///
/// Returns the address to embed in the order and, for a new address, the
/// copy to append to the profile.
fn resolve_address(
    profile: &UserProfile,
    shipping: ShippingChoice,
) -> Result<(Address, Option<Address>), CheckoutError> {
    match shipping {
        ShippingChoice::Existing(id) => profile
            .find_address(&id)
            .cloned()
            .map(|address| (address, None))
            .ok_or(CheckoutError::NotFound(MissingResource::Address)),
        ShippingChoice::New(new) => {
            let address = Address {
                id: AddressId::generate(),
                street: new.street,
                city: new.city,
                state: new.state,
                zip: new.zip,
                is_default: false,
            };
            Ok((address.clone(), Some(address)))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use greengrocer_core::ZipCode;

    use super::*;

    fn profile() -> UserProfile {
        let mut profile = UserProfile::new(UserId::new("u1"), "u1@x.io", None);
        profile.addresses.push(Address {
            id: AddressId::new("addr1"),
            street: "123 Market St".to_owned(),
            city: "Greenfield".to_owned(),
            state: "CA".to_owned(),
            zip: ZipCode::parse("90210").unwrap(),
            is_default: true,
        });
        profile
    }

    #[test]
    fn test_resolve_existing_address() {
        let (address, appended) =
            resolve_address(&profile(), ShippingChoice::Existing(AddressId::new("addr1")))
                .unwrap();
        assert_eq!(address.city, "Greenfield");
        assert!(appended.is_none());
    }

    #[test]
    fn test_resolve_unknown_address_hard_fails() {
        let err = resolve_address(
            &profile(),
            ShippingChoice::Existing(AddressId::new("addr_unknown")),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::NotFound(MissingResource::Address)
        ));
    }

    #[test]
    fn test_resolve_new_address_is_not_default() {
        let new = NewAddress {
            street: "1 Elm".to_owned(),
            city: "Ames".to_owned(),
            state: "IA".to_owned(),
            zip: ZipCode::parse("50010").unwrap(),
        };
        let (address, appended) = resolve_address(&profile(), ShippingChoice::New(new)).unwrap();
        assert!(!address.is_default);
        assert_eq!(appended.as_ref(), Some(&address));
        assert_ne!(address.id, AddressId::new("addr1"));
    }

    #[test]
    fn test_stages_are_ordered() {
        assert!(CheckoutStage::Draft < CheckoutStage::Validated);
        assert!(CheckoutStage::Priced < CheckoutStage::Placed);
    }
}
