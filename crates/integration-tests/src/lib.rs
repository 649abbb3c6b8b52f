//! Integration test fixtures for the Greengrocer storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p greengrocer-integration-tests
//! ```
//!
//! No database is needed: the service layer and the router run against
//! [`MemoryStore`] and `tower_sessions::MemoryStore`.
//!
//! # Test Categories
//!
//! - `checkout_workflow` - checkout service end to end
//! - `storefront_routes` - HTTP router via `tower::ServiceExt::oneshot`

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use secrecy::SecretString;

use greengrocer_core::{AddressId, ProductId, Quantity, UserId, ZipCode};
use greengrocer_storefront::catalog::Catalog;
use greengrocer_storefront::config::StorefrontConfig;
use greengrocer_storefront::db::MemoryStore;
use greengrocer_storefront::models::{Address, Cart, UserProfile};
use greengrocer_storefront::services::checkout::{
    CardDetails, CartStorage, CartStorageError, CheckoutForm, CheckoutService,
};
use greengrocer_storefront::services::payment::{
    PaymentAuthorization, PaymentError, PaymentProcessor,
};

/// Uid of the seeded shopper.
pub const SHOPPER_UID: &str = "u1";

/// Catalog id of the Apple product ($2.50).
pub const APPLE: &str = "1";

/// Catalog id of the Banana product ($1.80).
pub const BANANA: &str = "2";

fn address(id: &str, street: &str, is_default: bool) -> Address {
    Address {
        id: AddressId::new(id),
        street: street.to_owned(),
        city: "Greenfield".to_owned(),
        state: "CA".to_owned(),
        zip: ZipCode::parse("90210").expect("fixture zip is valid"),
        is_default,
    }
}

/// The seeded shopper: uid `u1` with addresses `addr1` (default) and `addr2`.
#[must_use]
pub fn shopper() -> UserProfile {
    let mut profile = UserProfile::new(
        UserId::new(SHOPPER_UID),
        "u1@example.com",
        Some("Jo Shopper".to_owned()),
    );
    profile.addresses = vec![
        address("addr1", "123 Market St", true),
        address("addr2", "456 Orchard Ave", false),
    ];
    profile
}

/// A store holding only [`shopper`].
#[must_use]
pub fn seeded_store() -> MemoryStore {
    MemoryStore::with_profiles([shopper()])
}

/// Cart JSON for the given `(product id, quantity)` lines, as the checkout
/// page would post it.
#[must_use]
pub fn cart_json(lines: &[(&str, u32)]) -> String {
    let catalog = Catalog::builtin();
    let mut cart = Cart::default();
    for &(id, quantity) in lines {
        let product = catalog
            .product(&ProductId::new(id))
            .expect("fixture product is in the catalog");
        let quantity = Quantity::new(quantity).expect("fixture quantity is at least 1");
        cart.add(product, quantity);
    }
    cart.to_json()
}

/// Cash-on-delivery submission shipping to a saved address.
#[must_use]
pub fn cod_form(cart_items: &str, address_id: &str) -> CheckoutForm {
    CheckoutForm {
        user_id: Some(SHOPPER_UID.to_owned()),
        cart_items: Some(cart_items.to_owned()),
        shipping_address: Some(address_id.to_owned()),
        payment_method: Some("cod".to_owned()),
        ..CheckoutForm::default()
    }
}

/// Card submission shipping to a new address in the flat field shape.
#[must_use]
pub fn card_form_new_address(cart_items: &str, zip: &str) -> CheckoutForm {
    CheckoutForm {
        user_id: Some(SHOPPER_UID.to_owned()),
        cart_items: Some(cart_items.to_owned()),
        shipping_address: Some("new".to_owned()),
        flat_street: Some("789 Grove Rd".to_owned()),
        flat_city: Some("Springfield".to_owned()),
        flat_state: Some("OR".to_owned()),
        flat_zip: Some(zip.to_owned()),
        payment_method: Some("creditCard".to_owned()),
        cardholder_name: Some("Jo Shopper".to_owned()),
        card_number: Some("4242424242424242".to_owned()),
        expiry_date: Some("09/27".to_owned()),
        cvv: Some("123".to_owned()),
        ..CheckoutForm::default()
    }
}

/// Payment processor that counts calls and approves or declines everything.
#[derive(Debug, Default)]
pub struct CountingPayments {
    calls: AtomicUsize,
    decline: bool,
}

impl CountingPayments {
    #[must_use]
    pub fn approving() -> Arc<Self> {
        Arc::new(Self::default())
    }

    #[must_use]
    pub fn declining() -> Arc<Self> {
        Arc::new(Self {
            decline: true,
            ..Self::default()
        })
    }

    /// Number of `authorize` calls so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentProcessor for CountingPayments {
    async fn authorize(&self, _card: &CardDetails) -> Result<PaymentAuthorization, PaymentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.decline {
            return Err(PaymentError::Declined);
        }
        Ok(PaymentAuthorization {
            reference: "test_ref".to_owned(),
        })
    }
}

/// Cart storage that records whether it was cleared.
#[derive(Debug, Default)]
pub struct RecordingCart {
    cleared: AtomicBool,
    fail: bool,
}

impl RecordingCart {
    /// A cart whose `clear_cart` always fails.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn was_cleared(&self) -> bool {
        self.cleared.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CartStorage for RecordingCart {
    async fn clear_cart(&self) -> Result<(), CartStorageError> {
        if self.fail {
            return Err("session store unavailable".into());
        }
        self.cleared.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Checkout service over `store` with the given payment processor.
#[must_use]
pub fn checkout_service(store: &MemoryStore, payments: Arc<CountingPayments>) -> CheckoutService {
    CheckoutService::new(Arc::new(store.clone()), payments)
}

/// Configuration for in-process tests. Nothing connects to the database URL.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        database_url: SecretString::from("postgres://unused@localhost/unused"),
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 3000,
        base_url: url::Url::parse("http://localhost:3000").expect("fixture URL is valid"),
        payment_latency: Duration::ZERO,
        suggestions: None,
        sentry_dsn: None,
        sentry_environment: None,
    }
}
