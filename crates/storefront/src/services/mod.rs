//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `checkout` - Checkout validation and order placement
//! - `payment` - Card authorization (mock gateway)
//! - `cart` - Session-backed cart persistence
//! - `orders` - Order history read model
//! - `account` - Profile, saved addresses, overview
//! - `suggestions` - Product category suggestions from a hosted model
//!
//! Handlers stay thin: they extract identity and form input, call into a
//! service, and turn the result into a response.

pub mod account;
pub mod cart;
pub mod checkout;
pub mod orders;
pub mod payment;
pub mod suggestions;
