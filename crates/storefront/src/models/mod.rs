//! Domain models for the storefront.
//!
//! These types represent validated domain objects separate from database row
//! types and from raw form input.

pub mod address;
pub mod cart;
pub mod order;
pub mod product;
pub mod profile;
pub mod session;

pub use address::Address;
pub use cart::{Cart, CartItem};
pub use order::{Order, OrderLine};
pub use product::{Category, Product};
pub use profile::UserProfile;
pub use session::{CurrentUser, keys as session_keys};
