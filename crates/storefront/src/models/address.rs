//! Shipping address domain type.

use serde::{Deserialize, Serialize};

use greengrocer_core::{AddressId, ZipCode};

/// A saved shipping address.
///
/// Owned by a [`UserProfile`](super::UserProfile). At most one address per
/// profile should be flagged default; nothing enforces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: ZipCode,
    pub is_default: bool,
}

impl Address {
    /// One-line rendering, e.g. `123 Market St, Greenfield, CA 90210`.
    #[must_use]
    pub fn single_line(&self) -> String {
        format!("{}, {}, {} {}", self.street, self.city, self.state, self.zip)
    }
}
