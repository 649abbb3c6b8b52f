//! Raw checkout submission.
//!
//! The checkout page has been wired two ways over time: nested
//! `newAddress.street` inputs and flattened `newAddressStreet` inputs. Both
//! deserialize into the same [`CheckoutForm`] and are merged by
//! [`CheckoutForm::new_address`] before validation.

use serde::{Deserialize, Serialize};

/// The form-encoded body of `POST /checkout`, exactly as submitted.
///
/// Every field is optional here; presence and format are checked by
/// [`validate`](super::validate). Unknown fields (such as a client-computed
/// `total`) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutForm {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    #[serde(rename = "cartItems")]
    pub cart_items: Option<String>,
    #[serde(rename = "shippingAddress")]
    pub shipping_address: Option<String>,

    #[serde(rename = "newAddress.street", skip_serializing_if = "Option::is_none")]
    pub new_address_street: Option<String>,
    #[serde(rename = "newAddress.city", skip_serializing_if = "Option::is_none")]
    pub new_address_city: Option<String>,
    #[serde(rename = "newAddress.state", skip_serializing_if = "Option::is_none")]
    pub new_address_state: Option<String>,
    #[serde(rename = "newAddress.zip", skip_serializing_if = "Option::is_none")]
    pub new_address_zip: Option<String>,

    #[serde(rename = "newAddressStreet", skip_serializing_if = "Option::is_none")]
    pub flat_street: Option<String>,
    #[serde(rename = "newAddressCity", skip_serializing_if = "Option::is_none")]
    pub flat_city: Option<String>,
    #[serde(rename = "newAddressState", skip_serializing_if = "Option::is_none")]
    pub flat_state: Option<String>,
    #[serde(rename = "newAddressZip", skip_serializing_if = "Option::is_none")]
    pub flat_zip: Option<String>,

    #[serde(rename = "paymentMethod")]
    pub payment_method: Option<String>,
    #[serde(rename = "cardholderName", skip_serializing_if = "Option::is_none")]
    pub cardholder_name: Option<String>,
    #[serde(rename = "cardNumber", skip_serializing_if = "Option::is_none")]
    pub card_number: Option<String>,
    #[serde(rename = "expiryDate", skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cvv: Option<String>,
}

/// New-address inputs after merging both submission shapes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressFields {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// Nested value if it has content, otherwise the flattened one.
fn merge(nested: Option<&String>, flat: Option<&String>) -> String {
    nested
        .filter(|v| !v.trim().is_empty())
        .or(flat)
        .cloned()
        .unwrap_or_default()
}

impl CheckoutForm {
    /// The new-address fields, whichever shape they were submitted in.
    #[must_use]
    pub fn new_address(&self) -> AddressFields {
        AddressFields {
            street: merge(self.new_address_street.as_ref(), self.flat_street.as_ref()),
            city: merge(self.new_address_city.as_ref(), self.flat_city.as_ref()),
            state: merge(self.new_address_state.as_ref(), self.flat_state.as_ref()),
            zip: merge(self.new_address_zip.as_ref(), self.flat_zip.as_ref()),
        }
    }
}
