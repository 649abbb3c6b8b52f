//! Status enums for orders and payments.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// Orders are created as `Processing`; later transitions are an
/// administrative concern outside the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// The stored / displayed name of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Processing" => Ok(Self::Processing),
            "Shipped" => Ok(Self::Shipped),
            "Delivered" => Ok(Self::Delivered),
            "Cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// How the shopper pays for an order.
///
/// Form submissions use the wire values `creditCard` / `cod`
/// ([`PaymentMethod::from_form_value`]); persisted orders and JSON carry the
/// human label ("Credit Card" / "Cash on Delivery").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "Cash on Delivery")]
    CashOnDelivery,
}

impl PaymentMethod {
    /// Human-readable label stored on the order.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::CreditCard => "Credit Card",
            Self::CashOnDelivery => "Cash on Delivery",
        }
    }

    /// Value used by the checkout form.
    #[must_use]
    pub const fn form_value(&self) -> &'static str {
        match self {
            Self::CreditCard => "creditCard",
            Self::CashOnDelivery => "cod",
        }
    }

    /// Parse the checkout form value.
    #[must_use]
    pub fn from_form_value(value: &str) -> Option<Self> {
        match value {
            "creditCard" => Some(Self::CreditCard),
            "cod" => Some(Self::CashOnDelivery),
            _ => None,
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    /// Parses the stored label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Credit Card" => Ok(Self::CreditCard),
            "Cash on Delivery" => Ok(Self::CashOnDelivery),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}
