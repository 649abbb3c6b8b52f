//! Checkout error taxonomy.

use axum::http::StatusCode;
use thiserror::Error;

use super::validation::ValidationError;
use crate::db::RepositoryError;
use crate::services::payment::PaymentError;

/// What could not be found while placing an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingResource {
    CartEmpty,
    Address,
    Profile,
}

/// Errors that stop an order from being placed.
///
/// Every variant maps to exactly one shopper-facing message via
/// [`CheckoutError::user_message`]; infrastructure detail stays in logs.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// A form field failed validation.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// No authenticated shopper, or the form names a different one.
    #[error("not authenticated")]
    Authentication,

    /// The card was declined.
    #[error("payment failed: {0}")]
    Payment(#[from] PaymentError),

    /// A referenced entity does not exist.
    #[error("not found: {0:?}")]
    NotFound(MissingResource),

    /// The store rejected or failed the write.
    #[error("persistence error: {0}")]
    Persistence(#[from] RepositoryError),

    /// Anything else, such as an order total that cannot be stored.
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl CheckoutError {
    /// The single message shown to the shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(err) => err.message.clone(),
            Self::Authentication => "You must be logged in to place an order.".to_owned(),
            Self::Payment(err) => err.to_string(),
            Self::NotFound(MissingResource::CartEmpty) => "Your cart is empty.".to_owned(),
            Self::NotFound(MissingResource::Address) => "Shipping address not found.".to_owned(),
            Self::NotFound(MissingResource::Profile) => "User profile not found.".to_owned(),
            Self::Persistence(RepositoryError::PermissionDenied(_)) => {
                "Permission denied. Check your database access rules.".to_owned()
            }
            Self::Persistence(_) => "Could not place your order. Please try again.".to_owned(),
            Self::Unexpected(_) => "An unexpected error occurred. Please try again.".to_owned(),
        }
    }

    /// HTTP status for the checkout response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Authentication => StatusCode::UNAUTHORIZED,
            Self::Payment(_) => StatusCode::PAYMENT_REQUIRED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Persistence(_) | Self::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether this failure is worth reporting to Sentry.
    #[must_use]
    pub const fn is_server_fault(&self) -> bool {
        matches!(
            self,
            Self::Persistence(_) | Self::Unexpected(_) | Self::NotFound(MissingResource::Profile)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_has_actionable_message() {
        let err = CheckoutError::Persistence(RepositoryError::PermissionDenied(
            "insufficient_privilege on storefront.customer_order".to_owned(),
        ));
        assert_eq!(
            err.user_message(),
            "Permission denied. Check your database access rules."
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_persistence_detail_is_not_leaked() {
        let err = CheckoutError::Persistence(RepositoryError::Unavailable(
            "connection reset by 10.0.0.5".to_owned(),
        ));
        assert!(!err.user_message().contains("10.0.0.5"));
    }

    #[test]
    fn test_unexpected_is_generic_server_fault() {
        let err = CheckoutError::Unexpected("order total: price is too large".to_owned());
        assert_eq!(
            err.user_message(),
            "An unexpected error occurred. Please try again."
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.is_server_fault());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            CheckoutError::Authentication.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            CheckoutError::NotFound(MissingResource::Address).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CheckoutError::Payment(PaymentError::Declined).status(),
            StatusCode::PAYMENT_REQUIRED
        );
    }
}
