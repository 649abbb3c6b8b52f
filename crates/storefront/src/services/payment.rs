//! Card payment authorization.
//!
//! Checkout talks to a [`PaymentProcessor`]; the only implementation is
//! [`MockPaymentProcessor`], which stands in for a real gateway by sleeping
//! for a configurable latency and then applying a fixed rejection rule.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

use super::checkout::CardDetails;

/// Errors returned by a payment processor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    #[error("Payment was declined. Please check your card details.")]
    Declined,
}

/// A successful authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentAuthorization {
    /// Processor reference for the authorization.
    pub reference: String,
}

/// Synchronous card authorization step.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Authorize a card payment.
    async fn authorize(&self, card: &CardDetails) -> Result<PaymentAuthorization, PaymentError>;
}

/// Simulated gateway.
///
/// Declines when the cardholder name or card number is blank, approves
/// everything else.
#[derive(Debug, Clone)]
pub struct MockPaymentProcessor {
    latency: Duration,
}

impl MockPaymentProcessor {
    #[must_use]
    pub const fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl PaymentProcessor for MockPaymentProcessor {
    #[instrument(skip(self, card), fields(last4 = %card.last4()))]
    async fn authorize(&self, card: &CardDetails) -> Result<PaymentAuthorization, PaymentError> {
        tokio::time::sleep(self.latency).await;

        if card.cardholder_name.trim().is_empty() || card.card_number.trim().is_empty() {
            tracing::info!("mock payment declined");
            return Err(PaymentError::Declined);
        }

        let reference = format!("mock_{}", Uuid::new_v4().simple());
        tracing::debug!(%reference, "mock payment authorized");
        Ok(PaymentAuthorization { reference })
    }
}
