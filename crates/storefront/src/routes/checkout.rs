//! Checkout route handler.
//!
//! Responds with `{"success": true, "orderId": "..."}` or
//! `{"success": false, "error": "..."}`, using the status code of the
//! [`CheckoutError`] category.

use axum::{
    Form, Json,
    extract::{State, rejection::FormRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use greengrocer_core::OrderId;

use crate::error::add_breadcrumb;
use crate::middleware::OptionalAuth;
use crate::services::cart::SessionCart;
use crate::services::checkout::{CheckoutError, CheckoutForm};
use crate::state::AppState;

/// Result of a checkout submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
}

impl CheckoutResponse {
    const fn placed(order_id: OrderId) -> Self {
        Self {
            success: true,
            error: None,
            order_id: Some(order_id),
        }
    }

    fn failed(err: &CheckoutError) -> Self {
        Self::error(err.user_message())
    }

    fn error(message: String) -> Self {
        Self {
            success: false,
            error: Some(message),
            order_id: None,
        }
    }
}

/// Message for a body that could not be decoded as a checkout form.
const UNREADABLE_FORM: &str = "Your order details could not be read. Please try again.";

/// Place an order.
///
/// The shopper is identified by the forwarded identity headers; the
/// `userId` form field must name the same shopper.
#[instrument(skip(state, session, user, form))]
pub async fn place_order(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    session: Session,
    form: Result<Form<CheckoutForm>, FormRejection>,
) -> Response {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::info!(error = %rejection, "unreadable checkout submission");
            return (
                StatusCode::BAD_REQUEST,
                Json(CheckoutResponse::error(UNREADABLE_FORM.to_owned())),
            )
                .into_response();
        }
    };
    let cart = SessionCart::new(session);
    let authenticated = user.as_ref().map(|u| &u.uid);

    match state
        .checkout()
        .place_order(&form, authenticated, &cart)
        .await
    {
        Ok(order_id) => {
            add_breadcrumb("checkout", "Order placed", Some(&[("order_id", order_id.as_str())]));
            (StatusCode::OK, Json(CheckoutResponse::placed(order_id))).into_response()
        }
        Err(err) => {
            if err.is_server_fault() {
                sentry::capture_error(&err);
            }
            (err.status(), Json(CheckoutResponse::failed(&err))).into_response()
        }
    }
}
