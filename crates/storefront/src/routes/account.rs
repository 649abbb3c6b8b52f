//! Account route handlers.
//!
//! These routes require authentication.

use axum::{
    Form, Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use greengrocer_core::OrderId;

use crate::error::{AppError, Result};
use crate::middleware::auth::RequireAuth;
use crate::models::{Address, Order};
use crate::services::account::{self, AccountOverview};
use crate::services::orders::{OrderHistory, find_order, order_history};
use crate::state::AppState;

/// Profile update form data.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    pub display_name: String,
}

/// Result of a profile update.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdated {
    pub success: bool,
    pub message: String,
    pub display_name: String,
}

/// Profile and order history. Creates the profile on first visit.
#[instrument(skip(state, user), fields(uid = %user.uid))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<AccountOverview>> {
    Ok(Json(account::overview(state.store(), &user).await?))
}

/// Order history, newest first.
#[instrument(skip(state, user), fields(uid = %user.uid))]
pub async fn orders(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<OrderHistory>> {
    Ok(Json(order_history(state.store(), &user.uid).await?))
}

/// A single order, as shown on the order confirmation page.
#[instrument(skip(state, user), fields(uid = %user.uid))]
pub async fn order(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<Order>> {
    find_order(state.store(), &user.uid, &OrderId::new(id.as_str()))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))
}

/// Saved shipping addresses.
#[instrument(skip(state, user), fields(uid = %user.uid))]
pub async fn addresses(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Address>>> {
    Ok(Json(account::addresses(state.store(), &user).await?))
}

/// Change the display name.
#[instrument(skip(state, user, form), fields(uid = %user.uid))]
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<ProfileForm>,
) -> Result<Json<ProfileUpdated>> {
    let display_name =
        account::update_display_name(state.store(), &user, &form.display_name).await?;
    Ok(Json(ProfileUpdated {
        success: true,
        message: "Profile updated.".to_owned(),
        display_name,
    }))
}
