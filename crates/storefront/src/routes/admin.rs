//! Catalog administration helpers.

use axum::{Form, Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::auth::RequireAuth;
use crate::services::suggestions::SuggestionRequest;
use crate::state::AppState;

/// Category suggestion form data.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizeForm {
    pub photo_data_uri: String,
    pub description: String,
}

/// Suggested categories for a product.
#[derive(Debug, Serialize)]
pub struct CategorizeResponse {
    pub success: bool,
    pub categories: Vec<String>,
}

/// Suggest catalog categories from a product photo and description.
#[instrument(skip(state, user, form), fields(uid = %user.uid))]
pub async fn categorize(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<CategorizeForm>,
) -> Result<Json<CategorizeResponse>> {
    let suggester = state
        .suggester()
        .ok_or_else(|| AppError::Unavailable("Category suggestions are not configured".into()))?;
    let request = SuggestionRequest::new(&form.photo_data_uri, &form.description)?;
    let categories = suggester.suggest(&request).await?;

    tracing::info!(count = categories.len(), "suggested categories");
    Ok(Json(CategorizeResponse {
        success: true,
        categories,
    }))
}
