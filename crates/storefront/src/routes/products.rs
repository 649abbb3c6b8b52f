//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use greengrocer_core::ProductId;

use crate::error::{AppError, Result};
use crate::models::{Category, Product};
use crate::state::AppState;

/// Listing filter.
#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub subcategory: Option<String>,
}

/// A category with its products.
#[derive(Debug, Serialize)]
pub struct CategoryView {
    #[serde(flatten)]
    pub category: Category,
    pub products: Vec<Product>,
}

/// List products, optionally filtered by category and subcategory.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<Product>>> {
    let catalog = state.catalog();
    let Some(category) = query.category.as_deref().filter(|c| !c.is_empty()) else {
        return Ok(Json(catalog.products().to_vec()));
    };

    if catalog.category(category).is_none() {
        return Err(AppError::NotFound(format!("category {category}")));
    }
    let subcategory = query.subcategory.as_deref().filter(|s| !s.is_empty());
    Ok(Json(
        catalog
            .products_in(category, subcategory)
            .cloned()
            .collect(),
    ))
}

/// Product detail.
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Product>> {
    state
        .catalog()
        .product(&ProductId::new(id.as_str()))
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// List categories.
pub async fn categories(State(state): State<AppState>) -> Json<Vec<Category>> {
    Json(state.catalog().categories().to_vec())
}

/// Category detail with its products.
pub async fn category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CategoryView>> {
    let catalog = state.catalog();
    let category = catalog
        .category(&id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("category {id}")))?;
    let products = catalog.products_in(&category.id, None).cloned().collect();

    Ok(Json(CategoryView { category, products }))
}
