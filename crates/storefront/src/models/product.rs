//! Catalog domain types.

use serde::{Deserialize, Serialize};

use greengrocer_core::{Price, ProductId};

/// An immutable catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub image_url: String,
    /// Short alt-text style hint for the product image.
    pub image_hint: String,
    /// Id of the owning [`Category`].
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    pub stock: u32,
}

/// A top-level product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub subcategories: Vec<String>,
}
