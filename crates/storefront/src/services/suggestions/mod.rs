//! Product category suggestions from a hosted vision model.
//!
//! The model sees a product photo and its description and returns up to
//! [`MAX_CATEGORIES`] category names. Input is checked locally first so the
//! API is never called with an unusable image.

pub mod client;
pub mod error;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;

pub use client::ClaudeSuggester;
pub use error::SuggestionError;

/// Upper bound on returned categories.
pub const MAX_CATEGORIES: usize = 5;

/// A base64 image taken from a `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// MIME type, always `image/*`.
    pub media_type: String,
    /// Base64 payload, as submitted.
    pub data: String,
}

impl ImageData {
    /// Parse `data:<mime>;base64,<payload>`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the URI is not a base64 image data URI or
    /// the payload does not decode.
    pub fn from_data_uri(uri: &str) -> Result<Self, SuggestionError> {
        const INVALID: SuggestionError =
            SuggestionError::InvalidInput("Photo must be a base64 image data URI.");

        let rest = uri.trim().strip_prefix("data:").ok_or(INVALID)?;
        let (media_type, data) = rest.split_once(";base64,").ok_or(INVALID)?;
        if !media_type.starts_with("image/") || media_type.len() <= "image/".len() {
            return Err(INVALID);
        }
        if data.is_empty() || STANDARD.decode(data).is_err() {
            return Err(INVALID);
        }

        Ok(Self {
            media_type: media_type.to_owned(),
            data: data.to_owned(),
        })
    }
}

/// Validated suggestion request.
#[derive(Debug, Clone)]
pub struct SuggestionRequest {
    pub image: ImageData,
    pub description: String,
}

impl SuggestionRequest {
    /// Validate the raw form values.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a bad data URI or a blank description.
    pub fn new(photo_data_uri: &str, description: &str) -> Result<Self, SuggestionError> {
        let image = ImageData::from_data_uri(photo_data_uri)?;
        let description = description.trim();
        if description.is_empty() {
            return Err(SuggestionError::InvalidInput("Description is required."));
        }
        Ok(Self {
            image,
            description: description.to_owned(),
        })
    }
}

/// Something that can suggest categories for a product.
#[async_trait]
pub trait CategorySuggester: Send + Sync {
    /// Suggest at most [`MAX_CATEGORIES`] categories.
    async fn suggest(&self, request: &SuggestionRequest) -> Result<Vec<String>, SuggestionError>;
}

#[derive(Deserialize)]
struct CategoriesReply {
    categories: Vec<String>,
}

/// Extract the category list from a model reply.
///
/// Accepts a bare JSON object or one surrounded by prose or code fences.
/// Blank entries are dropped and the list is truncated to [`MAX_CATEGORIES`].
///
/// # Errors
///
/// Returns `Parse` if no `{"categories": [...]}` object can be found.
pub fn parse_categories(text: &str) -> Result<Vec<String>, SuggestionError> {
    let start = text
        .find('{')
        .ok_or_else(|| SuggestionError::Parse("no JSON object in reply".to_owned()))?;
    let end = text
        .rfind('}')
        .filter(|&end| end > start)
        .ok_or_else(|| SuggestionError::Parse("unterminated JSON object in reply".to_owned()))?;
    let json = text.get(start..=end).unwrap_or_default();

    let reply: CategoriesReply = serde_json::from_str(json)
        .map_err(|e| SuggestionError::Parse(format!("invalid category reply: {e}")))?;

    Ok(reply
        .categories
        .into_iter()
        .map(|c| c.trim().to_owned())
        .filter(|c| !c.is_empty())
        .take(MAX_CATEGORIES)
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PIXEL: &str = "data:image/png;base64,iVBORw0KGgo=";

    #[test]
    fn test_data_uri_parsing() {
        let image = ImageData::from_data_uri(PIXEL).unwrap();
        assert_eq!(image.media_type, "image/png");
        assert_eq!(image.data, "iVBORw0KGgo=");

        for bad in [
            "",
            "iVBORw0KGgo=",
            "data:text/plain;base64,aGVsbG8=",
            "data:image/png,iVBORw0KGgo=",
            "data:image/png;base64,@@not-base64@@",
            "data:image/;base64,iVBORw0KGgo=",
        ] {
            assert!(ImageData::from_data_uri(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_request_requires_description() {
        assert!(SuggestionRequest::new(PIXEL, "  ").is_err());
        assert_eq!(
            SuggestionRequest::new(PIXEL, " Crisp red apples ")
                .unwrap()
                .description,
            "Crisp red apples"
        );
    }

    #[test]
    fn test_parse_categories_lenient() {
        let reply = "Sure!\n```json\n{\"categories\": [\"Fruit\", \" \", \"Apples\", \"Organic\", \"Fresh\", \"Produce\", \"Snacks\"]}\n```";
        assert_eq!(
            parse_categories(reply).unwrap(),
            ["Fruit", "Apples", "Organic", "Fresh", "Produce"]
        );
    }

    #[test]
    fn test_parse_categories_rejects_garbage() {
        assert!(parse_categories("I cannot help with that.").is_err());
        assert!(parse_categories("{\"labels\": []}").is_err());
    }
}
