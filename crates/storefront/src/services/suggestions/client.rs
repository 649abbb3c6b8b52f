//! Anthropic Messages API client for category suggestions.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::error::{ApiErrorResponse, SuggestionError};
use super::{CategorySuggester, MAX_CATEGORIES, SuggestionRequest, parse_categories};
use crate::config::SuggestionConfig;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 512;

const SYSTEM_PROMPT: &str = "You are an expert in grocery product categorization. \
Respond only with a JSON object of the form {\"categories\": [\"...\"]}.";

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [UserMessage<'a>; 1],
}

#[derive(Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: Vec<RequestBlock<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RequestBlock<'a> {
    Image { source: ImageSource<'a> },
    Text { text: String },
}

#[derive(Serialize)]
struct ImageSource<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    media_type: &'a str,
    data: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseBlock>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ResponseBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

/// Category suggester backed by Claude.
#[derive(Clone)]
pub struct ClaudeSuggester {
    inner: Arc<ClaudeSuggesterInner>,
}

struct ClaudeSuggesterInner {
    client: reqwest::Client,
    model: String,
}

impl ClaudeSuggester {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not a valid header value or the
    /// HTTP client cannot be built.
    pub fn new(config: &SuggestionConfig) -> Result<Self, SuggestionError> {
        let mut api_key = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|e| SuggestionError::InvalidApiKey(e.to_string()))?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("x-api-key", api_key);
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(ClaudeSuggesterInner {
                client,
                model: config.model.clone(),
            }),
        })
    }

    async fn handle_error_status(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> SuggestionError {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return SuggestionError::RateLimited(retry_after);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return SuggestionError::Unauthorized("Invalid API key".to_string());
        }

        match response.text().await {
            Ok(body) => serde_json::from_str::<ApiErrorResponse>(&body).map_or_else(
                |_| SuggestionError::Api {
                    error_type: "unknown".to_string(),
                    message: body.clone(),
                },
                |api_error| SuggestionError::Api {
                    error_type: api_error.error.error_type,
                    message: api_error.error.message,
                },
            ),
            Err(e) => SuggestionError::Http(e),
        }
    }
}

fn prompt(description: &str) -> String {
    format!(
        "Based on the product image and description, suggest up to {MAX_CATEGORIES} relevant \
         categories.\n\nProduct Description: {description}"
    )
}

#[async_trait]
impl CategorySuggester for ClaudeSuggester {
    #[instrument(skip(self, request), fields(model = %self.inner.model))]
    async fn suggest(&self, request: &SuggestionRequest) -> Result<Vec<String>, SuggestionError> {
        let body = MessagesRequest {
            model: &self.inner.model,
            max_tokens: MAX_TOKENS,
            system: SYSTEM_PROMPT,
            messages: [UserMessage {
                role: "user",
                content: vec![
                    RequestBlock::Image {
                        source: ImageSource {
                            kind: "base64",
                            media_type: &request.image.media_type,
                            data: &request.image.data,
                        },
                    },
                    RequestBlock::Text {
                        text: prompt(&request.description),
                    },
                ],
            }],
        };

        let response = self
            .inner
            .client
            .post(ANTHROPIC_API_URL)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::handle_error_status(status, response).await);
        }

        let reply: MessagesResponse = response
            .json()
            .await
            .map_err(|e| SuggestionError::Parse(format!("Failed to parse response: {e}")))?;
        let text = reply
            .content
            .into_iter()
            .find_map(|block| match block {
                ResponseBlock::Text { text } => Some(text),
                ResponseBlock::Other => None,
            })
            .ok_or_else(|| SuggestionError::Parse("reply has no text block".to_owned()))?;

        let categories = parse_categories(&text)?;
        tracing::debug!(count = categories.len(), "categories suggested");
        Ok(categories)
    }
}
