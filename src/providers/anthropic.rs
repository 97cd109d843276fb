use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::model::{AgeRating, MediaSource, MovieMetadata};

use super::{EnrichmentOptions, Enricher, SubtitleData};

const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

// First JSON object in a completion; models sometimes wrap it in prose or fences
static JSON_OBJECT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("Invalid JSON object regex"));

/// Anthropic Messages API client
#[derive(Debug, Clone)]
pub struct Anthropic {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL, empty for the public API
    endpoint: String,
}

/// Anthropic message request
#[derive(Debug, Serialize)]
pub struct AnthropicRequest {
    model: String,
    messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    max_tokens: u32,
}

/// Anthropic message format
#[derive(Debug, Serialize, Deserialize)]
pub struct AnthropicMessage {
    /// Role of the message sender (user, assistant)
    pub role: String,
    pub content: String,
}

/// Token usage information
#[derive(Debug, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Anthropic response
#[derive(Debug, Deserialize)]
pub struct AnthropicResponse {
    pub content: Vec<AnthropicContent>,
    pub usage: TokenUsage,
}

/// Individual content block in an Anthropic response
#[derive(Debug, Deserialize)]
pub struct AnthropicContent {
    #[serde(rename = "type")]
    pub content_type: String,
    #[serde(default)]
    pub text: String,
}

impl AnthropicRequest {
    pub fn new(model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            system: None,
            temperature: Some(0.7),
            max_tokens,
        }
    }

    /// Add a message to the request
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(AnthropicMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

impl Anthropic {
    /// Create a new client with a request timeout
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    fn messages_url(&self) -> String {
        let base = if self.endpoint.is_empty() {
            DEFAULT_ENDPOINT
        } else {
            self.endpoint.trim_end_matches('/')
        };
        format!("{}/v1/messages", base)
    }

    /// Complete a messages request
    pub async fn complete(&self, request: AnthropicRequest) -> Result<AnthropicResponse, ProviderError> {
        let response = self
            .client
            .post(self.messages_url())
            .header("Content-Type", "application/json")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    ProviderError::ConnectionError(e.to_string())
                } else {
                    ProviderError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Anthropic API error ({}): {}", status, error_text);
            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                return Err(ProviderError::AuthenticationError(error_text));
            }
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        response
            .json::<AnthropicResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))
    }

    /// Concatenate the text blocks of a response
    pub fn extract_text_from_response(response: &AnthropicResponse) -> String {
        response
            .content
            .iter()
            .filter(|c| c.content_type == "text")
            .map(|c| c.text.as_str())
            .collect()
    }
}

/// Metadata fields as the model returns them
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SuggestedMetadata {
    title: Option<String>,
    description: Option<String>,
    genre: Option<String>,
    age_rating: Option<String>,
}

/// Metadata enricher backed by the Messages API.
///
/// Only text is available to the model, so suggestions are derived from the
/// media's file name and the current metadata.
#[derive(Debug, Clone)]
pub struct AnthropicEnricher {
    client: Anthropic,
    model: String,
}

impl AnthropicEnricher {
    pub fn new(client: Anthropic, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    fn metadata_prompt(media: &MediaSource, options: &EnrichmentOptions, current: &MovieMetadata) -> String {
        let mut fields = Vec::new();
        if options.title {
            fields.push("\"title\": a catchy title");
        }
        if options.description {
            fields.push("\"description\": a one-paragraph synopsis");
        }
        if options.genre {
            fields.push("\"genre\": a single genre");
        }
        if options.rating {
            fields.push("\"ageRating\": one of L, 10, 12, 14, 16, 18");
        }
        format!(
            "Suggest catalog metadata for a video file named \"{}\".\n\
             Current title: {}\nCurrent description: {}\nCurrent genre: {}\n\n\
             Answer with a single JSON object containing only these keys:\n{}",
            media.stem().unwrap_or_else(|| media.label()),
            current.title,
            current.description,
            current.genre,
            fields.join("\n")
        )
    }
}

/// Parse the model's JSON answer and merge the requested fields into `current`
pub(crate) fn apply_suggestion(
    text: &str,
    options: &EnrichmentOptions,
    current: &MovieMetadata,
) -> Result<MovieMetadata, ProviderError> {
    let json = JSON_OBJECT_REGEX
        .find(text)
        .ok_or_else(|| ProviderError::ParseError("no JSON object in completion".to_string()))?;
    let suggested: SuggestedMetadata =
        serde_json::from_str(json.as_str()).map_err(|e| ProviderError::ParseError(e.to_string()))?;

    let mut merged = current.clone();
    if options.title {
        if let Some(title) = suggested.title.filter(|t| !t.trim().is_empty()) {
            merged.title = title;
        }
    }
    if options.description {
        if let Some(description) = suggested.description {
            merged.description = description;
        }
    }
    if options.genre {
        if let Some(genre) = suggested.genre {
            merged.genre = genre;
        }
    }
    if options.rating {
        if let Some(rating) = suggested.age_rating {
            merged.age_rating = rating
                .parse::<AgeRating>()
                .map_err(|e| ProviderError::ParseError(e.to_string()))?;
        }
    }
    Ok(merged)
}

#[async_trait]
impl Enricher for AnthropicEnricher {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn generate_metadata(
        &self,
        media: &MediaSource,
        options: &EnrichmentOptions,
        current: &MovieMetadata,
    ) -> Result<MovieMetadata, ProviderError> {
        if !options.wants_metadata() {
            return Ok(current.clone());
        }

        let request = AnthropicRequest::new(&self.model, 1024)
            .system("You write concise catalog metadata for short videos. Reply with JSON only.")
            .temperature(0.4)
            .add_message("user", Self::metadata_prompt(media, options, current));

        let response = self.client.complete(request).await?;
        debug!(
            "Metadata completion used {} input / {} output tokens",
            response.usage.input_tokens, response.usage.output_tokens
        );
        apply_suggestion(&Anthropic::extract_text_from_response(&response), options, current)
    }

    async fn generate_subtitles(&self, _media: &MediaSource) -> Result<SubtitleData, ProviderError> {
        Err(ProviderError::Unsupported("subtitle transcription".to_string()))
    }

    async fn generate_thumbnail(
        &self,
        _title: &str,
        _genre: &str,
        _description: &str,
    ) -> Result<Option<String>, ProviderError> {
        Err(ProviderError::Unsupported("thumbnail generation".to_string()))
    }
}
