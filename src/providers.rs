//! # Model Provider Clients
//!
//! Traits for the two external model calls the pipeline makes (photo
//! analysis and recipe generation) plus the Claude Messages API client that
//! implements both. Calls are guarded by a circuit breaker and retried with
//! exponential backoff and random jitter; a per-call timeout is treated as a
//! transient failure like any other.

use crate::circuit_breaker::CircuitBreaker;
use crate::image_fetch::EncodedImage;
use crate::model::UserPreferences;
use crate::pipeline_errors::PipelineError;
use crate::provider_config::{ProviderConfig, ANTHROPIC_VERSION};
use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Vision model: turns photos into free text naming food items
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Ask the model to describe the given images, returning its raw text
    async fn describe_images(
        &self,
        images: &[EncodedImage],
        instruction: &str,
    ) -> Result<String, PipelineError>;
}

/// Text model: turns a generation prompt into free text expected to carry
/// a recipes JSON object
#[async_trait]
pub trait RecipeProvider: Send + Sync {
    /// Run a completion for the given prompt, returning its raw text
    async fn complete_prompt(&self, prompt: &str) -> Result<String, PipelineError>;
}

/// Claude Messages API request format
#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a [ContentBlock<'a>],
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ContentBlock<'a> {
    Image { source: ImageSource<'a> },
    Text { text: &'a str },
}

#[derive(Debug, Serialize)]
struct ImageSource<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    media_type: &'a str,
    data: &'a str,
}

/// Claude Messages API response format
#[derive(Debug, Deserialize)]
struct ApiResponse {
    content: Vec<ResponseBlock>,
}

#[derive(Debug, Deserialize)]
struct ResponseBlock {
    #[serde(default)]
    text: String,
}

/// Client for the Claude Messages API, implementing both provider traits
pub struct ClaudeClient {
    http: reqwest::Client,
    config: ProviderConfig,
    breaker: CircuitBreaker,
}

impl ClaudeClient {
    /// Create a client with the configured per-call timeout
    pub fn new(config: ProviderConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.recovery.call_timeout_secs))
            .build()?;
        let breaker = CircuitBreaker::new(&config.recovery);
        Ok(Self {
            http,
            config,
            breaker,
        })
    }

    /// Send one user message, retrying transient failures
    async fn send(
        &self,
        model: &str,
        content: &[ContentBlock<'_>],
    ) -> Result<String, PipelineError> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            PipelineError::MissingCredentials("ANTHROPIC_API_KEY is not set".to_string())
        })?;

        let recovery = &self.config.recovery;
        let mut attempt: u32 = 0;

        loop {
            if self.breaker.is_open() {
                return Err(PipelineError::Provider(
                    "circuit breaker open, failing fast".to_string(),
                ));
            }

            match self.try_send(api_key, model, content).await {
                Ok(text) => {
                    self.breaker.record_success();
                    return Ok(text);
                }
                Err(err) => {
                    self.breaker.record_failure();
                    if attempt >= recovery.max_retries {
                        return Err(err);
                    }

                    let backoff = recovery
                        .base_retry_delay_ms
                        .saturating_mul(1u64 << attempt.min(10))
                        .min(recovery.max_retry_delay_ms);
                    let jitter = rand::thread_rng().gen_range(0..=backoff / 4);
                    warn!(
                        attempt,
                        backoff_ms = backoff + jitter,
                        error = %err,
                        "Provider call failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(backoff + jitter)).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn try_send(
        &self,
        api_key: &str,
        model: &str,
        content: &[ContentBlock<'_>],
    ) -> Result<String, PipelineError> {
        let request = ApiRequest {
            model,
            max_tokens: self.config.max_tokens,
            messages: [Message {
                role: "user",
                content,
            }],
        };

        debug!(model, blocks = content.len(), "Sending provider request");

        let response = self
            .http
            .post(&self.config.api_url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::Provider(format!(
                "API error {status}: {body}"
            )));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::Provider(format!("unreadable response body: {e}")))?;

        Ok(api_response
            .content
            .iter()
            .map(|block| block.text.as_str())
            .collect::<Vec<_>>()
            .join(""))
    }
}

#[async_trait]
impl VisionProvider for ClaudeClient {
    async fn describe_images(
        &self,
        images: &[EncodedImage],
        instruction: &str,
    ) -> Result<String, PipelineError> {
        let mut content: Vec<ContentBlock> = images
            .iter()
            .map(|image| ContentBlock::Image {
                source: ImageSource {
                    kind: "base64",
                    media_type: &image.media_type,
                    data: &image.data,
                },
            })
            .collect();
        content.push(ContentBlock::Text { text: instruction });

        self.send(&self.config.vision_model, &content).await
    }
}

#[async_trait]
impl RecipeProvider for ClaudeClient {
    async fn complete_prompt(&self, prompt: &str) -> Result<String, PipelineError> {
        let content = [ContentBlock::Text { text: prompt }];
        self.send(&self.config.recipe_model, &content).await
    }
}

/// Build the instruction sent alongside each photo
pub fn vision_instruction(dietary_restrictions: Option<&str>) -> String {
    let dietary_clause = match dietary_restrictions {
        Some(restrictions) if !restrictions.trim().is_empty() => {
            format!("The user follows these dietary restrictions: {restrictions}. Skip items that clearly violate them.\n")
        }
        _ => String::new(),
    };

    format!(
        r#"Identify every edible food item visible in this photo of a refrigerator or pantry.
{dietary_clause}Name concrete ingredients ("cheddar cheese", "red bell peppers"), never categories ("dairy", "vegetables") or container words ("jar", "bottle").

Respond with ONLY a JSON object, no markdown:
{{"high_confidence": [{{"name": "...", "evidence": "..."}}], "medium_confidence": [{{"name": "...", "evidence": "..."}}]}}

Put clearly identifiable items under high_confidence and partially visible or uncertain items under medium_confidence."#
    )
}

/// Build the recipe-generation prompt
pub fn recipe_prompt(
    ingredients: &[String],
    preferences: &UserPreferences,
    count: usize,
) -> String {
    let dietary = preferences
        .dietary_preferences
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or("none");
    let cuisines = if preferences.food_genres.is_empty() {
        "any".to_string()
    } else {
        preferences.food_genres.join(", ")
    };

    format!(
        r#"Create {count} recipes using mostly these available ingredients:
{}

Dietary restrictions: {dietary}
Preferred cuisines: {cuisines}

Common pantry staples (salt, pepper, water) may be assumed. Keep additional ingredients to a minimum.

Respond with ONLY a JSON object of the form:
{{"recipes": [{{"title": "...", "description": "...", "ingredients": ["..."], "instructions": ["..."], "prep_time": 15, "cook_time": 30, "servings": 4, "cuisine": ["..."], "dietary_tags": ["..."], "difficulty": "easy", "tips": ["..."], "variations": ["..."]}}]}}"#,
        ingredients.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_block_serializes_to_api_shape() {
        let block = ContentBlock::Image {
            source: ImageSource {
                kind: "base64",
                media_type: "image/jpeg",
                data: "QUJD",
            },
        };
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["type"], "image");
        assert_eq!(value["source"]["type"], "base64");
        assert_eq!(value["source"]["media_type"], "image/jpeg");
        assert_eq!(value["source"]["data"], "QUJD");
    }

    #[test]
    fn test_text_block_serializes_to_api_shape() {
        let block = ContentBlock::Text { text: "hello" };
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["type"], "text");
        assert_eq!(value["text"], "hello");
    }

    #[test]
    fn test_vision_instruction_mentions_restrictions() {
        let instruction = vision_instruction(Some("vegan"));
        assert!(instruction.contains("vegan"));
        assert!(instruction.contains("high_confidence"));

        let plain = vision_instruction(None);
        assert!(!plain.contains("dietary restrictions"));
    }

    #[test]
    fn test_recipe_prompt_carries_parameters() {
        let preferences = UserPreferences {
            dietary_preferences: Some("vegetarian".to_string()),
            food_genres: vec!["Italian".to_string(), "Thai".to_string()],
        };
        let prompt = recipe_prompt(
            &["eggs".to_string(), "tomatoes".to_string()],
            &preferences,
            4,
        );
        assert!(prompt.contains("Create 4 recipes"));
        assert!(prompt.contains("eggs, tomatoes"));
        assert!(prompt.contains("vegetarian"));
        assert!(prompt.contains("Italian, Thai"));
    }

    #[test]
    fn test_recipe_prompt_defaults() {
        let prompt = recipe_prompt(&["rice".to_string()], &UserPreferences::default(), 3);
        assert!(prompt.contains("Dietary restrictions: none"));
        assert!(prompt.contains("Preferred cuisines: any"));
    }

    #[tokio::test]
    async fn test_missing_api_key_is_credentials_error() {
        let client = ClaudeClient::new(ProviderConfig::default()).unwrap();
        let err = client.complete_prompt("hello").await.unwrap_err();
        assert!(matches!(err, PipelineError::MissingCredentials(_)));
    }
}
