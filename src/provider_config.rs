//! # Provider Configuration Module
//!
//! Configuration structures for the vision and recipe-generation provider
//! calls, including recovery settings, batch limits, and model parameters.

// Constants for provider configuration
pub const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const DEFAULT_VISION_MODEL: &str = "claude-3-5-sonnet-20241022";
pub const DEFAULT_RECIPE_MODEL: &str = "claude-3-5-haiku-20241022";
pub const DEFAULT_MAX_TOKENS: u32 = 2048;
pub const MAX_IMAGES_PER_BATCH: usize = 5;
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024; // 10MB limit for fetched photos
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.7;
pub const DEFAULT_RECIPE_COUNT: usize = 3;

/// Recovery configuration for provider error handling
#[derive(Debug, Clone)]
pub struct RecoveryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Base delay between retries in milliseconds
    pub base_retry_delay_ms: u64,
    /// Maximum delay between retries in milliseconds
    pub max_retry_delay_ms: u64,
    /// Timeout for a single provider call in seconds
    pub call_timeout_secs: u64,
    /// Circuit breaker failure threshold
    pub circuit_breaker_threshold: u32,
    /// Circuit breaker reset timeout in seconds
    pub circuit_breaker_reset_secs: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_retry_delay_ms: 1000,  // 1 second
            max_retry_delay_ms: 10000,  // 10 seconds
            call_timeout_secs: 30,      // 30 seconds
            circuit_breaker_threshold: 5,
            circuit_breaker_reset_secs: 60, // 1 minute
        }
    }
}

/// Configuration for talking to the model provider
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Messages API endpoint
    pub api_url: String,
    /// API key; absence is a fatal configuration error at request time
    pub api_key: Option<String>,
    /// Model used for photo analysis
    pub vision_model: String,
    /// Model used for recipe generation
    pub recipe_model: String,
    /// Token budget per completion
    pub max_tokens: u32,
    /// Photos accepted per analysis batch
    pub max_images_per_batch: usize,
    /// Maximum fetched image size in bytes
    pub max_image_bytes: u64,
    /// Minimum confidence tier score for an ingredient to be included
    pub min_confidence: f32,
    /// Recovery and error handling configuration
    pub recovery: RecoveryConfig,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            recipe_model: DEFAULT_RECIPE_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            max_images_per_batch: MAX_IMAGES_PER_BATCH,
            max_image_bytes: MAX_IMAGE_BYTES,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            recovery: RecoveryConfig::default(),
        }
    }
}

impl ProviderConfig {
    /// Build a configuration from the environment
    ///
    /// Reads `ANTHROPIC_API_KEY`; a missing key is not an error here, it is
    /// surfaced when a request actually needs the provider.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("ANTHROPIC_API_KEY").ok(),
            ..Self::default()
        }
    }
}
