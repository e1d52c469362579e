//! # Pipeline Error Types
//!
//! Error types for the analysis and generation pipeline. Most per-item
//! failures are normalized to defaults or dropped rather than raised; these
//! variants cover the cases that must be told apart at the boundary: the one
//! hard parse failure, missing credentials, and transient provider trouble.

/// Errors surfaced by provider calls and response parsing
#[derive(Debug, Clone)]
pub enum PipelineError {
    /// Recipe response had no usable `recipes` array
    MalformedRecipeResponse(String),
    /// Provider API key absent from the environment
    MissingCredentials(String),
    /// Provider returned an HTTP error or unusable body
    Provider(String),
    /// Fetching or decoding a photo failed
    ImageFetch(String),
    /// A provider call exceeded its timeout
    Timeout(String),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::MalformedRecipeResponse(msg) => {
                write!(f, "Malformed recipe response: {msg}")
            }
            PipelineError::MissingCredentials(msg) => write!(f, "Missing credentials: {msg}"),
            PipelineError::Provider(msg) => write!(f, "Provider error: {msg}"),
            PipelineError::ImageFetch(msg) => write!(f, "Image fetch error: {msg}"),
            PipelineError::Timeout(msg) => write!(f, "Timeout error: {msg}"),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<reqwest::Error> for PipelineError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PipelineError::Timeout(err.to_string())
        } else {
            PipelineError::Provider(err.to_string())
        }
    }
}
