//! # fridgechef
//!
//! Derives edible ingredients from photos of a refrigerator or pantry via a
//! vision model, then generates recipes constrained to (mostly) those
//! ingredients. The interesting part is the deterministic post-processing
//! pipeline: normalization, validation, deduplication, response parsing and
//! missing-ingredient scoring over noisy model output.

pub mod analysis;
pub mod circuit_breaker;
pub mod dedupe;
pub mod image_fetch;
pub mod json_span;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod pipeline_errors;
pub mod provider_config;
pub mod providers;
pub mod recipe_parser;
pub mod server;
pub mod validate;
pub mod vision_parser;
