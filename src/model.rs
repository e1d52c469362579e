//! # Recipe and Ingredient Data Model
//!
//! Value types flowing through the analysis and generation pipeline. All of
//! them are immutable once produced and owned by the request/response cycle
//! that created them; nothing here is shared mutable state.
//!
//! ## Core Concepts
//!
//! - **DetectedIngredient**: a canonical ingredient name plus the confidence
//!   tier the vision model reported it under
//! - **Recipe**: a generated recipe with explicit defaults for every field
//! - **RecipeWithMissing**: a recipe decorated with the ingredients the user
//!   would still need to buy

use serde::{Deserialize, Serialize};
use std::fmt;

/// Confidence tier assigned from the section of the vision response an
/// ingredient came from. Used only to decide inclusion against a
/// caller-supplied threshold, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    /// Listed under `high_confidence` in a structured response
    High,
    /// Listed under `medium_confidence` in a structured response
    Medium,
    /// Recovered from unstructured text
    Default,
}

impl ConfidenceTier {
    /// Numeric score for threshold comparisons
    pub fn score(&self) -> f32 {
        match self {
            ConfidenceTier::High => 0.95,
            ConfidenceTier::Medium => 0.8,
            ConfidenceTier::Default => 0.7,
        }
    }
}

/// A normalized, validated ingredient together with its confidence tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedIngredient {
    /// Canonical ingredient name
    pub name: String,
    /// Which section of the vision response it came from
    pub tier: ConfidenceTier,
}

/// Recipe difficulty as reported by the generation model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Parse a raw difficulty value, falling back to medium for anything that
    /// is not exactly easy/medium/hard
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some("easy") => Difficulty::Easy,
            Some("medium") => Difficulty::Medium,
            Some("hard") => Difficulty::Hard,
            _ => Difficulty::Medium,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

/// A generated recipe
///
/// Ingredient phrases are free text as emitted by the model, not
/// canonicalized. Ids are unique within one generation batch only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    /// Preparation time in minutes
    #[serde(default)]
    pub prep_time: u32,
    /// Cooking time in minutes
    #[serde(default)]
    pub cook_time: u32,
    #[serde(default)]
    pub servings: u32,
    #[serde(default)]
    pub cuisine: Vec<String>,
    #[serde(default)]
    pub dietary_tags: Vec<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variations: Option<Vec<String>>,
}

/// A recipe decorated with the ingredients not covered by the user's pantry
///
/// Derived, never persisted; recomputed whenever the available set or the
/// candidate list changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeWithMissing {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub missing_ingredients: Vec<String>,
    pub missing_count: usize,
}

/// User preferences supplied by the preferences store
///
/// `dietary_preferences` is free text, possibly comma-joined tags;
/// `food_genres` is a list of cuisine names used to steer generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub dietary_preferences: Option<String>,
    #[serde(default)]
    pub food_genres: Vec<String>,
}
