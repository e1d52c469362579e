//! # Recipe Response Parser
//!
//! Extracts structured recipes from the generation model's free-text
//! response. Unlike the vision parser there is no safe fallback shape for a
//! recipe, so a response without a usable `recipes` array is a hard
//! `MalformedRecipeResponse` error. Individual fields inside each recipe are
//! the opposite: missing or wrong-typed values are silently coerced to
//! defaults, never raised.

use crate::json_span::extract_json_object;
use crate::model::{Difficulty, Recipe};
use crate::pipeline_errors::PipelineError;
use chrono::Utc;
use log::{debug, info};
use serde_json::Value;

const DEFAULT_TITLE: &str = "Untitled Recipe";
const DEFAULT_PREP_MINUTES: u32 = 15;
const DEFAULT_COOK_MINUTES: u32 = 30;
const DEFAULT_SERVINGS: u32 = 4;
const DEFAULT_CUISINE: &str = "International";

/// Parse a raw generation response into recipes
///
/// Locates the first balanced JSON span, requires a top-level `recipes`
/// array, and coerces each entry into a [`Recipe`] with explicit defaults.
/// Each recipe gets a fresh id unique within this batch only.
pub fn parse_recipe_response(raw: &str) -> Result<Vec<Recipe>, PipelineError> {
    let span = extract_json_object(raw).ok_or_else(|| {
        PipelineError::MalformedRecipeResponse("no JSON object in response".to_string())
    })?;

    let value: Value = serde_json::from_str(span).map_err(|e| {
        PipelineError::MalformedRecipeResponse(format!("invalid JSON: {e}"))
    })?;

    let entries = value
        .get("recipes")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            PipelineError::MalformedRecipeResponse("missing recipes array".to_string())
        })?;

    let batch = Utc::now().timestamp_millis();
    let recipes: Vec<Recipe> = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| coerce_recipe(entry, batch, index))
        .collect();

    info!("Parsed {} recipes from generation response", recipes.len());
    Ok(recipes)
}

/// Coerce one raw recipe object into the Recipe shape
fn coerce_recipe(entry: &Value, batch: i64, index: usize) -> Recipe {
    let title = entry
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_TITLE)
        .to_string();

    debug!("Coercing recipe {}: '{}'", index, title);

    Recipe {
        id: format!("{batch}-{index}"),
        title,
        description: entry
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        ingredients: string_list(entry.get("ingredients")).unwrap_or_default(),
        instructions: string_list(entry.get("instructions")).unwrap_or_default(),
        prep_time: minutes(entry.get("prep_time"), DEFAULT_PREP_MINUTES),
        cook_time: minutes(entry.get("cook_time"), DEFAULT_COOK_MINUTES),
        servings: positive_count(entry.get("servings"), DEFAULT_SERVINGS),
        cuisine: string_list(entry.get("cuisine"))
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| vec![DEFAULT_CUISINE.to_string()]),
        dietary_tags: string_list(entry.get("dietary_tags")).unwrap_or_default(),
        difficulty: Difficulty::from_raw(entry.get("difficulty").and_then(Value::as_str)),
        tips: string_list(entry.get("tips")),
        variations: string_list(entry.get("variations")),
    }
}

/// Coerce a value into a list of strings; None when it is not an array
fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    let entries = value?.as_array()?;
    Some(
        entries
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
    )
}

/// Coerce a minutes field, clamping negatives to zero
fn minutes(value: Option<&Value>, default: u32) -> u32 {
    match value.and_then(Value::as_i64) {
        Some(n) if n < 0 => 0,
        Some(n) => u32::try_from(n).unwrap_or(default),
        None => default,
    }
}

/// Coerce a positive integer field, falling back to the default
fn positive_count(value: Option<&Value>, default: u32) -> u32 {
    match value.and_then(Value::as_i64) {
        Some(n) if n >= 1 => u32::try_from(n).unwrap_or(default),
        _ => default,
    }
}
