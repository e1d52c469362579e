//! # Recipe Matcher
//!
//! Scores candidate recipes by how many additional ingredients the user would
//! need to buy, and filters/ranks them under a pantry-size-adaptive tolerance
//! policy. Matching is a symmetric case-insensitive substring test, loose on
//! purpose so phrase variants like "red bell peppers" still satisfy
//! "peppers". Known limitation: substrings produce the occasional false
//! positive ("pea" matches "peanut").

use crate::model::{Recipe, RecipeWithMissing};
use log::debug;

/// Compute the recipe ingredients not satisfiable from the available set
///
/// A recipe ingredient counts as available when some pantry item contains it
/// or is contained by it, case-insensitively. Returns the ordered missing
/// sublist and its length.
///
/// # Examples
///
/// ```rust
/// use fridgechef::matcher::score_missing;
///
/// let available = vec!["tomatoes".to_string(), "onions".to_string(), "olive oil".to_string()];
/// let recipe = vec!["tomatoes".to_string(), "garlic".to_string(), "olive oil".to_string()];
/// let (missing, count) = score_missing(&recipe, &available);
/// assert_eq!(missing, vec!["garlic"]);
/// assert_eq!(count, 1);
/// ```
pub fn score_missing(
    recipe_ingredients: &[String],
    available: &[String],
) -> (Vec<String>, usize) {
    let available_lower: Vec<String> = available.iter().map(|a| a.to_lowercase()).collect();

    let missing: Vec<String> = recipe_ingredients
        .iter()
        .filter(|ingredient| {
            let needle = ingredient.to_lowercase();
            !available_lower
                .iter()
                .any(|have| have.contains(&needle) || needle.contains(have.as_str()))
        })
        .cloned()
        .collect();

    let count = missing.len();
    (missing, count)
}

/// Maximum tolerated missing-ingredient count as a function of pantry size
///
/// Small pantries get more lenient matching so the user is not shown zero
/// results: sizes up to 3 tolerate `min(3, size + 2)` missing ingredients,
/// larger pantries tolerate 2.
///
/// # Examples
///
/// ```rust
/// use fridgechef::matcher::adaptive_threshold;
///
/// assert_eq!(adaptive_threshold(0), 2);
/// assert_eq!(adaptive_threshold(3), 3);
/// assert_eq!(adaptive_threshold(4), 2);
/// ```
pub fn adaptive_threshold(pantry_size: usize) -> usize {
    if pantry_size <= 3 {
        3.min(pantry_size + 2)
    } else {
        2
    }
}

/// Filter and rank candidate recipes against the available ingredients
///
/// Recipes whose missing count exceeds the adaptive threshold are dropped;
/// survivors are sorted ascending by missing count with a stable sort, so
/// perfect matches surface first and ties keep generation order.
pub fn rank_recipes(recipes: Vec<Recipe>, available: &[String]) -> Vec<RecipeWithMissing> {
    let threshold = adaptive_threshold(available.len());
    debug!(
        "Ranking {} candidate recipes against {} available ingredients (threshold {})",
        recipes.len(),
        available.len(),
        threshold
    );

    let mut ranked: Vec<RecipeWithMissing> = recipes
        .into_iter()
        .filter_map(|recipe| {
            let (missing_ingredients, missing_count) =
                score_missing(&recipe.ingredients, available);
            if missing_count <= threshold {
                Some(RecipeWithMissing {
                    recipe,
                    missing_ingredients,
                    missing_count,
                })
            } else {
                debug!(
                    "Recipe '{}' dropped: {} missing ingredients",
                    recipe.title, missing_count
                );
                None
            }
        })
        .collect();

    ranked.sort_by_key(|r| r.missing_count);
    ranked
}
