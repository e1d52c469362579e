//! # Ingredient Validator
//!
//! Decides whether a raw token names an acceptable concrete ingredient.
//! Generic category words ("vegetables"), container words ("jar") and
//! non-food tokens are rejected, and an optional free-text dietary
//! restriction string switches on substring-based exclusion lists.
//!
//! All checks are case-insensitive and substring-based where noted; the
//! function is a pure predicate and never fails.

use log::debug;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Generic, category, container and vague terms that are never acceptable as
/// concrete ingredients. Matched against the whole lowercased token.
static GENERIC_TERMS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        // Category words
        "fruit",
        "fruits",
        "vegetable",
        "vegetables",
        "condiment",
        "condiments",
        "oils",
        "sauces",
        "spices",
        "seasonings",
        "herbs",
        "drinks",
        "beverages",
        "snacks",
        "dairy",
        "produce",
        "groceries",
        "leftovers",
        // Container words
        "container",
        "containers",
        "jar",
        "jars",
        "bottle",
        "bottles",
        "can",
        "cans",
        "box",
        "boxes",
        "bag",
        "bags",
        "package",
        "packages",
        "carton",
        "cartons",
        "tub",
        "tubs",
        // Vague / non-food tokens
        "various",
        "assorted",
        "misc",
        "miscellaneous",
        "item",
        "items",
        "food",
        "foods",
        "ingredient",
        "ingredients",
        "stuff",
        "things",
        "other",
        "unknown",
        "unclear",
        "none",
    ])
});

/// Animal products excluded under a vegan restriction
static VEGAN_EXCLUSIONS: &[&str] = &[
    "milk", "cheese", "butter", "yogurt", "cream", "eggs", "honey", "meat", "chicken", "beef",
    "pork", "fish", "salmon", "tuna", "bacon",
];

/// Meat products excluded under a vegetarian restriction
static VEGETARIAN_EXCLUSIONS: &[&str] = &[
    "meat", "chicken", "beef", "pork", "fish", "salmon", "tuna", "bacon", "ham", "turkey",
];

/// Gluten sources excluded under a gluten-free restriction
static GLUTEN_EXCLUSIONS: &[&str] = &[
    "bread", "pasta", "flour", "wheat", "barley", "rye", "soy sauce",
];

/// Check whether a token is an acceptable concrete ingredient
///
/// Rejects tokens shorter than two characters, tokens without any alphabetic
/// character, and exact matches against the generic-term blocklist. When a
/// dietary restriction string is supplied, the matching exclusion lists are
/// applied as case-insensitive substring checks: "vegan" excludes animal
/// products, otherwise "vegetarian" excludes meat, and "gluten-free"
/// independently excludes gluten sources.
///
/// # Examples
///
/// ```rust
/// use fridgechef::validate::is_valid_ingredient;
///
/// assert!(is_valid_ingredient("tomatoes", None));
/// assert!(!is_valid_ingredient("vegetables", None));
/// assert!(!is_valid_ingredient("chicken breast", Some("vegan")));
/// assert!(is_valid_ingredient("tofu", Some("vegan")));
/// ```
pub fn is_valid_ingredient(ingredient: &str, dietary_restrictions: Option<&str>) -> bool {
    let name = ingredient.trim().to_lowercase();

    if name.len() < 2 {
        debug!("Rejected ingredient '{}': too short", ingredient);
        return false;
    }

    if !name.chars().any(|c| c.is_alphabetic()) {
        debug!("Rejected ingredient '{}': no alphabetic character", ingredient);
        return false;
    }

    if GENERIC_TERMS.contains(name.as_str()) {
        debug!("Rejected ingredient '{}': generic term", ingredient);
        return false;
    }

    if let Some(restrictions) = dietary_restrictions {
        let restrictions = restrictions.to_lowercase();

        if restrictions.contains("vegan") {
            if contains_any(&name, VEGAN_EXCLUSIONS) {
                debug!("Rejected ingredient '{}': vegan restriction", ingredient);
                return false;
            }
        } else if restrictions.contains("vegetarian")
            && contains_any(&name, VEGETARIAN_EXCLUSIONS)
        {
            debug!("Rejected ingredient '{}': vegetarian restriction", ingredient);
            return false;
        }

        if restrictions.contains("gluten-free") && contains_any(&name, GLUTEN_EXCLUSIONS) {
            debug!("Rejected ingredient '{}': gluten-free restriction", ingredient);
            return false;
        }
    }

    true
}

fn contains_any(name: &str, exclusions: &[&str]) -> bool {
    exclusions.iter().any(|term| name.contains(term))
}
