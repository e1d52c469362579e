//! # Ingredient Normalizer
//!
//! Maps a raw ingredient token to its canonical string form. Normalization
//! lower-cases and trims the input, strips punctuation, collapses whitespace
//! runs, then applies an ordered table of canonicalization rules.
//!
//! ## Features
//!
//! - Singular/plural unification for common produce ("tomato" -> "tomatoes")
//! - Category collapses (oil variants -> "olive oil", leafy greens ->
//!   "lettuce", pepper variants -> "peppers", cheese variants -> "cheese")
//! - Idempotent: `normalize(normalize(x)) == normalize(x)`

use lazy_static::lazy_static;
use log::trace;
use regex::Regex;

// Lazy static regexes to avoid recompilation
lazy_static! {
    static ref PUNCTUATION: Regex =
        Regex::new(r"[^\p{L}\p{N}\s]+").expect("Punctuation pattern should be valid");
    static ref WHITESPACE_RUNS: Regex =
        Regex::new(r"\s+").expect("Whitespace pattern should be valid");
}

/// Ordered canonicalization rules, tested first to last. A rule fires when the
/// cleaned string equals the pattern or contains it as a substring; the first
/// match wins. Singular/plural unification comes before category collapses,
/// and guard entries (mapping a term to itself) precede broader substrings
/// they would otherwise be captured by.
const CANON_RULES: &[(&str, &str)] = &[
    // Guards for substring collisions
    ("eggplant", "eggplant"),
    ("pineapple", "pineapple"),
    ("sweet potato", "sweet potatoes"),
    // Singular -> plural unification
    ("egg", "eggs"),
    ("tomato", "tomatoes"),
    ("onion", "onions"),
    ("carrot", "carrots"),
    ("apple", "apples"),
    ("avocado", "avocados"),
    ("banana", "bananas"),
    ("potato", "potatoes"),
    ("cucumber", "cucumbers"),
    ("mushroom", "mushrooms"),
    // Oil variants
    ("vegetable oil", "olive oil"),
    ("canola oil", "olive oil"),
    ("sunflower oil", "olive oil"),
    ("cooking oil", "olive oil"),
    // Leafy greens
    ("romaine", "lettuce"),
    ("iceberg", "lettuce"),
    ("mixed greens", "lettuce"),
    ("salad greens", "lettuce"),
    ("lettuce", "lettuce"),
    // Pepper variants
    ("pepper", "peppers"),
    // Cheese variants
    ("cheddar", "cheese"),
    ("mozzarella", "cheese"),
    ("parmesan", "cheese"),
    ("feta", "cheese"),
    ("cheese", "cheese"),
];

/// Normalize a raw ingredient token into its canonical form
///
/// Always returns a string; input with no matching rule comes back cleaned
/// but otherwise unchanged.
///
/// # Examples
///
/// ```rust
/// use fridgechef::normalize::normalize;
///
/// assert_eq!(normalize("  Tomato!"), "tomatoes");
/// assert_eq!(normalize("Red Bell Peppers"), "peppers");
/// assert_eq!(normalize("milk"), "milk");
/// ```
pub fn normalize(raw: &str) -> String {
    let cleaned = clean(raw);

    for (pattern, replacement) in CANON_RULES {
        if cleaned == *pattern || cleaned.contains(pattern) {
            trace!(
                "Canonicalization rule '{}' fired: '{}' -> '{}'",
                pattern,
                cleaned,
                replacement
            );
            return (*replacement).to_string();
        }
    }

    cleaned
}

/// Lower-case, strip punctuation and collapse internal whitespace runs
fn clean(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let stripped = PUNCTUATION.replace_all(&lowered, "");
    WHITESPACE_RUNS
        .replace_all(stripped.trim(), " ")
        .into_owned()
}
