//! # Ingredient Deduplicator
//!
//! Collapses near-duplicate ingredient strings into one representative per
//! equivalence group. Exact duplicates are caught by comparing normalized
//! forms; a small fixed table of equivalence groups additionally treats
//! spelling variants ("lemon"/"lemons") as the same ingredient. The first
//! occurrence of any member of a group wins and output preserves first-seen
//! order.

use crate::normalize::normalize;
use log::trace;
use std::collections::HashSet;

/// Equivalence groups: if any member has been seen, every other member is a
/// duplicate. Members are normalized forms.
const EQUIVALENCE_GROUPS: &[&[&str]] = &[
    &["lemon", "lemons"],
    &["lime", "limes"],
    &["fruit", "fruits"],
    &["oil", "oils", "olive oil"],
    &["juice", "juices"],
];

/// Remove duplicate ingredients, first occurrence wins
///
/// Total on any input list, including an empty one.
///
/// # Examples
///
/// ```rust
/// use fridgechef::dedupe::dedupe;
///
/// let input = vec!["lemon".to_string(), "lemons".to_string(), "lime".to_string()];
/// assert_eq!(dedupe(&input), vec!["lemon", "lime"]);
/// ```
pub fn dedupe(ingredients: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut result = Vec::new();

    for ingredient in ingredients {
        let form = normalize(ingredient);
        if is_duplicate(&seen, &form) {
            trace!("Dropping duplicate ingredient '{}'", ingredient);
            continue;
        }
        seen.insert(form);
        result.push(ingredient.clone());
    }

    result
}

/// Check a normalized form against the seen set, honoring equivalence groups
pub(crate) fn is_duplicate(seen: &HashSet<String>, form: &str) -> bool {
    if seen.contains(form) {
        return true;
    }

    for group in EQUIVALENCE_GROUPS {
        if group.contains(&form) {
            return group.iter().any(|member| seen.contains(*member));
        }
    }

    false
}
