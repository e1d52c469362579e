//! # Vision Response Parser
//!
//! Extracts a set of normalized, valid ingredient names from the vision
//! model's raw response. The model is asked for structured JSON but is not
//! format-reliable, so parsing degrades through three levels of decreasing
//! structure: typed-array JSON, then a comma-separated list, then an empty
//! set. This parser never fails on malformed input.

use crate::dedupe::is_duplicate;
use crate::json_span::extract_json_object;
use crate::model::{ConfidenceTier, DetectedIngredient};
use crate::normalize::normalize;
use crate::validate::is_valid_ingredient;
use log::{debug, info};
use serde_json::Value;
use std::collections::HashSet;

/// Explicit classification of what the vision model actually returned
#[derive(Debug, Clone, PartialEq)]
pub enum VisionResponse {
    /// A JSON object carrying `high_confidence`/`medium_confidence` arrays
    Structured(Value),
    /// Anything else with text in it, treated as a comma-separated list
    PlainText(String),
    /// Nothing usable at all
    Unparseable,
}

/// Classify a raw response before dispatching on its shape
pub fn classify(raw: &str) -> VisionResponse {
    if raw.trim().is_empty() {
        return VisionResponse::Unparseable;
    }

    if let Some(span) = extract_json_object(raw) {
        if let Ok(value) = serde_json::from_str::<Value>(span) {
            let has_tiers = value.get("high_confidence").map_or(false, Value::is_array)
                || value.get("medium_confidence").map_or(false, Value::is_array);
            if has_tiers {
                return VisionResponse::Structured(value);
            }
            debug!("JSON span found but confidence arrays absent, using text fallback");
        } else {
            debug!("JSON span found but unparseable, using text fallback");
        }
    }

    VisionResponse::PlainText(raw.to_string())
}

/// Parse a raw vision response into detected ingredients
///
/// Structured responses yield high/medium tiers per array; the comma-split
/// fallback tags everything with the default tier. Output is deduplicated by
/// normalized form (first occurrence wins); ordering is not guaranteed and
/// callers needing determinism must sort.
pub fn parse_vision_response(
    raw: &str,
    dietary_restrictions: Option<&str>,
) -> Vec<DetectedIngredient> {
    let detected = match classify(raw) {
        VisionResponse::Structured(value) => parse_structured(&value, dietary_restrictions),
        VisionResponse::PlainText(text) => parse_comma_list(&text, dietary_restrictions),
        VisionResponse::Unparseable => Vec::new(),
    };

    info!("Vision response yielded {} ingredients", detected.len());
    detected
}

fn parse_structured(value: &Value, dietary: Option<&str>) -> Vec<DetectedIngredient> {
    let mut seen = HashSet::new();
    let mut detected = Vec::new();

    for (key, tier) in [
        ("high_confidence", ConfidenceTier::High),
        ("medium_confidence", ConfidenceTier::Medium),
    ] {
        let Some(entries) = value.get(key).and_then(Value::as_array) else {
            continue;
        };
        for entry in entries {
            let Some(name) = entry.get("name").and_then(Value::as_str) else {
                continue;
            };
            push_if_new(&mut seen, &mut detected, name, tier, dietary);
        }
    }

    detected
}

fn parse_comma_list(text: &str, dietary: Option<&str>) -> Vec<DetectedIngredient> {
    let mut seen = HashSet::new();
    let mut detected = Vec::new();

    for token in text.to_lowercase().split(',') {
        push_if_new(
            &mut seen,
            &mut detected,
            token,
            ConfidenceTier::Default,
            dietary,
        );
    }

    detected
}

/// Validate, normalize and append one candidate name, skipping duplicates
fn push_if_new(
    seen: &mut HashSet<String>,
    detected: &mut Vec<DetectedIngredient>,
    candidate: &str,
    tier: ConfidenceTier,
    dietary: Option<&str>,
) {
    let candidate = candidate.trim().to_lowercase();
    if candidate.is_empty() || !is_valid_ingredient(&candidate, dietary) {
        return;
    }

    let name = normalize(&candidate);
    if is_duplicate(seen, &name) {
        return;
    }
    seen.insert(name.clone());
    detected.push(DetectedIngredient { name, tier });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(detected: &[DetectedIngredient]) -> Vec<&str> {
        detected.iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn test_structured_response_with_tiers() {
        let raw = r#"{"high_confidence":[{"name":"Avocados"}],"medium_confidence":[{"name":"red bell peppers"}]}"#;
        let detected = parse_vision_response(raw, None);

        assert_eq!(detected.len(), 2);
        assert_eq!(detected[0].name, "avocados");
        assert_eq!(detected[0].tier, ConfidenceTier::High);
        assert_eq!(detected[1].name, "peppers");
        assert_eq!(detected[1].tier, ConfidenceTier::Medium);
    }

    #[test]
    fn test_structured_response_wrapped_in_prose() {
        let raw = "Here is what I found:\n{\"high_confidence\":[{\"name\":\"milk\",\"evidence\":\"carton on shelf\"}],\"medium_confidence\":[]}\nLet me know!";
        let detected = parse_vision_response(raw, None);

        assert_eq!(names(&detected), vec!["milk"]);
        assert_eq!(detected[0].tier, ConfidenceTier::High);
    }

    #[test]
    fn test_comma_fallback() {
        let detected = parse_vision_response("eggs, milk, tomatoes", None);
        assert_eq!(names(&detected), vec!["eggs", "milk", "tomatoes"]);
        assert!(detected.iter().all(|d| d.tier == ConfidenceTier::Default));
    }

    #[test]
    fn test_fallback_drops_invalid_tokens() {
        let detected = parse_vision_response("eggs, , vegetables, 123, milk", None);
        assert_eq!(names(&detected), vec!["eggs", "milk"]);
    }

    #[test]
    fn test_fallback_dedupes_by_normalized_form() {
        let detected = parse_vision_response("tomato, tomatoes, lemon, lemons", None);
        assert_eq!(names(&detected), vec!["tomatoes", "lemon"]);
    }

    #[test]
    fn test_malformed_json_degrades_to_comma_split() {
        // The span never balances, so the whole text goes down the comma path
        let detected = parse_vision_response("{, eggs, milk", None);
        assert_eq!(names(&detected), vec!["eggs", "milk"]);
    }

    #[test]
    fn test_json_without_tier_arrays_degrades() {
        // A parseable object without the tier arrays is treated as plain text
        let detected = parse_vision_response(r#"{"1": 2}, eggs, milk"#, None);
        assert_eq!(names(&detected), vec!["eggs", "milk"]);
    }

    #[test]
    fn test_total_failure_yields_empty_set() {
        assert!(parse_vision_response("", None).is_empty());
        assert!(parse_vision_response("   ", None).is_empty());
    }

    #[test]
    fn test_dietary_restrictions_applied() {
        let raw = r#"{"high_confidence":[{"name":"chicken"},{"name":"tofu"}],"medium_confidence":[]}"#;
        let detected = parse_vision_response(raw, Some("vegan"));
        assert_eq!(names(&detected), vec!["tofu"]);
    }

    #[test]
    fn test_duplicate_across_tiers_keeps_high() {
        let raw = r#"{"high_confidence":[{"name":"lemon"}],"medium_confidence":[{"name":"lemons"}]}"#;
        let detected = parse_vision_response(raw, None);
        assert_eq!(detected.len(), 1);
        assert_eq!(detected[0].tier, ConfidenceTier::High);
    }

    #[test]
    fn test_entries_without_name_skipped() {
        let raw = r#"{"high_confidence":[{"evidence":"blurry"},{"name":"milk"}],"medium_confidence":[]}"#;
        let detected = parse_vision_response(raw, None);
        assert_eq!(names(&detected), vec!["milk"]);
    }
}
