//! # Analysis and Generation Orchestration
//!
//! Drives the full pipeline for one request: photos are fetched and analyzed
//! one at a time (a single bad image or failed call is logged and skipped,
//! never fatal to the batch), per-image detections are unioned, filtered by
//! confidence, deduplicated and sorted; recipe generation runs the prompt
//! through the text provider and ranks the parsed candidates, falling back
//! to the caller's saved recipes when generation fails or yields nothing.

use crate::dedupe::is_duplicate;
use crate::image_fetch::fetch_and_encode;
use crate::matcher::rank_recipes;
use crate::model::{DetectedIngredient, Recipe, RecipeWithMissing, UserPreferences};
use crate::pipeline_errors::PipelineError;
use crate::provider_config::ProviderConfig;
use crate::providers::{recipe_prompt, vision_instruction, RecipeProvider, VisionProvider};
use crate::recipe_parser::parse_recipe_response;
use crate::vision_parser::parse_vision_response;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::{info, warn};

/// Outcome of analyzing one batch of photos
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    /// Final ingredient names, deduplicated and sorted alphabetically
    pub ingredients: Vec<String>,
    /// The same ingredients with their confidence tiers
    pub detected: Vec<DetectedIngredient>,
    /// Images that were fetched and analyzed successfully
    pub images_processed: usize,
    /// Images skipped because of fetch or provider failures
    pub images_failed: usize,
    pub analyzed_at: DateTime<Utc>,
}

/// Outcome of one recipe-generation request
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub recipes: Vec<RecipeWithMissing>,
    /// True when the saved-recipe fallback produced the result
    pub used_saved_fallback: bool,
}

/// Analyze a batch of photo URLs into an ingredient list
///
/// Processes at most `max_images_per_batch` URLs, sequentially. Images are
/// independent; a failure on one is counted and skipped.
pub async fn analyze_photo_urls(
    http: &reqwest::Client,
    vision: &dyn VisionProvider,
    config: &ProviderConfig,
    image_urls: &[String],
    dietary_restrictions: Option<&str>,
) -> AnalysisReport {
    let batch = &image_urls[..image_urls.len().min(config.max_images_per_batch)];
    if batch.len() < image_urls.len() {
        warn!(
            submitted = image_urls.len(),
            accepted = batch.len(),
            "Too many images submitted, extra ones ignored"
        );
    }

    let instruction = vision_instruction(dietary_restrictions);
    let mut detected_all = Vec::new();
    let mut images_failed = 0;

    for url in batch {
        let image = match fetch_and_encode(http, url, config.max_image_bytes).await {
            Ok(image) => image,
            Err(e) => {
                warn!(url = %url, error = %e, "Skipping image: fetch failed");
                images_failed += 1;
                continue;
            }
        };

        match vision.describe_images(&[image], &instruction).await {
            Ok(text) => detected_all.extend(parse_vision_response(&text, dietary_restrictions)),
            Err(e) => {
                warn!(url = %url, error = %e, "Skipping image: vision call failed");
                images_failed += 1;
            }
        }
    }

    let detected = aggregate_detections(detected_all, config.min_confidence);
    let ingredients: Vec<String> = detected.iter().map(|d| d.name.clone()).collect();

    info!(
        ingredients = ingredients.len(),
        images_processed = batch.len() - images_failed,
        images_failed,
        "Photo analysis complete"
    );

    AnalysisReport {
        ingredients,
        detected,
        images_processed: batch.len() - images_failed,
        images_failed,
        analyzed_at: Utc::now(),
    }
}

/// Union per-image detections: drop below-threshold tiers, deduplicate across
/// images (first occurrence keeps its tier), and sort alphabetically for
/// deterministic output
pub fn aggregate_detections(
    detected: Vec<DetectedIngredient>,
    min_confidence: f32,
) -> Vec<DetectedIngredient> {
    let mut seen = HashSet::new();
    let mut result = Vec::new();

    for item in detected {
        if item.tier.score() < min_confidence {
            continue;
        }
        if is_duplicate(&seen, &item.name) {
            continue;
        }
        seen.insert(item.name.clone());
        result.push(item);
    }

    result.sort_by(|a, b| a.name.cmp(&b.name));
    result
}

/// Generate and rank recipes for the available ingredients
///
/// On provider failure or a malformed response there is no safe default
/// recipe to fabricate, so the caller's saved recipes are ranked instead;
/// only when that fallback is empty too does the error propagate. A missing
/// API key is a configuration error and always propagates.
pub async fn generate_recipe_batch(
    provider: &dyn RecipeProvider,
    ingredients: &[String],
    preferences: &UserPreferences,
    count: usize,
    saved_recipes: &[Recipe],
) -> Result<GenerationReport, PipelineError> {
    let prompt = recipe_prompt(ingredients, preferences, count);

    let generated = match provider.complete_prompt(&prompt).await {
        Ok(text) => parse_recipe_response(&text),
        Err(e) => Err(e),
    };

    match generated {
        Ok(recipes) => {
            let ranked = rank_recipes(recipes, ingredients);
            if ranked.is_empty() && !saved_recipes.is_empty() {
                info!("Generation yielded no matching recipes, ranking saved recipes");
                return Ok(GenerationReport {
                    recipes: rank_recipes(saved_recipes.to_vec(), ingredients),
                    used_saved_fallback: true,
                });
            }
            Ok(GenerationReport {
                recipes: ranked,
                used_saved_fallback: false,
            })
        }
        Err(e @ PipelineError::MissingCredentials(_)) => Err(e),
        Err(e) => {
            if saved_recipes.is_empty() {
                return Err(e);
            }
            warn!(error = %e, "Recipe generation failed, ranking saved recipes");
            Ok(GenerationReport {
                recipes: rank_recipes(saved_recipes.to_vec(), ingredients),
                used_saved_fallback: true,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConfidenceTier, Difficulty};
    use async_trait::async_trait;

    struct ScriptedRecipes {
        response: Result<String, PipelineError>,
    }

    #[async_trait]
    impl RecipeProvider for ScriptedRecipes {
        async fn complete_prompt(&self, _prompt: &str) -> Result<String, PipelineError> {
            self.response.clone()
        }
    }

    fn saved_recipe(title: &str, ingredients: &[&str]) -> Recipe {
        Recipe {
            id: "saved-1".to_string(),
            title: title.to_string(),
            description: String::new(),
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
            instructions: vec![],
            prep_time: 15,
            cook_time: 30,
            servings: 4,
            cuisine: vec!["International".to_string()],
            dietary_tags: vec![],
            difficulty: Difficulty::Medium,
            tips: None,
            variations: None,
        }
    }

    fn detected(name: &str, tier: ConfidenceTier) -> DetectedIngredient {
        DetectedIngredient {
            name: name.to_string(),
            tier,
        }
    }

    #[test]
    fn test_aggregate_filters_sorts_and_dedupes() {
        let input = vec![
            detected("milk", ConfidenceTier::High),
            detected("eggs", ConfidenceTier::Default),
            detected("milk", ConfidenceTier::Medium),
            detected("butter", ConfidenceTier::Medium),
        ];
        let result = aggregate_detections(input, 0.75);

        // "eggs" falls below the threshold, duplicate "milk" keeps High
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].name, "butter");
        assert_eq!(result[1].name, "milk");
        assert_eq!(result[1].tier, ConfidenceTier::High);
    }

    #[test]
    fn test_aggregate_spans_equivalence_groups() {
        let input = vec![
            detected("lemon", ConfidenceTier::High),
            detected("lemons", ConfidenceTier::High),
        ];
        let result = aggregate_detections(input, 0.0);
        assert_eq!(result.len(), 1);
    }

    #[tokio::test]
    async fn test_generation_success_ranks_candidates() {
        let provider = ScriptedRecipes {
            response: Ok(r#"{"recipes": [
                {"title": "Scramble", "ingredients": ["eggs", "salt", "pepper"]},
                {"title": "Pancakes", "ingredients": ["eggs", "milk", "flour", "sugar", "yeast"]}
            ]}"#
            .to_string()),
        };
        let available = vec![
            "eggs".to_string(),
            "milk".to_string(),
            "bread".to_string(),
            "butter".to_string(),
        ];

        let report = generate_recipe_batch(
            &provider,
            &available,
            &UserPreferences::default(),
            3,
            &[],
        )
        .await
        .unwrap();

        assert!(!report.used_saved_fallback);
        assert_eq!(report.recipes.len(), 1);
        assert_eq!(report.recipes[0].recipe.title, "Scramble");
        assert_eq!(report.recipes[0].missing_count, 2);
    }

    #[tokio::test]
    async fn test_malformed_response_falls_back_to_saved() {
        let provider = ScriptedRecipes {
            response: Ok("I cannot produce recipes right now.".to_string()),
        };
        let available = vec!["eggs".to_string(), "milk".to_string()];
        let saved = vec![saved_recipe("French Toast", &["eggs", "milk", "bread"])];

        let report = generate_recipe_batch(
            &provider,
            &available,
            &UserPreferences::default(),
            3,
            &saved,
        )
        .await
        .unwrap();

        assert!(report.used_saved_fallback);
        assert_eq!(report.recipes.len(), 1);
        assert_eq!(report.recipes[0].recipe.title, "French Toast");
        assert_eq!(report.recipes[0].missing_ingredients, vec!["bread"]);
    }

    #[tokio::test]
    async fn test_malformed_response_without_saved_is_error() {
        let provider = ScriptedRecipes {
            response: Ok("no json here".to_string()),
        };

        let err = generate_recipe_batch(
            &provider,
            &["eggs".to_string()],
            &UserPreferences::default(),
            3,
            &[],
        )
        .await
        .unwrap_err();

        assert!(matches!(err, PipelineError::MalformedRecipeResponse(_)));
    }

    #[tokio::test]
    async fn test_provider_failure_falls_back_to_saved() {
        let provider = ScriptedRecipes {
            response: Err(PipelineError::Timeout("30s elapsed".to_string())),
        };
        let available = vec!["eggs".to_string()];
        let saved = vec![saved_recipe("Boiled Eggs", &["eggs"])];

        let report = generate_recipe_batch(
            &provider,
            &available,
            &UserPreferences::default(),
            3,
            &saved,
        )
        .await
        .unwrap();

        assert!(report.used_saved_fallback);
        assert_eq!(report.recipes[0].missing_count, 0);
    }

    #[tokio::test]
    async fn test_missing_credentials_always_propagates() {
        let provider = ScriptedRecipes {
            response: Err(PipelineError::MissingCredentials("no key".to_string())),
        };
        let saved = vec![saved_recipe("Anything", &["eggs"])];

        let err = generate_recipe_batch(
            &provider,
            &["eggs".to_string()],
            &UserPreferences::default(),
            3,
            &saved,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, PipelineError::MissingCredentials(_)));
    }

    #[tokio::test]
    async fn test_empty_generation_falls_back_to_saved() {
        let provider = ScriptedRecipes {
            response: Ok(r#"{"recipes": []}"#.to_string()),
        };
        let available = vec!["eggs".to_string(), "milk".to_string()];
        let saved = vec![saved_recipe("French Toast", &["eggs", "milk", "bread"])];

        let report = generate_recipe_batch(
            &provider,
            &available,
            &UserPreferences::default(),
            3,
            &saved,
        )
        .await
        .unwrap();

        assert!(report.used_saved_fallback);
        assert_eq!(report.recipes.len(), 1);
    }
}
