//! HTTP surface over the pipeline.
//!
//! A thin proxy whose only jobs are hiding the provider API key and shaping
//! requests/responses for the client app. Two POST endpoints, permissive
//! CORS for browser callers, axum's default 405 for other methods.

use crate::analysis::{analyze_photo_urls, generate_recipe_batch};
use crate::model::{Recipe, RecipeWithMissing, UserPreferences};
use crate::pipeline_errors::PipelineError;
use crate::provider_config::{ProviderConfig, DEFAULT_RECIPE_COUNT};
use crate::providers::{RecipeProvider, VisionProvider};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub vision: Arc<dyn VisionProvider>,
    pub recipes: Arc<dyn RecipeProvider>,
    pub http: reqwest::Client,
    pub config: Arc<ProviderConfig>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(rename = "imageUrls")]
    pub image_urls: Vec<String>,
    #[serde(rename = "dietaryRestrictions")]
    pub dietary_restrictions: Option<String>,
    #[serde(rename = "cuisinePreferences", default)]
    pub cuisine_preferences: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeMetadata {
    pub model: String,
    pub images_processed: usize,
    pub images_failed: usize,
    pub analyzed_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub ingredients: Vec<String>,
    pub metadata: AnalyzeMetadata,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub preferences: UserPreferences,
    pub count: Option<usize>,
    #[serde(rename = "savedRecipes", default)]
    pub saved_recipes: Vec<Recipe>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub recipes: Vec<RecipeWithMissing>,
    pub used_saved_fallback: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/analyze-ingredients", post(analyze_ingredients))
        .route("/api/generate-recipes", post(generate_recipes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn analyze_ingredients(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Response {
    if state.config.api_key.is_none() {
        error!("Analyze request rejected: provider API key not configured");
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "provider credentials are not configured",
        );
    }

    if request.image_urls.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "imageUrls must not be empty");
    }

    let report = analyze_photo_urls(
        &state.http,
        state.vision.as_ref(),
        &state.config,
        &request.image_urls,
        request.dietary_restrictions.as_deref(),
    )
    .await;

    Json(AnalyzeResponse {
        ingredients: report.ingredients,
        metadata: AnalyzeMetadata {
            model: state.config.vision_model.clone(),
            images_processed: report.images_processed,
            images_failed: report.images_failed,
            analyzed_at: report.analyzed_at,
        },
    })
    .into_response()
}

async fn generate_recipes(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Response {
    if state.config.api_key.is_none() {
        error!("Generate request rejected: provider API key not configured");
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "provider credentials are not configured",
        );
    }

    if request.ingredients.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "ingredients must not be empty");
    }

    let count = request.count.unwrap_or(DEFAULT_RECIPE_COUNT);
    let result = generate_recipe_batch(
        state.recipes.as_ref(),
        &request.ingredients,
        &request.preferences,
        count,
        &request.saved_recipes,
    )
    .await;

    match result {
        Ok(report) => Json(GenerateResponse {
            recipes: report.recipes,
            used_saved_fallback: report.used_saved_fallback,
        })
        .into_response(),
        Err(e @ PipelineError::MissingCredentials(_)) => {
            error!(error = %e, "Generation failed: missing credentials");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
        Err(e) => {
            error!(error = %e, "Recipe generation failed with no fallback");
            error_response(StatusCode::BAD_GATEWAY, e.to_string())
        }
    }
}
