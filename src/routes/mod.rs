use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    middleware::{make_span_with_request_id, request_id_middleware},
    services::{detection::MAX_IMAGE_BYTES, DetectionSettings, IngredientDetector, RecipeCatalog},
};

pub mod detect;
pub mod ingredients;
pub mod recipes;

/// Room for multipart framing on top of the image itself
const UPLOAD_OVERHEAD_BYTES: usize = 64 * 1024;

/// Shared application state
///
/// Everything here is read-only after startup, so cloning is just a few
/// reference count bumps.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<RecipeCatalog>,
    pub detector: Arc<dyn IngredientDetector>,
    pub detection: DetectionSettings,
    /// Default cap on match results
    pub match_limit: Option<usize>,
}

impl AppState {
    pub fn new(catalog: RecipeCatalog, detector: Arc<dyn IngredientDetector>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            detector,
            detection: DetectionSettings::default(),
            match_limit: None,
        }
    }

    pub fn with_detection_settings(mut self, settings: DetectionSettings) -> Self {
        self.detection = settings;
        self
    }

    pub fn with_match_limit(mut self, limit: Option<usize>) -> Self {
        self.match_limit = limit;
        self
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(recipes::list))
        .route("/recipes/match", post(recipes::find_matches))
        .route("/recipes/:id", get(recipes::get_by_id))
        .route("/ingredients", get(ingredients::suggest))
        .route(
            "/detect",
            post(detect::detect).layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES + UPLOAD_OVERHEAD_BYTES)),
        )
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
