use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{MatchRequest, MatchResponse, Recipe},
    routes::AppState,
    services::{CatalogProvider, Matcher},
};

/// Handler for listing the whole catalog
pub async fn list(State(state): State<AppState>) -> Json<Vec<Recipe>> {
    Json(state.catalog.all_recipes().to_vec())
}

/// Handler for the recipe detail view
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Recipe>> {
    state
        .catalog
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Recipe {} not found", id)))
}

/// Handler for ranking recipes against the user's ingredients
pub async fn find_matches(
    State(state): State<AppState>,
    request_id: RequestId,
    Json(request): Json<MatchRequest>,
) -> Response {
    let limit = request.limit.or(state.match_limit);

    tracing::info!(
        request_id = %request_id,
        ingredients = request.query.ingredients.len(),
        dietary_filters = request.query.dietary_filters.len(),
        max_time = request.query.max_time,
        difficulty = ?request.query.difficulty,
        limit = ?limit,
        "Processing match request"
    );

    let matches = Matcher::new(state.catalog.as_ref()).find_matches(&request.query, limit);

    tracing::info!(
        request_id = %request_id,
        matches = matches.len(),
        "Match completed"
    );

    Json(MatchResponse {
        total: matches.len(),
        matches,
    })
    .into_response()
}
