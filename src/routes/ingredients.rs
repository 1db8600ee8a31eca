use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    models::SuggestionQuery,
    routes::AppState,
    services::catalog::DEFAULT_SUGGESTION_LIMIT,
};

/// Handler for ingredient autocomplete
pub async fn suggest(
    State(state): State<AppState>,
    Query(params): Query<SuggestionQuery>,
) -> Json<Vec<String>> {
    let selected = params.selected_ingredients();
    let limit = params.limit.unwrap_or(DEFAULT_SUGGESTION_LIMIT);

    let suggestions = state
        .catalog
        .suggest_ingredients(&params.q, &selected, limit)
        .into_iter()
        .map(str::to_string)
        .collect();

    Json(suggestions)
}
