use serde::{Deserialize, Serialize};

mod ingredient;
mod query;
mod recipe;

pub use ingredient::{normalize_ingredient, same_ingredient};
pub use query::{MatchQuery, QueryError, DEFAULT_MAX_TIME};
pub use recipe::{DietaryTag, Difficulty, Nutrition, Recipe};

/// A ranked recipe together with the explanation of its score
///
/// Borrows the recipe from the catalog; nothing is copied out of it except the
/// generated reason strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeMatch<'a> {
    pub recipe: &'a Recipe,
    /// Percentage of the recipe's ingredients already on hand, 0..=100
    pub score: u8,
    /// Recipe ingredients the user has, in the recipe's own order and casing
    pub overlap_ingredients: Vec<&'a str>,
    pub reasons: Vec<String>,
}

// ============================================================================
// HTTP Request/Response Types
// ============================================================================

/// Request body for the match endpoint
#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    #[serde(flatten)]
    pub query: MatchQuery,
    /// Maximum number of results; falls back to the configured default
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Response with ranked matches
#[derive(Debug, Serialize)]
pub struct MatchResponse<'a> {
    /// Number of matches returned
    pub total: usize,
    pub matches: Vec<RecipeMatch<'a>>,
}

/// Query string for ingredient autocomplete
#[derive(Debug, Deserialize)]
pub struct SuggestionQuery {
    #[serde(default)]
    pub q: String,
    /// Comma-separated ingredients already chosen
    #[serde(default)]
    pub selected: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl SuggestionQuery {
    pub fn selected_ingredients(&self) -> Vec<String> {
        self.selected
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Ingredients recognised in an uploaded photo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectResponse {
    pub ingredients: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_recipe() -> Recipe {
        Recipe {
            id: "r1".to_string(),
            title: "Caprese".to_string(),
            description: String::new(),
            ingredients: vec!["Tomato".to_string(), "Basil".to_string()],
            dietary: vec![DietaryTag::Vegetarian],
            difficulty: Difficulty::Easy,
            cooking_time_minutes: 10,
            instructions: vec![],
            nutrition: Nutrition::default(),
        }
    }

    #[test]
    fn test_match_request_flattens_query() {
        let json = r#"{
            "ingredients": ["tomato"],
            "dietary_filters": ["gluten-free"],
            "difficulty": "medium",
            "limit": 3
        }"#;

        let request: MatchRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.query.ingredients, vec!["tomato".to_string()]);
        assert_eq!(request.query.dietary_filters, vec![DietaryTag::GlutenFree]);
        assert_eq!(request.query.difficulty, Some(Difficulty::Medium));
        assert_eq!(request.query.max_time, DEFAULT_MAX_TIME);
        assert_eq!(request.limit, Some(3));
    }

    #[test]
    fn test_recipe_match_serializes_borrowed_recipe() {
        let recipe = sample_recipe();
        let result = RecipeMatch {
            recipe: &recipe,
            score: 50,
            overlap_ingredients: vec!["Tomato"],
            reasons: vec!["1 of 2 ingredients on hand".to_string()],
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["recipe"]["id"], "r1");
        assert_eq!(json["score"], 50);
        assert_eq!(json["overlap_ingredients"][0], "Tomato");
    }

    #[test]
    fn test_suggestion_query_splits_selected() {
        let query = SuggestionQuery {
            q: "to".to_string(),
            selected: Some(" tomato, ,Basil ".to_string()),
            limit: None,
        };
        assert_eq!(query.selected_ingredients(), vec!["tomato", "Basil"]);
    }

    #[test]
    fn test_suggestion_query_without_selected() {
        let query = SuggestionQuery {
            q: String::new(),
            selected: None,
            limit: None,
        };
        assert!(query.selected_ingredients().is_empty());
    }
}
