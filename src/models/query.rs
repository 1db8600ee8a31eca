use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{normalize_ingredient, same_ingredient, DietaryTag, Difficulty};

/// Default cooking time ceiling in minutes
pub const DEFAULT_MAX_TIME: i64 = 45;

/// Error types for query construction
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Please enter an ingredient before adding.")]
    EmptyIngredient,
    #[error("That ingredient is already selected.")]
    DuplicateIngredient,
}

/// Ingredients and filters for one matching call
///
/// `max_time` is signed: a negative ceiling is a valid filter that simply
/// excludes every recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchQuery {
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub dietary_filters: Vec<DietaryTag>,
    #[serde(default = "default_max_time")]
    pub max_time: i64,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

fn default_max_time() -> i64 {
    DEFAULT_MAX_TIME
}

impl Default for MatchQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchQuery {
    /// Creates a query with no ingredients and the default filters
    pub fn new() -> Self {
        Self {
            ingredients: Vec::new(),
            dietary_filters: Vec::new(),
            max_time: DEFAULT_MAX_TIME,
            difficulty: None,
        }
    }

    pub fn with_ingredients<I, S>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ingredients = ingredients.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_dietary_filters(mut self, filters: Vec<DietaryTag>) -> Self {
        self.dietary_filters = filters;
        self
    }

    pub fn with_max_time(mut self, max_time: i64) -> Self {
        self.max_time = max_time;
        self
    }

    pub fn with_difficulty(mut self, difficulty: Option<Difficulty>) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Adds a single user-entered ingredient
    ///
    /// The value is trimmed before being stored. Blank entries and entries
    /// already selected (ignoring case) are rejected.
    pub fn add_ingredient(&mut self, raw: &str) -> Result<(), QueryError> {
        let ingredient = raw.trim();
        if ingredient.is_empty() {
            return Err(QueryError::EmptyIngredient);
        }
        if self.contains_ingredient(ingredient) {
            return Err(QueryError::DuplicateIngredient);
        }
        self.ingredients.push(ingredient.to_string());
        Ok(())
    }

    /// Adds several ingredients at once, e.g. the output of image detection
    ///
    /// Blanks and duplicates are skipped silently. Returns how many were added.
    pub fn add_ingredients<I, S>(&mut self, ingredients: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ingredients
            .into_iter()
            .filter(|ingredient| self.add_ingredient(ingredient.as_ref()).is_ok())
            .count()
    }

    /// Removes an ingredient, ignoring case. Returns whether anything was removed.
    pub fn remove_ingredient(&mut self, raw: &str) -> bool {
        let before = self.ingredients.len();
        self.ingredients.retain(|existing| !same_ingredient(existing, raw));
        self.ingredients.len() != before
    }

    pub fn contains_ingredient(&self, raw: &str) -> bool {
        let needle = normalize_ingredient(raw);
        self.ingredients
            .iter()
            .any(|existing| normalize_ingredient(existing) == needle)
    }
}
