use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use thiserror::Error;

use crate::models::{normalize_ingredient, Recipe};

/// Default number of autocomplete suggestions
pub const DEFAULT_SUGGESTION_LIMIT: usize = 8;

const BUILTIN_RECIPES: &str = include_str!("../../data/recipes.json");

/// Error types for catalog loading
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Recipe at position {0} has an empty id")]
    EmptyId(usize),
    #[error("Duplicate recipe id: {0}")]
    DuplicateId(String),
    #[error("Recipe {0} has an empty title")]
    EmptyTitle(String),
    #[error("Recipe {0} must have a positive cooking time")]
    InvalidCookingTime(String),
    #[error("Recipe {id} has an invalid {field} value")]
    InvalidNutrition { id: String, field: &'static str },
    #[error("Recipe {0} lists a blank ingredient")]
    BlankIngredient(String),
}

/// Supplies the full recipe list and the known ingredient names
///
/// Implementations guarantee the data never changes for the lifetime of the
/// process, so borrowers may hold on to the returned slices.
pub trait CatalogProvider: Send + Sync {
    /// Every recipe, in catalog order
    fn all_recipes(&self) -> &[Recipe];

    /// Distinct normalized ingredient names, for autocomplete
    fn all_ingredients(&self) -> &[String];
}

/// Immutable, validated recipe catalog
#[derive(Debug, Clone)]
pub struct RecipeCatalog {
    recipes: Vec<Recipe>,
    ingredients: Vec<String>,
}

impl RecipeCatalog {
    /// Validates `recipes` and builds the catalog
    pub fn new(recipes: Vec<Recipe>) -> Result<Self, CatalogError> {
        let mut seen_ids = HashSet::new();
        for (position, recipe) in recipes.iter().enumerate() {
            validate_recipe(position, recipe)?;
            if !seen_ids.insert(recipe.id.as_str()) {
                return Err(CatalogError::DuplicateId(recipe.id.clone()));
            }
        }

        let ingredients: BTreeSet<String> = recipes
            .iter()
            .flat_map(|recipe| recipe.ingredients.iter())
            .map(|name| normalize_ingredient(name))
            .collect();

        Ok(Self {
            recipes,
            ingredients: ingredients.into_iter().collect(),
        })
    }

    /// Parses a JSON array of recipes
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let recipes: Vec<Recipe> = serde_json::from_str(json)?;
        Self::new(recipes)
    }

    /// Loads the catalog from a JSON file
    pub async fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let json = tokio::fs::read_to_string(path).await?;
        let catalog = Self::from_json(&json)?;

        tracing::info!(
            path = %path.display(),
            recipes = catalog.len(),
            "Loaded recipe catalog from file"
        );

        Ok(catalog)
    }

    /// The catalog bundled with the binary
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_RECIPES)
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Looks up a recipe by id
    pub fn get(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|recipe| recipe.id == id)
    }

    /// Autocomplete suggestions for partially typed input
    ///
    /// With blank input, returns the first known ingredients. Otherwise returns
    /// ingredients containing the input. Already selected ingredients are never
    /// suggested.
    pub fn suggest_ingredients(&self, input: &str, selected: &[String], limit: usize) -> Vec<&str> {
        let needle = normalize_ingredient(input);
        let selected: HashSet<String> = selected.iter().map(|s| normalize_ingredient(s)).collect();

        self.ingredients
            .iter()
            .filter(|name| !selected.contains(name.as_str()))
            .filter(|name| needle.is_empty() || name.contains(&needle))
            .take(limit)
            .map(String::as_str)
            .collect()
    }
}

impl CatalogProvider for RecipeCatalog {
    fn all_recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    fn all_ingredients(&self) -> &[String] {
        &self.ingredients
    }
}

fn validate_recipe(position: usize, recipe: &Recipe) -> Result<(), CatalogError> {
    if recipe.id.trim().is_empty() {
        return Err(CatalogError::EmptyId(position));
    }
    if recipe.title.trim().is_empty() {
        return Err(CatalogError::EmptyTitle(recipe.id.clone()));
    }
    if recipe.cooking_time_minutes == 0 {
        return Err(CatalogError::InvalidCookingTime(recipe.id.clone()));
    }
    if recipe.ingredients.iter().any(|name| name.trim().is_empty()) {
        return Err(CatalogError::BlankIngredient(recipe.id.clone()));
    }

    let nutrition = &recipe.nutrition;
    for (field, value) in [
        ("calories", nutrition.calories),
        ("protein", nutrition.protein),
        ("carbs", nutrition.carbs),
        ("fat", nutrition.fat),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(CatalogError::InvalidNutrition {
                id: recipe.id.clone(),
                field,
            });
        }
    }

    Ok(())
}
