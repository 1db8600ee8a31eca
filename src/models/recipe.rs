use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Dietary tag a recipe can carry and a user can require
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DietaryTag {
    Vegetarian,
    Vegan,
    GlutenFree,
}

impl Display for DietaryTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DietaryTag::Vegetarian => write!(f, "vegetarian"),
            DietaryTag::Vegan => write!(f, "vegan"),
            DietaryTag::GlutenFree => write!(f, "gluten-free"),
        }
    }
}

/// How demanding a recipe is to cook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

/// Per-serving nutrition facts
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// A recipe from the catalog
///
/// Recipes are loaded once at startup and never mutated afterwards. The matcher
/// only looks at `ingredients`, `dietary`, `difficulty`, `cooking_time_minutes`
/// and `title`; everything else is passed through for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub dietary: Vec<DietaryTag>,
    pub difficulty: Difficulty,
    pub cooking_time_minutes: u32,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub nutrition: Nutrition,
}

impl Recipe {
    /// Returns true if the recipe carries every tag in `required`
    pub fn satisfies_dietary(&self, required: &[DietaryTag]) -> bool {
        required.iter().all(|tag| self.dietary.contains(tag))
    }
}
