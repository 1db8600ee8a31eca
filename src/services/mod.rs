pub mod catalog;
pub mod detection;
pub mod matcher;

pub use catalog::{CatalogError, CatalogProvider, RecipeCatalog};
pub use detection::{ClarifaiDetector, DetectionSettings, IngredientDetector};
pub use matcher::{match_recipes, Matcher};
