//! Ingredient detection from photos
//!
//! The recognition provider sits behind [`IngredientDetector`] so handlers and
//! tests never depend on a concrete HTTP client. Uploads are validated before
//! any provider call, and only confident, de-duplicated names come back out.

use std::collections::HashSet;

use crate::{
    error::{AppError, AppResult},
    models::normalize_ingredient,
};

pub mod clarifai;

pub use clarifai::ClarifaiDetector;

/// Largest accepted upload, in bytes
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

pub const FILE_TOO_LARGE: &str = "File too large. Maximum size is 5MB.";

/// Accepted upload content types
pub const SUPPORTED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// A validated image upload
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    content_type: String,
    bytes: Vec<u8>,
}

impl ImageUpload {
    /// Checks the content type and size of an uploaded image
    pub fn new(content_type: &str, bytes: Vec<u8>) -> AppResult<Self> {
        let content_type = content_type.trim().to_ascii_lowercase();
        if !SUPPORTED_IMAGE_TYPES.contains(&content_type.as_str()) {
            return Err(AppError::InvalidInput(
                "Unsupported file type. Please upload JPG, PNG, or WEBP.".to_string(),
            ));
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(AppError::InvalidInput(FILE_TOO_LARGE.to_string()));
        }

        Ok(Self {
            content_type,
            bytes,
        })
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// One candidate returned by a recognition provider
#[derive(Debug, Clone, PartialEq)]
pub struct Concept {
    pub name: String,
    pub confidence: f32,
}

/// Filtering applied to provider output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionSettings {
    /// Concepts below this confidence are dropped
    pub min_confidence: f32,
    /// At most this many ingredient names are returned
    pub max_ingredients: usize,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            min_confidence: 0.75,
            max_ingredients: 8,
        }
    }
}

/// Trait for image recognition providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait IngredientDetector: Send + Sync {
    /// Returns the concepts the provider sees in the image, in provider order
    async fn detect(&self, image: &ImageUpload) -> AppResult<Vec<Concept>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Runs detection and turns confident concepts into ingredient names
///
/// Names are normalized, blanks and duplicates dropped, and the list capped
/// at `settings.max_ingredients` in provider order.
pub async fn detect_ingredients(
    detector: &dyn IngredientDetector,
    image: &ImageUpload,
    settings: DetectionSettings,
) -> AppResult<Vec<String>> {
    let concepts = detector.detect(image).await?;
    let candidates = concepts.len();

    let mut seen = HashSet::new();
    let ingredients: Vec<String> = concepts
        .into_iter()
        .filter(|concept| concept.confidence >= settings.min_confidence)
        .map(|concept| normalize_ingredient(&concept.name))
        .filter(|name| !name.is_empty() && seen.insert(name.clone()))
        .take(settings.max_ingredients)
        .collect();

    tracing::info!(
        provider = detector.name(),
        candidates,
        accepted = ingredients.len(),
        "Ingredient detection completed"
    );

    Ok(ingredients)
}
