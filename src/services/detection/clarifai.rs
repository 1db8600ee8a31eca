//! Clarifai food recognition provider
//!
//! API Flow:
//! 1. POST /v2/models/{model}/outputs with the image as base64 JSON
//! 2. Read concepts from outputs[0].data.concepts

use crate::{
    error::{AppError, AppResult},
    services::detection::{Concept, ImageUpload, IngredientDetector},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

pub const DEFAULT_API_URL: &str =
    "https://api.clarifai.com/v2/models/food-item-recognition/outputs";

#[derive(Clone)]
pub struct ClarifaiDetector {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
}

impl ClarifaiDetector {
    /// Creates a detector; without an API key every call fails with
    /// [`AppError::MissingCredentials`]
    pub fn new(api_key: Option<String>, api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        let api_key = api_key.filter(|key| !key.trim().is_empty());

        if api_key.is_none() {
            tracing::warn!("CLARIFAI_PAT is not set, image detection is disabled");
        }

        Ok(Self {
            http_client,
            api_key,
            api_url,
        })
    }

    fn request_body(image: &ImageUpload) -> serde_json::Value {
        json!({
            "inputs": [
                {
                    "data": {
                        "image": {
                            "base64": STANDARD.encode(image.bytes())
                        }
                    }
                }
            ]
        })
    }
}

#[async_trait::async_trait]
impl IngredientDetector for ClarifaiDetector {
    async fn detect(&self, image: &ImageUpload) -> AppResult<Vec<Concept>> {
        let api_key = self.api_key.as_deref().ok_or(AppError::MissingCredentials)?;

        let response = self
            .http_client
            .post(&self.api_url)
            .header("Authorization", format!("Key {}", api_key))
            .json(&Self::request_body(image))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %body, "Clarifai request failed");
            return Err(AppError::ExternalApi(format!(
                "Clarifai request failed with status {}",
                status
            )));
        }

        let response_text = response.text().await?;
        tracing::debug!(response = %response_text, "Raw Clarifai API response");

        let concepts = parse_concepts(&response_text)?;

        tracing::info!(
            concepts = concepts.len(),
            content_type = image.content_type(),
            provider = "clarifai",
            "Image classified"
        );

        Ok(concepts)
    }

    fn name(&self) -> &'static str {
        "clarifai"
    }
}

// ============================================================================
// Clarifai API Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ClarifaiResponse {
    #[serde(default)]
    outputs: Vec<ClarifaiOutput>,
}

#[derive(Debug, Deserialize)]
struct ClarifaiOutput {
    #[serde(default)]
    data: Option<ClarifaiOutputData>,
}

#[derive(Debug, Deserialize)]
struct ClarifaiOutputData {
    #[serde(default)]
    concepts: Vec<ClarifaiConcept>,
}

#[derive(Debug, Deserialize)]
struct ClarifaiConcept {
    name: String,
    value: f32,
}

/// Parses a Clarifai outputs payload into concepts
///
/// Missing `outputs`, `data` or `concepts` mean nothing was recognised. A
/// payload of the wrong shape is an upstream error.
pub fn parse_concepts(body: &str) -> AppResult<Vec<Concept>> {
    let payload: ClarifaiResponse = serde_json::from_str(body).map_err(|e| {
        tracing::error!(error = %e, "Failed to deserialize Clarifai response");
        AppError::ExternalApi(format!("Failed to parse Clarifai response: {}", e))
    })?;

    let concepts = payload
        .outputs
        .into_iter()
        .next()
        .and_then(|output| output.data)
        .map(|data| data.concepts)
        .unwrap_or_default()
        .into_iter()
        .filter(|concept| concept.value.is_finite())
        .map(|concept| Concept {
            name: concept.name,
            confidence: concept.value,
        })
        .collect();

    Ok(concepts)
}
