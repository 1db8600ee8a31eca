use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::{
    multipart::{MultipartForm, Part},
    TestServer,
};
use serde_json::{json, Value};

use pantry_api::{
    error::{AppError, AppResult},
    models::{DietaryTag, Difficulty, Nutrition, Recipe},
    routes::{create_router, AppState},
    services::{
        detection::{Concept, ImageUpload, IngredientDetector},
        RecipeCatalog,
    },
};

/// Detector returning a fixed set of concepts
struct StubDetector {
    concepts: Vec<(&'static str, f32)>,
}

#[async_trait::async_trait]
impl IngredientDetector for StubDetector {
    async fn detect(&self, _image: &ImageUpload) -> AppResult<Vec<Concept>> {
        Ok(self
            .concepts
            .iter()
            .map(|(name, confidence)| Concept {
                name: name.to_string(),
                confidence: *confidence,
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

/// Detector that always fails the way an unconfigured provider does
struct UnconfiguredDetector;

#[async_trait::async_trait]
impl IngredientDetector for UnconfiguredDetector {
    async fn detect(&self, _image: &ImageUpload) -> AppResult<Vec<Concept>> {
        Err(AppError::MissingCredentials)
    }

    fn name(&self) -> &'static str {
        "unconfigured"
    }
}

fn recipe(
    id: &str,
    title: &str,
    ingredients: &[&str],
    minutes: u32,
    difficulty: Difficulty,
    dietary: &[DietaryTag],
) -> Recipe {
    Recipe {
        id: id.to_string(),
        title: title.to_string(),
        description: format!("{} description", title),
        ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
        dietary: dietary.to_vec(),
        difficulty,
        cooking_time_minutes: minutes,
        instructions: vec!["Cook it.".to_string()],
        nutrition: Nutrition {
            calories: 300.0,
            protein: 10.0,
            carbs: 40.0,
            fat: 10.0,
        },
    }
}

fn test_catalog() -> RecipeCatalog {
    RecipeCatalog::new(vec![
        recipe("r1", "Bruschetta", &["Tomato", "Basil"], 20, Difficulty::Easy, &[]),
        recipe(
            "r2",
            "Margherita",
            &["Tomato", "Cheese", "Basil", "Oil"],
            40,
            Difficulty::Medium,
            &[DietaryTag::Vegetarian],
        ),
    ])
    .unwrap()
}

fn create_test_server() -> TestServer {
    let detector = StubDetector {
        concepts: vec![("Tomato", 0.97), ("Table", 0.30), ("basil", 0.81)],
    };
    server_with_state(AppState::new(test_catalog(), Arc::new(detector)))
}

fn server_with_state(state: AppState) -> TestServer {
    TestServer::new(create_router(state)).unwrap()
}

fn image_form(content_type: &str, bytes: &[u8]) -> MultipartForm {
    let part = Part::bytes(bytes.to_vec())
        .file_name("fridge")
        .mime_type(content_type);
    MultipartForm::new().add_part("image", part)
}

fn match_ids(body: &Value) -> Vec<String> {
    body["matches"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["recipe"]["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server();
    let id = "6f9619ff-8b86-4d11-b42d-00c04fc964ff";

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static(id),
        )
        .await;

    assert_eq!(response.headers()["x-request-id"], id);
}

#[tokio::test]
async fn test_request_id_is_generated_when_missing() {
    let server = create_test_server();
    let response = server.get("/health").await;

    let header = response.headers()["x-request-id"].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(header).is_ok());
}

#[tokio::test]
async fn test_malformed_request_id_is_replaced() {
    let server = create_test_server();
    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("not-a-uuid"),
        )
        .await;

    let header = response.headers()["x-request-id"].to_str().unwrap();
    assert_ne!(header, "not-a-uuid");
    assert!(uuid::Uuid::parse_str(header).is_ok());
}

#[tokio::test]
async fn test_list_recipes() {
    let server = create_test_server();
    let response = server.get("/api/v1/recipes").await;
    response.assert_status_ok();

    let recipes: Vec<Value> = response.json();
    assert_eq!(recipes.len(), 2);
    assert_eq!(recipes[0]["cooking_time_minutes"], 20);
}

#[tokio::test]
async fn test_get_recipe_by_id() {
    let server = create_test_server();
    let response = server.get("/api/v1/recipes/r2").await;
    response.assert_status_ok();

    let recipe: Value = response.json();
    assert_eq!(recipe["title"], "Margherita");
    assert_eq!(recipe["dietary"][0], "vegetarian");
}

#[tokio::test]
async fn test_get_unknown_recipe_is_not_found() {
    let server = create_test_server();
    let response = server.get("/api/v1/recipes/nope").await;
    response.assert_status_not_found();

    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("nope"));
}

#[tokio::test]
async fn test_match_ranks_by_score() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recipes/match")
        .json(&json!({
            "ingredients": ["tomato", " BASIL "],
            "max_time": 45
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total"], 2);
    assert_eq!(match_ids(&body), vec!["r1", "r2"]);
    assert_eq!(body["matches"][0]["score"], 100);
    assert_eq!(body["matches"][1]["score"], 50);
    assert_eq!(body["matches"][1]["overlap_ingredients"], json!(["Tomato", "Basil"]));
    assert_eq!(
        body["matches"][1]["reasons"],
        json!(["2 of 4 ingredients on hand", "Ready in 40 minutes"])
    );
}

#[tokio::test]
async fn test_match_respects_max_time() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recipes/match")
        .json(&json!({ "ingredients": ["tomato", "basil"], "max_time": 30 }))
        .await;

    assert_eq!(match_ids(&response.json()), vec!["r1"]);
}

#[tokio::test]
async fn test_match_browse_all_without_ingredients() {
    let server = create_test_server();
    let response = server.post("/api/v1/recipes/match").json(&json!({})).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(match_ids(&body), vec!["r1", "r2"]);
    assert_eq!(body["matches"][0]["score"], 0);
    assert_eq!(body["matches"][1]["score"], 0);
}

#[tokio::test]
async fn test_match_dietary_filter() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recipes/match")
        .json(&json!({ "ingredients": ["tomato", "basil"], "dietary_filters": ["vegetarian"] }))
        .await;

    let body: Value = response.json();
    assert_eq!(match_ids(&body), vec!["r2"]);
    assert_eq!(
        body["matches"][0]["reasons"][2],
        "Matches vegetarian preference"
    );
}

#[tokio::test]
async fn test_match_difficulty_and_limit() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recipes/match")
        .json(&json!({ "difficulty": "hard" }))
        .await;
    assert_eq!(response.json::<Value>()["total"], 0);

    let response = server
        .post("/api/v1/recipes/match")
        .json(&json!({ "limit": 1 }))
        .await;
    assert_eq!(match_ids(&response.json()), vec!["r1"]);
}

#[tokio::test]
async fn test_match_uses_configured_default_limit() {
    let detector = StubDetector { concepts: vec![] };
    let server = server_with_state(
        AppState::new(test_catalog(), Arc::new(detector)).with_match_limit(Some(1)),
    );

    let response = server.post("/api/v1/recipes/match").json(&json!({})).await;
    assert_eq!(response.json::<Value>()["total"], 1);
}

#[tokio::test]
async fn test_match_rejects_unknown_dietary_tag() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recipes/match")
        .json(&json!({ "dietary_filters": ["paleo"] }))
        .await;

    assert!(response.status_code().is_client_error());
}

#[tokio::test]
async fn test_ingredient_suggestions() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/ingredients")
        .add_query_param("q", "o")
        .add_query_param("selected", "Tomato")
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!(["oil"]));
}

#[tokio::test]
async fn test_ingredient_suggestions_blank_query() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/ingredients")
        .add_query_param("limit", 2)
        .await;

    assert_eq!(response.json::<Value>(), json!(["basil", "cheese"]));
}

#[tokio::test]
async fn test_detect_returns_confident_ingredients() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/detect")
        .multipart(image_form("image/png", &[0x89, 0x50, 0x4e, 0x47]))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["ingredients"], json!(["tomato", "basil"]));
}

#[tokio::test]
async fn test_detect_rejects_unsupported_type() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/detect")
        .multipart(image_form("image/gif", b"GIF89a"))
        .await;

    response.assert_status_bad_request();
    assert_eq!(
        response.json::<Value>()["error"],
        "Unsupported file type. Please upload JPG, PNG, or WEBP."
    );
}

#[tokio::test]
async fn test_detect_requires_image_field() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/detect")
        .multipart(MultipartForm::new().add_text("note", "hello"))
        .await;

    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["error"], "Image file is required.");
}

#[tokio::test]
async fn test_detect_without_credentials() {
    let server = server_with_state(AppState::new(test_catalog(), Arc::new(UnconfiguredDetector)));
    let response = server
        .post("/api/v1/detect")
        .multipart(image_form("image/jpeg", &[0xff, 0xd8, 0xff]))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>()["error"],
        "Clarifai credentials are not configured."
    );
}
