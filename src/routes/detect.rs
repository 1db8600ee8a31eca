use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::DetectResponse,
    routes::AppState,
    services::detection::{detect_ingredients, ImageUpload, FILE_TOO_LARGE},
};

/// Multipart field holding the photo
const IMAGE_FIELD: &str = "image";

/// Handler for detecting ingredients in an uploaded photo
pub async fn detect(
    State(state): State<AppState>,
    request_id: RequestId,
    mut multipart: Multipart,
) -> AppResult<Json<DetectResponse>> {
    let image = read_image(&mut multipart).await?;

    tracing::info!(
        request_id = %request_id,
        content_type = image.content_type(),
        bytes = image.bytes().len(),
        "Processing detection request"
    );

    let ingredients =
        detect_ingredients(state.detector.as_ref(), &image, state.detection).await?;

    Ok(Json(DetectResponse { ingredients }))
}

/// Pulls the image field out of the form and validates it
async fn read_image(multipart: &mut Multipart) -> AppResult<ImageUpload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                AppError::InvalidInput(FILE_TOO_LARGE.to_string())
            } else {
                AppError::InvalidInput(format!("Failed to read uploaded image: {}", e))
            }
        })?;

        return ImageUpload::new(&content_type, bytes.to_vec());
    }

    Err(AppError::InvalidInput("Image file is required.".to_string()))
}
