use axum::{ extract::State, http::StatusCode, response::IntoResponse, Json };
use axum_extra::extract::Multipart;
use serde_json::Value;

use crate::{ data_uri::DataUri, error::AppError, models::AnalyzeFoodImageInput, state::AppState };

pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

pub async fn analyze_food_image(
    State(state): State<AppState>,
    Json(payload): Json<Value>
) -> Result<impl IntoResponse, AppError> {
    tracing::info!("Received request for food image analysis");

    let output = state.analyze_food_image.run(&payload).await?;

    Ok((StatusCode::OK, Json(output)))
}

/// Multipart variant: an `image` file part and an optional `description` text part.
pub async fn upload_food_image(
    State(state): State<AppState>,
    mut multipart: Multipart
) -> Result<impl IntoResponse, AppError> {
    tracing::info!("Received multipart food image upload");

    let mut image_data: Option<Vec<u8>> = None;
    let mut mime_type: Option<String> = None;
    let mut description: Option<String> = None;

    while
        let Some(field) = multipart
            .next_field().await
            .map_err(|e| AppError::BadRequest(format!("Failed to read multipart field: {}", e)))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "image" => {
                mime_type = field.content_type().map(|ct| ct.to_string());

                let data = field
                    .bytes().await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read image data: {}", e)))?;

                image_data = Some(data.to_vec());
            }
            "description" => {
                let text = field
                    .text().await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read description: {}", e)))?;

                description = Some(text).filter(|t| !t.trim().is_empty());
            }
            _ => {}
        }
    }

    let image_data = image_data.ok_or_else(|| {
        AppError::BadRequest("No image provided. Please upload an image file.".to_string())
    })?;

    if image_data.len() > MAX_IMAGE_BYTES {
        return Err(AppError::BadRequest("Image too large. Maximum size is 10MB.".to_string()));
    }

    let mime_type = mime_type.unwrap_or_else(|| "image/jpeg".to_string());

    if !mime_type.starts_with("image/") {
        return Err(AppError::BadRequest("Invalid file type. Please upload an image.".to_string()));
    }

    tracing::info!("Processing image: {} bytes, mime_type: {}", image_data.len(), mime_type);

    let input = AnalyzeFoodImageInput {
        photo_data_uri: DataUri::encode(&mime_type, &image_data),
        description,
    };

    let output = state.analyze_food_image.analyze(&input).await?;

    Ok((StatusCode::OK, Json(output)))
}
