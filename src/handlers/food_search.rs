use axum::{ extract::{ Query, State }, http::StatusCode, response::IntoResponse, Json };
use serde::{ Deserialize, Serialize };

use crate::{ error::AppError, state::AppState };

#[derive(Debug, Deserialize)]
pub struct FoodSearchQuery {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

pub async fn search_foods(
    State(state): State<AppState>,
    Query(params): Query<FoodSearchQuery>
) -> Result<impl IntoResponse, AppError> {
    let query = params.query.trim();
    if query.is_empty() {
        return Err(AppError::BadRequest("Query parameter 'query' must not be empty".to_string()));
    }

    tracing::info!("Searching {} food lookup for: {}", state.food_lookup.backend_name(), query);

    let items = state.food_lookup.search(query).await.map_err(|e| {
        tracing::error!("Food lookup failed: {:#}", e);
        AppError::UpstreamCallFailure(
            "Food lookup service is temporarily unavailable. Please try again later.".to_string()
        )
    })?;

    tracing::info!("Food lookup returned {} item(s)", items.len());

    Ok((
        StatusCode::OK,
        Json(ApiResponse {
            success: true,
            data: Some(items),
            message: None,
        }),
    ))
}
