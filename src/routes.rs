use axum::{ extract::DefaultBodyLimit, routing::{ get, post }, Router };

use crate::{ error::AppError, handlers, state::AppState };

/// Leaves room for a 10MB image plus multipart framing.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

pub fn create_routes(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/api/analyze-food-image", post(handlers::food_analysis::analyze_food_image))
        .route("/api/analyze-food-image/upload", post(handlers::food_analysis::upload_food_image))
        .route("/api/generate-diet-plan", post(handlers::diet_plan::generate_diet_plan))
        .route("/api/diet-plan/export", post(handlers::diet_plan::export_diet_plan))
        .route("/api/foods/search", get(handlers::food_search::search_foods));

    Router::new()
        .route("/status", get(handlers::status::status_check))
        .merge(api_routes)
        .fallback(|| async { AppError::NotFound("Route not found".to_string()) })
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
