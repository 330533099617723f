use axum::{ extract::State, http::StatusCode, Json };
use serde_json::{ json, Value };

use crate::state::AppState;

pub async fn status_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(
            json!({
            "status": "healthy",
            "service": "NutriSnap API",
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "environment": if state.config.is_production() { "production" } else { "development" },
            "model": state.config.gemini.model,
            "foodLookup": state.food_lookup.backend_name(),
        })
        ),
    )
}
