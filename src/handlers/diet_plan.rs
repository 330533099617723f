use axum::{ extract::State, http::{ header, StatusCode }, response::IntoResponse, Json };
use serde_json::Value;

use crate::{
    error::AppError,
    models::DietPlanExportRequest,
    schema::{ self, definitions },
    services::diet_plan_export::{ self, DietPlanTable, ExportOptions },
    state::AppState,
};

pub async fn generate_diet_plan(
    State(state): State<AppState>,
    Json(payload): Json<Value>
) -> Result<impl IntoResponse, AppError> {
    tracing::info!("Received request for diet plan generation");

    let output = state.generate_diet_plan.run(&payload).await?;

    Ok((StatusCode::OK, Json(output)))
}

/// Renders the plan as a printable `text/html` document, paged with CSS page
/// breaks. No `application/pdf` is produced; callers print or save to PDF
/// from the browser.
pub async fn export_diet_plan(
    State(state): State<AppState>,
    Json(payload): Json<Value>
) -> Result<impl IntoResponse, AppError> {
    let request: DietPlanExportRequest = schema::validate_as(
        &definitions::diet_plan_export_request(),
        &payload
    )?;

    tracing::info!("Exporting diet plan with {} meal(s)", request.diet_plan.len());

    let defaults = ExportOptions::default();
    let options = ExportOptions {
        title: request.title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(defaults.title),
        rows_per_page: state.config.export.rows_per_page,
        generated_at: defaults.generated_at,
        weight_kg: request.weight_kg,
    };

    let table = DietPlanTable::from_meals(&request.diet_plan);
    let html = diet_plan_export::render_html(&table, &options);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "inline; filename=\"diet-plan.html\""),
        ],
        html,
    ))
}
