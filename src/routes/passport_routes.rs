use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;

use crate::controllers::passport_controller::PassportController;
use crate::dto::passport_dto::SummaryQuery;
use crate::dto::ApiResponse;
use crate::services::passport_verification::VerificationReport;
use crate::services::passport_view::PassportSummary;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_passport_router() -> Router<AppState> {
    Router::new()
        .route("/:vin/verify", get(verify_passport))
        .route("/:vin/summary", get(passport_summary))
}

async fn verify_passport(
    State(state): State<AppState>,
    Path(vin): Path<String>,
) -> Result<Json<VerificationReport>, AppError> {
    let controller = PassportController::new(&state);
    let report = controller.verify(&vin).await?;
    Ok(Json(report))
}

async fn passport_summary(
    State(state): State<AppState>,
    Path(vin): Path<String>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<ApiResponse<PassportSummary>>, AppError> {
    let controller = PassportController::new(&state);
    let summary = controller
        .summary(&vin, query.audience.unwrap_or_default(), Utc::now())
        .await?;
    Ok(Json(ApiResponse::success(summary)))
}
