use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use tracing::debug;
use validator::Validate;

use crate::dto::diagnostics_dto::{
    AuctionStateRequest, BatteryHealthRequest, DtcDescriptionResponse, EvDetectionQuery,
    TyreAssessResponse, TyreMetricsDisplay,
};
use crate::models::ev::EvDetectionResult;
use crate::models::passport::TyreDepths;
use crate::services::auction_state::{self, AuctionView, AuctionWindow};
use crate::services::battery_health::{self, BatteryHealthView};
use crate::services::{dtc_resolver, tyre_assessment};
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

pub fn create_diagnostics_router() -> Router<AppState> {
    Router::new()
        .route("/vin/:vin/ev", get(detect_ev))
        .route("/ev-detection", get(detect_ev_query))
        .route("/dtc/:code", get(describe_dtc))
        .route("/tyres/assess", post(assess_tyres))
        .route("/battery/health", post(derive_battery_health))
        .route("/auction/state", post(derive_auction_state))
}

async fn detect_ev(
    State(state): State<AppState>,
    Path(vin): Path<String>,
) -> Json<EvDetectionResult> {
    let result = state.classifier.classify(Some(&vin));
    debug!("🔋 Detección EV para {}: {:?}", vin, result.notes());
    Json(result)
}

async fn detect_ev_query(
    State(state): State<AppState>,
    Query(query): Query<EvDetectionQuery>,
) -> Json<EvDetectionResult> {
    Json(state.classifier.classify(query.vin.as_deref()))
}

async fn describe_dtc(Path(code): Path<String>) -> Json<DtcDescriptionResponse> {
    let description = dtc_resolver::describe(&code);
    Json(DtcDescriptionResponse {
        code: code.trim().to_uppercase(),
        valid: dtc_resolver::is_dtc_code(&code),
        description,
    })
}

async fn assess_tyres(Json(depths): Json<TyreDepths>) -> Json<TyreAssessResponse> {
    let assessment = tyre_assessment::assess(&depths);
    let metrics = assessment.as_ref().map(|a| {
        let (min, avg, variation) = a.display_metrics();
        TyreMetricsDisplay { min, avg, variation }
    });

    Json(TyreAssessResponse {
        wheels: tyre_assessment::wheel_readings(&depths),
        assessment,
        metrics,
        legal_notes: tyre_assessment::legal_notes(),
    })
}

async fn derive_battery_health(
    State(state): State<AppState>,
    Json(request): Json<BatteryHealthRequest>,
) -> AppResult<Json<BatteryHealthView>> {
    request.validate().map_err(AppError::Validation)?;

    let thresholds = request.thresholds(state.soc_thresholds());
    if thresholds.warning_pct > thresholds.good_pct {
        return Err(AppError::BadRequest(
            "socWarningPct must not be greater than socGoodPct".to_string(),
        ));
    }

    Ok(Json(battery_health::derive(&request.health(), &thresholds)))
}

async fn derive_auction_state(Json(request): Json<AuctionStateRequest>) -> AppResult<Json<AuctionView>> {
    request.validate().map_err(AppError::Validation)?;

    let now = request.now.unwrap_or_else(Utc::now);
    let window = AuctionWindow::new(request.open_at, request.close_at);
    let info = request.auction_info();

    Ok(Json(auction_state::derive_view(Some(window), Some(&info), now)))
}
