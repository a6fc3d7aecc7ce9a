//! Single-instrument analysis endpoints.

use crate::api::ApiResponse;
use crate::error::Result;
use crate::types::{InstrumentAnalysis, LevelForecast, PricePoint, Signal};
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;

/// Request body carrying one instrument's bars in time order.
#[derive(Debug, Deserialize)]
pub struct SeriesRequest {
    pub points: Vec<PricePoint>,
}

/// Create the instruments router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signals", post(post_signals))
        .route("/levels", post(post_levels))
        .route("/analysis", post(post_analysis))
}

/// POST /api/instruments/signals
async fn post_signals(
    State(state): State<AppState>,
    Json(request): Json<SeriesRequest>,
) -> Result<Json<ApiResponse<Vec<Signal>>>> {
    let signals = state.instruments.signals(request.points)?;
    Ok(Json(ApiResponse::new(signals)))
}

/// POST /api/instruments/levels
async fn post_levels(
    State(state): State<AppState>,
    Json(request): Json<SeriesRequest>,
) -> Result<Json<ApiResponse<LevelForecast>>> {
    let forecast = state.instruments.levels(request.points)?;
    Ok(Json(ApiResponse::new(forecast)))
}

/// POST /api/instruments/analysis
async fn post_analysis(
    State(state): State<AppState>,
    Json(request): Json<SeriesRequest>,
) -> Result<Json<ApiResponse<InstrumentAnalysis>>> {
    let analysis = state.instruments.analyze(request.points)?;
    Ok(Json(ApiResponse::new(analysis)))
}
