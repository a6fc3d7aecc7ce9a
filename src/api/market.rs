//! Market-wide sentiment and sector endpoints.

use crate::api::ApiResponse;
use crate::error::{AppError, Result};
use crate::services::sentiment::{market_snapshot, SectorRow};
use crate::types::{
    IndexBar, InstrumentQuote, MarketReport, MarketSnapshot, SectorRanking, SentimentReport,
};
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use tracing::warn;

/// Sentiment inputs: a ready snapshot or raw quotes, plus index bars.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentRequest {
    /// Takes precedence over `quotes` when both are present.
    pub snapshot: Option<MarketSnapshot>,
    #[serde(default)]
    pub quotes: Vec<InstrumentQuote>,
    /// Daily index bars in time order; the last two are scored.
    #[serde(default)]
    pub index_bars: Vec<IndexBar>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SectorsRequest {
    pub rows: Vec<SectorRow>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub quotes: Vec<InstrumentQuote>,
    #[serde(default)]
    pub rows: Vec<SectorRow>,
    #[serde(default)]
    pub index_bars: Vec<IndexBar>,
}

/// Create the market router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sentiment", post(post_sentiment))
        .route("/sectors", post(post_sectors))
        .route("/report", post(post_report))
}

/// POST /api/market/sentiment
async fn post_sentiment(
    State(state): State<AppState>,
    Json(request): Json<SentimentRequest>,
) -> Result<Json<ApiResponse<SentimentReport>>> {
    let snapshot = match request.snapshot {
        Some(snapshot) => Some(snapshot),
        None if !request.quotes.is_empty() => match market_snapshot(&request.quotes) {
            Ok(snapshot) => Some(snapshot),
            Err(err) if !request.index_bars.is_empty() => {
                warn!("scoring index without breadth: {}", err);
                None
            }
            Err(err) => return Err(err),
        },
        None if request.index_bars.is_empty() => {
            return Err(AppError::BadRequest(
                "provide a snapshot, quotes or index bars".to_string(),
            ))
        }
        None => None,
    };

    let report = state.market.sentiment(snapshot.as_ref(), &request.index_bars);
    Ok(Json(ApiResponse::new(report)))
}

/// POST /api/market/sectors
async fn post_sectors(
    State(state): State<AppState>,
    Json(request): Json<SectorsRequest>,
) -> Result<Json<ApiResponse<SectorRanking>>> {
    let ranking = state.market.sectors(&request.rows)?;
    Ok(Json(ApiResponse::new(ranking)))
}

/// POST /api/market/report
async fn post_report(
    State(state): State<AppState>,
    Json(request): Json<ReportRequest>,
) -> Result<Json<ApiResponse<MarketReport>>> {
    let report = state
        .market
        .report(&request.quotes, &request.rows, &request.index_bars)?;
    Ok(Json(ApiResponse::new(report)))
}
