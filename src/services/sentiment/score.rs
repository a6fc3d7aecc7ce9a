//! Sentiment scoring.
//!
//! Two independent 0-100 scores: one from a market breadth snapshot and one
//! from the benchmark index's latest day, optionally weighted by breadth.

use crate::error::{AppError, Result};
use crate::services::signals::round_to;
use crate::types::{
    defined, IndexBar, IndexComponents, IndexSentiment, MarketSnapshot, SentimentReport,
    SentimentTier, HUNDRED_MILLION,
};
use tracing::{debug, warn};

/// Score returned by the index path whenever it cannot be computed.
pub const NEUTRAL_SCORE: f64 = 50.0;

const UP_DOWN_WEIGHT: f64 = 0.4;
const AVG_CHANGE_WEIGHT: f64 = 0.3;
const TURNOVER_WEIGHT: f64 = 0.3;

/// Weighted breadth, average change and turnover score, rounded to 2 decimals.
///
/// `None` when the average change or turnover is undefined.
pub fn snapshot_score(snapshot: &MarketSnapshot) -> Option<f64> {
    let avg_change = defined(snapshot.avg_change_pct)?;
    let turnover = defined(snapshot.total_turnover)?;

    let up_down = (snapshot.up_down_ratio() * 50.0).min(100.0);
    let change = ((avg_change + 10.0) * 5.0).clamp(0.0, 100.0);
    let volume = (turnover / HUNDRED_MILLION / 100.0 * 10.0).min(100.0);

    let score = up_down * UP_DOWN_WEIGHT + change * AVG_CHANGE_WEIGHT + volume * TURNOVER_WEIGHT;

    debug!(up_down, change, volume, score, "snapshot sentiment components");

    Some(round_to(score, 2))
}

/// Index-driven score from the last two bars and optional breadth.
///
/// Falls back to [`NEUTRAL_SCORE`] without components when the bars cannot
/// be scored.
pub fn index_sentiment(bars: &[IndexBar], breadth: Option<&MarketSnapshot>) -> IndexSentiment {
    match index_components(bars, breadth) {
        Ok(components) => {
            let score =
                components.change_score + components.volume_score + components.breadth_score;
            debug!(
                change_score = components.change_score,
                volume_score = components.volume_score,
                breadth_score = components.breadth_score,
                score,
                "index sentiment components"
            );
            IndexSentiment {
                score,
                components: Some(components),
            }
        }
        Err(e) => {
            warn!("index sentiment unavailable, using neutral score: {}", e);
            IndexSentiment {
                score: NEUTRAL_SCORE,
                components: None,
            }
        }
    }
}

fn index_components(bars: &[IndexBar], breadth: Option<&MarketSnapshot>) -> Result<IndexComponents> {
    let [previous, latest] = match bars {
        [.., previous, latest] => [previous, latest],
        _ => return Err(AppError::missing("index sentiment needs two daily bars")),
    };

    let prev_close = defined(previous.close).ok_or_else(|| malformed("previous close", previous.close))?;
    let close = defined(latest.close).ok_or_else(|| malformed("close", latest.close))?;
    let prev_volume =
        defined(previous.volume).ok_or_else(|| malformed("previous volume", previous.volume))?;
    let volume = defined(latest.volume).ok_or_else(|| malformed("volume", latest.volume))?;

    if prev_close == 0.0 {
        return Err(AppError::DegenerateDivision("previous close is zero".to_string()));
    }
    if prev_volume == 0.0 {
        return Err(AppError::DegenerateDivision("previous volume is zero".to_string()));
    }

    let day_return_pct = (close - prev_close) / prev_close * 100.0;
    let volume_ratio = volume / prev_volume;

    Ok(IndexComponents {
        change_score: ((day_return_pct + 10.0) * 2.0).clamp(0.0, 40.0),
        volume_score: ((volume_ratio - 0.5) * 30.0).clamp(0.0, 30.0),
        breadth_score: breadth.map_or(0.0, breadth_score),
    })
}

fn breadth_score(snapshot: &MarketSnapshot) -> f64 {
    let total = snapshot.advance_count + snapshot.decline_count;
    if total == 0 {
        return 0.0;
    }
    (snapshot.advance_count as f64 / total as f64 * 30.0).clamp(0.0, 30.0)
}

fn malformed(field: &str, value: f64) -> AppError {
    AppError::MalformedField {
        field: field.to_string(),
        value: value.to_string(),
    }
}

/// Combine both scores into a report; the tier follows the index score.
pub fn sentiment_report(snapshot: Option<&MarketSnapshot>, index_bars: &[IndexBar]) -> SentimentReport {
    let index = index_sentiment(index_bars, snapshot);
    let tier = SentimentTier::from_score(index.score);

    SentimentReport {
        snapshot_score: snapshot.and_then(snapshot_score),
        index,
        tier,
        recommendation: tier.recommendation(),
    }
}
