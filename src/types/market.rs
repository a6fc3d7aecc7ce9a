use serde::{Deserialize, Serialize};

use crate::types::price::lenient_f64;

/// Turnover units per 亿 (hundred million).
pub const HUNDRED_MILLION: f64 = 100_000_000.0;

/// Per-instrument quote from the market-wide spot feed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentQuote {
    /// Daily change in percent.
    #[serde(deserialize_with = "lenient_f64")]
    pub change_pct: f64,
    /// Traded value in currency units.
    #[serde(deserialize_with = "lenient_f64")]
    pub turnover: f64,
}

/// Point-in-time aggregate over all listed instruments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub advance_count: u64,
    pub decline_count: u64,
    /// Total traded value in currency units.
    pub total_turnover: f64,
    pub avg_change_pct: f64,
}

impl MarketSnapshot {
    /// Advances per decline, with zero declines counted as one.
    pub fn up_down_ratio(&self) -> f64 {
        self.advance_count as f64 / self.decline_count.max(1) as f64
    }

    /// Total turnover expressed in 亿.
    pub fn turnover_hundred_millions(&self) -> f64 {
        self.total_turnover / HUNDRED_MILLION
    }
}

/// One daily bar of the benchmark index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexBar {
    #[serde(deserialize_with = "lenient_f64")]
    pub close: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub volume: f64,
}

/// One sector row after column normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorRecord {
    pub sector_name: String,
    pub change_pct: f64,
    pub net_flow_amount: f64,
}

impl SectorRecord {
    /// Inflow-weighted score that favors sectors which have not moved yet.
    pub fn potential_score(&self) -> f64 {
        self.net_flow_amount - self.change_pct.abs() * 100.0
    }

    /// Whether both numeric fields parsed.
    pub fn is_complete(&self) -> bool {
        self.change_pct.is_finite() && self.net_flow_amount.is_finite()
    }
}

/// Sector rows in provider order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectorSnapshot {
    pub sectors: Vec<SectorRecord>,
}

/// Hot and potential sector rankings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorRanking {
    /// Ranked by change percent, descending.
    pub hot: Vec<SectorRecord>,
    /// Net-inflow sectors ranked by potential score, descending.
    pub potential: Vec<SectorRecord>,
}

/// Discrete recommendation tier for a sentiment score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentTier {
    ExtremelyOptimistic,
    ModeratelyOptimistic,
    Neutral,
    Pessimistic,
    Depressed,
}

impl SentimentTier {
    /// Map a 0-100 score to a tier, evaluated from high to low.
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 80.0 => SentimentTier::ExtremelyOptimistic,
            s if s >= 60.0 => SentimentTier::ModeratelyOptimistic,
            s if s >= 40.0 => SentimentTier::Neutral,
            s if s >= 20.0 => SentimentTier::Pessimistic,
            _ => SentimentTier::Depressed,
        }
    }

    /// Star rating, 5 for the most optimistic tier.
    pub fn stars(&self) -> u8 {
        match self {
            SentimentTier::ExtremelyOptimistic => 5,
            SentimentTier::ModeratelyOptimistic => 4,
            SentimentTier::Neutral => 3,
            SentimentTier::Pessimistic => 2,
            SentimentTier::Depressed => 1,
        }
    }

    /// Get display label for this tier.
    pub fn label(&self) -> &'static str {
        match self {
            SentimentTier::ExtremelyOptimistic => "extremely optimistic / caution",
            SentimentTier::ModeratelyOptimistic => "moderately optimistic / may participate",
            SentimentTier::Neutral => "neutral / hold",
            SentimentTier::Pessimistic => "pessimistic / caution",
            SentimentTier::Depressed => "depressed / observe",
        }
    }

    /// Full investment recommendation text.
    pub fn recommendation(&self) -> String {
        format!("{} stars - {}", self.stars(), self.label())
    }
}

/// Breakdown of the index-driven sentiment score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexComponents {
    /// Day return score, 0-40.
    pub change_score: f64,
    /// Volume ratio score, 0-30.
    pub volume_score: f64,
    /// Advance/decline breadth score, 0-30.
    pub breadth_score: f64,
}

/// Index-driven sentiment score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSentiment {
    pub score: f64,
    /// `None` when the neutral fallback was used.
    pub components: Option<IndexComponents>,
}

/// Sentiment scores and the resulting recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentReport {
    /// Breadth/turnover/average-change score; `None` when unavailable.
    pub snapshot_score: Option<f64>,
    pub index: IndexSentiment,
    pub tier: SentimentTier,
    pub recommendation: String,
}

/// Full market-wide analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketReport {
    /// Unix timestamp (milliseconds) when generated.
    pub generated_at: i64,
    pub snapshot: MarketSnapshot,
    pub up_down_ratio: f64,
    /// Total turnover in 亿.
    pub turnover_hundred_millions: f64,
    pub sentiment: SentimentReport,
    pub sectors: SectorRanking,
    /// Names of the first three hot sectors.
    pub top_hot_sectors: Vec<String>,
}
