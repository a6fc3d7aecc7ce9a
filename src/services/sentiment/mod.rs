//! Market-wide sentiment service module.
//!
//! Breadth overview, sentiment scores and sector rankings, combined into a
//! single market report by [`MarketAnalyzer`].

pub mod overview;
pub mod score;
pub mod sectors;

pub use overview::market_snapshot;
pub use score::{index_sentiment, sentiment_report, snapshot_score, NEUTRAL_SCORE};
pub use sectors::{hot_sectors, normalize_rows, potential_sectors, rank_sectors, SectorRow};

use crate::error::Result;
use crate::types::{IndexBar, InstrumentQuote, MarketReport, MarketSnapshot, SectorRanking, SentimentReport};
use tracing::info;

/// Number of hot sector names highlighted in a report.
const TOP_HOT_NAMES: usize = 3;

/// Market-wide analysis over caller-supplied snapshots.
#[derive(Debug, Clone)]
pub struct MarketAnalyzer {
    top_n: usize,
}

impl Default for MarketAnalyzer {
    fn default() -> Self {
        Self::new(10)
    }
}

impl MarketAnalyzer {
    /// Create an analyzer keeping `top_n` sectors per ranking.
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Sentiment from a breadth snapshot and index bars.
    pub fn sentiment(&self, snapshot: Option<&MarketSnapshot>, index_bars: &[IndexBar]) -> SentimentReport {
        sentiment_report(snapshot, index_bars)
    }

    /// Normalize raw sector rows and rank them.
    pub fn sectors(&self, rows: &[SectorRow]) -> Result<SectorRanking> {
        let snapshot = normalize_rows(rows)?;
        Ok(rank_sectors(&snapshot, self.top_n))
    }

    /// Full report: overview, scores, recommendation and sector rankings.
    pub fn report(
        &self,
        quotes: &[InstrumentQuote],
        rows: &[SectorRow],
        index_bars: &[IndexBar],
    ) -> Result<MarketReport> {
        let snapshot = market_snapshot(quotes)?;
        let sectors = self.sectors(rows)?;
        let sentiment = sentiment_report(Some(&snapshot), index_bars);

        let top_hot_sectors = sectors
            .hot
            .iter()
            .take(TOP_HOT_NAMES)
            .map(|s| s.sector_name.clone())
            .collect();

        info!(
            score = sentiment.index.score,
            tier = ?sentiment.tier,
            "generated market report"
        );

        Ok(MarketReport {
            generated_at: chrono::Utc::now().timestamp_millis(),
            snapshot,
            up_down_ratio: snapshot.up_down_ratio(),
            turnover_hundred_millions: snapshot.turnover_hundred_millions(),
            sentiment,
            sectors,
            top_hot_sectors,
        })
    }
}
