//! Market breadth overview built from per-instrument quotes.

use crate::error::{AppError, Result};
use crate::types::{InstrumentQuote, MarketSnapshot};
use tracing::{debug, warn};

/// Aggregate quotes into a [`MarketSnapshot`].
///
/// Each field is aggregated on its own: advances, declines and the average
/// change use the defined change percents, and the turnover total uses the
/// defined turnovers. Fails with `MissingData` when no change percent is
/// defined.
pub fn market_snapshot(quotes: &[InstrumentQuote]) -> Result<MarketSnapshot> {
    let changes: Vec<f64> = quotes
        .iter()
        .map(|q| q.change_pct)
        .filter(|v| v.is_finite())
        .collect();
    let turnovers: Vec<f64> = quotes
        .iter()
        .map(|q| q.turnover)
        .filter(|v| v.is_finite())
        .collect();

    let bad_changes = quotes.len() - changes.len();
    let bad_turnovers = quotes.len() - turnovers.len();
    if bad_changes > 0 || bad_turnovers > 0 {
        warn!(
            bad_changes,
            bad_turnovers,
            total = quotes.len(),
            "skipped malformed quote fields"
        );
    }

    if changes.is_empty() {
        return Err(AppError::missing("no instrument quote has a usable change percent"));
    }

    let advance_count = changes.iter().filter(|c| **c > 0.0).count() as u64;
    let decline_count = changes.iter().filter(|c| **c < 0.0).count() as u64;
    let total_turnover: f64 = turnovers.iter().sum();
    let avg_change_pct = changes.iter().sum::<f64>() / changes.len() as f64;

    debug!(
        advance_count,
        decline_count, total_turnover, avg_change_pct, "built market snapshot"
    );

    Ok(MarketSnapshot {
        advance_count,
        decline_count,
        total_turnover,
        avg_change_pct,
    })
}
