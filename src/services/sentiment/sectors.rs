//! Sector snapshot normalization and hot/potential ranking.

use crate::error::{AppError, Result};
use crate::types::{numeric_value, SectorRanking, SectorRecord, SectorSnapshot};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Provider column names accepted for the sector name.
const NAME_COLUMNS: &[&str] = &["行业", "名称", "板块名称", "name", "sector", "sector_name"];
/// Provider column names accepted for the change percent.
const CHANGE_COLUMNS: &[&str] = &["涨跌幅", "涨跌幅(%)", "change_pct"];
/// Provider column names accepted for the net flow amount.
const FLOW_COLUMNS: &[&str] = &["涨跌额", "变动金额", "net_flow_amount", "change_amount"];

/// A raw provider row keyed by column name.
pub type SectorRow = Map<String, Value>;

/// Map provider rows onto [`SectorRecord`]s, preserving order.
///
/// A row without a name, change or flow column fails the whole batch with
/// `MissingData`. Unparseable numbers become NaN and are dropped later by
/// the rankings.
pub fn normalize_rows(rows: &[SectorRow]) -> Result<SectorSnapshot> {
    let sectors = rows
        .iter()
        .enumerate()
        .map(|(index, row)| normalize_row(index, row))
        .collect::<Result<Vec<_>>>()?;

    debug!(sectors = sectors.len(), "normalized sector rows");
    Ok(SectorSnapshot { sectors })
}

fn normalize_row(index: usize, row: &SectorRow) -> Result<SectorRecord> {
    let name = column(row, NAME_COLUMNS)
        .ok_or_else(|| AppError::missing(format!("sector row {} has no name column", index)))?;

    let sector_name = match name {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        other => {
            return Err(AppError::MalformedField {
                field: "sector_name".to_string(),
                value: other.to_string(),
            })
        }
    };

    let change_pct = column(row, CHANGE_COLUMNS)
        .map(numeric_value)
        .ok_or_else(|| AppError::missing(format!("sector row {} has no change column", index)))?;
    let net_flow_amount = column(row, FLOW_COLUMNS)
        .map(numeric_value)
        .ok_or_else(|| AppError::missing(format!("sector row {} has no net flow column", index)))?;

    Ok(SectorRecord {
        sector_name,
        change_pct,
        net_flow_amount,
    })
}

/// First non-null value under any alias, matching keys after trimming.
fn column<'a>(row: &'a SectorRow, aliases: &[&str]) -> Option<&'a Value> {
    aliases.iter().find_map(|alias| {
        row.iter()
            .find(|(key, value)| key.trim() == *alias && !value.is_null())
            .map(|(_, value)| value)
    })
}

fn complete(snapshot: &SectorSnapshot) -> Vec<&SectorRecord> {
    let complete: Vec<&SectorRecord> = snapshot.sectors.iter().filter(|s| s.is_complete()).collect();

    let dropped = snapshot.sectors.len() - complete.len();
    if dropped > 0 {
        warn!(dropped, "excluded sectors with malformed numbers from ranking");
    }

    complete
}

/// Top `n` sectors by change percent, descending. Ties keep input order.
pub fn hot_sectors(snapshot: &SectorSnapshot, n: usize) -> Vec<SectorRecord> {
    let mut sectors = complete(snapshot);
    sectors.sort_by(|a, b| b.change_pct.total_cmp(&a.change_pct));
    sectors.into_iter().take(n).cloned().collect()
}

/// Top `n` net-inflow sectors by potential score, descending.
pub fn potential_sectors(snapshot: &SectorSnapshot, n: usize) -> Vec<SectorRecord> {
    let mut sectors: Vec<&SectorRecord> = complete(snapshot)
        .into_iter()
        .filter(|s| s.net_flow_amount > 0.0)
        .collect();
    sectors.sort_by(|a, b| b.potential_score().total_cmp(&a.potential_score()));
    sectors.into_iter().take(n).cloned().collect()
}

/// Both rankings at once.
pub fn rank_sectors(snapshot: &SectorSnapshot, n: usize) -> SectorRanking {
    SectorRanking {
        hot: hot_sectors(snapshot, n),
        potential: potential_sectors(snapshot, n),
    }
}
