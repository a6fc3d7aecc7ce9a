//! Market sentiment pipeline tests against the public library API.

use serde_json::json;
use tapeline::services::sentiment::{
    index_sentiment, market_snapshot, normalize_rows, rank_sectors, snapshot_score, SectorRow,
    NEUTRAL_SCORE,
};
use tapeline::services::MarketAnalyzer;
use tapeline::{AppError, IndexBar, InstrumentQuote, SentimentTier};

fn quotes(changes: &[f64]) -> Vec<InstrumentQuote> {
    changes
        .iter()
        .map(|&change_pct| InstrumentQuote {
            change_pct,
            turnover: 1.0e9,
        })
        .collect()
}

fn rows(value: serde_json::Value) -> Vec<SectorRow> {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_quotes_to_snapshot_score() {
    let snapshot = market_snapshot(&quotes(&[1.0, 2.0, -1.0, 0.0])).unwrap();

    // up/down 2.0 -> 100 * 0.4; avg 0.5 -> 52.5 * 0.3; 40 亿 -> 4 * 0.3
    assert_eq!(snapshot_score(&snapshot), Some(56.95));
}

#[test]
fn test_scores_stay_in_range() {
    let cases = [
        vec![-10.0; 50],
        vec![10.0; 50],
        vec![0.0; 3],
        vec![5.0, -5.0, 0.3, -0.2],
    ];

    for changes in cases {
        let snapshot = market_snapshot(&quotes(&changes)).unwrap();
        let score = snapshot_score(&snapshot).unwrap();
        assert!((0.0..=100.0).contains(&score));

        let bars = [
            IndexBar { close: 100.0, volume: 10.0 },
            IndexBar { close: 100.0 + changes[0], volume: 10.0 + changes[0] },
        ];
        let index = index_sentiment(&bars, Some(&snapshot));
        assert!((0.0..=100.0).contains(&index.score));
    }
}

#[test]
fn test_index_failure_is_exactly_neutral() {
    let bars = [
        IndexBar { close: 0.0, volume: 10.0 },
        IndexBar { close: 100.0, volume: 10.0 },
    ];
    let result = index_sentiment(&bars, None);
    assert_eq!(result.score, 50.0);
    assert_eq!(result.score, NEUTRAL_SCORE);
    assert_eq!(SentimentTier::from_score(result.score), SentimentTier::Neutral);
}

#[test]
fn test_sector_aliases_and_ranking() {
    let snapshot = normalize_rows(&rows(json!([
        {"名称": "有色金属", "涨跌幅": "4.10%", "变动金额": "-12.5"},
        {"名称": "软件开发", "涨跌幅": "0.20%", "变动金额": "88.0"},
        {"名称": "煤炭", "涨跌幅": "-1.30%", "变动金额": "140.0"},
        {"名称": "白酒", "涨跌幅": "--", "变动金额": "3.0"}
    ])))
    .unwrap();

    let ranking = rank_sectors(&snapshot, 10);
    let hot: Vec<&str> = ranking.hot.iter().map(|s| s.sector_name.as_str()).collect();
    let potential: Vec<&str> = ranking
        .potential
        .iter()
        .map(|s| s.sector_name.as_str())
        .collect();

    assert_eq!(hot, vec!["有色金属", "软件开发", "煤炭"]);
    // 软件开发: 88 - 20 = 68; 煤炭: 140 - 130 = 10
    assert_eq!(potential, vec!["软件开发", "煤炭"]);
}

#[test]
fn test_sector_missing_field_fails_fast() {
    let err = normalize_rows(&rows(json!([
        {"sector": "Tech", "change_pct": 1.0, "net_flow_amount": 1.0},
        {"sector": "Energy", "net_flow_amount": 1.0}
    ])))
    .unwrap_err();

    assert!(matches!(err, AppError::MissingData(_)));
}

#[test]
fn test_market_report_top_sectors() {
    let sector_rows = rows(json!([
        {"sector_name": "A", "change_pct": 0.5, "change_amount": 1.0},
        {"sector_name": "B", "change_pct": 1.5, "change_amount": 1.0}
    ]));
    let bars = [
        IndexBar { close: 100.0, volume: 10.0 },
        IndexBar { close: 101.0, volume: 12.0 },
    ];

    let report = MarketAnalyzer::new(10)
        .report(&quotes(&[1.0, -1.0]), &sector_rows, &bars)
        .unwrap();

    assert_eq!(report.top_hot_sectors, vec!["B", "A"]);
    assert_eq!(report.sentiment.tier, SentimentTier::from_score(report.sentiment.index.score));
    assert_eq!(report.sentiment.recommendation, report.sentiment.tier.recommendation());
}
