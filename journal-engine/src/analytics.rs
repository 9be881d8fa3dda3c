//! Journal analytics (pure functions over stored records)
//!
//! - Average confluence score per session
//! - Score distribution (raw series + 10-point histogram)
//! - Trade count per fib level

use journal_domain::{FibLevel, Session, TradeRecord};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Width of a histogram bucket in score points
const BUCKET_WIDTH: Decimal = Decimal::TEN;

/// Number of histogram buckets; the last one is closed at 100
const BUCKET_COUNT: usize = 10;

/// One histogram bucket `[lower, upper)` (the last is `[90, 100]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreBucket {
    pub lower: Decimal,
    pub upper: Decimal,
    pub count: usize,
}

/// Scores in insertion order plus their histogram
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreDistribution {
    pub scores: Vec<Decimal>,
    pub buckets: Vec<ScoreBucket>,
}

/// Everything the dashboard shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsSummary {
    pub total_trades: usize,
    pub average_score: Option<Decimal>,
    pub average_score_by_session: BTreeMap<Session, Decimal>,
    pub score_distribution: ScoreDistribution,
    pub trades_per_fib_level: BTreeMap<FibLevel, usize>,
}

/// Mean of a set of scores, rounded to 2 dp
fn mean(scores: &[Decimal]) -> Option<Decimal> {
    if scores.is_empty() {
        return None;
    }
    let sum: Decimal = scores.iter().copied().sum();
    Some((sum / Decimal::from(scores.len())).round_dp(2).normalize())
}

/// Mean confluence score per session (sessions without trades are absent)
pub fn average_score_by_session(records: &[TradeRecord]) -> BTreeMap<Session, Decimal> {
    let mut grouped: BTreeMap<Session, Vec<Decimal>> = BTreeMap::new();
    for record in records {
        grouped.entry(record.session()).or_default().push(record.confluence_score);
    }

    grouped
        .into_iter()
        .filter_map(|(session, scores)| mean(&scores).map(|avg| (session, avg)))
        .collect()
}

/// Score series and 10-point histogram
pub fn score_distribution(records: &[TradeRecord]) -> ScoreDistribution {
    let scores: Vec<Decimal> = records.iter().map(|r| r.confluence_score).collect();

    let mut counts = [0usize; BUCKET_COUNT];
    for score in &scores {
        counts[bucket_index(*score)] += 1;
    }

    let buckets = counts
        .iter()
        .enumerate()
        .map(|(i, count)| {
            let lower = BUCKET_WIDTH * Decimal::from(i);
            ScoreBucket {
                lower,
                upper: lower + BUCKET_WIDTH,
                count: *count,
            }
        })
        .collect();

    ScoreDistribution { scores, buckets }
}

fn bucket_index(score: Decimal) -> usize {
    (score / BUCKET_WIDTH)
        .floor()
        .to_usize()
        .unwrap_or(0)
        .min(BUCKET_COUNT - 1)
}

/// Trade count per fib level (levels without trades are absent)
pub fn trades_per_fib_level(records: &[TradeRecord]) -> BTreeMap<FibLevel, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.fib_level()).or_insert(0) += 1;
    }
    counts
}

/// Build the full dashboard summary
pub fn summary(records: &[TradeRecord]) -> AnalyticsSummary {
    let distribution = score_distribution(records);
    AnalyticsSummary {
        total_trades: records.len(),
        average_score: mean(&distribution.scores),
        average_score_by_session: average_score_by_session(records),
        score_distribution: distribution,
        trades_per_fib_level: trades_per_fib_level(records),
    }
}
