//! Journal service: scores submissions and keeps the trade log.
//!
//! Wires the pure scorer and analytics from `journal-engine` to a
//! [`TradeStore`]. Every write goes through here so the stored score is
//! always the one the scorer produced for the stored inputs.

use crate::error::DaemonResult;
use journal_domain::{ScoreBreakdown, TradeRecord, TradeSubmission};
use journal_engine::{analytics, AnalyticsSummary, ConfluenceScorer};
use journal_store::{export_csv, TradeStore};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Result of a successful submit
#[derive(Debug, Clone, Serialize)]
pub struct Submitted {
    /// 0-based position in the journal
    pub position: usize,
    /// Stored record
    pub record: TradeRecord,
    /// Contributor breakdown (returned to the caller, not stored)
    pub breakdown: ScoreBreakdown,
}

/// Trade journal backed by a store.
pub struct Journal<S: TradeStore + ?Sized> {
    store: Arc<S>,
    scorer: ConfluenceScorer,
}

impl<S: TradeStore + ?Sized> Journal<S> {
    /// Create a journal with the standard weights.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_scorer(store, ConfluenceScorer::new())
    }

    /// Create a journal with a custom scorer.
    pub fn with_scorer(store: Arc<S>, scorer: ConfluenceScorer) -> Self {
        Self { store, scorer }
    }

    /// Underlying store
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Score a filled-out form without recording it.
    pub fn preview(&self, entry: &TradeSubmission) -> ScoreBreakdown {
        self.scorer.score(&entry.confluence_input())
    }

    /// Score a submission and append it to the journal.
    pub async fn submit(&self, entry: TradeSubmission) -> DaemonResult<Submitted> {
        let breakdown = self.scorer.score(&entry.confluence_input());
        let record = TradeRecord::new(entry, breakdown.score);

        let position = self.store.append(&record).await?;

        info!(
            position,
            trade_id = %record.id,
            trade_number = %record.entry.trade_number,
            score = %record.confluence_score,
            backend = self.store.backend(),
            "Trade recorded"
        );

        Ok(Submitted {
            position,
            record,
            breakdown,
        })
    }

    /// All recorded trades in insertion order.
    pub async fn list(&self) -> DaemonResult<Vec<TradeRecord>> {
        Ok(self.store.list().await?)
    }

    /// Remove the trade at `position`.
    pub async fn delete(&self, position: usize) -> DaemonResult<TradeRecord> {
        let removed = self.store.delete(position).await?;
        info!(position, trade_id = %removed.id, "Trade deleted");
        Ok(removed)
    }

    /// Dashboard summary over the current journal.
    pub async fn analytics(&self) -> DaemonResult<AnalyticsSummary> {
        let records = self.store.list().await?;
        debug!(total = records.len(), "Computing analytics");
        Ok(analytics::summary(&records))
    }

    /// Whole journal as CSV, header row first.
    pub async fn export_csv(&self) -> DaemonResult<String> {
        let records = self.store.list().await?;
        Ok(export_csv(&records)?)
    }
}

impl<S: TradeStore + ?Sized> Clone for Journal<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            scorer: self.scorer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DaemonError;
    use journal_domain::{Direction, FibLevel, Session, Timeframe, TrendState};
    use journal_store::{MemoryStore, StoreError};
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn create_journal() -> Journal<MemoryStore> {
        Journal::new(Arc::new(MemoryStore::new()))
    }

    fn aligned_buy() -> TradeSubmission {
        let htf: BTreeMap<_, _> = Timeframe::HIGHER
            .iter()
            .map(|tf| (*tf, TrendState::Bullish))
            .collect();
        TradeSubmission {
            planned_direction: Direction::Buy,
            htf_trends: htf,
            fib_level: FibLevel::Fib618,
            session: Session::London,
            ..TradeSubmission::default()
        }
    }

    #[tokio::test]
    async fn test_submit_stores_scored_record() {
        let journal = create_journal();

        let submitted = journal.submit(aligned_buy()).await.unwrap();

        assert_eq!(submitted.position, 0);
        assert_eq!(submitted.record.confluence_score, submitted.breakdown.score);
        assert_eq!(submitted.record.stop_loss_pips, 50);
        assert_eq!(submitted.record.take_profit_pips, 100);

        let trades = journal.list().await.unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].id, submitted.record.id);
    }

    #[tokio::test]
    async fn test_preview_does_not_record() {
        let journal = create_journal();
        let submission = aligned_buy();

        let preview = journal.preview(&submission);
        let submitted = journal.submit(submission).await.unwrap();

        assert_eq!(preview, submitted.breakdown);
        assert_eq!(journal.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_minimal_submission_scores_zero() {
        let journal = create_journal();

        let submitted = journal.submit(TradeSubmission::default()).await.unwrap();

        assert_eq!(submitted.record.confluence_score, dec!(0));
    }

    #[tokio::test]
    async fn test_delete_out_of_range() {
        let journal = create_journal();
        journal.submit(aligned_buy()).await.unwrap();

        let result = journal.delete(3).await;

        assert!(matches!(
            result,
            Err(DaemonError::Store(StoreError::NotFound { position: 3, len: 1 }))
        ));
        assert_eq!(journal.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_shifts_positions() {
        let journal = create_journal();
        let first = journal.submit(aligned_buy()).await.unwrap();
        let second = journal.submit(TradeSubmission::default()).await.unwrap();

        let removed = journal.delete(0).await.unwrap();

        assert_eq!(removed.id, first.record.id);
        let trades = journal.list().await.unwrap();
        assert_eq!(trades[0].id, second.record.id);
    }

    #[tokio::test]
    async fn test_analytics_over_journal() {
        let journal = create_journal();
        journal.submit(aligned_buy()).await.unwrap();
        journal.submit(aligned_buy()).await.unwrap();

        let summary = journal.analytics().await.unwrap();

        assert_eq!(summary.total_trades, 2);
        assert_eq!(summary.trades_per_fib_level.get(&FibLevel::Fib618), Some(&2));
        assert!(summary.average_score_by_session.contains_key(&Session::London));
    }

    #[tokio::test]
    async fn test_export_csv_has_header_and_rows() {
        let journal = create_journal();
        journal.submit(aligned_buy()).await.unwrap();

        let csv = journal.export_csv().await.unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("DateTime"));
        assert!(lines[1].contains("London"));
    }
}
