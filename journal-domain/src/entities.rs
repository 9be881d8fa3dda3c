//! Domain Entities for the Trading Journal
//!
//! `TradeSubmission` is what the journal form collects; `TradeRecord` is the
//! persisted entry built from it once it has been scored.

use crate::confluence::ConfluenceInput;
use crate::value_objects::{
    timeframe_map, CandleType, Direction, FibLevel, Session, StructureLabel, Timeframe,
    TradeNumber, TradeResult, TrendState,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Unique identifier for a TradeRecord
pub type TradeId = Uuid;

/// Suggested stop-loss distance in pips (placeholder, never computed)
pub const PLACEHOLDER_STOP_LOSS_PIPS: u32 = 50;

/// Suggested take-profit distance in pips (placeholder, never computed)
pub const PLACEHOLDER_TAKE_PROFIT_PIPS: u32 = 100;

// =============================================================================
// TradeSubmission
// =============================================================================

/// A filled-out journal form
///
/// Every field is optional on the wire; absent selections default to their
/// `None` variant and absent text to an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeSubmission {
    pub trade_number: TradeNumber,
    pub planned_direction: Direction,
    #[serde(deserialize_with = "timeframe_map")]
    pub htf_trends: BTreeMap<Timeframe, TrendState>,
    #[serde(deserialize_with = "timeframe_map")]
    pub ltf_trends: BTreeMap<Timeframe, TrendState>,
    #[serde(deserialize_with = "timeframe_map")]
    pub ltf_expected: BTreeMap<Timeframe, StructureLabel>,
    pub fib_level: FibLevel,
    pub entry_candle: CandleType,
    pub session: Session,
    pub structure_change: bool,
    pub ob_sd_conflict: bool,
    pub liquidity_sweep: bool,
    pub notes: String,
    pub mistakes: String,
    pub lessons: String,
    pub screenshot: Option<String>,
    pub trade_result: TradeResult,
}

impl TradeSubmission {
    /// Derive the scorer input from the form selections
    pub fn confluence_input(&self) -> ConfluenceInput {
        ConfluenceInput {
            planned_direction: self.planned_direction,
            htf_trends: self.htf_trends.clone(),
            ltf_trends: self.ltf_trends.clone(),
            ltf_expected: self.ltf_expected.clone(),
            fib_level_tapped: self.fib_level.is_tapped(),
            entry_candle_confirmed: self.entry_candle.is_confirmation(),
            session_favorable: self.session.is_favorable(),
            structure_changed_against_bias: self.structure_change,
            ob_sd_conflict: self.ob_sd_conflict,
            liquidity_sweep_against_trade: self.liquidity_sweep,
        }
    }
}

// =============================================================================
// TradeRecord
// =============================================================================

/// A scored, persisted journal entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub id: TradeId,
    pub recorded_at: DateTime<Utc>,
    #[serde(flatten)]
    pub entry: TradeSubmission,
    pub confluence_score: Decimal,
    pub stop_loss_pips: u32,
    pub take_profit_pips: u32,
}

impl TradeRecord {
    /// Create a record for a submission that has just been scored
    pub fn new(entry: TradeSubmission, confluence_score: Decimal) -> Self {
        Self {
            id: Uuid::now_v7(),
            recorded_at: Utc::now(),
            entry,
            confluence_score,
            stop_loss_pips: PLACEHOLDER_STOP_LOSS_PIPS,
            take_profit_pips: PLACEHOLDER_TAKE_PROFIT_PIPS,
        }
    }

    /// Session the trade was taken in
    pub fn session(&self) -> Session {
        self.entry.session
    }

    /// Fib level the trade was taken at
    pub fn fib_level(&self) -> FibLevel {
        self.entry.fib_level
    }
}
