//! Confluence scoring input and output
//!
//! `ConfluenceInput` is the structured description of a trade setup handed to
//! the scorer; `ScoreBreakdown` is what comes back. Both are plain values with
//! no lifecycle beyond a single evaluation.

use crate::value_objects::{timeframe_map, Direction, StructureLabel, Timeframe, TrendState};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// ConfluenceInput
// =============================================================================

/// Multi-timeframe description of a planned trade
///
/// Timeframe maps are sparse: a missing key reads as `None`. Keys outside the
/// relevant set (e.g. `1H` in `htf_trends`) are ignored by the accessors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfluenceInput {
    #[serde(default)]
    pub planned_direction: Direction,
    #[serde(default, deserialize_with = "timeframe_map")]
    pub htf_trends: BTreeMap<Timeframe, TrendState>,
    #[serde(default, deserialize_with = "timeframe_map")]
    pub ltf_trends: BTreeMap<Timeframe, TrendState>,
    #[serde(default, deserialize_with = "timeframe_map")]
    pub ltf_expected: BTreeMap<Timeframe, StructureLabel>,
    #[serde(default)]
    pub fib_level_tapped: bool,
    #[serde(default)]
    pub entry_candle_confirmed: bool,
    #[serde(default)]
    pub session_favorable: bool,
    #[serde(default)]
    pub structure_changed_against_bias: bool,
    #[serde(default)]
    pub ob_sd_conflict: bool,
    #[serde(default)]
    pub liquidity_sweep_against_trade: bool,
}

impl ConfluenceInput {
    /// Empty setup for a direction: every trend and structure is `None`,
    /// every flag is false.
    pub fn new(planned_direction: Direction) -> Self {
        Self {
            planned_direction,
            ..Self::default()
        }
    }

    /// Set a higher timeframe trend
    pub fn with_htf(mut self, timeframe: Timeframe, trend: TrendState) -> Self {
        self.htf_trends.insert(timeframe, trend);
        self
    }

    /// Set a lower timeframe trend
    pub fn with_ltf(mut self, timeframe: Timeframe, trend: TrendState) -> Self {
        self.ltf_trends.insert(timeframe, trend);
        self
    }

    /// Set the structure expected to form on a lower timeframe
    pub fn with_expected(mut self, timeframe: Timeframe, label: StructureLabel) -> Self {
        self.ltf_expected.insert(timeframe, label);
        self
    }

    /// Trend on a higher timeframe (`None` when absent)
    pub fn htf_trend(&self, timeframe: Timeframe) -> TrendState {
        self.htf_trends.get(&timeframe).copied().unwrap_or_default()
    }

    /// Trend on a lower timeframe (`None` when absent)
    pub fn ltf_trend(&self, timeframe: Timeframe) -> TrendState {
        self.ltf_trends.get(&timeframe).copied().unwrap_or_default()
    }

    /// Expected structure on a lower timeframe (`None` when absent)
    pub fn expected_structure(&self, timeframe: Timeframe) -> StructureLabel {
        self.ltf_expected.get(&timeframe).copied().unwrap_or_default()
    }
}

// =============================================================================
// Contributor
// =============================================================================

/// Named factor appearing in a score breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Contributor {
    HtfAlignment,
    LtfAlignment,
    PlannedDirection,
    ExpectedStructure,
    FibLevelTapped,
    FibLevelMissed,
    EntryCandleConfirmation,
    EntryCandleFailed,
    ObSdConflict,
    ObSdClear,
    LiquiditySweep,
    NoLiquiditySweep,
    SessionFavorability,
    SessionWeak,
    StructureChange,
    NoStructureChange,
}

impl Contributor {
    /// Key used in the contributor maps
    pub fn label(&self) -> &'static str {
        match self {
            Contributor::HtfAlignment => "HTF Alignment",
            Contributor::LtfAlignment => "LTF Alignment",
            Contributor::PlannedDirection => "Planned Trade Direction Alignment",
            Contributor::ExpectedStructure => "Expected LTF Structure",
            Contributor::FibLevelTapped => "Fib Level Tapped",
            Contributor::FibLevelMissed => "Fib Level Missed",
            Contributor::EntryCandleConfirmation => "Entry Candle Confirmation",
            Contributor::EntryCandleFailed => "Entry Candle Failed",
            Contributor::ObSdConflict => "OB/SD Conflict",
            Contributor::ObSdClear => "OB/SD Clear",
            Contributor::LiquiditySweep => "Liquidity Sweep",
            Contributor::NoLiquiditySweep => "No Liquidity Sweep",
            Contributor::SessionFavorability => "Session Favorability",
            Contributor::SessionWeak => "Session Weak",
            Contributor::StructureChange => "Structure Change",
            Contributor::NoStructureChange => "No Structure Change",
        }
    }
}

impl fmt::Display for Contributor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// ScoreBreakdown
// =============================================================================

/// Result of a confluence evaluation
///
/// # Invariants
/// - `score` is within [0, 100] with at most 2 decimal places
/// - positive amounts are >= 0, negative amounts are <= 0
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub score: Decimal,
    pub positive_contributors: BTreeMap<String, Decimal>,
    pub negative_contributors: BTreeMap<String, Decimal>,
}

impl ScoreBreakdown {
    /// Amount recorded on the positive side for a contributor
    pub fn positive(&self, contributor: Contributor) -> Option<Decimal> {
        self.positive_contributors.get(contributor.label()).copied()
    }

    /// Amount recorded on the negative side for a contributor
    pub fn negative(&self, contributor: Contributor) -> Option<Decimal> {
        self.negative_contributors.get(contributor.label()).copied()
    }

    /// Sum of every contribution before clamping
    pub fn raw_total(&self) -> Decimal {
        self.positive_contributors.values().copied().sum::<Decimal>()
            + self.negative_contributors.values().copied().sum::<Decimal>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_missing_timeframes_read_as_none() {
        let input = ConfluenceInput::new(Direction::Buy)
            .with_htf(Timeframe::Weekly, TrendState::Bullish)
            .with_expected(Timeframe::H1, StructureLabel::HL);

        assert_eq!(input.htf_trend(Timeframe::Weekly), TrendState::Bullish);
        assert_eq!(input.htf_trend(Timeframe::Daily), TrendState::None);
        assert_eq!(input.ltf_trend(Timeframe::M5), TrendState::None);
        assert_eq!(input.expected_structure(Timeframe::H1), StructureLabel::HL);
        assert_eq!(input.expected_structure(Timeframe::M30), StructureLabel::None);
    }

    #[test]
    fn test_input_deserializes_with_missing_fields() {
        let input: ConfluenceInput = serde_json::from_str(
            r#"{"planned_direction":"Hold","htf_trends":{"4H":"Bearish"}}"#,
        )
        .unwrap();

        assert_eq!(input.planned_direction, Direction::None);
        assert_eq!(input.htf_trend(Timeframe::H4), TrendState::Bearish);
        assert!(!input.ob_sd_conflict);
    }

    #[test]
    fn test_input_tolerates_malformed_timeframes() {
        let input: ConfluenceInput = serde_json::from_str(
            r#"{
                "planned_direction": null,
                "htf_trends": {"1W": "Bullish", "4h": "Bullish"},
                "ltf_trends": {"1H": null, "15m": 3}
            }"#,
        )
        .unwrap();

        assert_eq!(input.planned_direction, Direction::None);
        assert_eq!(input.htf_trends.len(), 1);
        assert_eq!(input.htf_trend(Timeframe::H4), TrendState::Bullish);
        assert_eq!(input.ltf_trend(Timeframe::H1), TrendState::None);
        assert_eq!(input.ltf_trend(Timeframe::M15), TrendState::None);
    }

    #[test]
    fn test_breakdown_lookup_by_contributor() {
        let mut breakdown = ScoreBreakdown::default();
        breakdown
            .positive_contributors
            .insert(Contributor::HtfAlignment.label().to_string(), dec!(20));
        breakdown
            .negative_contributors
            .insert(Contributor::SessionWeak.label().to_string(), dec!(-20));

        assert_eq!(breakdown.positive(Contributor::HtfAlignment), Some(dec!(20)));
        assert_eq!(breakdown.negative(Contributor::HtfAlignment), None);
        assert_eq!(breakdown.raw_total(), dec!(0));
    }
}
