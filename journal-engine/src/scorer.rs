//! Confluence Scorer (Pure Function)
//!
//! Grades a trade setup by summing weighted evidence from six groups of
//! signals, then clamping the total to [0, 100].
//!
//! # Factors
//!
//! ```text
//! HTF Alignment            +20   (>= 2 of Weekly/Daily/4H aligned)
//! LTF Alignment            ±25   (70% majors 1H/30M, 15% per minor 15M/5M)
//! Planned Direction        ±15   (follows the HTF majority)
//! Expected LTF Structure   ±10   (per-timeframe multiples)
//! Fib / Candle              ±10 each
//! OB/SD / Liquidity Sweep   ±10 each
//! Session                  ±20
//! Structure Change         ±10   (fixed, outside the weight table)
//! ```
//!
//! Every amount is a `Decimal`, so the fractional weights (17.5, 3.75, 1.5)
//! add up exactly before the final 2 dp rounding.

use journal_domain::{
    ConfluenceInput, Contributor, Direction, ScoreBreakdown, StructureLabel, Timeframe,
};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::debug;

/// Swing applied for a structure change against bias.
///
/// Not part of `WeightTable`: it is hardcoded and never rescaled.
pub const STRUCTURE_CHANGE_SWING: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

/// Lowest possible score
pub const MIN_SCORE: Decimal = Decimal::ZERO;

/// Highest possible score
pub const MAX_SCORE: Decimal = Decimal::ONE_HUNDRED;

/// Share of the LTF weight carried by the two major timeframes together
const LTF_MAJOR_SHARE: Decimal = Decimal::from_parts(7, 0, 0, false, 1);

/// Share of the LTF weight carried by each minor timeframe
const LTF_MINOR_SHARE: Decimal = Decimal::from_parts(15, 0, 0, false, 2);

/// HTF matches needed for alignment and for the direction bonus
const HTF_MAJORITY: usize = 2;

// =============================================================================
// Weight table
// =============================================================================

/// Percentage-of-100 weight per factor
///
/// Penalty factors (`ob_sd_conflict`, `liquidity_sweep`) carry a negative
/// weight; the scorer uses their magnitude on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightTable {
    pub htf_alignment: Decimal,
    pub ltf_alignment: Decimal,
    pub planned_direction: Decimal,
    pub expected_structure: Decimal,
    pub fib_level_tapped: Decimal,
    pub entry_candle_confirmation: Decimal,
    pub ob_sd_conflict: Decimal,
    pub liquidity_sweep: Decimal,
    pub session_favorability: Decimal,
}

impl WeightTable {
    /// The journal's fixed weights
    pub const STANDARD: WeightTable = WeightTable {
        htf_alignment: Decimal::from_parts(20, 0, 0, false, 0),
        ltf_alignment: Decimal::from_parts(25, 0, 0, false, 0),
        planned_direction: Decimal::from_parts(15, 0, 0, false, 0),
        expected_structure: Decimal::from_parts(10, 0, 0, false, 0),
        fib_level_tapped: Decimal::from_parts(10, 0, 0, false, 0),
        entry_candle_confirmation: Decimal::from_parts(10, 0, 0, false, 0),
        ob_sd_conflict: Decimal::from_parts(10, 0, 0, true, 0),
        liquidity_sweep: Decimal::from_parts(10, 0, 0, true, 0),
        session_favorability: Decimal::from_parts(20, 0, 0, false, 0),
    };
}

impl Default for WeightTable {
    fn default() -> Self {
        Self::STANDARD
    }
}

// =============================================================================
// Tally
// =============================================================================

/// Running total plus the two contributor maps
#[derive(Debug, Default)]
struct Tally {
    total: Decimal,
    positive: BTreeMap<String, Decimal>,
    negative: BTreeMap<String, Decimal>,
}

impl Tally {
    /// Add `amount` (>= 0) on the positive side
    fn reward(&mut self, contributor: Contributor, amount: Decimal) {
        self.total += amount;
        self.positive.insert(contributor.label().to_string(), round(amount));
    }

    /// Subtract `amount` (>= 0), recorded as a negative contribution
    fn penalize(&mut self, contributor: Contributor, amount: Decimal) {
        self.total -= amount;
        self.negative.insert(contributor.label().to_string(), round(-amount));
    }

    /// Record a net amount: only one side is non-zero but both keys exist
    fn net(&mut self, contributor: Contributor, net: Decimal) {
        self.total += net;
        let label = contributor.label().to_string();
        self.positive.insert(label.clone(), round(net.max(Decimal::ZERO)));
        self.negative.insert(label, round(net.min(Decimal::ZERO)));
    }

    /// Record separately accumulated positive and negative parts
    fn split(&mut self, contributor: Contributor, positive: Decimal, negative: Decimal) {
        self.total += positive + negative;
        let label = contributor.label().to_string();
        self.positive.insert(label.clone(), round(positive));
        self.negative.insert(label, round(negative));
    }

    fn finish(self) -> ScoreBreakdown {
        ScoreBreakdown {
            score: round(self.total.clamp(MIN_SCORE, MAX_SCORE)),
            positive_contributors: self.positive,
            negative_contributors: self.negative,
        }
    }
}

fn round(value: Decimal) -> Decimal {
    let rounded = value.round_dp(2).normalize();
    // -0 prints as "-0"
    if rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    }
}

// =============================================================================
// ConfluenceScorer
// =============================================================================

/// Stateless rule engine grading a trade setup
///
/// Safe to share across threads; `score` takes `&self` and touches nothing
/// but its arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfluenceScorer {
    weights: WeightTable,
}

impl ConfluenceScorer {
    /// Scorer using `WeightTable::STANDARD`
    pub fn new() -> Self {
        Self::default()
    }

    /// Scorer using custom weights
    pub fn with_weights(weights: WeightTable) -> Self {
        Self { weights }
    }

    /// Weights in use
    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    /// Grade a setup.
    ///
    /// Total over its input domain: absent timeframes read as `None` and a
    /// `None` direction never aligns.
    pub fn score(&self, input: &ConfluenceInput) -> ScoreBreakdown {
        let w = &self.weights;
        let direction = input.planned_direction;
        let mut tally = Tally::default();

        // HTF alignment
        let htf_matches = Timeframe::HIGHER
            .iter()
            .filter(|tf| input.htf_trend(**tf).aligns_with(direction))
            .count();
        if htf_matches >= HTF_MAJORITY {
            tally.reward(Contributor::HtfAlignment, w.htf_alignment);
        } else {
            tally.reward(Contributor::HtfAlignment, Decimal::ZERO);
        }

        // LTF alignment
        tally.net(Contributor::LtfAlignment, self.ltf_alignment(input));

        // Planned direction follows the HTF majority
        if direction.is_planned() {
            if htf_matches >= HTF_MAJORITY {
                tally.reward(Contributor::PlannedDirection, w.planned_direction);
            } else {
                tally.penalize(Contributor::PlannedDirection, w.planned_direction);
            }
        } else {
            tally.reward(Contributor::PlannedDirection, Decimal::ZERO);
        }

        // Expected LTF structure
        let (structure_pos, structure_neg) = Timeframe::LOWER.iter().fold(
            (Decimal::ZERO, Decimal::ZERO),
            |(pos, neg), tf| {
                let value = self.structure_value(direction, *tf, input.expected_structure(*tf));
                if value > Decimal::ZERO {
                    (pos + value, neg)
                } else {
                    (pos, neg + value)
                }
            },
        );
        tally.split(Contributor::ExpectedStructure, structure_pos, structure_neg);

        // Binary factors
        if input.fib_level_tapped {
            tally.reward(Contributor::FibLevelTapped, w.fib_level_tapped);
        } else {
            tally.penalize(Contributor::FibLevelMissed, w.fib_level_tapped);
        }

        if input.entry_candle_confirmed {
            tally.reward(Contributor::EntryCandleConfirmation, w.entry_candle_confirmation);
        } else {
            tally.penalize(Contributor::EntryCandleFailed, w.entry_candle_confirmation);
        }

        if input.ob_sd_conflict {
            tally.penalize(Contributor::ObSdConflict, w.ob_sd_conflict.abs());
        } else {
            tally.reward(Contributor::ObSdClear, w.ob_sd_conflict.abs());
        }

        if input.liquidity_sweep_against_trade {
            tally.penalize(Contributor::LiquiditySweep, w.liquidity_sweep.abs());
        } else {
            tally.reward(Contributor::NoLiquiditySweep, w.liquidity_sweep.abs());
        }

        if input.session_favorable {
            tally.reward(Contributor::SessionFavorability, w.session_favorability);
        } else {
            tally.penalize(Contributor::SessionWeak, w.session_favorability);
        }

        if input.structure_changed_against_bias {
            tally.penalize(Contributor::StructureChange, STRUCTURE_CHANGE_SWING);
        } else {
            tally.reward(Contributor::NoStructureChange, STRUCTURE_CHANGE_SWING);
        }

        let raw_total = tally.total;
        let breakdown = tally.finish();
        debug!(
            direction = %direction,
            htf_matches,
            raw_total = %raw_total,
            score = %breakdown.score,
            "Confluence scored"
        );
        breakdown
    }

    /// Net LTF contribution (positive parts minus negative parts)
    fn ltf_alignment(&self, input: &ConfluenceInput) -> Decimal {
        let direction = input.planned_direction;
        let aligned = |tf: &Timeframe| input.ltf_trend(*tf).aligns_with(direction);
        let weight = self.weights.ltf_alignment;
        let major = weight * LTF_MAJOR_SHARE;
        let minor = weight * LTF_MINOR_SHARE;

        let mut positive = Decimal::ZERO;
        let mut negative = Decimal::ZERO;

        // Without a direction there is nothing to be misaligned against, so
        // the majors fall through to the mixed case.
        if Timeframe::LTF_MAJOR.iter().all(aligned) {
            positive += major;
        } else if direction.is_planned() && !Timeframe::LTF_MAJOR.iter().any(aligned) {
            negative += major;
        }

        for tf in Timeframe::LTF_MINOR.iter() {
            if aligned(tf) {
                positive += minor;
            } else {
                negative += minor;
            }
        }

        positive - negative
    }

    /// Contribution of the structure expected on one lower timeframe
    fn structure_value(
        &self,
        direction: Direction,
        timeframe: Timeframe,
        label: StructureLabel,
    ) -> Decimal {
        let major = timeframe.is_ltf_major();
        let multiple = match (direction, label) {
            (_, StructureLabel::None) | (Direction::None, _) => return Decimal::ZERO,
            (Direction::Buy, StructureLabel::HL) | (Direction::Sell, StructureLabel::LH) => {
                if major {
                    Decimal::new(4, 1)
                } else {
                    Decimal::new(15, 2)
                }
            },
            (Direction::Buy, StructureLabel::HH) | (Direction::Sell, StructureLabel::LL) => {
                if major {
                    Decimal::new(3, 1)
                } else {
                    Decimal::new(1, 1)
                }
            },
            (Direction::Buy, StructureLabel::LH | StructureLabel::LL)
            | (Direction::Sell, StructureLabel::HL | StructureLabel::HH) => {
                if major {
                    Decimal::new(-4, 1)
                } else {
                    Decimal::new(-15, 2)
                }
            },
        };
        self.weights.expected_structure * multiple
    }
}

/// Grade a setup with the standard weights
pub fn score(input: &ConfluenceInput) -> ScoreBreakdown {
    ConfluenceScorer::new().score(input)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use journal_domain::TrendState;
    use rust_decimal_macros::dec;

    fn aligned_buy() -> ConfluenceInput {
        let mut input = ConfluenceInput::new(Direction::Buy)
            .with_htf(Timeframe::Weekly, TrendState::Bullish)
            .with_htf(Timeframe::Daily, TrendState::Bullish)
            .with_htf(Timeframe::H4, TrendState::Bearish);
        for tf in Timeframe::LOWER {
            input = input
                .with_ltf(tf, TrendState::Bullish)
                .with_expected(tf, StructureLabel::HL);
        }
        input.fib_level_tapped = true;
        input.entry_candle_confirmed = true;
        input.session_favorable = true;
        input
    }

    #[test]
    fn test_weight_table_constants() {
        let w = WeightTable::STANDARD;
        assert_eq!(w.htf_alignment, dec!(20));
        assert_eq!(w.ltf_alignment, dec!(25));
        assert_eq!(w.planned_direction, dec!(15));
        assert_eq!(w.expected_structure, dec!(10));
        assert_eq!(w.ob_sd_conflict, dec!(-10));
        assert_eq!(w.liquidity_sweep, dec!(-10));
        assert_eq!(w.session_favorability, dec!(20));
        assert_eq!(STRUCTURE_CHANGE_SWING, dec!(10));
        assert_eq!(LTF_MAJOR_SHARE, dec!(0.7));
        assert_eq!(LTF_MINOR_SHARE, dec!(0.15));
    }

    #[test]
    fn test_end_to_end_scenario_clamps_to_100() {
        let breakdown = score(&aligned_buy());

        assert_eq!(breakdown.positive(Contributor::HtfAlignment), Some(dec!(20)));
        assert_eq!(breakdown.positive(Contributor::PlannedDirection), Some(dec!(15)));
        assert_eq!(breakdown.positive(Contributor::LtfAlignment), Some(dec!(25)));
        assert_eq!(breakdown.negative(Contributor::LtfAlignment), Some(dec!(0)));
        assert_eq!(breakdown.positive(Contributor::ExpectedStructure), Some(dec!(11)));
        assert_eq!(breakdown.negative(Contributor::ExpectedStructure), Some(dec!(0)));
        assert_eq!(breakdown.positive(Contributor::ObSdClear), Some(dec!(10)));
        assert_eq!(breakdown.positive(Contributor::NoLiquiditySweep), Some(dec!(10)));
        assert_eq!(breakdown.positive(Contributor::NoStructureChange), Some(dec!(10)));
        assert_eq!(breakdown.raw_total(), dec!(141));
        assert_eq!(breakdown.score, dec!(100));
    }

    #[test]
    fn test_minimal_scenario_clamps_to_zero() {
        let breakdown = score(&ConfluenceInput::default());

        assert_eq!(breakdown.positive(Contributor::HtfAlignment), Some(dec!(0)));
        assert_eq!(breakdown.positive(Contributor::PlannedDirection), Some(dec!(0)));
        assert_eq!(breakdown.negative(Contributor::PlannedDirection), None);
        assert_eq!(breakdown.positive(Contributor::LtfAlignment), Some(dec!(0)));
        assert_eq!(breakdown.negative(Contributor::LtfAlignment), Some(dec!(-7.5)));
        assert_eq!(breakdown.positive(Contributor::ExpectedStructure), Some(dec!(0)));
        assert_eq!(breakdown.negative(Contributor::ExpectedStructure), Some(dec!(0)));
        assert_eq!(breakdown.negative(Contributor::FibLevelMissed), Some(dec!(-10)));
        assert_eq!(breakdown.negative(Contributor::EntryCandleFailed), Some(dec!(-10)));
        assert_eq!(breakdown.negative(Contributor::SessionWeak), Some(dec!(-20)));
        assert_eq!(breakdown.raw_total(), dec!(-17.5));
        assert_eq!(breakdown.score, dec!(0));
    }

    #[test]
    fn test_full_ltf_opposition_is_full_penalty() {
        let mut input = ConfluenceInput::new(Direction::Buy);
        for tf in Timeframe::LOWER {
            input = input.with_ltf(tf, TrendState::Bearish);
        }

        let breakdown = score(&input);

        assert_eq!(breakdown.negative(Contributor::LtfAlignment), Some(dec!(-25)));
        assert_eq!(breakdown.positive(Contributor::LtfAlignment), Some(dec!(0)));
    }

    #[test]
    fn test_mixed_majors_only_score_minors() {
        let input = ConfluenceInput::new(Direction::Sell)
            .with_ltf(Timeframe::H1, TrendState::Bearish)
            .with_ltf(Timeframe::M30, TrendState::Bullish)
            .with_ltf(Timeframe::M15, TrendState::Bearish)
            .with_ltf(Timeframe::M5, TrendState::Bearish);

        let breakdown = score(&input);

        assert_eq!(breakdown.positive(Contributor::LtfAlignment), Some(dec!(7.5)));
        assert_eq!(breakdown.negative(Contributor::LtfAlignment), Some(dec!(0)));
    }

    #[test]
    fn test_aligned_majors_with_opposed_minors() {
        let input = ConfluenceInput::new(Direction::Buy)
            .with_ltf(Timeframe::H1, TrendState::Bullish)
            .with_ltf(Timeframe::M30, TrendState::Bullish)
            .with_ltf(Timeframe::M15, TrendState::Bearish);

        let breakdown = score(&input);

        // 17.5 - 3.75 - 3.75
        assert_eq!(breakdown.positive(Contributor::LtfAlignment), Some(dec!(10)));
    }

    #[test]
    fn test_direction_penalty_without_htf_majority() {
        let input = ConfluenceInput::new(Direction::Sell)
            .with_htf(Timeframe::Weekly, TrendState::Bearish)
            .with_htf(Timeframe::Daily, TrendState::Bullish);

        let breakdown = score(&input);

        assert_eq!(breakdown.positive(Contributor::HtfAlignment), Some(dec!(0)));
        assert_eq!(breakdown.negative(Contributor::PlannedDirection), Some(dec!(-15)));
        assert_eq!(breakdown.positive(Contributor::PlannedDirection), None);
    }

    #[test]
    fn test_sell_structure_multiples() {
        let input = ConfluenceInput::new(Direction::Sell)
            .with_expected(Timeframe::H1, StructureLabel::LH)
            .with_expected(Timeframe::M30, StructureLabel::LL)
            .with_expected(Timeframe::M15, StructureLabel::HH)
            .with_expected(Timeframe::M5, StructureLabel::LL);

        let breakdown = score(&input);

        // 4 + 3 + 1 on the positive side, -1.5 on the negative side
        assert_eq!(breakdown.positive(Contributor::ExpectedStructure), Some(dec!(8)));
        assert_eq!(breakdown.negative(Contributor::ExpectedStructure), Some(dec!(-1.5)));
    }

    #[test]
    fn test_buy_structure_contradiction_on_majors() {
        let input = ConfluenceInput::new(Direction::Buy)
            .with_expected(Timeframe::H1, StructureLabel::LL)
            .with_expected(Timeframe::M30, StructureLabel::HH);

        let breakdown = score(&input);

        assert_eq!(breakdown.positive(Contributor::ExpectedStructure), Some(dec!(3)));
        assert_eq!(breakdown.negative(Contributor::ExpectedStructure), Some(dec!(-4)));
    }

    #[test]
    fn test_structure_ignored_without_direction() {
        let mut input = ConfluenceInput::new(Direction::None);
        for tf in Timeframe::LOWER {
            input = input.with_expected(tf, StructureLabel::HL);
        }

        let breakdown = score(&input);

        assert_eq!(breakdown.positive(Contributor::ExpectedStructure), Some(dec!(0)));
        assert_eq!(breakdown.negative(Contributor::ExpectedStructure), Some(dec!(0)));
    }

    #[test]
    fn test_ob_sd_toggle_swings_by_20() {
        let clear = aligned_buy();
        let mut conflict = clear.clone();
        conflict.ob_sd_conflict = true;

        let a = score(&clear);
        let b = score(&conflict);

        assert_eq!(a.raw_total() - b.raw_total(), dec!(20));
        assert_eq!(b.negative(Contributor::ObSdConflict), Some(dec!(-10)));
        assert_eq!(b.positive(Contributor::ObSdClear), None);

        // Nothing else moved
        let mut a_pos = a.positive_contributors.clone();
        a_pos.remove(Contributor::ObSdClear.label());
        let mut b_neg = b.negative_contributors.clone();
        b_neg.remove(Contributor::ObSdConflict.label());
        assert_eq!(a_pos, b.positive_contributors);
        assert_eq!(a.negative_contributors, b_neg);
    }

    #[test]
    fn test_risk_flags_and_structure_change() {
        let mut input = aligned_buy();
        input.liquidity_sweep_against_trade = true;
        input.structure_changed_against_bias = true;
        input.session_favorable = false;

        let breakdown = score(&input);

        assert_eq!(breakdown.negative(Contributor::LiquiditySweep), Some(dec!(-10)));
        assert_eq!(breakdown.negative(Contributor::StructureChange), Some(dec!(-10)));
        assert_eq!(breakdown.negative(Contributor::SessionWeak), Some(dec!(-20)));
        // 141 - 20 - 20 - 40
        assert_eq!(breakdown.score, dec!(61));
    }

    #[test]
    fn test_unclamped_score_keeps_fraction() {
        let input = ConfluenceInput::new(Direction::Buy)
            .with_htf(Timeframe::Weekly, TrendState::Bullish)
            .with_htf(Timeframe::Daily, TrendState::Bullish)
            .with_ltf(Timeframe::H1, TrendState::Bullish)
            .with_ltf(Timeframe::M30, TrendState::Bullish)
            .with_ltf(Timeframe::M15, TrendState::Bullish);

        let breakdown = score(&input);

        // 20 + (17.5 + 3.75 - 3.75) + 15 + 0 - 10 - 10 + 10 + 10 - 20 + 10
        assert_eq!(breakdown.positive(Contributor::LtfAlignment), Some(dec!(17.5)));
        assert_eq!(breakdown.score, dec!(42.5));
    }

    #[test]
    fn test_custom_weights() {
        let weights = WeightTable {
            session_favorability: dec!(5),
            ..WeightTable::STANDARD
        };
        let scorer = ConfluenceScorer::with_weights(weights);

        let breakdown = scorer.score(&ConfluenceInput::default());

        assert_eq!(breakdown.negative(Contributor::SessionWeak), Some(dec!(-5)));
        assert_eq!(breakdown.negative(Contributor::StructureChange), None);
        assert_eq!(breakdown.positive(Contributor::NoStructureChange), Some(dec!(10)));
    }

    #[test]
    fn test_score_is_deterministic() {
        let input = aligned_buy();
        assert_eq!(score(&input), score(&input));
    }
}
