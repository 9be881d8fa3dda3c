//! Trading Journal Engine Layer
//!
//! Pure decision logic, deterministic, no I/O.
//! Takes a trade setup → returns a confluence score and its breakdown.
//! Also hosts the read-side analytics computed over stored entries.

#![warn(clippy::all)]

pub mod analytics;
pub mod scorer;

pub use analytics::{AnalyticsSummary, ScoreBucket, ScoreDistribution};
pub use scorer::{score, ConfluenceScorer, WeightTable, STRUCTURE_CHANGE_SWING};
