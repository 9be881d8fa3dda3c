//! Trading Journal Domain Layer
//!
//! Pure domain logic with zero I/O dependencies.
//! Contains the trade setup description, the score breakdown, and the
//! persisted journal entry.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Public modules
pub mod confluence;
pub mod entities;
pub mod value_objects;

// Re-export commonly used types
pub use confluence::{ConfluenceInput, Contributor, ScoreBreakdown};
pub use entities::{
    TradeId, TradeRecord, TradeSubmission, PLACEHOLDER_STOP_LOSS_PIPS,
    PLACEHOLDER_TAKE_PROFIT_PIPS,
};
pub use value_objects::{
    CandleType, Direction, DomainError, FibLevel, Session, StructureLabel, Timeframe,
    TradeNumber, TradeResult, TrendState,
};
