//! Value Objects for the Trading Journal Domain
//!
//! Immutable domain primitives describing a trade setup.
//!
//! Form-backed enumerations (trend, structure, direction, session, ...) parse
//! leniently: any unrecognized text collapses to the `None` variant instead of
//! failing. Only the values that have a real validity rule (`TradeNumber`,
//! `Timeframe`) return `DomainError`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Domain errors for value object validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Trade number outside the daily slots
    #[error("Invalid trade number: {0}")]
    InvalidTradeNumber(String),

    /// Unknown timeframe label
    #[error("Invalid timeframe: {0}")]
    InvalidTimeframe(String),
}

/// Declares a form-backed enum with a display label per variant.
///
/// Parsing is case-insensitive, trims whitespace and accepts optional
/// aliases. Anything else maps to the `#[default]` variant.
macro_rules! lenient_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $label:literal $(| $alias:literal)*
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Display label, as shown on the journal form
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            /// Parse a label; unknown text yields the default variant
            pub fn parse(raw: &str) -> Self {
                let needle = raw.trim();
                $(
                    if needle.eq_ignore_ascii_case($label)
                        $(|| needle.eq_ignore_ascii_case($alias))*
                    {
                        return $name::$variant;
                    }
                )+
                $name::default()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                $name::parse(raw)
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                $name::parse(&raw)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                // null, numbers and other non-text cells read as the default
                match Option::<serde_json::Value>::deserialize(deserializer)? {
                    Some(serde_json::Value::String(raw)) => Ok($name::parse(&raw)),
                    _ => Ok($name::default()),
                }
            }
        }
    };
}

// =============================================================================
// Trend / Structure / Direction
// =============================================================================

lenient_enum! {
    /// Trend state observed on a timeframe
    pub enum TrendState {
        /// Higher highs and higher lows
        Bullish => "Bullish",
        /// Lower highs and lower lows
        Bearish => "Bearish",
        /// No trend selected
        #[default]
        None => "None",
    }
}

impl TrendState {
    /// Alignment predicate: Buy needs Bullish, Sell needs Bearish.
    ///
    /// A `None` direction never aligns.
    pub fn aligns_with(self, direction: Direction) -> bool {
        matches!(
            (direction, self),
            (Direction::Buy, TrendState::Bullish) | (Direction::Sell, TrendState::Bearish)
        )
    }
}

lenient_enum! {
    /// Market structure label expected to form on a timeframe
    pub enum StructureLabel {
        /// Higher high
        HH => "HH",
        /// Higher low
        HL => "HL",
        /// Lower high
        LH => "LH",
        /// Lower low
        LL => "LL",
        /// No expectation
        #[default]
        None => "None",
    }
}

lenient_enum! {
    /// Planned trade direction
    pub enum Direction {
        /// Long entry
        Buy => "Buy",
        /// Short entry
        Sell => "Sell",
        /// No direction planned (also the fallback for unknown input)
        #[default]
        None => "None",
    }
}

impl Direction {
    /// True for Buy or Sell
    pub fn is_planned(self) -> bool {
        !matches!(self, Direction::None)
    }
}

// =============================================================================
// Form selections
// =============================================================================

lenient_enum! {
    /// Trading session the entry is planned in
    pub enum Session {
        #[default]
        None => "None",
        Asia => "Asia",
        London => "London",
        NyPreOpen => "NY Pre-Open" | "NY Pre Open",
        NyOpen => "NY Open",
    }
}

impl Session {
    /// Any selected session counts as favorable
    pub fn is_favorable(self) -> bool {
        !matches!(self, Session::None)
    }
}

lenient_enum! {
    /// Fibonacci retracement level tapped before entry
    pub enum FibLevel {
        #[default]
        None => "None",
        Fib382 => "0.382",
        Fib500 => "0.50" | "0.5",
        Fib618 => "0.618",
        Fib705 => "0.705",
        Fib786 => "0.786",
    }
}

impl FibLevel {
    /// A level other than `None` was tapped
    pub fn is_tapped(self) -> bool {
        !matches!(self, FibLevel::None)
    }
}

lenient_enum! {
    /// Entry candle pattern
    pub enum CandleType {
        #[default]
        None => "None",
        Engulfing => "Engulfing",
        WickRejection => "Wick Rejection",
        Momentum => "Momentum",
    }
}

impl CandleType {
    /// Any selected pattern confirms the entry
    pub fn is_confirmation(self) -> bool {
        !matches!(self, CandleType::None)
    }
}

lenient_enum! {
    /// Outcome of the trade once closed
    pub enum TradeResult {
        /// Still open or not recorded
        #[default]
        None => "None",
        TpHit => "TP Hit",
        SlHit => "SL Hit",
        Breakeven => "Breakeven",
    }
}

// =============================================================================
// Timeframe
// =============================================================================

/// Chart timeframe used in the multi-timeframe analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "Weekly")]
    Weekly,
    #[serde(rename = "Daily")]
    Daily,
    #[serde(rename = "4H")]
    H4,
    #[serde(rename = "1H")]
    H1,
    #[serde(rename = "30M")]
    M30,
    #[serde(rename = "15M")]
    M15,
    #[serde(rename = "5M")]
    M5,
}

impl Timeframe {
    /// Higher timeframes (bias)
    pub const HIGHER: [Timeframe; 3] = [Timeframe::Weekly, Timeframe::Daily, Timeframe::H4];

    /// Lower timeframes (execution)
    pub const LOWER: [Timeframe; 4] =
        [Timeframe::H1, Timeframe::M30, Timeframe::M15, Timeframe::M5];

    /// Dominant lower timeframes
    pub const LTF_MAJOR: [Timeframe; 2] = [Timeframe::H1, Timeframe::M30];

    /// Secondary lower timeframes
    pub const LTF_MINOR: [Timeframe; 2] = [Timeframe::M15, Timeframe::M5];

    /// Chart label (e.g. "4H")
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Weekly => "Weekly",
            Timeframe::Daily => "Daily",
            Timeframe::H4 => "4H",
            Timeframe::H1 => "1H",
            Timeframe::M30 => "30M",
            Timeframe::M15 => "15M",
            Timeframe::M5 => "5M",
        }
    }

    /// True for Weekly, Daily and 4H
    pub fn is_higher(&self) -> bool {
        Self::HIGHER.contains(self)
    }

    /// True for 1H and 30M
    pub fn is_ltf_major(&self) -> bool {
        Self::LTF_MAJOR.contains(self)
    }
}

impl FromStr for Timeframe {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        [
            Timeframe::Weekly,
            Timeframe::Daily,
            Timeframe::H4,
            Timeframe::H1,
            Timeframe::M30,
            Timeframe::M15,
            Timeframe::M5,
        ]
        .into_iter()
        .find(|tf| tf.as_str().eq_ignore_ascii_case(needle))
        .ok_or_else(|| DomainError::InvalidTimeframe(needle.to_string()))
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read a timeframe-keyed map from form input.
///
/// Keys go through `Timeframe::from_str` (case-insensitive); unknown keys are
/// dropped and a `null` map reads as empty.
pub(crate) fn timeframe_map<'de, D, V>(deserializer: D) -> Result<BTreeMap<Timeframe, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    let raw = Option::<BTreeMap<String, V>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(key, value)| key.parse::<Timeframe>().ok().map(|tf| (tf, value)))
        .collect())
}

// =============================================================================
// TradeNumber
// =============================================================================

/// Slot of the trade within the trading day
///
/// # Invariants
/// - 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct TradeNumber(u8);

impl TradeNumber {
    /// Highest allowed slot
    pub const MAX: u8 = 5;

    /// Create a trade number with validation
    ///
    /// # Errors
    /// Returns `DomainError::InvalidTradeNumber` outside 1..=5
    pub fn new(value: u8) -> Result<Self, DomainError> {
        if value == 0 || value > Self::MAX {
            return Err(DomainError::InvalidTradeNumber(format!(
                "{} is outside 1..={}",
                value,
                Self::MAX
            )));
        }
        Ok(Self(value))
    }

    /// Underlying slot number
    pub fn get(&self) -> u8 {
        self.0
    }
}

impl Default for TradeNumber {
    fn default() -> Self {
        Self(1)
    }
}

impl TryFrom<u8> for TradeNumber {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TradeNumber> for u8 {
    fn from(number: TradeNumber) -> Self {
        number.0
    }
}

impl FromStr for TradeNumber {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<u8>()
            .map_err(|_| DomainError::InvalidTradeNumber(s.trim().to_string()))?;
        Self::new(value)
    }
}

impl fmt::Display for TradeNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Tests
// =============================================================================
