//! Flat spreadsheet row for a journal entry
//!
//! One column per form field, under the journal sheet's column headers.
//! Timeframe maps are flattened to compact JSON strings so each entry fits a
//! single sheet row or CSV line. Shared by the sheet store and CSV export.

use crate::error::StoreError;
use chrono::{DateTime, NaiveDateTime, Utc};
use journal_domain::{
    CandleType, Direction, FibLevel, Session, TradeNumber, TradeRecord, TradeResult,
    TradeSubmission, PLACEHOLDER_STOP_LOSS_PIPS, PLACEHOLDER_TAKE_PROFIT_PIPS,
};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Timestamp format of the `DateTime` column (UTC)
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One journal entry as text cells
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRow {
    #[serde(rename = "DateTime", default, deserialize_with = "cell")]
    pub date_time: String,
    #[serde(rename = "Trade Number", default, deserialize_with = "cell")]
    pub trade_number: String,
    #[serde(rename = "Planned Direction", default, deserialize_with = "cell")]
    pub planned_direction: String,
    #[serde(rename = "Session", default, deserialize_with = "cell")]
    pub session: String,
    #[serde(rename = "HTF Trend", default, deserialize_with = "cell")]
    pub htf_trend: String,
    #[serde(rename = "LTF Trend", default, deserialize_with = "cell")]
    pub ltf_trend: String,
    #[serde(rename = "LTF Expected", default, deserialize_with = "cell")]
    pub ltf_expected: String,
    #[serde(rename = "Fibonacci Level", default, deserialize_with = "cell")]
    pub fib_level: String,
    #[serde(rename = "Entry Candle", default, deserialize_with = "cell")]
    pub entry_candle: String,
    #[serde(rename = "Structure Change", default, deserialize_with = "cell")]
    pub structure_change: String,
    #[serde(rename = "OB/SD Conflict", default, deserialize_with = "cell")]
    pub ob_sd_conflict: String,
    #[serde(rename = "Liquidity Sweep", default, deserialize_with = "cell")]
    pub liquidity_sweep: String,
    #[serde(rename = "Confluence Score", default, deserialize_with = "cell")]
    pub confluence_score: String,
    #[serde(rename = "SL", default, deserialize_with = "cell")]
    pub stop_loss: String,
    #[serde(rename = "TP", default, deserialize_with = "cell")]
    pub take_profit: String,
    #[serde(rename = "Notes", default, deserialize_with = "cell")]
    pub notes: String,
    #[serde(rename = "Mistakes", default, deserialize_with = "cell")]
    pub mistakes: String,
    #[serde(rename = "Lessons", default, deserialize_with = "cell")]
    pub lessons: String,
    #[serde(rename = "Screenshot", default, deserialize_with = "cell")]
    pub screenshot: String,
    #[serde(rename = "Trade Result", default, deserialize_with = "cell")]
    pub trade_result: String,
    #[serde(rename = "Id", default, deserialize_with = "cell")]
    pub id: String,
}

/// Read any scalar cell (text, number, bool, empty) as text.
///
/// Sheets hand back typed cells; whole floats lose their `.0`.
fn cell<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{}", f as i64)
            },
            _ => n.to_string(),
        },
        other => other.to_string(),
    })
}

impl TradeRow {
    /// True when every cell is empty (sheets pad with blank rows)
    pub fn is_blank(&self) -> bool {
        [
            &self.date_time,
            &self.trade_number,
            &self.planned_direction,
            &self.session,
            &self.htf_trend,
            &self.ltf_trend,
            &self.ltf_expected,
            &self.fib_level,
            &self.entry_candle,
            &self.structure_change,
            &self.ob_sd_conflict,
            &self.liquidity_sweep,
            &self.confluence_score,
            &self.stop_loss,
            &self.take_profit,
            &self.notes,
            &self.mistakes,
            &self.lessons,
            &self.screenshot,
            &self.trade_result,
            &self.id,
        ]
        .iter()
        .all(|c| c.trim().is_empty())
    }
}

impl From<&TradeRecord> for TradeRow {
    fn from(record: &TradeRecord) -> Self {
        let entry = &record.entry;
        Self {
            date_time: record.recorded_at.format(DATE_TIME_FORMAT).to_string(),
            trade_number: entry.trade_number.to_string(),
            planned_direction: entry.planned_direction.to_string(),
            session: entry.session.to_string(),
            htf_trend: flatten_map(&entry.htf_trends),
            ltf_trend: flatten_map(&entry.ltf_trends),
            ltf_expected: flatten_map(&entry.ltf_expected),
            fib_level: entry.fib_level.to_string(),
            entry_candle: entry.entry_candle.to_string(),
            structure_change: entry.structure_change.to_string(),
            ob_sd_conflict: entry.ob_sd_conflict.to_string(),
            liquidity_sweep: entry.liquidity_sweep.to_string(),
            confluence_score: record.confluence_score.to_string(),
            stop_loss: record.stop_loss_pips.to_string(),
            take_profit: record.take_profit_pips.to_string(),
            notes: entry.notes.clone(),
            mistakes: entry.mistakes.clone(),
            lessons: entry.lessons.clone(),
            screenshot: entry.screenshot.clone().unwrap_or_default(),
            trade_result: entry.trade_result.to_string(),
            id: record.id.to_string(),
        }
    }
}

impl TryFrom<TradeRow> for TradeRecord {
    type Error = StoreError;

    fn try_from(row: TradeRow) -> Result<Self, Self::Error> {
        let id = if row.id.trim().is_empty() {
            // Rows typed into the sheet by hand have no id yet
            Uuid::now_v7()
        } else {
            Uuid::parse_str(row.id.trim())
                .map_err(|e| StoreError::Deserialization(format!("Id '{}': {}", row.id, e)))?
        };

        let entry = TradeSubmission {
            trade_number: if row.trade_number.trim().is_empty() {
                TradeNumber::default()
            } else {
                TradeNumber::from_str(&row.trade_number)?
            },
            planned_direction: Direction::parse(&row.planned_direction),
            htf_trends: parse_map("HTF Trend", &row.htf_trend)?,
            ltf_trends: parse_map("LTF Trend", &row.ltf_trend)?,
            ltf_expected: parse_map("LTF Expected", &row.ltf_expected)?,
            fib_level: FibLevel::parse(&row.fib_level),
            entry_candle: CandleType::parse(&row.entry_candle),
            session: Session::parse(&row.session),
            structure_change: parse_flag("Structure Change", &row.structure_change)?,
            ob_sd_conflict: parse_flag("OB/SD Conflict", &row.ob_sd_conflict)?,
            liquidity_sweep: parse_flag("Liquidity Sweep", &row.liquidity_sweep)?,
            notes: row.notes,
            mistakes: row.mistakes,
            lessons: row.lessons,
            screenshot: Some(row.screenshot).filter(|s| !s.trim().is_empty()),
            trade_result: TradeResult::parse(&row.trade_result),
        };

        Ok(TradeRecord {
            id,
            recorded_at: parse_date_time(&row.date_time)?,
            entry,
            confluence_score: Decimal::from_str(row.confluence_score.trim()).map_err(|e| {
                StoreError::Deserialization(format!(
                    "Confluence Score '{}': {}",
                    row.confluence_score, e
                ))
            })?,
            stop_loss_pips: parse_pips("SL", &row.stop_loss, PLACEHOLDER_STOP_LOSS_PIPS)?,
            take_profit_pips: parse_pips("TP", &row.take_profit, PLACEHOLDER_TAKE_PROFIT_PIPS)?,
        })
    }
}

fn flatten_map<T: Serialize>(map: &T) -> String {
    // BTreeMap with string-like keys always serializes
    serde_json::to_string(map).unwrap_or_default()
}

fn parse_map<T: DeserializeOwned + Default>(column: &str, raw: &str) -> Result<T, StoreError> {
    if raw.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(raw)
        .map_err(|e| StoreError::Deserialization(format!("{} '{}': {}", column, raw, e)))
}

fn parse_flag(column: &str, raw: &str) -> Result<bool, StoreError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "0" | "no" => Ok(false),
        "true" | "1" | "yes" => Ok(true),
        _ => Err(StoreError::Deserialization(format!("{} '{}' is not a flag", column, raw))),
    }
}

fn parse_pips(column: &str, raw: &str, default: u32) -> Result<u32, StoreError> {
    if raw.trim().is_empty() {
        return Ok(default);
    }
    raw.trim()
        .parse()
        .map_err(|e| StoreError::Deserialization(format!("{} '{}': {}", column, raw, e)))
}

fn parse_date_time(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    let raw = raw.trim();
    if raw.is_empty() {
        // Hand-typed rows may leave the timestamp out
        return Ok(Utc::now());
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, DATE_TIME_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| StoreError::Deserialization(format!("DateTime '{}': {}", raw, e)))
}

/// Column headers, in the order `TradeRow` serializes them
pub const COLUMNS: [&str; 21] = [
    "DateTime",
    "Trade Number",
    "Planned Direction",
    "Session",
    "HTF Trend",
    "LTF Trend",
    "LTF Expected",
    "Fibonacci Level",
    "Entry Candle",
    "Structure Change",
    "OB/SD Conflict",
    "Liquidity Sweep",
    "Confluence Score",
    "SL",
    "TP",
    "Notes",
    "Mistakes",
    "Lessons",
    "Screenshot",
    "Trade Result",
    "Id",
];

/// Render records as CSV (header row + one line per record)
pub fn export_csv(records: &[TradeRecord]) -> Result<String, StoreError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(COLUMNS)?;
    for record in records {
        writer.serialize(TradeRow::from(record))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| StoreError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| StoreError::Csv(e.to_string()))
}
