use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::config::CleaningConfig;
use crate::models::RawCell;
use crate::utils::constants::{MAX_SPREADSHEET_SERIAL, MIN_TEXT_SERIAL, SPREADSHEET_EPOCH};

/// Outcome of parsing one numeric cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedValue {
    Number(f64),
    Trace(f64),
    Missing,
}

impl ParsedValue {
    pub fn value(&self) -> Option<f64> {
        match self {
            ParsedValue::Number(v) | ParsedValue::Trace(v) => Some(*v),
            ParsedValue::Missing => None,
        }
    }

    pub fn is_trace(&self) -> bool {
        matches!(self, ParsedValue::Trace(_))
    }
}

/// Converts raw cells into numbers and dates; never fails
pub struct CellParser {
    missing_tokens: Vec<String>,
    trace_token: String,
    trace_value: f64,
    date_formats: Vec<String>,
}

impl CellParser {
    pub fn new(config: &CleaningConfig) -> Self {
        Self {
            missing_tokens: config.normalized_missing_tokens(),
            trace_token: config.normalized_trace_token(),
            trace_value: config.trace_value,
            date_formats: config.date_formats.clone(),
        }
    }

    /// Parse a numeric cell: a number, the trace sentinel, or missing
    pub fn parse_numeric(&self, cell: &RawCell) -> ParsedValue {
        match cell {
            RawCell::Number(n) if n.is_finite() => ParsedValue::Number(*n),
            RawCell::Text(s) => self.parse_numeric_text(s),
            _ => ParsedValue::Missing,
        }
    }

    fn parse_numeric_text(&self, text: &str) -> ParsedValue {
        let token = text.trim().to_uppercase();

        if self.missing_tokens.iter().any(|t| *t == token) {
            return ParsedValue::Missing;
        }

        if token == self.trace_token {
            return ParsedValue::Trace(self.trace_value);
        }

        parse_decimal(&token)
            .map(ParsedValue::Number)
            .unwrap_or(ParsedValue::Missing)
    }

    /// Resolve a date cell; `None` when it cannot be placed on the timeline
    pub fn parse_date(&self, cell: &RawCell) -> Option<NaiveDate> {
        match cell {
            RawCell::Date(d) => Some(*d),
            RawCell::Number(n) => serial_to_date(*n),
            RawCell::Text(s) => self.parse_date_text(s.trim()),
            RawCell::Empty => None,
        }
    }

    fn parse_date_text(&self, text: &str) -> Option<NaiveDate> {
        if text.is_empty() {
            return None;
        }

        for format in &self.date_formats {
            if let Ok(date) = NaiveDate::parse_from_str(text, format) {
                return Some(date);
            }
            if let Ok(datetime) = NaiveDateTime::parse_from_str(text, format) {
                return Some(datetime.date());
            }
        }

        text.parse::<f64>()
            .ok()
            .filter(|serial| *serial >= MIN_TEXT_SERIAL)
            .and_then(serial_to_date)
    }
}

/// Plain decimal parse; anything else (including `12,4` or `1,234`) is missing
fn parse_decimal(token: &str) -> Option<f64> {
    let value = token.parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

/// Spreadsheet serial day number to a calendar date
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..=MAX_SPREADSHEET_SERIAL).contains(&serial) {
        return None;
    }

    let (year, month, day) = SPREADSHEET_EPOCH;
    let epoch = NaiveDate::from_ymd_opt(year, month, day)?;
    epoch.checked_add_signed(Duration::days(serial.trunc() as i64))
}
