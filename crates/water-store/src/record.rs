//! Record Types

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// On-disk date format (ISO-8601 calendar date)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

pub(crate) const DATE_COLUMN: &str = "date";
pub(crate) const HOUSEHOLD_COLUMN: &str = "household";

/// A row kind persisted by a [`crate::TableStore`].
///
/// Both kinds share the `date,household,<measure>` layout and differ only in
/// the name of the measurement column.
pub trait Record: Clone {
    /// Header name of the measurement column
    const MEASURE_COLUMN: &'static str;

    /// Build a record from already-parsed fields
    fn from_parts(date: Option<NaiveDate>, household: String, measure: Option<f64>) -> Self;

    fn date(&self) -> Option<NaiveDate>;

    fn household(&self) -> &str;

    fn measure(&self) -> Option<f64>;

    /// Full header row for this kind
    fn header() -> [&'static str; 3] {
        [DATE_COLUMN, HOUSEHOLD_COLUMN, Self::MEASURE_COLUMN]
    }
}

/// Daily water usage for a household
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// `None` when the stored date could not be parsed
    pub date: Option<NaiveDate>,
    pub household: String,
    /// `None` when the stored volume was not numeric
    pub liters: Option<f64>,
}

impl UsageRecord {
    /// Create a fully populated usage record
    pub fn new(date: NaiveDate, household: impl Into<String>, liters: f64) -> Self {
        Self {
            date: Some(date),
            household: household.into(),
            liters: Some(liters),
        }
    }
}

impl Record for UsageRecord {
    const MEASURE_COLUMN: &'static str = "liters";

    fn from_parts(date: Option<NaiveDate>, household: String, measure: Option<f64>) -> Self {
        Self {
            date,
            household,
            liters: measure,
        }
    }

    fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    fn household(&self) -> &str {
        &self.household
    }

    fn measure(&self) -> Option<f64> {
        self.liters
    }
}

/// A pH reading for a household's water
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityRecord {
    pub date: Option<NaiveDate>,
    pub household: String,
    #[serde(rename = "pH")]
    pub ph: Option<f64>,
}

impl QualityRecord {
    /// Create a fully populated quality record
    pub fn new(date: NaiveDate, household: impl Into<String>, ph: f64) -> Self {
        Self {
            date: Some(date),
            household: household.into(),
            ph: Some(ph),
        }
    }
}

impl Record for QualityRecord {
    const MEASURE_COLUMN: &'static str = "pH";

    fn from_parts(date: Option<NaiveDate>, household: String, measure: Option<f64>) -> Self {
        Self {
            date,
            household,
            ph: measure,
        }
    }

    fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    fn household(&self) -> &str {
        &self.household
    }

    fn measure(&self) -> Option<f64> {
        self.ph
    }
}

/// A field that could not be parsed while loading a file.
///
/// The row is kept; only the offending field is blanked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseWarning {
    /// 1-based line number in the file
    pub line: u64,
    pub field: &'static str,
    pub value: String,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: unparseable {} '{}'",
            self.line, self.field, self.value
        )
    }
}

/// Parse a stored date, accepting a full timestamp and keeping its date part
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return Some(date);
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|datetime| datetime.date())
}

pub(crate) fn parse_measure(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

pub(crate) fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// Shortest round-trip form, always with a fractional part (`12.0`, `7.25`)
pub(crate) fn format_measure(value: Option<f64>) -> String {
    match value {
        Some(v) => {
            let text = v.to_string();
            if text.contains('.') || !v.is_finite() {
                text
            } else {
                format!("{text}.0")
            }
        }
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(
            parse_date("2024-01-05"),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
    }

    #[test]
    fn test_parse_datetime_keeps_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9);
        assert_eq!(parse_date("2024-03-09 00:00:00"), expected);
        assert_eq!(parse_date("2024-03-09T14:30:00"), expected);
    }

    #[test]
    fn test_parse_bad_date() {
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("2024-13-40"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_parse_measure() {
        assert_eq!(parse_measure("12.5"), Some(12.5));
        assert_eq!(parse_measure(" 7 "), Some(7.0));
        assert_eq!(parse_measure("abc"), None);
        assert_eq!(parse_measure("nan"), None);
        assert_eq!(parse_measure(""), None);
    }

    #[test]
    fn test_format_measure() {
        assert_eq!(format_measure(Some(12.0)), "12.0");
        assert_eq!(format_measure(Some(7.25)), "7.25");
        assert_eq!(format_measure(Some(0.1)), "0.1");
        assert_eq!(format_measure(None), "");
    }

    #[test]
    fn test_headers() {
        assert_eq!(UsageRecord::header(), ["date", "household", "liters"]);
        assert_eq!(QualityRecord::header(), ["date", "household", "pH"]);
    }
}
