//! Cell values and their typed coercions.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use std::str::FromStr;

/// A single cell value, independent of the workbook format it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// No value.
    Empty,
    /// Text as entered.
    Text(String),
    /// Any numeric value (integers included).
    Number(f64),
    /// A boolean.
    Bool(bool),
    /// An Excel date/time serial (days since 1899-12-30, fraction = time of day).
    DateTime(f64),
}

const SECONDS_PER_DAY: f64 = 86_400.0;

impl CellValue {
    /// Builds a numeric cell from a decimal amount.
    pub fn from_decimal(value: Decimal) -> Self {
        value
            .to_f64()
            .map(CellValue::Number)
            .unwrap_or(CellValue::Empty)
    }

    /// Returns true when the cell has no value or only whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    /// Returns the cell as display text (numbers without a trailing `.0`).
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(text) => text.trim().to_string(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Bool(b) => b.to_string(),
            CellValue::DateTime(serial) => excel_serial_to_date(*serial)
                .map(|d| d.format("%d/%m/%Y").to_string())
                .unwrap_or_else(|| format_number(*serial)),
        }
    }

    /// Coerces the cell to a decimal.
    ///
    /// Returns `Ok(None)` for blank cells and `Err(text)` for text that is not a number.
    /// Text may carry an `S/` currency prefix and `,` thousands separators.
    pub fn as_decimal(&self) -> Result<Option<Decimal>, String> {
        match self {
            CellValue::Empty => Ok(None),
            CellValue::Number(n) | CellValue::DateTime(n) => Decimal::from_f64(*n)
                .map(Some)
                .ok_or_else(|| n.to_string()),
            CellValue::Bool(b) => Ok(Some(if *b { Decimal::ONE } else { Decimal::ZERO })),
            CellValue::Text(text) => {
                let cleaned = text
                    .trim()
                    .trim_start_matches("S/.")
                    .trim_start_matches("S/")
                    .trim()
                    .replace(',', "");
                if cleaned.is_empty() {
                    return Ok(None);
                }
                Decimal::from_str(&cleaned)
                    .map(Some)
                    .map_err(|_| text.trim().to_string())
            }
        }
    }

    /// Coerces the cell to a calendar date.
    ///
    /// Unparseable values yield `None`, mirroring a lenient date conversion.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::Number(serial) | CellValue::DateTime(serial) => {
                excel_serial_to_date(*serial)
            }
            CellValue::Text(text) => parse_date_text(text),
            _ => None,
        }
    }

    /// Coerces the cell to a time of day.
    ///
    /// Returns `Ok(None)` for blank cells and `Err(text)` when the value is not a time.
    pub fn as_time(&self) -> Result<Option<NaiveTime>, String> {
        match self {
            CellValue::Empty => Ok(None),
            CellValue::Number(serial) | CellValue::DateTime(serial) => {
                Ok(Some(excel_fraction_to_time(*serial)))
            }
            CellValue::Text(text) if text.trim().is_empty() => Ok(None),
            CellValue::Text(text) => parse_time_text(text)
                .map(Some)
                .ok_or_else(|| text.trim().to_string()),
            CellValue::Bool(b) => Err(b.to_string()),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Converts an Excel serial (1900 date system) to a date.
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.floor() as i64))
}

fn excel_fraction_to_time(serial: f64) -> NaiveTime {
    let fraction = serial - serial.floor();
    let seconds = (fraction * SECONDS_PER_DAY).round() as u32 % 86_400;
    NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0).unwrap_or(NaiveTime::MIN)
}

/// Parses a date written as text.
///
/// Accepts `DD/MM/YYYY`, `DD-MM-YYYY` and ISO `YYYY-MM-DD`, optionally followed by a time.
///
/// # Example
///
/// ```
/// use planilla_engine::spreadsheet::parse_date_text;
/// use chrono::NaiveDate;
///
/// assert_eq!(parse_date_text("31/12/2023"), NaiveDate::from_ymd_opt(2023, 12, 31));
/// assert_eq!(parse_date_text("not a date"), None);
/// ```
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let first = text.split_whitespace().next()?;
    ["%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(first, fmt).ok())
        .or_else(|| {
            NaiveDateTime::parse_from_str(text.trim(), "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Parses a time of day written as text (`HH:MM`, `HH:MM:SS`, `H:MM AM`).
///
/// # Example
///
/// ```
/// use planilla_engine::spreadsheet::parse_time_text;
/// use chrono::NaiveTime;
///
/// assert_eq!(parse_time_text("08:30"), NaiveTime::from_hms_opt(8, 30, 0));
/// assert_eq!(parse_time_text("1:15 p.m."), NaiveTime::from_hms_opt(13, 15, 0));
/// ```
pub fn parse_time_text(text: &str) -> Option<NaiveTime> {
    let normalized = text
        .trim()
        .to_uppercase()
        .replace('.', "")
        .replace("A M", "AM")
        .replace("P M", "PM");

    ["%H:%M:%S", "%H:%M", "%I:%M %p", "%I:%M:%S %p", "%I:%M%p"]
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(&normalized, fmt).ok())
}
