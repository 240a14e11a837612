//! Work-hour entries and results.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How shift times are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleMode {
    /// Same-day shifts with a mandatory break.
    #[default]
    Standard,
    /// Shifts may cross midnight, the break is optional and night hours are reported.
    Flexible,
}

/// The clock times recorded for one working day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    /// Shift start (`Hora Inicio`).
    pub start: NaiveTime,
    /// Shift end (`Hora Fin`).
    pub end: NaiveTime,
    /// Break start (`Hora Refrigerio Inicio`).
    pub break_start: Option<NaiveTime>,
    /// Break end (`Hora Refrigerio Fin`).
    pub break_end: Option<NaiveTime>,
}

/// The hours derived from one [`TimeEntry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkedHours {
    /// Break length in minutes.
    pub break_minutes: i64,
    /// Shift length minus the break, in hours.
    pub worked_hours: Decimal,
    /// Hours up to the daily threshold.
    pub ordinary_hours: Decimal,
    /// Overtime hours paid with a 25% surcharge.
    pub overtime_25_hours: Decimal,
    /// Overtime hours paid with a 35% surcharge.
    pub overtime_35_hours: Decimal,
    /// Hours worked between 22:00 and 06:00 (flexible mode only).
    pub night_hours: Option<Decimal>,
}

impl WorkedHours {
    /// Total overtime hours across both tiers.
    pub fn overtime_hours(&self) -> Decimal {
        self.overtime_25_hours + self.overtime_35_hours
    }
}
