//! Work-hour calculation.
//!
//! Turns the four clock times of a working day into worked hours, splits them
//! into ordinary hours and two overtime tiers, and (for flexible schedules)
//! measures the hours that fall in the night window.

use chrono::{NaiveTime, Timelike};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::WorkHoursConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{ScheduleMode, TimeEntry, WorkedHours};

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Night work starts at 22:00.
pub const NIGHT_START_MINUTE: i64 = 22 * 60;

/// Night work ends at 06:00.
pub const NIGHT_END_MINUTE: i64 = 6 * 60;

/// A half-open interval of minutes on a timeline that starts at the shift's
/// calendar day midnight and may run past 24:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    start: i64,
    end: i64,
}

impl Span {
    fn minutes(self) -> i64 {
        self.end - self.start
    }

    fn overlap(self, other: Span) -> i64 {
        (self.end.min(other.end) - self.start.max(other.start)).max(0)
    }

    fn contains(self, other: Span) -> bool {
        other.start >= self.start && other.end <= self.end
    }
}

fn minute_of_day(time: NaiveTime) -> i64 {
    i64::from(time.hour() * 60 + time.minute())
}

fn minutes_to_hours(minutes: i64) -> Decimal {
    (Decimal::from(minutes) / Decimal::from(60))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn invalid(message: impl Into<String>) -> EngineError {
    EngineError::CalculationError {
        message: message.into(),
    }
}

fn standard_spans(entry: &TimeEntry) -> EngineResult<(Span, Option<Span>)> {
    let (Some(break_start), Some(break_end)) = (entry.break_start, entry.break_end) else {
        return Err(invalid("break start and end are required"));
    };

    let shift = Span {
        start: minute_of_day(entry.start),
        end: minute_of_day(entry.end),
    };
    if shift.end <= shift.start {
        return Err(invalid("shift end must be after shift start"));
    }

    let lunch = Span {
        start: minute_of_day(break_start),
        end: minute_of_day(break_end),
    };
    if lunch.end < lunch.start {
        return Err(invalid("break end must not be before break start"));
    }
    if !shift.contains(lunch) {
        return Err(invalid("break must lie within the shift"));
    }

    Ok((shift, Some(lunch)))
}

fn flexible_spans(entry: &TimeEntry) -> EngineResult<(Span, Option<Span>)> {
    let start = minute_of_day(entry.start);
    let mut end = minute_of_day(entry.end);
    if end <= start {
        end += MINUTES_PER_DAY;
    }
    let shift = Span { start, end };

    let lunch = match (entry.break_start, entry.break_end) {
        (None, None) => None,
        (Some(break_start), Some(break_end)) => {
            let mut lunch = Span {
                start: minute_of_day(break_start),
                end: minute_of_day(break_end),
            };
            if lunch.end < lunch.start {
                lunch.end += MINUTES_PER_DAY;
            }
            // a break taken after midnight of an overnight shift
            if lunch.start < shift.start {
                lunch.start += MINUTES_PER_DAY;
                lunch.end += MINUTES_PER_DAY;
            }
            if !shift.contains(lunch) {
                return Err(invalid("break must lie within the shift"));
            }
            Some(lunch)
        }
        _ => return Err(invalid("break start and end must be given together")),
    };

    Ok((shift, lunch))
}

/// Minutes of `span` that fall in any night window on a two-day timeline.
fn night_minutes(span: Span) -> i64 {
    (0..=2)
        .map(|day| Span {
            start: day * MINUTES_PER_DAY - (MINUTES_PER_DAY - NIGHT_START_MINUTE),
            end: day * MINUTES_PER_DAY + NIGHT_END_MINUTE,
        })
        .map(|window| span.overlap(window))
        .sum()
}

/// Splits worked hours into ordinary hours and two overtime tiers.
///
/// Returns `(ordinary, overtime_25, overtime_35)`.
///
/// # Example
///
/// ```
/// use planilla_engine::calculation::split_overtime;
/// use rust_decimal::Decimal;
///
/// let (ordinary, first, second) =
///     split_overtime(Decimal::from(11), Decimal::from(8), Decimal::from(2));
/// assert_eq!(ordinary, Decimal::from(8));
/// assert_eq!(first, Decimal::from(2));
/// assert_eq!(second, Decimal::from(1));
/// ```
pub fn split_overtime(
    worked_hours: Decimal,
    daily_threshold: Decimal,
    first_tier: Decimal,
) -> (Decimal, Decimal, Decimal) {
    let ordinary = worked_hours.min(daily_threshold);
    let overtime = (worked_hours - daily_threshold).max(Decimal::ZERO);
    let overtime_25 = overtime.min(first_tier);
    let overtime_35 = overtime - overtime_25;
    (ordinary, overtime_25, overtime_35)
}

/// Calculates the hours worked for one day.
///
/// In [`ScheduleMode::Standard`] the shift must end after it starts on the
/// same day and both break times must lie inside it. In
/// [`ScheduleMode::Flexible`] a shift ending at or before its start crosses
/// midnight, the break is optional and night hours are reported.
///
/// # Errors
///
/// Returns `CalculationError` when the times are inconsistent for the mode.
///
/// # Example
///
/// ```
/// use planilla_engine::calculation::calculate_work_hours;
/// use planilla_engine::config::WorkHoursConfig;
/// use planilla_engine::models::{ScheduleMode, TimeEntry};
/// use chrono::NaiveTime;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let config = WorkHoursConfig {
///     daily_threshold_hours: Decimal::from(8),
///     overtime_first_tier_hours: Decimal::from(2),
/// };
/// let entry = TimeEntry {
///     start: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
///     end: NaiveTime::from_hms_opt(19, 30, 0).unwrap(),
///     break_start: NaiveTime::from_hms_opt(13, 0, 0),
///     break_end: NaiveTime::from_hms_opt(14, 0, 0),
/// };
///
/// let hours = calculate_work_hours(&entry, ScheduleMode::Standard, &config).unwrap();
/// assert_eq!(hours.break_minutes, 60);
/// assert_eq!(hours.worked_hours, Decimal::from_str("10.5").unwrap());
/// assert_eq!(hours.overtime_25_hours, Decimal::from(2));
/// assert_eq!(hours.overtime_35_hours, Decimal::from_str("0.5").unwrap());
/// ```
pub fn calculate_work_hours(
    entry: &TimeEntry,
    mode: ScheduleMode,
    config: &WorkHoursConfig,
) -> EngineResult<WorkedHours> {
    let (shift, lunch) = match mode {
        ScheduleMode::Standard => standard_spans(entry)?,
        ScheduleMode::Flexible => flexible_spans(entry)?,
    };

    let break_minutes = lunch.map(Span::minutes).unwrap_or(0);
    let worked_hours = minutes_to_hours(shift.minutes() - break_minutes);
    let (ordinary_hours, overtime_25_hours, overtime_35_hours) = split_overtime(
        worked_hours,
        config.daily_threshold_hours,
        config.overtime_first_tier_hours,
    );

    let night_hours = match mode {
        ScheduleMode::Standard => None,
        ScheduleMode::Flexible => {
            let minutes = night_minutes(shift) - lunch.map(night_minutes).unwrap_or(0);
            Some(minutes_to_hours(minutes))
        }
    };

    Ok(WorkedHours {
        break_minutes,
        worked_hours,
        ordinary_hours,
        overtime_25_hours,
        overtime_35_hours,
        night_hours,
    })
}
