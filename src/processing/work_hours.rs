//! Work-hours workbook processing.

use tracing::debug;

use super::{output_columns, padded_row};
use crate::calculation::calculate_work_hours;
use crate::config::WorkHoursConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{ScheduleMode, TimeEntry};
use crate::spreadsheet::{CellValue, SheetData, Table};

/// Default sheet holding the time records.
pub const WORK_HOURS_SHEET: &str = "Horas";

/// Name of the report sheet.
pub const WORK_HOURS_REPORT_SHEET: &str = "Reporte";

/// Download name of the report workbook.
pub const WORK_HOURS_FILE_NAME: &str = "reporte_horas_calculadas.xlsx";

const STANDARD_OUTPUT_COLUMNS: [&str; 5] = [
    "Minutos Refrigerio",
    "Horas Trabajadas",
    "Horas Ordinarias",
    "Horas Extra 25%",
    "Horas Extra 35%",
];

const NIGHT_HOURS_COLUMN: &str = "Horas Nocturnas";

/// The header names of the four time columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkHoursColumns {
    /// Shift start column.
    pub start: String,
    /// Shift end column.
    pub end: String,
    /// Break start column.
    pub break_start: String,
    /// Break end column.
    pub break_end: String,
}

impl Default for WorkHoursColumns {
    fn default() -> Self {
        Self {
            start: "Hora Inicio".to_string(),
            end: "Hora Fin".to_string(),
            break_start: "Hora Refrigerio Inicio".to_string(),
            break_end: "Hora Refrigerio Fin".to_string(),
        }
    }
}

/// The outcome of processing a work-hours sheet.
#[derive(Debug, Clone)]
pub struct WorkHoursReport {
    /// Rows with computed hours.
    pub rows_processed: usize,
    /// Rows copied through because all their time cells were empty.
    pub rows_skipped: usize,
    /// The report sheet.
    pub sheet: SheetData,
}

/// Resolved positions of the time columns. Break columns are optional in flexible mode.
struct TimeColumns {
    start: usize,
    end: usize,
    break_start: Option<usize>,
    break_end: Option<usize>,
}

fn resolve_columns(
    table: &Table,
    columns: &WorkHoursColumns,
    mode: ScheduleMode,
) -> EngineResult<TimeColumns> {
    match mode {
        ScheduleMode::Standard => {
            let cols = table.require_columns(&[
                columns.start.as_str(),
                columns.end.as_str(),
                columns.break_start.as_str(),
                columns.break_end.as_str(),
            ])?;
            Ok(TimeColumns {
                start: cols[0],
                end: cols[1],
                break_start: Some(cols[2]),
                break_end: Some(cols[3]),
            })
        }
        ScheduleMode::Flexible => {
            let cols = table.require_columns(&[columns.start.as_str(), columns.end.as_str()])?;
            Ok(TimeColumns {
                start: cols[0],
                end: cols[1],
                break_start: table.column_index(&columns.break_start),
                break_end: table.column_index(&columns.break_end),
            })
        }
    }
}

fn optional_time(
    table: &Table,
    row: usize,
    col: Option<usize>,
) -> EngineResult<Option<chrono::NaiveTime>> {
    match col {
        Some(col) => table.time(row, col),
        None => Ok(None),
    }
}

fn required(table: &Table, row: usize, col: usize) -> EngineError {
    EngineError::invalid_cell(table.sheet_row(row), &table.headers[col], "a time is required")
}

fn read_entry(
    table: &Table,
    row: usize,
    cols: &TimeColumns,
    mode: ScheduleMode,
) -> EngineResult<Option<TimeEntry>> {
    let start = table.time(row, cols.start)?;
    let end = table.time(row, cols.end)?;
    let break_start = optional_time(table, row, cols.break_start)?;
    let break_end = optional_time(table, row, cols.break_end)?;

    if start.is_none() && end.is_none() && break_start.is_none() && break_end.is_none() {
        return Ok(None);
    }

    let start = start.ok_or_else(|| required(table, row, cols.start))?;
    let end = end.ok_or_else(|| required(table, row, cols.end))?;

    if mode == ScheduleMode::Standard {
        if let (None, Some(col)) = (break_start, cols.break_start) {
            return Err(required(table, row, col));
        }
        if let (None, Some(col)) = (break_end, cols.break_end) {
            return Err(required(table, row, col));
        }
    }

    Ok(Some(TimeEntry {
        start,
        end,
        break_start,
        break_end,
    }))
}

/// Computes worked hours for every row of a time sheet.
///
/// The report keeps every original column and value and appends the computed
/// columns (plus `Horas Nocturnas` for flexible schedules). Rows whose time
/// cells are all empty are copied through with empty computed cells.
///
/// # Errors
///
/// - `MissingColumns` when a time column is absent
/// - `InvalidCell` naming the row for unreadable or inconsistent times
pub fn process_work_hours(
    table: &Table,
    columns: &WorkHoursColumns,
    mode: ScheduleMode,
    config: &WorkHoursConfig,
) -> EngineResult<WorkHoursReport> {
    let cols = resolve_columns(table, columns, mode)?;

    let mut output_names = STANDARD_OUTPUT_COLUMNS.to_vec();
    if mode == ScheduleMode::Flexible {
        output_names.push(NIGHT_HOURS_COLUMN);
    }

    let mut headers = table.headers.clone();
    let out = output_columns(&mut headers, &output_names);

    let mut rows = Vec::with_capacity(table.rows.len());
    let mut rows_processed = 0;
    let mut rows_skipped = 0;

    for row in 0..table.rows.len() {
        let mut cells = padded_row(table, row, headers.len());

        let Some(entry) = read_entry(table, row, &cols, mode)? else {
            for &idx in &out {
                cells[idx] = CellValue::Empty;
            }
            rows.push(cells);
            rows_skipped += 1;
            continue;
        };

        let hours = calculate_work_hours(&entry, mode, config).map_err(|e| {
            let message = match e {
                EngineError::CalculationError { message } => message,
                other => other.to_string(),
            };
            EngineError::invalid_cell(table.sheet_row(row), &table.headers[cols.start], message)
        })?;

        cells[out[0]] = CellValue::Number(hours.break_minutes as f64);
        cells[out[1]] = CellValue::from_decimal(hours.worked_hours);
        cells[out[2]] = CellValue::from_decimal(hours.ordinary_hours);
        cells[out[3]] = CellValue::from_decimal(hours.overtime_25_hours);
        cells[out[4]] = CellValue::from_decimal(hours.overtime_35_hours);
        if let (Some(night), Some(&idx)) = (hours.night_hours, out.get(5)) {
            cells[idx] = CellValue::from_decimal(night);
        }

        rows.push(cells);
        rows_processed += 1;
    }

    debug!(
        sheet = %table.sheet_name,
        rows_processed,
        rows_skipped,
        ?mode,
        "Work-hours sheet processed"
    );
    Ok(WorkHoursReport {
        rows_processed,
        rows_skipped,
        sheet: SheetData {
            name: WORK_HOURS_REPORT_SHEET.to_string(),
            headers,
            rows,
        },
    })
}
