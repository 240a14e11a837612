//! ESSALUD workbook processing.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use tracing::debug;

use super::{output_columns, padded_row};
use crate::calculation::{calculate_essalud, summarize_essalud};
use crate::config::EssaludConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{EssaludRecord, EssaludResult, EssaludSummary};
use crate::spreadsheet::{CellValue, SheetData, Table};

/// Columns an ESSALUD workbook must have.
pub const ESSALUD_COLUMNS: [&str; 6] = [
    "fecha_ingreso",
    "fecha_cese",
    "Importe Bruto",
    "Días Subsidio",
    "Dias_Mes",
    "Importe ESSALUD EJB",
];

/// Columns added to the results sheet.
pub const ESSALUD_OUTPUT_COLUMNS: [&str; 4] = [
    "DIAS PLAME",
    "Importe_Calculado",
    "CALCULO DIAS PLAME",
    "IMPORTE ESSALUD FINAL",
];

/// Name of the results sheet.
pub const ESSALUD_RESULT_SHEET: &str = "Resultados ESSALUD";

/// Name of the summary sheet.
pub const ESSALUD_SUMMARY_SHEET: &str = "Resumen";

/// The outcome of processing an ESSALUD workbook.
#[derive(Debug, Clone)]
pub struct EssaludReport {
    /// Every processed record with its result, in sheet order.
    pub results: Vec<(EssaludRecord, EssaludResult)>,
    /// Batch figures.
    pub summary: EssaludSummary,
    /// The results sheet followed by the summary sheet.
    pub sheets: Vec<SheetData>,
}

/// The download name for a processed workbook, `essalud_procesado_YYYYMMDD_HHMMSS.xlsx`.
pub fn essalud_file_name(now: NaiveDateTime) -> String {
    format!("essalud_procesado_{}.xlsx", now.format("%Y%m%d_%H%M%S"))
}

fn read_record(table: &Table, row: usize, cols: &[usize]) -> EngineResult<EssaludRecord> {
    let record = EssaludRecord {
        hire_date: table.date(row, cols[0]),
        termination_date: table.date(row, cols[1]),
        gross_amount: table.decimal_or_zero(row, cols[2])?,
        subsidy_days: table.decimal_or_zero(row, cols[3])?,
        month_days: table.decimal_or_zero(row, cols[4])?,
        payroll_amount: table.decimal_or_zero(row, cols[5])?,
    };

    if record.has_subsidy() && record.month_days <= Decimal::ZERO {
        return Err(EngineError::invalid_cell(
            table.sheet_row(row),
            &table.headers[cols[4]],
            "month days must be greater than zero when there are subsidy days",
        ));
    }

    Ok(record)
}

fn summary_sheet(summary: &EssaludSummary) -> SheetData {
    let metric = |name: &str, value: CellValue| vec![CellValue::Text(name.to_string()), value];

    SheetData {
        name: ESSALUD_SUMMARY_SHEET.to_string(),
        headers: vec!["Métrica".to_string(), "Valor".to_string()],
        rows: vec![
            metric("Filas procesadas", CellValue::Number(summary.rows as f64)),
            metric(
                "Total IMPORTE ESSALUD FINAL",
                CellValue::from_decimal(summary.total_final_amount),
            ),
            metric(
                "Empleados con subsidio",
                CellValue::Number(summary.employees_with_subsidy as f64),
            ),
            metric(
                "Empleados con fecha de cese",
                CellValue::Number(summary.employees_terminated as f64),
            ),
            metric(
                "Promedio DIAS PLAME",
                CellValue::from_decimal(summary.average_plame_days),
            ),
        ],
    }
}

/// Applies the ESSALUD rules to every non-blank row of a sheet.
///
/// The results sheet keeps every original column and value and appends the
/// four computed columns. Blank rows are left out.
///
/// # Errors
///
/// - `MissingColumns` listing every absent required column
/// - `InvalidCell` for non-numeric amounts or zero month days with subsidy days
/// - `EmptySheet` when the sheet has no data rows
pub fn process_essalud(table: &Table, config: &EssaludConfig) -> EngineResult<EssaludReport> {
    let cols = table.require_columns(&ESSALUD_COLUMNS)?;

    let mut headers = table.headers.clone();
    let out = output_columns(&mut headers, &ESSALUD_OUTPUT_COLUMNS);

    let mut results = Vec::new();
    let mut rows = Vec::new();
    let mut step_number = 1;

    for row in 0..table.rows.len() {
        if table.is_blank_row(row) {
            continue;
        }

        let record = read_record(table, row, &cols)?;
        let result = calculate_essalud(&record, config, step_number).map_err(|e| match e {
            EngineError::CalculationError { message } => EngineError::CalculationError {
                message: format!("row {}: {}", table.sheet_row(row), message),
            },
            other => other,
        })?;
        step_number += result.audit_steps.len() as u32;

        let mut cells = padded_row(table, row, headers.len());
        cells[out[0]] = CellValue::from_decimal(result.plame_days);
        cells[out[1]] = CellValue::from_decimal(result.computed_amount);
        cells[out[2]] = CellValue::from_decimal(result.plame_days_amount);
        cells[out[3]] = CellValue::from_decimal(result.final_amount);
        rows.push(cells);

        results.push((record, result));
    }

    if results.is_empty() {
        return Err(EngineError::EmptySheet {
            sheet: table.sheet_name.clone(),
        });
    }

    let summary = summarize_essalud(&results)?;
    let sheets = vec![
        SheetData {
            name: ESSALUD_RESULT_SHEET.to_string(),
            headers,
            rows,
        },
        summary_sheet(&summary),
    ];

    debug!(
        sheet = %table.sheet_name,
        rows = summary.rows,
        "ESSALUD sheet processed"
    );
    Ok(EssaludReport {
        results,
        summary,
        sheets,
    })
}
