//! Workflow processing.
//!
//! Each workflow turns an uploaded [`Table`](crate::spreadsheet::Table) into
//! typed records, runs the formulas from [`crate::calculation`] on every row
//! and assembles the artifacts the API hands back: result sheets for the
//! Excel workflows and computed documents for the PDF workflows.

mod essalud;
mod payslips;
mod profit_sharing;
mod work_hours;

pub use essalud::{
    ESSALUD_COLUMNS, ESSALUD_OUTPUT_COLUMNS, ESSALUD_RESULT_SHEET, ESSALUD_SUMMARY_SHEET,
    EssaludReport, essalud_file_name, process_essalud,
};
pub use payslips::{PAYSLIP_REQUIRED_COLUMNS, PAYSLIP_SHEET, build_payslips, read_payslip_inputs};
pub use profit_sharing::{
    PROFIT_SHARING_REQUIRED_COLUMNS, PROFIT_SHARING_SHEET, read_profit_sharing_employees,
};
pub use work_hours::{
    WORK_HOURS_FILE_NAME, WORK_HOURS_REPORT_SHEET, WORK_HOURS_SHEET, WorkHoursColumns,
    WorkHoursReport, process_work_hours,
};

use crate::spreadsheet::{CellValue, Table};

/// Returns the index of every output column, appending the ones the sheet lacks.
///
/// Columns that already exist are overwritten in place so that re-uploading a
/// processed workbook does not duplicate them.
fn output_columns(headers: &mut Vec<String>, names: &[&str]) -> Vec<usize> {
    names
        .iter()
        .map(|name| match headers.iter().position(|h| h == name) {
            Some(idx) => idx,
            None => {
                headers.push((*name).to_string());
                headers.len() - 1
            }
        })
        .collect()
}

/// Digits in a DNI (documento nacional de identidad).
const DNI_DIGITS: usize = 8;

/// Reads a DNI cell.
///
/// A DNI typed as a number loses its leading zeros in Excel, so whole numbers
/// are left-padded back to eight digits. Text is kept as written.
fn read_dni(table: &Table, row: usize, col: usize) -> String {
    match table.cell(row, col) {
        CellValue::Number(n) if n.fract() == 0.0 && *n >= 0.0 => {
            format!("{:0>width$}", table.text(row, col), width = DNI_DIGITS)
        }
        _ => table.text(row, col),
    }
}

/// Copies a data row, padded to the header width.
fn padded_row(table: &Table, row: usize, width: usize) -> Vec<CellValue> {
    let mut cells = table.rows.get(row).cloned().unwrap_or_default();
    cells.resize(width, CellValue::Empty);
    cells
}
