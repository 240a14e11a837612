//! Profit-sharing sheet reading.

use rust_decimal::Decimal;

use super::read_dni;

use crate::error::{EngineError, EngineResult};
use crate::models::ProfitSharingEmployee;
use crate::spreadsheet::Table;

/// Default sheet holding the workers.
pub const PROFIT_SHARING_SHEET: &str = "Empleados";

/// Columns a profit-sharing sheet must have.
pub const PROFIT_SHARING_REQUIRED_COLUMNS: [&str; 4] =
    ["DNI", "Nombre", "Dias Laborados", "Remuneracion Computable"];

const POSITION_COLUMN: &str = "Cargo";
const WITHHOLDING_COLUMN: &str = "Retencion";

/// Reads every worker of a profit-sharing sheet.
///
/// Rows with both `DNI` and `Nombre` empty are skipped; blank amounts count as zero.
///
/// # Errors
///
/// - `MissingColumns` when a required column is absent
/// - `InvalidCell` for non-numeric amounts
/// - `EmptySheet` when no worker row remains
pub fn read_profit_sharing_employees(table: &Table) -> EngineResult<Vec<ProfitSharingEmployee>> {
    let cols = table.require_columns(&PROFIT_SHARING_REQUIRED_COLUMNS)?;
    let position_col = table.column_index(POSITION_COLUMN);
    let withholding_col = table.column_index(WITHHOLDING_COLUMN);

    let mut employees = Vec::new();
    for row in 0..table.rows.len() {
        let dni = read_dni(table, row, cols[0]);
        let name = table.text(row, cols[1]);
        if dni.is_empty() && name.is_empty() {
            continue;
        }

        let position = position_col
            .map(|col| table.text(row, col))
            .filter(|p| !p.is_empty());
        let withholding = match withholding_col {
            Some(col) => table.decimal_or_zero(row, col)?,
            None => Decimal::ZERO,
        };

        employees.push(ProfitSharingEmployee {
            dni,
            name,
            position,
            days_worked: table.decimal_or_zero(row, cols[2])?,
            remuneration: table.decimal_or_zero(row, cols[3])?,
            withholding,
        });
    }

    if employees.is_empty() {
        return Err(EngineError::EmptySheet {
            sheet: table.sheet_name.clone(),
        });
    }

    Ok(employees)
}
