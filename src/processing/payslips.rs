//! Payslip sheet reading and payslip assembly.

use rust_decimal::Decimal;

use super::read_dni;

use crate::calculation::calculate_payslip;
use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::models::{PayItem, PayrollPeriod, Payslip, PayslipEmployee, PayslipInput};
use crate::spreadsheet::{CellValue, Table};

/// Default sheet holding the payroll rows.
pub const PAYSLIP_SHEET: &str = "Empleados";

/// Columns a payslip sheet must have.
pub const PAYSLIP_REQUIRED_COLUMNS: [&str; 7] = [
    "DNI",
    "Nombre",
    "Cargo",
    "Periodo",
    "Fecha Ingreso",
    "Sueldo Basico",
    "Sistema Pension",
];

/// Optional income columns and the concept printed for each.
const INCOME_COLUMNS: [(&str, &str); 4] = [
    ("Asignacion Familiar", "ASIGNACIÓN FAMILIAR"),
    ("Horas Extras", "HORAS EXTRAS"),
    ("Bonificaciones", "BONIFICACIONES"),
    ("Gratificacion", "GRATIFICACIÓN"),
];

/// Optional deduction columns and the concept printed for each.
const DEDUCTION_COLUMNS: [(&str, &str); 3] = [
    ("Renta Quinta", "RENTA 5TA CATEGORÍA"),
    ("Adelantos", "ADELANTOS"),
    ("Otros Descuentos", "OTROS DESCUENTOS"),
];

const DAYS_WORKED_COLUMN: &str = "Dias Trabajados";
const DEFAULT_DAYS_WORKED: i64 = 30;

fn optional_items(
    table: &Table,
    row: usize,
    columns: &[(&str, &str)],
) -> EngineResult<Vec<PayItem>> {
    let mut items = Vec::new();
    for (header, concept) in columns {
        let Some(col) = table.column_index(header) else {
            continue;
        };
        let amount = table.decimal_or_zero(row, col)?;
        if !amount.is_zero() {
            items.push(PayItem::new(*concept, amount));
        }
    }
    Ok(items)
}

/// Reads every payable row of a payslip sheet.
///
/// Rows with both `DNI` and `Nombre` empty are skipped. The basic salary is
/// always the first income line; optional incomes and deductions follow in
/// column order when their amount is not zero.
///
/// # Errors
///
/// - `MissingColumns` when a required column is absent
/// - `InvalidCell` for an unreadable period or a non-numeric amount
/// - `EmptySheet` when no row is payable
pub fn read_payslip_inputs(table: &Table) -> EngineResult<Vec<PayslipInput>> {
    Ok(read_rows(table)?
        .into_iter()
        .map(|(_, input)| input)
        .collect())
}

/// Reads every payable row and applies the payslip formulas to it.
///
/// # Errors
///
/// The errors of [`read_payslip_inputs`], plus `InvalidCell` on the
/// `Sistema Pension` column for a pension system without a configured rate
/// and `CalculationError` naming the row when its amounts are out of range.
pub fn build_payslips(table: &Table, config: &ConfigLoader) -> EngineResult<Vec<Payslip>> {
    let pension_column = PAYSLIP_REQUIRED_COLUMNS[6];
    read_rows(table)?
        .into_iter()
        .map(|(sheet_row, input)| {
            let system = &input.employee.pension_system;
            if config.pension_rate(system).is_none() {
                return Err(EngineError::invalid_cell(
                    sheet_row,
                    pension_column,
                    format!("unknown pension system '{}'", system.trim()),
                ));
            }
            calculate_payslip(input, config).map_err(|e| match e {
                EngineError::CalculationError { message } => EngineError::CalculationError {
                    message: format!("row {}: {}", sheet_row, message),
                },
                other => other,
            })
        })
        .collect()
}

/// Payable rows with their 1-based sheet row.
fn read_rows(table: &Table) -> EngineResult<Vec<(usize, PayslipInput)>> {
    let cols = table.require_columns(&PAYSLIP_REQUIRED_COLUMNS)?;
    let days_col = table.column_index(DAYS_WORKED_COLUMN);

    let mut inputs = Vec::new();
    for row in 0..table.rows.len() {
        let dni = read_dni(table, row, cols[0]);
        let name = table.text(row, cols[1]);
        if dni.is_empty() && name.is_empty() {
            continue;
        }

        let period_text = table.text(row, cols[3]);
        let period = match table.cell(row, cols[3]) {
            CellValue::DateTime(_) => table.date(row, cols[3]).map(PayrollPeriod::from_date),
            _ => PayrollPeriod::parse(&period_text),
        };
        let period = period.ok_or_else(|| {
            EngineError::invalid_cell(
                table.sheet_row(row),
                &table.headers[cols[3]],
                format!("'{}' is not a period in MM/YYYY form", period_text),
            )
        })?;

        let days_worked = match days_col {
            Some(col) => table
                .decimal(row, col)?
                .unwrap_or(Decimal::from(DEFAULT_DAYS_WORKED)),
            None => Decimal::from(DEFAULT_DAYS_WORKED),
        };

        let mut incomes = vec![PayItem::new(
            "SUELDO BÁSICO",
            table.decimal_or_zero(row, cols[5])?,
        )];
        incomes.extend(optional_items(table, row, &INCOME_COLUMNS)?);

        inputs.push((
            table.sheet_row(row),
            PayslipInput {
                employee: PayslipEmployee {
                    dni,
                    name,
                    position: table.text(row, cols[2]),
                    period,
                    hire_date: table.date(row, cols[4]),
                    days_worked,
                    pension_system: table.text(row, cols[6]),
                },
                incomes,
                other_deductions: optional_items(table, row, &DEDUCTION_COLUMNS)?,
            },
        ));
    }

    if inputs.is_empty() {
        return Err(EngineError::EmptySheet {
            sheet: table.sheet_name.clone(),
        });
    }

    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn headers(extra: &[&str]) -> Vec<String> {
        PAYSLIP_REQUIRED_COLUMNS
            .iter()
            .chain(extra.iter())
            .map(|h| h.to_string())
            .collect()
    }

    fn base_row(dni: &str, name: &str) -> Vec<CellValue> {
        vec![
            text(dni),
            text(name),
            text("ASISTENTE"),
            text("03/2024"),
            text("15/01/2022"),
            CellValue::Number(1500.0),
            text("ONP"),
        ]
    }

    #[test]
    fn test_reads_required_and_optional_columns() {
        let mut row = base_row("45678912", "MARIA LOPEZ");
        row.extend([
            CellValue::Number(113.0),
            CellValue::Number(0.0),
            CellValue::Number(50.0),
            CellValue::Number(28.0),
        ]);
        let table = Table::new(
            "Empleados",
            headers(&["Asignacion Familiar", "Horas Extras", "Adelantos", "Dias Trabajados"]),
            vec![row],
        );

        let inputs = read_payslip_inputs(&table).unwrap();
        assert_eq!(inputs.len(), 1);

        let input = &inputs[0];
        assert_eq!(input.employee.dni, "45678912");
        assert_eq!(input.employee.period, PayrollPeriod::new(3, 2024).unwrap());
        assert_eq!(input.employee.hire_date, NaiveDate::from_ymd_opt(2022, 1, 15));
        assert_eq!(input.employee.days_worked, Decimal::from(28));
        // zero overtime is left out
        assert_eq!(
            input.incomes,
            vec![
                PayItem::new("SUELDO BÁSICO", Decimal::from(1500)),
                PayItem::new("ASIGNACIÓN FAMILIAR", Decimal::from(113)),
            ]
        );
        assert_eq!(
            input.other_deductions,
            vec![PayItem::new("ADELANTOS", Decimal::from(50))]
        );
    }

    #[test]
    fn test_days_worked_defaults_to_thirty() {
        let table = Table::new("Empleados", headers(&[]), vec![base_row("1", "ANA")]);
        let inputs = read_payslip_inputs(&table).unwrap();
        assert_eq!(inputs[0].employee.days_worked, Decimal::from(30));
    }

    #[test]
    fn test_rows_without_dni_and_name_are_skipped() {
        let table = Table::new(
            "Empleados",
            headers(&[]),
            vec![base_row("", ""), base_row("1", "ANA")],
        );
        let inputs = read_payslip_inputs(&table).unwrap();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].employee.name, "ANA");
    }

    #[test]
    fn test_no_payable_rows_is_empty_sheet() {
        let table = Table::new("Empleados", headers(&[]), vec![base_row("", "")]);
        assert!(matches!(
            read_payslip_inputs(&table),
            Err(EngineError::EmptySheet { .. })
        ));
    }

    #[test]
    fn test_invalid_period_names_the_cell() {
        let mut row = base_row("1", "ANA");
        row[3] = text("marzo");
        let table = Table::new("Empleados", headers(&[]), vec![row]);

        match read_payslip_inputs(&table) {
            Err(EngineError::InvalidCell { row, column, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(column, "Periodo");
            }
            other => panic!("expected InvalidCell, got {:?}", other),
        }
    }

    #[test]
    fn test_period_from_a_date_cell() {
        let mut row = base_row("1", "ANA");
        // 2024-03-01
        row[3] = CellValue::DateTime(45352.0);
        let table = Table::new("Empleados", headers(&[]), vec![row]);

        let inputs = read_payslip_inputs(&table).unwrap();
        assert_eq!(inputs[0].employee.period, PayrollPeriod::new(3, 2024).unwrap());
    }

    #[test]
    fn test_build_payslips_applies_formulas() {
        let config = ConfigLoader::load("./config/planilla.yaml").unwrap();
        let table = Table::new("Empleados", headers(&[]), vec![base_row("1", "ANA")]);

        let payslips = build_payslips(&table, &config).unwrap();
        assert_eq!(payslips.len(), 1);
        // ONP 13% of 1500
        assert_eq!(payslips[0].deductions[0].amount, Decimal::from(195));
        assert_eq!(payslips[0].totals.net_pay, Decimal::from(1305));
    }

    #[test]
    fn test_unknown_pension_system_names_the_cell() {
        let config = ConfigLoader::load("./config/planilla.yaml").unwrap();
        let mut second = base_row("2", "LUIS");
        second[6] = text("AFP Futura");
        let table = Table::new(
            "Empleados",
            headers(&[]),
            vec![base_row("", ""), base_row("1", "ANA"), second],
        );

        match build_payslips(&table, &config) {
            Err(EngineError::InvalidCell { row, column, .. }) => {
                assert_eq!(row, 4);
                assert_eq!(column, "Sistema Pension");
            }
            other => panic!("expected InvalidCell, got {:?}", other.map(|p| p.len())),
        }
    }

    #[test]
    fn test_numeric_dni_is_read_without_decimals() {
        let mut row = base_row("", "ANA");
        row[0] = CellValue::Number(45678912.0);
        let table = Table::new("Empleados", headers(&[]), vec![row]);

        let inputs = read_payslip_inputs(&table).unwrap();
        assert_eq!(inputs[0].employee.dni, "45678912");
    }
}
