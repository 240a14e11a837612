//! Payslip (boleta de pago) models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PayrollPeriod;

/// Worker data printed on a payslip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayslipEmployee {
    /// National identity number.
    pub dni: String,
    /// Full name.
    pub name: String,
    /// Job title (cargo).
    pub position: String,
    /// The payroll period.
    pub period: PayrollPeriod,
    /// Hire date, when the sheet provides a parseable one.
    pub hire_date: Option<NaiveDate>,
    /// Days worked in the period.
    pub days_worked: Decimal,
    /// Pension system as written on the sheet (`ONP`, `AFP Integra`, ...).
    pub pension_system: String,
}

/// A named amount: one income, deduction or contribution line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayItem {
    /// The concept printed on the payslip.
    pub concept: String,
    /// The amount in soles.
    pub amount: Decimal,
}

impl PayItem {
    /// Creates a pay item.
    pub fn new(concept: impl Into<String>, amount: Decimal) -> Self {
        Self {
            concept: concept.into(),
            amount,
        }
    }
}

/// Payslip inputs before any formula is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayslipInput {
    /// Worker data.
    pub employee: PayslipEmployee,
    /// Income lines taken from the sheet.
    pub incomes: Vec<PayItem>,
    /// Deduction lines taken from the sheet (pension excluded).
    pub other_deductions: Vec<PayItem>,
}

/// Aggregated payslip figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipTotals {
    /// Total remuneration (TOTAL HABER).
    pub total_income: Decimal,
    /// Total worker deductions.
    pub total_deductions: Decimal,
    /// Total employer contributions.
    pub total_contributions: Decimal,
    /// Net pay (NETO A PAGAR).
    pub net_pay: Decimal,
}

/// A fully computed payslip, ready to render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payslip {
    /// Worker data.
    pub employee: PayslipEmployee,
    /// REMUNERACIONES column.
    pub incomes: Vec<PayItem>,
    /// DESCUENTOS TRABAJADOR column.
    pub deductions: Vec<PayItem>,
    /// APORTES EMPLEADOR column.
    pub contributions: Vec<PayItem>,
    /// Totals.
    pub totals: PayslipTotals,
    /// Net pay written out in Spanish words.
    pub net_pay_words: String,
    /// Payment date (last day of the period).
    pub payment_date: NaiveDate,
}

impl Payslip {
    /// The download file name, `BOLETA_<DNI>_<MM>_<YYYY>.pdf`.
    pub fn file_name(&self) -> String {
        format!(
            "BOLETA_{}_{:02}_{}.pdf",
            self.employee.dni, self.employee.period.month, self.employee.period.year
        )
    }
}
