//! ESSALUD contribution records and results.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AuditStep;

/// One employee row of an ESSALUD contribution sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EssaludRecord {
    /// Hire date (`fecha_ingreso`).
    pub hire_date: Option<NaiveDate>,
    /// Termination date (`fecha_cese`); `None` when absent or unparseable.
    pub termination_date: Option<NaiveDate>,
    /// Gross remuneration for the month (`Importe Bruto`).
    pub gross_amount: Decimal,
    /// Days covered by an ESSALUD subsidy (`Días Subsidio`).
    pub subsidy_days: Decimal,
    /// Calendar days of the month (`Dias_Mes`).
    pub month_days: Decimal,
    /// Contribution already computed by the payroll system (`Importe ESSALUD EJB`).
    pub payroll_amount: Decimal,
}

impl EssaludRecord {
    /// Returns true when the worker left during the month.
    pub fn is_terminated(&self) -> bool {
        self.termination_date.is_some()
    }

    /// Returns true when the worker had subsidised days.
    pub fn has_subsidy(&self) -> bool {
        self.subsidy_days > Decimal::ZERO
    }
}

/// Which branch of the contribution rule produced `computed_amount`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionRule {
    /// Termination date present: rate applied to the gross amount.
    Terminated,
    /// Subsidy days present: no employer contribution on the gross amount.
    Subsidized,
    /// Gross amount below the minimum remuneration: rate applied to the minimum.
    MinimumRemuneration,
    /// Rate applied to the gross amount.
    GrossRate,
}

/// The derived ESSALUD fields for one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EssaludResult {
    /// `DIAS PLAME`: month days minus subsidy days.
    pub plame_days: Decimal,
    /// `Importe_Calculado`.
    pub computed_amount: Decimal,
    /// The branch that produced `computed_amount`.
    pub rule: ContributionRule,
    /// `CALCULO DIAS PLAME`: subsidy-proportional amount, rounded to cents.
    pub plame_days_amount: Decimal,
    /// `IMPORTE ESSALUD FINAL`: the largest of the three candidate amounts.
    pub final_amount: Decimal,
    /// The audit trail for this record.
    pub audit_steps: Vec<AuditStep>,
}

/// Aggregate figures over a processed sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EssaludSummary {
    /// Number of processed rows.
    pub rows: usize,
    /// Sum of `IMPORTE ESSALUD FINAL`.
    pub total_final_amount: Decimal,
    /// Rows with subsidy days.
    pub employees_with_subsidy: usize,
    /// Rows with a termination date.
    pub employees_terminated: usize,
    /// Mean of `DIAS PLAME`, rounded to one decimal; zero for an empty sheet.
    pub average_plame_days: Decimal,
}
