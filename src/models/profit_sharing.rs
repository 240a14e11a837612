//! Profit-sharing (utilidades) models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One worker row of a profit-sharing sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitSharingEmployee {
    /// National identity number.
    pub dni: String,
    /// Full name.
    pub name: String,
    /// Job title, when the sheet has one.
    pub position: Option<String>,
    /// Days actually worked in the fiscal year.
    pub days_worked: Decimal,
    /// Computable remuneration for the fiscal year.
    pub remuneration: Decimal,
    /// Income tax withheld from the participation.
    pub withholding: Decimal,
}

/// The amount to distribute and the totals it is split over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitSharingPool {
    /// The fiscal year the profits belong to.
    pub fiscal_year: i32,
    /// The total participation to distribute.
    pub amount: Decimal,
    /// Sum of days worked by all workers.
    pub total_days: Decimal,
    /// Sum of computable remuneration of all workers.
    pub total_remuneration: Decimal,
}

/// One worker's share of the pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitShare {
    /// The worker.
    pub employee: ProfitSharingEmployee,
    /// Share distributed by days worked.
    pub by_days: Decimal,
    /// Share distributed by remuneration.
    pub by_remuneration: Decimal,
    /// `by_days + by_remuneration`.
    pub total: Decimal,
    /// Net amount after withholding.
    pub net: Decimal,
    /// Net amount in Spanish words.
    pub net_words: String,
}

impl ProfitShare {
    /// The worker name with spaces replaced by underscores.
    pub fn file_stem(&self) -> String {
        self.employee
            .name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
    }

    /// The download file name, `Certificado_Liquidacion_<Name>.pdf`.
    pub fn file_name(&self) -> String {
        format!("Certificado_Liquidacion_{}.pdf", self.file_stem())
    }
}
