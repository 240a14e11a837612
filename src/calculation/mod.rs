//! Calculation logic for the payroll engine.
//!
//! This module contains the row-wise formulas: ESSALUD contribution amounts,
//! worked hours with overtime tiers and night hours, payslip totals,
//! profit-sharing distribution and amount-in-words conversion.

mod amount_words;
mod checked;
mod essalud;
mod payslip;
mod profit_sharing;
mod work_hours;

pub use amount_words::{amount_to_words, integer_to_words};
pub use essalud::{
    ESSALUD_LEGAL_REF, calculate_contribution, calculate_essalud, calculate_plame_days,
    calculate_plame_days_amount, summarize_essalud,
};
pub use payslip::{calculate_essalud_contribution, calculate_payslip, calculate_pension_deduction};
pub use profit_sharing::{
    PROFIT_SHARING_LEGAL_REF, build_pool, calculate_share, distribute_profit_sharing,
};
pub use work_hours::{
    NIGHT_END_MINUTE, NIGHT_START_MINUTE, calculate_work_hours, split_overtime,
};
