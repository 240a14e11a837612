//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod audit;
mod essalud;
mod payslip;
mod period;
mod profit_sharing;
mod work_hours;

pub use audit::AuditStep;
pub use essalud::{ContributionRule, EssaludRecord, EssaludResult, EssaludSummary};
pub use payslip::{PayItem, Payslip, PayslipEmployee, PayslipInput, PayslipTotals};
pub use period::PayrollPeriod;
pub use profit_sharing::{ProfitShare, ProfitSharingEmployee, ProfitSharingPool};
pub use work_hours::{ScheduleMode, TimeEntry, WorkedHours};
