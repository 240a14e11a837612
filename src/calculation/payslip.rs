//! Payslip (boleta de pago) calculation.

use rust_decimal::{Decimal, RoundingStrategy};

use super::{amount_to_words, checked};
use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::models::{PayItem, Payslip, PayslipInput, PayslipTotals};

fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// The deduction line for a pension system, e.g. `ONP 13%` or `AFP INTEGRA`.
fn pension_concept(system: &str) -> String {
    let system = system.trim().to_uppercase();
    if system == "ONP" || system == "SNP" {
        "ONP".to_string()
    } else if system.starts_with("AFP") {
        system
    } else {
        format!("AFP {}", system)
    }
}

/// Calculates the worker's pension deduction on the total remuneration.
///
/// # Errors
///
/// Returns `CalculationError` when the pension system has no configured rate.
pub fn calculate_pension_deduction(
    total_income: Decimal,
    system: &str,
    config: &ConfigLoader,
) -> EngineResult<PayItem> {
    let rate = config
        .pension_rate(system)
        .ok_or_else(|| EngineError::CalculationError {
            message: format!("unknown pension system '{}'", system.trim()),
        })?;

    Ok(PayItem::new(
        pension_concept(system),
        round_cents(checked::mul(total_income, rate, "pension deduction")?),
    ))
}

/// Calculates the employer's ESSALUD contribution for a payslip.
///
/// The contribution never goes below the rate applied to the minimum remuneration.
///
/// # Errors
///
/// Returns `CalculationError` when the income is too large to multiply.
pub fn calculate_essalud_contribution(
    total_income: Decimal,
    config: &ConfigLoader,
) -> EngineResult<PayItem> {
    let essalud = config.essalud();
    let base = total_income.max(essalud.minimum_remuneration);
    Ok(PayItem::new(
        "ESSALUD",
        round_cents(checked::mul(base, essalud.rate, "ESSALUD contribution")?),
    ))
}

/// Applies the payslip formulas: pension deduction, employer contribution,
/// totals, net pay, amount in words and payment date.
///
/// Income and deduction lines keep the order they were given in.
///
/// # Errors
///
/// Returns `CalculationError` for an unknown pension system or for amounts
/// whose totals are out of range.
pub fn calculate_payslip(input: PayslipInput, config: &ConfigLoader) -> EngineResult<Payslip> {
    let PayslipInput {
        employee,
        incomes,
        other_deductions,
    } = input;

    let total_income = checked::sum(incomes.iter().map(|item| item.amount), "total income")?;

    let mut deductions = Vec::with_capacity(other_deductions.len() + 1);
    deductions.push(calculate_pension_deduction(
        total_income,
        &employee.pension_system,
        config,
    )?);
    deductions.extend(other_deductions);
    let total_deductions =
        checked::sum(deductions.iter().map(|item| item.amount), "total deductions")?;

    let contributions = vec![calculate_essalud_contribution(total_income, config)?];
    let total_contributions =
        checked::sum(contributions.iter().map(|item| item.amount), "total contributions")?;

    let net_pay = round_cents(checked::sub(total_income, total_deductions, "net pay")?);
    let payment_date = employee.period.last_day();

    Ok(Payslip {
        employee,
        incomes,
        deductions,
        contributions,
        totals: PayslipTotals {
            total_income,
            total_deductions,
            total_contributions,
            net_pay,
        },
        net_pay_words: amount_to_words(net_pay),
        payment_date,
    })
}
