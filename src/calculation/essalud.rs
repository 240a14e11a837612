//! ESSALUD contribution calculation.
//!
//! This module applies the monthly ESSALUD contribution rules to one employee
//! record: PLAME days, the rate-based amount, the subsidy-proportional amount
//! and the final amount (the largest of the candidates, including the amount
//! the payroll system already computed).

use rust_decimal::{Decimal, RoundingStrategy};

use super::checked;

use crate::config::EssaludConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, ContributionRule, EssaludRecord, EssaludResult, EssaludSummary};

/// Legal reference for the 9% employer contribution.
pub const ESSALUD_LEGAL_REF: &str = "Ley 26790, art. 6";

fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Calculates `DIAS PLAME`: month days minus subsidy days.
///
/// # Examples
///
/// ```
/// use planilla_engine::calculation::calculate_plame_days;
/// use rust_decimal::Decimal;
///
/// assert_eq!(
///     calculate_plame_days(Decimal::from(30), Decimal::from(5)).unwrap(),
///     Decimal::from(25)
/// );
/// ```
///
/// # Errors
///
/// Returns `CalculationError` when the difference is out of range.
pub fn calculate_plame_days(month_days: Decimal, subsidy_days: Decimal) -> EngineResult<Decimal> {
    checked::sub(month_days, subsidy_days, "DIAS PLAME")
}

/// Calculates `Importe_Calculado` and reports which branch applied.
///
/// Branches are tried in order:
/// 1. termination date present: `gross × rate`
/// 2. subsidy days present: `0`
/// 3. `0 < gross < minimum`: `minimum × rate`
/// 4. otherwise: `gross × rate`
///
/// # Errors
///
/// Returns `CalculationError` when the gross amount is too large to multiply.
pub fn calculate_contribution(
    record: &EssaludRecord,
    config: &EssaludConfig,
) -> EngineResult<(Decimal, ContributionRule)> {
    let on_gross = || checked::mul(record.gross_amount, config.rate, "Importe_Calculado");
    Ok(if record.is_terminated() {
        (on_gross()?, ContributionRule::Terminated)
    } else if record.has_subsidy() {
        (Decimal::ZERO, ContributionRule::Subsidized)
    } else if record.gross_amount > Decimal::ZERO
        && record.gross_amount < config.minimum_remuneration
    {
        (
            checked::mul(config.minimum_remuneration, config.rate, "Importe_Calculado")?,
            ContributionRule::MinimumRemuneration,
        )
    } else {
        (on_gross()?, ContributionRule::GrossRate)
    })
}

/// Calculates `CALCULO DIAS PLAME`.
///
/// With subsidy days the daily base is spread over the month and multiplied
/// by the PLAME days, rounded to cents; without subsidy days the amount is zero.
///
/// # Errors
///
/// Returns `CalculationError` when there are subsidy days but the month has no
/// days, or when the month days are so small that the amount is out of range.
pub fn calculate_plame_days_amount(
    record: &EssaludRecord,
    plame_days: Decimal,
    config: &EssaludConfig,
) -> EngineResult<Decimal> {
    if !record.has_subsidy() {
        return Ok(Decimal::ZERO);
    }
    if record.month_days <= Decimal::ZERO {
        return Err(EngineError::CalculationError {
            message: "month days must be greater than zero when there are subsidy days"
                .to_string(),
        });
    }

    let daily = checked::div(config.subsidy_daily_base, record.month_days, "CALCULO DIAS PLAME")?;
    Ok(round_cents(checked::mul(daily, plame_days, "CALCULO DIAS PLAME")?))
}

/// Applies every ESSALUD rule to a record.
///
/// # Example
///
/// ```
/// use planilla_engine::calculation::calculate_essalud;
/// use planilla_engine::config::EssaludConfig;
/// use planilla_engine::models::{ContributionRule, EssaludRecord};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let config = EssaludConfig {
///     rate: Decimal::from_str("0.09").unwrap(),
///     minimum_remuneration: Decimal::from(1130),
///     subsidy_daily_base: Decimal::from_str("101.70").unwrap(),
/// };
/// let record = EssaludRecord {
///     hire_date: None,
///     termination_date: None,
///     gross_amount: Decimal::from(800),
///     subsidy_days: Decimal::ZERO,
///     month_days: Decimal::from(30),
///     payroll_amount: Decimal::from(72),
/// };
///
/// let result = calculate_essalud(&record, &config, 1).unwrap();
/// assert_eq!(result.rule, ContributionRule::MinimumRemuneration);
/// assert_eq!(result.final_amount, Decimal::from_str("101.70").unwrap());
/// ```
pub fn calculate_essalud(
    record: &EssaludRecord,
    config: &EssaludConfig,
    step_number: u32,
) -> EngineResult<EssaludResult> {
    let mut audit_steps = Vec::with_capacity(4);

    let plame_days = calculate_plame_days(record.month_days, record.subsidy_days)?;
    audit_steps.push(AuditStep {
        step_number,
        rule_id: "essalud_plame_days".to_string(),
        rule_name: "PLAME Days".to_string(),
        legal_ref: "PLAME".to_string(),
        input: serde_json::json!({
            "month_days": record.month_days.normalize().to_string(),
            "subsidy_days": record.subsidy_days.normalize().to_string()
        }),
        output: serde_json::json!({
            "plame_days": plame_days.normalize().to_string()
        }),
        reasoning: format!(
            "{} - {} = {}",
            record.month_days.normalize(),
            record.subsidy_days.normalize(),
            plame_days.normalize()
        ),
    });

    let (computed_amount, rule) = calculate_contribution(record, config)?;
    let reasoning = match rule {
        ContributionRule::Terminated => format!(
            "Termination date present: {} x {} = {}",
            record.gross_amount.normalize(),
            config.rate.normalize(),
            computed_amount.normalize()
        ),
        ContributionRule::Subsidized => format!(
            "{} subsidy days: no contribution on the gross amount",
            record.subsidy_days.normalize()
        ),
        ContributionRule::MinimumRemuneration => format!(
            "Gross {} below minimum {}: {} x {} = {}",
            record.gross_amount.normalize(),
            config.minimum_remuneration.normalize(),
            config.minimum_remuneration.normalize(),
            config.rate.normalize(),
            computed_amount.normalize()
        ),
        ContributionRule::GrossRate => format!(
            "{} x {} = {}",
            record.gross_amount.normalize(),
            config.rate.normalize(),
            computed_amount.normalize()
        ),
    };
    audit_steps.push(AuditStep {
        step_number: step_number + 1,
        rule_id: "essalud_contribution".to_string(),
        rule_name: "Contribution on Remuneration".to_string(),
        legal_ref: ESSALUD_LEGAL_REF.to_string(),
        input: serde_json::json!({
            "gross_amount": record.gross_amount.normalize().to_string(),
            "terminated": record.is_terminated(),
            "subsidy_days": record.subsidy_days.normalize().to_string()
        }),
        output: serde_json::json!({
            "computed_amount": computed_amount.normalize().to_string(),
            "rule": rule
        }),
        reasoning,
    });

    let plame_days_amount = calculate_plame_days_amount(record, plame_days, config)?;
    audit_steps.push(AuditStep {
        step_number: step_number + 2,
        rule_id: "essalud_plame_days_amount".to_string(),
        rule_name: "Subsidy-Proportional Amount".to_string(),
        legal_ref: "PLAME".to_string(),
        input: serde_json::json!({
            "daily_base": config.subsidy_daily_base.normalize().to_string(),
            "month_days": record.month_days.normalize().to_string(),
            "plame_days": plame_days.normalize().to_string()
        }),
        output: serde_json::json!({
            "plame_days_amount": plame_days_amount.normalize().to_string()
        }),
        reasoning: if record.has_subsidy() {
            format!(
                "{} / {} x {} = {}",
                config.subsidy_daily_base.normalize(),
                record.month_days.normalize(),
                plame_days.normalize(),
                plame_days_amount.normalize()
            )
        } else {
            "No subsidy days: amount is zero".to_string()
        },
    });

    let final_amount = computed_amount
        .max(plame_days_amount)
        .max(record.payroll_amount);
    audit_steps.push(AuditStep {
        step_number: step_number + 3,
        rule_id: "essalud_final".to_string(),
        rule_name: "Final ESSALUD Amount".to_string(),
        legal_ref: ESSALUD_LEGAL_REF.to_string(),
        input: serde_json::json!({
            "computed_amount": computed_amount.normalize().to_string(),
            "plame_days_amount": plame_days_amount.normalize().to_string(),
            "payroll_amount": record.payroll_amount.normalize().to_string()
        }),
        output: serde_json::json!({
            "final_amount": final_amount.normalize().to_string()
        }),
        reasoning: format!(
            "max({}, {}, {}) = {}",
            computed_amount.normalize(),
            plame_days_amount.normalize(),
            record.payroll_amount.normalize(),
            final_amount.normalize()
        ),
    });

    Ok(EssaludResult {
        plame_days,
        computed_amount,
        rule,
        plame_days_amount,
        final_amount,
        audit_steps,
    })
}

/// Aggregates processed records into the dashboard figures.
///
/// # Errors
///
/// Returns `CalculationError` when a total is out of range.
pub fn summarize_essalud(records: &[(EssaludRecord, EssaludResult)]) -> EngineResult<EssaludSummary> {
    let rows = records.len();
    let total_final_amount = checked::sum(
        records.iter().map(|(_, r)| r.final_amount),
        "Total IMPORTE ESSALUD FINAL",
    )?;
    let employees_with_subsidy = records.iter().filter(|(rec, _)| rec.has_subsidy()).count();
    let employees_terminated = records.iter().filter(|(rec, _)| rec.is_terminated()).count();

    let average_plame_days = if rows == 0 {
        Decimal::ZERO
    } else {
        let total = checked::sum(records.iter().map(|(_, r)| r.plame_days), "Promedio DIAS PLAME")?;
        (total / Decimal::from(rows)).round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
    };

    Ok(EssaludSummary {
        rows,
        total_final_amount,
        employees_with_subsidy,
        employees_terminated,
        average_plame_days,
    })
}
