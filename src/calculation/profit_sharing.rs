//! Profit-sharing (utilidades) distribution.
//!
//! Half of the participation is distributed in proportion to the days each
//! worker worked during the fiscal year and half in proportion to their
//! computable remuneration (D. Leg. 892, art. 2).

use rust_decimal::{Decimal, RoundingStrategy};

use super::{amount_to_words, checked};
use crate::error::{EngineError, EngineResult};
use crate::models::{ProfitShare, ProfitSharingEmployee, ProfitSharingPool};

/// Legal reference printed on certificates.
pub const PROFIT_SHARING_LEGAL_REF: &str = "D. Leg. 892";

fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Builds the pool for a set of workers.
///
/// # Errors
///
/// Returns `CalculationError` when the amount is not positive, when the
/// workers' total days or total remuneration is zero, or when a total is out
/// of range.
pub fn build_pool(
    employees: &[ProfitSharingEmployee],
    amount: Decimal,
    fiscal_year: i32,
) -> EngineResult<ProfitSharingPool> {
    if amount <= Decimal::ZERO {
        return Err(EngineError::CalculationError {
            message: "profit-sharing amount must be greater than zero".to_string(),
        });
    }

    let total_days = checked::sum(employees.iter().map(|e| e.days_worked), "total days worked")?;
    let total_remuneration = checked::sum(
        employees.iter().map(|e| e.remuneration),
        "total computable remuneration",
    )?;

    if total_days <= Decimal::ZERO {
        return Err(EngineError::CalculationError {
            message: "total days worked is zero".to_string(),
        });
    }
    if total_remuneration <= Decimal::ZERO {
        return Err(EngineError::CalculationError {
            message: "total computable remuneration is zero".to_string(),
        });
    }

    Ok(ProfitSharingPool {
        fiscal_year,
        amount,
        total_days,
        total_remuneration,
    })
}

/// Share of `half` proportional to `part / whole`.
///
/// Divides first when `half × part` alone would overflow.
fn proportional(half: Decimal, part: Decimal, whole: Decimal, what: &str) -> EngineResult<Decimal> {
    let share = match half.checked_mul(part) {
        Some(product) => checked::div(product, whole, what)?,
        None => checked::mul(checked::div(part, whole, what)?, half, what)?,
    };
    Ok(round_cents(share))
}

/// Calculates one worker's share of a pool.
///
/// # Errors
///
/// Returns `CalculationError` naming the worker when an amount is out of range.
pub fn calculate_share(
    employee: ProfitSharingEmployee,
    pool: &ProfitSharingPool,
) -> EngineResult<ProfitShare> {
    let half = pool.amount / Decimal::TWO;
    let amounts = proportional(half, employee.days_worked, pool.total_days, "share by days")
        .and_then(|by_days| {
            let by_remuneration = proportional(
                half,
                employee.remuneration,
                pool.total_remuneration,
                "share by remuneration",
            )?;
            let total = checked::add(by_days, by_remuneration, "total share")?;
            let net = checked::sub(total, employee.withholding, "net share")?;
            Ok((by_days, by_remuneration, total, net))
        });
    let (by_days, by_remuneration, total, net) = amounts.map_err(|e| match e {
        EngineError::CalculationError { message } => EngineError::CalculationError {
            message: format!("{}: {}", employee.name, message),
        },
        other => other,
    })?;

    Ok(ProfitShare {
        net_words: amount_to_words(net),
        employee,
        by_days,
        by_remuneration,
        total,
        net,
    })
}

/// Distributes a participation amount across all workers.
///
/// # Example
///
/// ```
/// use planilla_engine::calculation::distribute_profit_sharing;
/// use planilla_engine::models::ProfitSharingEmployee;
/// use rust_decimal::Decimal;
///
/// let worker = |dni: &str, days: i64, pay: i64| ProfitSharingEmployee {
///     dni: dni.to_string(),
///     name: format!("WORKER {}", dni),
///     position: None,
///     days_worked: Decimal::from(days),
///     remuneration: Decimal::from(pay),
///     withholding: Decimal::ZERO,
/// };
///
/// let (pool, shares) = distribute_profit_sharing(
///     vec![worker("1", 360, 30_000), worker("2", 360, 10_000)],
///     Decimal::from(10_000),
///     2023,
/// )
/// .unwrap();
///
/// assert_eq!(pool.total_days, Decimal::from(720));
/// assert_eq!(shares[0].total, Decimal::from(6_250));
/// assert_eq!(shares[1].total, Decimal::from(3_750));
/// ```
pub fn distribute_profit_sharing(
    employees: Vec<ProfitSharingEmployee>,
    amount: Decimal,
    fiscal_year: i32,
) -> EngineResult<(ProfitSharingPool, Vec<ProfitShare>)> {
    let pool = build_pool(&employees, amount, fiscal_year)?;
    let shares = employees
        .into_iter()
        .map(|employee| calculate_share(employee, &pool))
        .collect::<EngineResult<Vec<_>>>()?;
    Ok((pool, shares))
}
