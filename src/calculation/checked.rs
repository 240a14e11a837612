//! Overflow-checked Decimal arithmetic for amounts read from uploads.
//!
//! `Decimal` operators panic past ±7.9e28; these helpers turn that into a
//! `CalculationError` naming the quantity being computed.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};

fn out_of_range(what: &str) -> EngineError {
    EngineError::CalculationError {
        message: format!("{} is out of range", what),
    }
}

pub(crate) fn add(a: Decimal, b: Decimal, what: &str) -> EngineResult<Decimal> {
    a.checked_add(b).ok_or_else(|| out_of_range(what))
}

pub(crate) fn sub(a: Decimal, b: Decimal, what: &str) -> EngineResult<Decimal> {
    a.checked_sub(b).ok_or_else(|| out_of_range(what))
}

pub(crate) fn mul(a: Decimal, b: Decimal, what: &str) -> EngineResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| out_of_range(what))
}

pub(crate) fn div(a: Decimal, b: Decimal, what: &str) -> EngineResult<Decimal> {
    a.checked_div(b).ok_or_else(|| out_of_range(what))
}

pub(crate) fn sum<I>(values: I, what: &str) -> EngineResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |total, value| add(total, value, what))
}
