//! Amount-in-words conversion for payslips and certificates.
//!
//! Peruvian payroll documents print the net amount in Spanish words,
//! e.g. `MIL DOSCIENTOS TREINTA Y CUATRO CON 50/100 SOLES`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

const UNITS: [&str; 30] = [
    "",
    "UNO",
    "DOS",
    "TRES",
    "CUATRO",
    "CINCO",
    "SEIS",
    "SIETE",
    "OCHO",
    "NUEVE",
    "DIEZ",
    "ONCE",
    "DOCE",
    "TRECE",
    "CATORCE",
    "QUINCE",
    "DIECISÉIS",
    "DIECISIETE",
    "DIECIOCHO",
    "DIECINUEVE",
    "VEINTE",
    "VEINTIUNO",
    "VEINTIDÓS",
    "VEINTITRÉS",
    "VEINTICUATRO",
    "VEINTICINCO",
    "VEINTISÉIS",
    "VEINTISIETE",
    "VEINTIOCHO",
    "VEINTINUEVE",
];

const TENS: [&str; 10] = [
    "", "", "", "TREINTA", "CUARENTA", "CINCUENTA", "SESENTA", "SETENTA", "OCHENTA", "NOVENTA",
];

const HUNDREDS: [&str; 10] = [
    "",
    "CIENTO",
    "DOSCIENTOS",
    "TRESCIENTOS",
    "CUATROCIENTOS",
    "QUINIENTOS",
    "SEISCIENTOS",
    "SETECIENTOS",
    "OCHOCIENTOS",
    "NOVECIENTOS",
];

fn below_hundred(n: u64) -> String {
    let n = n as usize;
    if n < 30 {
        UNITS[n].to_string()
    } else if n % 10 == 0 {
        TENS[n / 10].to_string()
    } else {
        format!("{} Y {}", TENS[n / 10], UNITS[n % 10])
    }
}

fn below_thousand(n: u64) -> String {
    if n == 100 {
        return "CIEN".to_string();
    }
    let hundreds = HUNDREDS[(n / 100) as usize];
    let rest = below_hundred(n % 100);
    match (hundreds.is_empty(), rest.is_empty()) {
        (true, _) => rest,
        (false, true) => hundreds.to_string(),
        (false, false) => format!("{} {}", hundreds, rest),
    }
}

/// "UNO" shortens to "UN" before MIL / MILLONES.
fn apocopate(words: String) -> String {
    if let Some(stem) = words.strip_suffix("VEINTIUNO") {
        format!("{}VEINTIÚN", stem)
    } else if let Some(stem) = words.strip_suffix("UNO") {
        format!("{}UN", stem)
    } else {
        words
    }
}

/// Writes a non-negative integer in Spanish words, upper case.
///
/// # Examples
///
/// ```
/// use planilla_engine::calculation::integer_to_words;
///
/// assert_eq!(integer_to_words(0), "CERO");
/// assert_eq!(integer_to_words(115), "CIENTO QUINCE");
/// assert_eq!(integer_to_words(21_000), "VEINTIÚN MIL");
/// assert_eq!(integer_to_words(1_000_001), "UN MILLÓN UNO");
/// ```
pub fn integer_to_words(n: u64) -> String {
    if n == 0 {
        return "CERO".to_string();
    }

    let millions = n / 1_000_000;
    let thousands = (n % 1_000_000) / 1_000;
    let units = n % 1_000;

    let mut parts: Vec<String> = Vec::new();
    match millions {
        0 => {}
        1 => parts.push("UN MILLÓN".to_string()),
        m => parts.push(format!("{} MILLONES", apocopate(integer_to_words(m)))),
    }
    match thousands {
        0 => {}
        1 => parts.push("MIL".to_string()),
        t => parts.push(format!("{} MIL", apocopate(below_thousand(t)))),
    }
    if units > 0 {
        parts.push(below_thousand(units));
    }

    parts.join(" ")
}

/// Writes a monetary amount in words with cents as a fraction of 100.
///
/// The amount is rounded half away from zero to cents first.
///
/// # Examples
///
/// ```
/// use planilla_engine::calculation::amount_to_words;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let amount = Decimal::from_str("1234.50").unwrap();
/// assert_eq!(
///     amount_to_words(amount),
///     "MIL DOSCIENTOS TREINTA Y CUATRO CON 50/100 SOLES"
/// );
/// ```
pub fn amount_to_words(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let absolute = rounded.abs();
    let integer = absolute.trunc();
    let cents = ((absolute - integer) * Decimal::ONE_HUNDRED)
        .to_u64()
        .unwrap_or(0);

    let words = integer_to_words(integer.to_u64().unwrap_or(0));
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "MENOS "
    } else {
        ""
    };

    format!("{}{} CON {:02}/100 SOLES", sign, words, cents)
}
