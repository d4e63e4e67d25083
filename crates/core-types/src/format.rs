//! Pure conversions from stored values to display values.
//!
//! Amounts are persisted as integer cents. Everything in this module is
//! total over its input and has no side effects, so the same row always
//! renders the same way.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Formats an amount in integer cents as an en-US dollar string, e.g. `$1,234.56`.
pub fn format_currency(cents: i64) -> String {
    let amount = Decimal::new(cents, 2);
    let text = amount.abs().to_string();
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount.is_sign_negative() && !amount.is_zero() { "-" } else { "" };
    format!("{sign}${grouped}.{fraction}")
}

/// Converts integer cents into a dollar amount for edit forms.
pub fn cents_to_dollars(cents: i64) -> f64 {
    coerce_numeric(Decimal::new(cents, 2))
}

/// Coerces a database numeric into a plain number for charting.
pub fn coerce_numeric(value: Decimal) -> f64 {
    // Every Decimal is within f64 range; precision loss past 15 digits is acceptable here.
    value.to_f64().unwrap_or_default()
}
