//! Currency helpers shared by the ledger.
//!
//! Amounts are `f64` Turkish Lira. Anything produced by arithmetic is rounded
//! to kuruş (two decimals) before it is stored or compared.

use crate::errors::{Error, Result};

/// Rounds to two decimal places (half away from zero).
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Gross amount of an invoice: `net * (1 + vat_rate / 100)`, rounded.
#[must_use]
pub fn gross_from_net(amount_net: f64, vat_rate: f64) -> f64 {
    round2(amount_net * (1.0 + vat_rate / 100.0))
}

/// Price of a package after its discount, rounded.
#[must_use]
pub fn discounted_price(list_price: f64, discount_percent: f64) -> f64 {
    round2(list_price * (1.0 - discount_percent / 100.0))
}

/// Rejects negative and non-finite amounts. Zero is allowed.
pub fn ensure_non_negative(amount: f64) -> Result<f64> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(amount)
}

/// Rejects zero, negative and non-finite amounts.
pub fn ensure_positive(amount: f64) -> Result<f64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(amount)
}

/// Rejects percentages outside `0..=100` (and NaN).
pub fn ensure_percentage(percentage: f64) -> Result<f64> {
    if !(0.0..=100.0).contains(&percentage) {
        return Err(Error::InvalidPercentage { percentage });
    }
    Ok(percentage)
}

/// Rejects day-of-month values outside `1..=31`.
pub fn ensure_day_of_month(field: &str, day: i32) -> Result<i32> {
    if !(1..=31).contains(&day) {
        return Err(Error::validation(format!(
            "{field} must be between 1 and 31, got {day}"
        )));
    }
    Ok(day)
}
