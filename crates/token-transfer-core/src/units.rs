use alloy::primitives::utils::{format_units, parse_units, ParseUnits};
use alloy::primitives::U256;

use crate::error::ValidationError;

/// Parses a human-readable, non-negative decimal amount into base units.
///
/// Only ASCII digits with at most one `.` are accepted; signs, exponents and
/// `_` separators are rejected. Fractional digits beyond `decimals` are
/// truncated rather than rounded, so `"1.0000009"` with 6 decimals is
/// exactly `1.000000`.
pub fn parse_amount(raw: &str, decimals: u8) -> Result<U256, ValidationError> {
    let amount = raw.trim();
    if !amount.bytes().any(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidAmount(format!(
            "'{amount}' is not a number"
        )));
    }
    if amount.starts_with('-') {
        return Err(ValidationError::InvalidAmount(
            "amount must not be negative".to_owned(),
        ));
    }
    let well_formed = amount.bytes().all(|b| b.is_ascii_digit() || b == b'.')
        && amount.bytes().filter(|&b| b == b'.').count() <= 1;
    if !well_formed {
        return Err(ValidationError::InvalidAmount(format!(
            "'{amount}' is not a decimal number"
        )));
    }
    match parse_units(amount, decimals) {
        Ok(ParseUnits::U256(value)) => Ok(value),
        Ok(ParseUnits::I256(_)) => Err(ValidationError::InvalidAmount(
            "amount must not be negative".to_owned(),
        )),
        Err(e) => Err(ValidationError::InvalidAmount(format!("'{amount}': {e}"))),
    }
}

/// Renders base units as a decimal string with exactly `decimals` fractional digits.
pub fn format_amount(value: U256, decimals: u8) -> String {
    format_units(value, decimals).unwrap_or_else(|_| value.to_string())
}
