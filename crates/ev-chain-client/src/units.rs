//! Scaling between human token amounts and base units.

use alloy_primitives::U256;

use crate::ChainError;

// 10^77 is the largest power of ten below 2^256.
const MAX_DECIMALS: u8 = 77;

fn unit(decimals: u8) -> Result<U256, ChainError> {
    if decimals > MAX_DECIMALS {
        return Err(ChainError::InvalidResponse(format!("unsupported token decimals: {decimals}")));
    }
    Ok(U256::from(10u64).pow(U256::from(decimals)))
}

/// Formats base units as a decimal string with at least one fractional digit
/// (`1500000000000000000` at 18 decimals → `"1.5"`).
pub fn format_units(value: U256, decimals: u8) -> Result<String, ChainError> {
    let base = unit(decimals)?;
    let whole = value / base;
    let fraction = value % base;

    let mut digits = fraction.to_string();
    while digits.len() < decimals as usize {
        digits.insert(0, '0');
    }
    let trimmed = digits.trim_end_matches('0');
    let fraction = if trimmed.is_empty() { "0" } else { trimmed };

    Ok(format!("{whole}.{fraction}"))
}

/// Parses a non-negative decimal amount into base units.
///
/// Fractional digits beyond `decimals` are only accepted when they are zeros.
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256, ChainError> {
    let invalid = || ChainError::InvalidAmount(amount.to_owned());
    let raw = amount.trim();
    if raw.is_empty() || raw.starts_with('-') {
        return Err(invalid());
    }

    let (whole, fraction) = match raw.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (raw, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let precision = decimals as usize;
    let (kept, dropped) = if fraction.len() > precision {
        fraction.split_at(precision)
    } else {
        (fraction, "")
    };
    if dropped.chars().any(|c| c != '0') {
        return Err(invalid());
    }

    let base = unit(decimals)?;
    let whole = if whole.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(whole, 10).map_err(|_| invalid())?
    };

    let mut padded = kept.to_owned();
    while padded.len() < precision {
        padded.push('0');
    }
    let fraction = if padded.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(&padded, 10).map_err(|_| invalid())?
    };

    whole
        .checked_mul(base)
        .and_then(|scaled| scaled.checked_add(fraction))
        .ok_or_else(invalid)
}
