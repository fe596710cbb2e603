//! Input validation for request data.
//!
//! Phone numbers arrive as the bot stores them (E.164-ish, with or without
//! the leading plus). Target prices arrive as form text and must be exact
//! decimals; parsing goes through `rust_decimal` so "19.99" means 19.99 and
//! not whatever f64 parsing makes of malformed input.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

lazy_static! {
    /// Regex for validating phone numbers as the bot records them
    static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9]{7,15}$").unwrap();
}

/// Validate a phone number
pub fn validate_phone(phone: &str) -> Result<(), String> {
    if phone.is_empty() {
        return Err("Phone number is required".to_string());
    }

    if !PHONE_REGEX.is_match(phone) {
        return Err(
            "Invalid phone number. Use digits only, optionally prefixed with '+'".to_string(),
        );
    }

    Ok(())
}

/// Parse a submitted target price.
///
/// Accepts non-negative decimals with at most 2 fraction digits and returns
/// the value for storage. Anything else is rejected without touching the row.
pub fn parse_target_price(input: &str) -> Result<f64, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Target price is required".to_string());
    }

    let value: Decimal = trimmed
        .parse()
        .map_err(|_| "Target price must be a number like 19.99".to_string())?;

    if value.is_sign_negative() {
        return Err("Target price cannot be negative".to_string());
    }

    // normalize() drops trailing zeros so "19.990" still counts as 2 digits
    if value.normalize().scale() > 2 {
        return Err("Target price can have at most 2 decimal places".to_string());
    }

    value
        .to_f64()
        .ok_or_else(|| "Target price is out of range".to_string())
}
