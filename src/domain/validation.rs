//! Custom field rules used by `#[validate(custom(...))]`.

use std::borrow::Cow;

use rust_decimal::Decimal;
use validator::ValidationError;

use crate::config::{MONEY_INTEGER_DIGITS, MONEY_SCALE};

fn rule(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(rule("not_blank", "Name must not be blank"));
    }
    Ok(())
}

/// Whether `value` can be stored in a money column without rounding or overflow.
pub fn fits_money_column(value: &Decimal) -> bool {
    let bound = Decimal::from(10_i64.pow(MONEY_INTEGER_DIGITS));
    value.normalize().scale() <= MONEY_SCALE && value.abs() < bound
}

pub fn positive_price(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        return Err(rule("positive", "Price must be greater than zero"));
    }
    if value.normalize().scale() > MONEY_SCALE {
        return Err(rule("scale", "Price must have at most 2 decimal places"));
    }
    if !fits_money_column(value) {
        return Err(rule("max", "Price must be less than 100000000"));
    }
    Ok(())
}
