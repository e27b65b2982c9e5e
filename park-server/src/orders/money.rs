//! Money arithmetic using rust_decimal for precision
//!
//! All subtotal/total computation is done in `Decimal` and converted to `f64`
//! only for storage and serialization. Order totals must equal the exact sum
//! of their line subtotals, so every rounding step happens here and nowhere
//! else.

use rust_decimal::prelude::*;

use crate::utils::{AppError, AppResult};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

fn to_decimal(value: f64, field: &str) -> AppResult<Decimal> {
    Decimal::from_f64(value)
        .ok_or_else(|| AppError::validation(format!("{field} is not a representable amount: {value}")))
}

fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// quantity × unit_price, rounded to cents.
pub fn line_subtotal(unit_price: f64, quantity: i64) -> AppResult<f64> {
    let price = to_decimal(unit_price, "unit_price")?;
    let subtotal = round_money(price * Decimal::from(quantity));
    subtotal
        .to_f64()
        .ok_or_else(|| AppError::validation("subtotal overflow"))
}

/// Exact sum of line subtotals.
pub fn order_total(subtotals: &[f64]) -> AppResult<f64> {
    let mut total = Decimal::ZERO;
    for s in subtotals {
        total += to_decimal(*s, "subtotal")?;
    }
    round_money(total)
        .to_f64()
        .ok_or_else(|| AppError::validation("total overflow"))
}

/// True when two amounts agree within [`MONEY_TOLERANCE`].
pub fn amounts_match(a: f64, b: f64) -> AppResult<bool> {
    let a = to_decimal(a, "amount")?;
    let b = to_decimal(b, "amount")?;
    Ok((a - b).abs() <= MONEY_TOLERANCE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_subtotal_exact() {
        assert_eq!(line_subtotal(19.99, 3).unwrap(), 59.97);
        assert_eq!(line_subtotal(24.50, 2).unwrap(), 49.0);
        assert_eq!(line_subtotal(0.0, 5).unwrap(), 0.0);
    }

    #[test]
    fn test_order_total_is_exact_sum() {
        // The classic float trap: 0.1 + 0.2
        let total = order_total(&[0.1, 0.2]).unwrap();
        assert_eq!(total, 0.3);

        let total = order_total(&[59.97, 49.0, 12.25]).unwrap();
        assert_eq!(total, 121.22);
    }

    #[test]
    fn test_amounts_match_tolerance() {
        assert!(amounts_match(10.00, 10.00).unwrap());
        assert!(amounts_match(10.00, 10.01).unwrap());
        assert!(!amounts_match(10.00, 10.02).unwrap());
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(line_subtotal(f64::NAN, 1).is_err());
        assert!(line_subtotal(f64::INFINITY, 1).is_err());
    }
}
