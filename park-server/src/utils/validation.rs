//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so limits live here.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: ride, store, item, employee
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions (maintenance description, rain-out note)
pub const MAX_NOTE_LEN: usize = 500;

/// Opaque payment-method tokens
pub const MAX_TOKEN_LEN: usize = 100;

// ── Order bounds ────────────────────────────────────────────────────

/// Maximum allowed unit price (€1,000,000)
pub const MAX_PRICE: f64 = 1_000_000.0;

/// Maximum allowed quantity per line
pub const MAX_QUANTITY: i64 = 9999;

/// Maximum lines per order
pub const MAX_ORDER_LINES: usize = 200;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate a line quantity: positive and bounded.
pub fn validate_quantity(quantity: i64, field: &str) -> Result<(), AppError> {
    if quantity <= 0 {
        return Err(AppError::validation(format!(
            "{field} must be positive, got {quantity}"
        )));
    }
    if quantity > MAX_QUANTITY {
        return Err(AppError::validation(format!(
            "{field} exceeds maximum allowed ({MAX_QUANTITY}), got {quantity}"
        )));
    }
    Ok(())
}

/// Validate a price: finite, non-negative, bounded.
pub fn validate_price(price: f64, field: &str) -> Result<(), AppError> {
    if !price.is_finite() {
        return Err(AppError::validation(format!(
            "{field} must be a finite number, got {price}"
        )));
    }
    if price < 0.0 {
        return Err(AppError::validation(format!(
            "{field} must be non-negative, got {price}"
        )));
    }
    if price > MAX_PRICE {
        return Err(AppError::validation(format!(
            "{field} exceeds maximum allowed ({MAX_PRICE}), got {price}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text_rejects_empty() {
        assert!(validate_required_text("  ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("Splash Mountain", "name", MAX_NAME_LEN).is_ok());
    }

    #[test]
    fn test_quantity_bounds() {
        assert!(validate_quantity(0, "quantity").is_err());
        assert!(validate_quantity(-3, "quantity").is_err());
        assert!(validate_quantity(MAX_QUANTITY + 1, "quantity").is_err());
        assert!(validate_quantity(1, "quantity").is_ok());
    }

    #[test]
    fn test_price_bounds() {
        assert!(validate_price(f64::NAN, "price").is_err());
        assert!(validate_price(-0.01, "price").is_err());
        assert!(validate_price(MAX_PRICE * 2.0, "price").is_err());
        assert!(validate_price(19.99, "price").is_ok());
    }
}
