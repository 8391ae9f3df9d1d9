//! # Validation Module
//!
//! Input validation for ledger operations.
//!
//! Every mutator validates before touching state, and the persisted variant
//! validates before issuing the remote write, so a rejected input never
//! reaches the backend.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Add product form                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_product_name / validate_unit       ← text fields              │
//! │  validate_quantity / validate_unit_price     ← 0 ..= MAX_*              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Daily usage form                                                       │
//! │  validate_deduction                          ← must be > 0              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_QUANTITY, MAX_TOTAL_PRICE_CENTS, MAX_UNIT_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 200;
const MAX_UNIT_LEN: usize = 32;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
///
/// ## Example
/// ```rust
/// use larder_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Basmati Rice").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_text("name", name, MAX_NAME_LEN)
}

/// Validates a unit of measure ("kg", "pcs").
pub fn validate_unit(unit: &str) -> ValidationResult<()> {
    validate_text("unit", unit, MAX_UNIT_LEN)
}

fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an on-hand quantity. Zero is allowed (out of stock).
///
/// ## Rules
/// - Must be >= 0
/// - Must be <= [`MAX_QUANTITY`]
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    validate_bounded("quantity", qty, MAX_QUANTITY)
}

/// Validates a unit price. Zero is allowed (donated stock).
pub fn validate_unit_price(price: Money) -> ValidationResult<()> {
    validate_bounded("unit_price", price.cents(), MAX_UNIT_PRICE_CENTS)
}

/// Validates an explicit purchase total.
pub fn validate_total_price(total: Money) -> ValidationResult<()> {
    validate_bounded("total_price", total.cents(), MAX_TOTAL_PRICE_CENTS)
}

/// `unit_price × quantity`, rejecting a product that does not fit in cents.
///
/// ```rust
/// use larder_core::validation::line_total;
/// use larder_core::Money;
///
/// assert_eq!(line_total(Money::from_cents(250), 4), Ok(Money::from_cents(1000)));
/// assert!(line_total(Money::from_cents(4), i64::MAX / 2).is_err());
/// ```
pub fn line_total(unit_price: Money, qty: i64) -> ValidationResult<Money> {
    unit_price
        .multiply_quantity(qty)
        .ok_or_else(|| ValidationError::TooLarge {
            field: "total_price".to_string(),
            max: MAX_TOTAL_PRICE_CENTS,
        })
}

fn validate_bounded(field: &str, value: i64, max: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    if value > max {
        return Err(ValidationError::TooLarge {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a usage deduction amount.
///
/// ## Rules
/// - Must be positive (> 0). Oversized amounts are fine; the ledger clamps.
pub fn validate_deduction(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "deduction".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Date Validators
// =============================================================================

/// Parses a business date in `YYYY-MM-DD` form.
///
/// ```rust
/// use larder_core::validation::parse_business_date;
///
/// assert!(parse_business_date("2024-02-29").is_ok());
/// assert!(parse_business_date("2023-02-29").is_err());
/// ```
pub fn parse_business_date(input: &str) -> ValidationResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|e| {
        ValidationError::InvalidFormat {
            field: "business_date".to_string(),
            reason: e.to_string(),
        }
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
