//! # Validation Module
//!
//! Input validation utilities for Papyrus POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Caller (UI / session layer)                                  │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Typed contracts (Rust)                                       │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── UNIQUE constraints (code, invoice number)                         │
//! │  └── Foreign key + CHECK (units >= 0) constraints                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use papyrus_core::validation::{validate_article_code, validate_quantity};
//!
//! // Validate a business code before database insert
//! validate_article_code("PRO-0001").unwrap();
//!
//! // Validate quantity before a restock operation
//! validate_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::sequence::{parse_sequence, ARTICLE_CODE_PREFIX};
use crate::types::Customer;
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an article business code.
///
/// ## Rules
/// - Must not be empty
/// - Must carry the `PRO-` prefix with a numeric suffix
///
/// ## Example
/// ```rust
/// use papyrus_core::validation::validate_article_code;
///
/// assert!(validate_article_code("PRO-0001").is_ok());
/// assert!(validate_article_code("").is_err());
/// assert!(validate_article_code("FAC-0000001").is_err());
/// ```
pub fn validate_article_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    parse_sequence(ARTICLE_CODE_PREFIX, code)?;
    Ok(())
}

/// Validates an article name.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 200 characters
pub fn validate_article_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a barcode token.
///
/// ## Rules
/// - Must not be empty (an article with no scanned barcode stores its
///   business code here instead)
/// - Maximum 64 characters
pub fn validate_barcode(barcode: &str) -> ValidationResult<()> {
    let barcode = barcode.trim();

    if barcode.is_empty() {
        return Err(ValidationError::Required {
            field: "barcode".to_string(),
        });
    }

    if barcode.len() > 64 {
        return Err(ValidationError::TooLong {
            field: "barcode".to_string(),
            max: 64,
        });
    }

    Ok(())
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (returns all articles)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value (cart lines, restocks, withdrawals).
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in minor units.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (giveaway items)
///
/// ## Example
/// ```rust
/// use papyrus_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(3500).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Checkout Validators
// =============================================================================

/// Validates the customer fields required to finalize an invoice.
///
/// ## Rules
/// - `name` must be non-empty after trimming
/// - `tax_id` must be non-empty after trimming
///
/// The customer type needs no check: both variants are valid at checkout.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Checkout: Pay clicked                                                  │
/// │                                                                         │
/// │  Customer form: { name: "Ana", taxId: "" }                             │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_checkout_customer() ← THIS FUNCTION                          │
/// │       │                                                                 │
/// │       ├── name empty?   → Error: "customer name is required"           │
/// │       │                                                                 │
/// │       ├── tax id empty? → Error: "tax id is required"                  │
/// │       │                                                                 │
/// │       └── OK → build_draft proceeds, cart still intact                 │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_checkout_customer(customer: &Customer) -> ValidationResult<()> {
    if customer.name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "customer name".to_string(),
        });
    }

    if customer.tax_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "tax id".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Rules
/// - Must be a valid UUID format
/// - 36 characters with hyphens: xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CustomerType;

    #[test]
    fn test_validate_article_code() {
        assert!(validate_article_code("PRO-0001").is_ok());
        assert!(validate_article_code("PRO-10000").is_ok());

        assert!(validate_article_code("").is_err());
        assert!(validate_article_code("   ").is_err());
        assert!(validate_article_code("FAC-0000001").is_err());
        assert!(validate_article_code("PRO-00x1").is_err());
    }

    #[test]
    fn test_validate_article_name() {
        assert!(validate_article_name("Cuaderno rayado 100 hojas").is_ok());
        assert!(validate_article_name("").is_err());
        assert!(validate_article_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_barcode() {
        assert!(validate_barcode("7701234567890").is_ok());
        assert!(validate_barcode("PRO-0001").is_ok());
        assert!(validate_barcode("").is_err());
        assert!(validate_barcode(&"9".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(100).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(3500).is_ok());
        assert!(validate_price_cents(-100).is_err());
    }

    #[test]
    fn test_validate_search_query_trims() {
        assert_eq!(validate_search_query("  lapiz  ").unwrap(), "lapiz");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"q".repeat(200)).is_err());
    }

    #[test]
    fn test_validate_checkout_customer() {
        let complete = Customer::new("Ana", "900123", CustomerType::Normal);
        assert!(validate_checkout_customer(&complete).is_ok());

        let no_name = Customer::new("   ", "900123", CustomerType::Normal);
        assert!(validate_checkout_customer(&no_name).is_err());

        let no_tax_id = Customer::new("Ana", "", CustomerType::TaxExempt);
        assert!(validate_checkout_customer(&no_tax_id).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("not-a-uuid").is_err());
    }
}
