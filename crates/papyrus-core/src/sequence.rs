//! # Sequential Business Identifiers
//!
//! Article codes and invoice numbers share one parse-and-increment scheme:
//! a fixed prefix, a dash, and a zero-padded numeric suffix.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 Sequential Identifier Scheme                            │
//! │                                                                         │
//! │  Article codes:    PRO-0001, PRO-0002, ...        (4-digit suffix)     │
//! │  Invoice numbers:  FAC-0000001, FAC-0000002, ...  (7-digit suffix)     │
//! │                                                                         │
//! │  last = "FAC-0000042"                                                  │
//! │       │                                                                 │
//! │       ▼  split on '-', parse suffix, increment, re-pad                 │
//! │  next = "FAC-0000043"                                                  │
//! │                                                                         │
//! │  last = None (no prior record)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  next = "FAC-0000001"                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency Caveat
//! A value computed from the last *seen* record is advisory only: two
//! sessions can compute the same "next" number. Invoice numbers are
//! therefore assigned by the persistence layer inside the creating
//! transaction; this module is the single place the arithmetic lives.

use crate::error::ValidationError;

/// Prefix for article business codes.
pub const ARTICLE_CODE_PREFIX: &str = "PRO";

/// Zero-padded width of the article code suffix.
pub const ARTICLE_CODE_WIDTH: usize = 4;

/// Prefix for invoice numbers.
pub const INVOICE_NUMBER_PREFIX: &str = "FAC";

/// Zero-padded width of the invoice number suffix.
pub const INVOICE_NUMBER_WIDTH: usize = 7;

/// Computes the next identifier in a `PREFIX-NNNN` sequence.
///
/// ## Arguments
/// * `prefix` - Expected prefix (e.g. `"PRO"`)
/// * `width` - Zero-pad width of the numeric suffix
/// * `last` - The most recent identifier, or `None` when no record exists
///
/// ## Errors
/// `ValidationError::InvalidFormat` when `last` doesn't carry the expected
/// prefix or a parseable numeric suffix.
pub fn next_in_sequence(
    prefix: &str,
    width: usize,
    last: Option<&str>,
) -> Result<String, ValidationError> {
    let next = match last {
        None => 1,
        Some(value) => parse_sequence(prefix, value)? + 1,
    };

    Ok(format!("{}-{:0width$}", prefix, next, width = width))
}

/// Extracts the numeric suffix of a sequential identifier.
pub fn parse_sequence(prefix: &str, value: &str) -> Result<u64, ValidationError> {
    let suffix = value
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('-'))
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: format!("expected prefix '{}-', got '{}'", prefix, value),
        })?;

    suffix
        .parse::<u64>()
        .map_err(|_| ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: format!("non-numeric suffix in '{}'", value),
        })
}

/// Next article code: `PRO-0001` when no article exists.
pub fn next_article_code(last: Option<&str>) -> Result<String, ValidationError> {
    next_in_sequence(ARTICLE_CODE_PREFIX, ARTICLE_CODE_WIDTH, last)
}

/// Next invoice number: `FAC-0000001` when no invoice exists.
pub fn next_invoice_number(last: Option<&str>) -> Result<String, ValidationError> {
    next_in_sequence(INVOICE_NUMBER_PREFIX, INVOICE_NUMBER_WIDTH, last)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_article_code() {
        assert_eq!(next_article_code(None).unwrap(), "PRO-0001");
    }

    #[test]
    fn test_first_invoice_number() {
        assert_eq!(next_invoice_number(None).unwrap(), "FAC-0000001");
    }

    #[test]
    fn test_increment_invoice_number() {
        assert_eq!(
            next_invoice_number(Some("FAC-0000042")).unwrap(),
            "FAC-0000043"
        );
    }

    #[test]
    fn test_increment_article_code() {
        assert_eq!(next_article_code(Some("PRO-0009")).unwrap(), "PRO-0010");
    }

    #[test]
    fn test_width_grows_past_padding() {
        // A suffix that outgrows its padding keeps incrementing
        assert_eq!(next_article_code(Some("PRO-9999")).unwrap(), "PRO-10000");
    }

    #[test]
    fn test_wrong_prefix_rejected() {
        assert!(next_invoice_number(Some("PRO-0001")).is_err());
    }

    #[test]
    fn test_malformed_suffix_rejected() {
        assert!(next_article_code(Some("PRO-00x1")).is_err());
        assert!(next_article_code(Some("PRO")).is_err());
        assert!(next_article_code(Some("")).is_err());
    }
}
