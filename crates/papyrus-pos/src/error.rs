//! # Service Error Type
//!
//! Unified error envelope for session and report operations.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Error Flow in Papyrus POS                             │
//! │                                                                         │
//! │  Caller                      Service Layer                              │
//! │  ──────                      ─────────────                              │
//! │                                                                         │
//! │  session.checkout()                                                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Result<T, ServiceError>                                         │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Core error?  ── CoreError::InsufficientStock ──┐               │  │
//! │  │         │                                       │               │  │
//! │  │         ▼                                       ▼               │  │
//! │  │  Db error?    ── DbError::StockConflict ──── ServiceError ────► │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────► │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "code": "INSUFFICIENT_STOCK", "message": "..." }                    │
//! │  is_retryable() tells the caller whether retrying the same request     │
//! │  can succeed (transient persistence failures) or not (validation).     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use papyrus_core::CoreError;
use papyrus_db::DbError;

/// Service error returned from session and report operations.
///
/// ## Serialization
/// This is what a caller receives when an operation fails:
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Article not found: PRO-0042"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for service responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Stock bound would be violated
    InsufficientStock,

    /// Cart operation failed (e.g. checkout on an empty cart)
    CartError,

    /// Persistence operation failed
    DatabaseError,

    /// Internal error
    Internal,
}

impl ServiceError {
    /// Creates a new service error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ServiceError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ServiceError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ServiceError::new(ErrorCode::Internal, message)
    }

    /// Whether retrying the same request can succeed.
    ///
    /// Persistence failures are transient: the cart survives a failed
    /// checkout precisely so the operator can retry. Validation and
    /// stock errors need a changed request first.
    pub fn is_retryable(&self) -> bool {
        matches!(self.code, ErrorCode::DatabaseError)
    }
}

/// Converts core errors to service errors.
impl From<CoreError> for ServiceError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ArticleNotFound(id) => ServiceError::not_found("Article", &id),
            CoreError::InvoiceNotFound(id) => ServiceError::not_found("Invoice", &id),
            CoreError::InsufficientStock {
                code,
                available,
                requested,
            } => ServiceError::new(
                ErrorCode::InsufficientStock,
                format!(
                    "Insufficient stock for {}: {} available, {} requested",
                    code, available, requested
                ),
            ),
            CoreError::EmptyCart => ServiceError::new(
                ErrorCode::CartError,
                "Cannot build an invoice from an empty cart",
            ),
            CoreError::Validation(e) => ServiceError::validation(e.to_string()),
        }
    }
}

/// Converts database errors to service errors.
impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ServiceError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ServiceError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::StockConflict {
                article_id,
                requested,
            } => ServiceError::new(
                ErrorCode::InsufficientStock,
                format!(
                    "Insufficient stock for article {}: requested {}",
                    article_id, requested
                ),
            ),
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ServiceError::new(ErrorCode::ValidationError, "Invalid reference")
            }
            DbError::ConnectionFailed(_) => {
                ServiceError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ServiceError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ServiceError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ServiceError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::PoolExhausted => {
                ServiceError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ServiceError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ServiceError {}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_mapping() {
        let err: ServiceError = CoreError::InsufficientStock {
            code: "PRO-0001".to_string(),
            available: 1,
            requested: 2,
        }
        .into();

        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_stock_conflict_maps_to_insufficient_stock() {
        let err: ServiceError = DbError::StockConflict {
            article_id: "a1".to_string(),
            requested: 5,
        }
        .into();

        assert_eq!(err.code, ErrorCode::InsufficientStock);
    }

    #[test]
    fn test_persistence_failures_are_retryable() {
        let err: ServiceError = DbError::PoolExhausted.into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(err.is_retryable());

        let err: ServiceError = CoreError::EmptyCart.into();
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_serialized_shape() {
        let err = ServiceError::not_found("Article", "PRO-0042");
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Article not found: PRO-0042");
    }
}
