//! # Error Types
//!
//! Domain-specific error types for larder-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  larder-core errors (this file)                                        │
//! │  ├── CoreError        - Ledger / persistence-protocol failures         │
//! │  └── ValidationError  - Input rejected before any mutation             │
//! │                                                                         │
//! │  larder-db errors (separate crate)                                     │
//! │  └── DbError          - SQLite failures, surfaced as RemoteFailure     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError ← DbError (via RemoteFailure)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A batch usage run that skips entries is not an error: the batch completes
//! and the skipped entries show up in its [`UsageSummary`](crate::usage::UsageSummary).

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Ledger and persistence-protocol errors.
///
/// None of these are fatal. The in-memory state is left untouched whenever
/// one is returned from a single-item operation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product id is not in the ledger.
    ///
    /// Only `update` reports this; `delete` and `deduct` treat an unknown id
    /// as a no-op.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The persistence collaborator rejected or failed a write.
    ///
    /// ## User Workflow
    /// ```text
    /// Edit product ──► repository.update_product() ──► Err
    ///                                                   │
    ///                                                   ▼
    ///                         RemoteFailure (ledger unchanged, caller retries)
    /// ```
    #[error("Remote {operation} failed: {message}")]
    RemoteFailure { operation: String, message: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Wraps a persistence error raised while performing `operation`.
    pub fn remote(operation: impl Into<String>, err: impl std::fmt::Display) -> Self {
        CoreError::RemoteFailure {
            operation: operation.into(),
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any state is touched, locally or remotely.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value exceeds the ledger's numeric limit.
    #[error("{field} must be at most {max}")]
    TooLarge { field: String, max: i64 },

    /// Value must be zero or greater (quantities, prices).
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Value must be strictly greater than zero (deduction amounts).
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. a date or amount that does not parse).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g. a product id handed out twice by the backend).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
