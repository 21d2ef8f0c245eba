//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is a deterministic business outcome that callers can match on.
/// Persistence/connectivity failures are not represented here; they belong to
/// the infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required field was missing, blank or malformed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier could not be parsed.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The referenced item/claim/admin does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A status precondition failed (concurrent transition or already-resolved item).
    #[error("conflict: {0}")]
    Conflict(String),

    /// No valid administrator identity could be resolved for the caller.
    #[error("unauthenticated")]
    Unauthenticated,

    /// A uniqueness rule was violated (e.g. a second administrator).
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Login failed. Deliberately carries no detail about which part was wrong.
    #[error("invalid credentials")]
    InvalidCredentials,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn already_exists(msg: impl Into<String>) -> Self {
        Self::AlreadyExists(msg.into())
    }

    /// Reject a blank (empty or whitespace-only) mandatory field.
    pub fn require_non_blank(field: &str, value: &str) -> DomainResult<()> {
        if value.trim().is_empty() {
            return Err(Self::validation(format!("{field} cannot be empty")));
        }
        Ok(())
    }
}
