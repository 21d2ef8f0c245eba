//! Application services: run lifecycle decisions against the stores.
//!
//! ```text
//! request
//!   ↓
//! 1. Load item (and claim) from the stores
//!   ↓
//! 2. Decide (pure lifecycle engine, produces a plan)
//!   ↓
//! 3. Conditional write (compare-and-swap on the observed item status, and on
//!    the claim's status when a claim is involved; both land or neither does)
//! ```

pub mod access_gate;
pub mod admin;
pub mod lifecycle;

use thiserror::Error;

use lostfound_auth::{CredentialError, TokenError};
use lostfound_core::DomainError;
use lostfound_items::lifecycle::{stale_claim, stale_status};

use crate::store::StoreError;

pub use access_gate::AccessGate;
pub use admin::{AdminService, AdminSession};
pub use lifecycle::{Approval, ClaimSubmission, LifecycleService, Rejection};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("unauthenticated")]
    Unauthenticated,

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    /// Persistence or crypto backend failure. Never retried here.
    #[error("infrastructure failure: {0}")]
    Infrastructure(String),
}

impl ServiceError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "validation_error",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::Conflict(_) => "conflict",
            ServiceError::Unauthenticated => "unauthenticated",
            ServiceError::AlreadyExists(_) => "already_exists",
            ServiceError::InvalidCredentials => "invalid_credentials",
            ServiceError::Infrastructure(_) => "infrastructure_error",
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => ServiceError::Validation(msg),
            DomainError::InvalidId(msg) => ServiceError::Validation(msg),
            DomainError::NotFound(msg) => ServiceError::NotFound(msg),
            DomainError::Conflict(msg) => ServiceError::Conflict(msg),
            DomainError::Unauthenticated => ServiceError::Unauthenticated,
            DomainError::AlreadyExists(msg) => ServiceError::AlreadyExists(msg),
            DomainError::InvalidCredentials => ServiceError::InvalidCredentials,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(msg) => ServiceError::NotFound(msg),
            StoreError::StaleStatus { expected, actual } => stale_status(expected, actual).into(),
            StoreError::StaleClaim {
                claim_id, actual, ..
            } => stale_claim(claim_id, actual).into(),
            StoreError::AlreadyExists(msg) => ServiceError::AlreadyExists(msg),
            StoreError::Invalid(msg) => ServiceError::Validation(msg),
            StoreError::Backend(msg) => ServiceError::Infrastructure(msg),
        }
    }
}

impl From<CredentialError> for ServiceError {
    fn from(value: CredentialError) -> Self {
        ServiceError::Infrastructure(value.to_string())
    }
}

impl From<TokenError> for ServiceError {
    fn from(value: TokenError) -> Self {
        match value {
            TokenError::Signing(msg) => ServiceError::Infrastructure(msg),
            _ => ServiceError::Unauthenticated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lostfound_items::ItemStatus;

    #[test]
    fn stale_writes_surface_as_conflicts() {
        let err: ServiceError = StoreError::StaleStatus {
            expected: ItemStatus::Pending,
            actual: ItemStatus::Returned,
        }
        .into();
        assert_eq!(err, ServiceError::Conflict("item already resolved".to_string()));
        assert_eq!(err.code(), "conflict");
    }

    #[test]
    fn reviewed_claims_surface_as_conflicts() {
        let claim_id = lostfound_core::ClaimId::new();
        let err: ServiceError = StoreError::StaleClaim {
            claim_id,
            expected: lostfound_items::ClaimStatus::Pending,
            actual: lostfound_items::ClaimStatus::Rejected,
        }
        .into();
        assert_eq!(
            err,
            ServiceError::Conflict(format!("claim {claim_id} is already Rejected"))
        );
    }

    #[test]
    fn malformed_ids_are_validation_errors() {
        let err: ServiceError = DomainError::invalid_id("ItemId: bad").into();
        assert_eq!(err.code(), "validation_error");
    }

    #[test]
    fn token_failures_are_unauthenticated() {
        assert_eq!(ServiceError::from(TokenError::Expired), ServiceError::Unauthenticated);
        assert_eq!(
            ServiceError::from(TokenError::Signing("x".into())).code(),
            "infrastructure_error"
        );
    }
}
