//! Persistence boundary for items, claims and the administrator.
//!
//! The lifecycle engine decides; stores only persist. The one rule stores
//! enforce themselves is compare-and-swap: a status write carries the status
//! it was decided against and must fail if the stored record has moved on.
//! Claim writes always travel with the item write they belong to, and the
//! pair is applied atomically or not at all.

pub mod in_memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use lostfound_auth::Admin;
use lostfound_core::{AdminId, ClaimId, ItemId};
use lostfound_items::lifecycle::latest_pending_claim;
use lostfound_items::{
    Claim, ClaimStatus, ClaimStatusChange, Item, ItemFilter, ItemStatus, Provenance, StatusChange,
};

pub use in_memory::{InMemoryAdminStore, InMemoryClaimStore, InMemoryItemStore};
pub use postgres::{PostgresAdminStore, PostgresClaimStore, PostgresItemStore};

/// Errors returned by store adapters.
///
/// - **NotFound**: the referenced record does not exist
/// - **StaleStatus**: conditional item status write lost against a concurrent change
/// - **StaleClaim**: the claim was reviewed concurrently and is no longer at the expected status
/// - **AlreadyExists**: a uniqueness rule rejected the insert (second admin)
/// - **Invalid**: the write itself was malformed (e.g. provenance without Returned)
/// - **Backend**: connectivity, pool or driver failure
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("status precondition failed (expected {expected}, found {actual})")]
    StaleStatus {
        expected: ItemStatus,
        actual: ItemStatus,
    },

    #[error("claim {claim_id} precondition failed (expected {expected}, found {actual})")]
    StaleClaim {
        claim_id: ClaimId,
        expected: ClaimStatus,
        actual: ClaimStatus,
    },

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("invalid write: {0}")]
    Invalid(String),

    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub(crate) fn poisoned() -> Self {
        StoreError::Backend("in-memory store lock poisoned".to_string())
    }
}

#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn create(&self, item: Item) -> Result<Item, StoreError>;

    async fn get(&self, id: ItemId) -> Result<Item, StoreError>;

    /// Matching items, newest first (created_at desc, then id desc).
    async fn list(&self, filter: &ItemFilter) -> Result<Vec<Item>, StoreError>;

    /// Apply `change` only if the stored status still equals `change.expected`.
    ///
    /// `provenance` is written in the same step; it must be present exactly
    /// when `change.next` is Returned.
    async fn update_status_conditional(
        &self,
        change: StatusChange,
        provenance: Option<Provenance>,
    ) -> Result<Item, StoreError>;
}

#[async_trait]
pub trait ClaimStore: Send + Sync {
    async fn get(&self, id: ClaimId) -> Result<Claim, StoreError>;

    /// All claims for an item, newest first.
    async fn list_for_item(&self, item_id: ItemId) -> Result<Vec<Claim>, StoreError>;

    /// Most recent claim for an item by (created_at, id), regardless of status.
    async fn latest_for_item(&self, item_id: ItemId) -> Result<Option<Claim>, StoreError>;

    /// Apply `change` to the item and insert `claim`, as one atomic write.
    async fn open(&self, change: StatusChange, claim: Claim) -> Result<(Item, Claim), StoreError>;

    /// Apply `change` to the item and `review` to one of its claims, as one atomic write.
    ///
    /// Nothing is written unless both preconditions hold.
    async fn review(
        &self,
        change: StatusChange,
        provenance: Option<Provenance>,
        review: Option<ClaimStatusChange>,
    ) -> Result<(Item, Option<Claim>), StoreError>;

    /// Most recent claim for an item that is still Pending.
    async fn latest_pending_for_item(&self, item_id: ItemId) -> Result<Option<Claim>, StoreError> {
        let claims = self.list_for_item(item_id).await?;
        Ok(latest_pending_claim(&claims).cloned())
    }
}

#[async_trait]
pub trait AdminStore: Send + Sync {
    async fn exists(&self) -> Result<bool, StoreError>;

    /// Insert `admin` unless an admin already exists; the check and the insert are atomic.
    async fn create_if_absent(&self, admin: Admin) -> Result<Admin, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<Admin>, StoreError>;

    async fn get(&self, id: AdminId) -> Result<Option<Admin>, StoreError>;
}
