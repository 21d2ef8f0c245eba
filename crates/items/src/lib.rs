//! Lost & found domain module.
//!
//! Items, claims and the lifecycle engine that decides every status
//! transition. Implemented purely as deterministic domain logic (no IO, no
//! HTTP, no storage); callers persist the decisions through conditional writes.

pub mod claim;
pub mod item;
pub mod lifecycle;

pub use claim::{Claim, ClaimStatus, SubmitClaim};
pub use item::{Item, ItemFilter, ItemStatus, Provenance, ReportItem, ReportKind};
pub use lifecycle::{ApprovalPlan, ClaimStatusChange, RejectionPlan, StatusChange};
