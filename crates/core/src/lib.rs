//! `lostfound-core`: shared domain primitives.
//!
//! This crate contains **pure domain** building blocks (no infrastructure concerns):
//! strongly-typed identifiers, the domain error taxonomy and the `Entity` trait.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::{Entity, most_recent, sort_newest_first};
pub use error::{DomainError, DomainResult};
pub use id::{AdminId, ClaimId, ItemId};
