//! Infrastructure layer: stores, services, access gate, config.

pub mod config;
pub mod db;
pub mod service;
pub mod store;

pub use config::{Config, ConfigError};
pub use service::{
    AccessGate, AdminService, AdminSession, Approval, ClaimSubmission, LifecycleService, Rejection,
    ServiceError, ServiceResult,
};
pub use store::{AdminStore, ClaimStore, ItemStore, StoreError};
