//! `lostfound-auth`: administrator identity, password credentials and admin tokens.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod admin;
pub mod credentials;
pub mod token;

pub use admin::{Admin, AdminCredentials, AdminIdentity};
pub use credentials::{Argon2Verifier, CredentialError, CredentialVerifier};
pub use token::{AdminClaims, Hs256TokenCodec, IssuedToken, TokenError, TokenResolver, validate_claims};
