//! Password credential hashing and verification.

use argon2::password_hash::{
    self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};
use argon2::{Algorithm, Argon2, Params, Version};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("failed to hash password: {0}")]
    Hash(String),

    #[error("stored credential is malformed: {0}")]
    Malformed(String),
}

/// Pluggable password verifier.
///
/// `hash` produces an opaque credential string; `verify` checks a candidate
/// password against one. A mismatch is `Ok(false)`, not an error.
pub trait CredentialVerifier: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, CredentialError>;

    fn verify(&self, password: &str, credential: &str) -> Result<bool, CredentialError>;
}

/// Argon2id verifier producing PHC-format strings.
#[derive(Debug, Clone)]
pub struct Argon2Verifier {
    params: Params,
}

impl Argon2Verifier {
    /// Library-default Argon2id cost parameters.
    pub fn new() -> Self {
        Self {
            params: Params::default(),
        }
    }

    /// Custom cost parameters (tests use cheap ones).
    pub fn with_params(params: Params) -> Self {
        Self { params }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for Argon2Verifier {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialVerifier for Argon2Verifier {
    fn hash(&self, password: &str) -> Result<String, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| CredentialError::Hash(e.to_string()))
    }

    fn verify(&self, password: &str, credential: &str) -> Result<bool, CredentialError> {
        let parsed = PasswordHash::new(credential).map_err(|e| {
            tracing::warn!(error = %e, "stored admin credential could not be parsed");
            CredentialError::Malformed(e.to_string())
        })?;

        match self.argon2().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(CredentialError::Malformed(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> Argon2Verifier {
        Argon2Verifier::with_params(Params::new(8, 1, 1, None).unwrap())
    }

    #[test]
    fn hash_then_verify() {
        let verifier = cheap();
        let credential = verifier.hash("correct horse").unwrap();

        assert!(credential.starts_with("$argon2id$"));
        assert!(verifier.verify("correct horse", &credential).unwrap());
        assert!(!verifier.verify("battery staple", &credential).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let verifier = cheap();
        assert_ne!(verifier.hash("pw").unwrap(), verifier.hash("pw").unwrap());
    }

    #[test]
    fn malformed_credential_is_an_error() {
        let err = cheap().verify("pw", "plaintext-password").unwrap_err();
        assert!(matches!(err, CredentialError::Malformed(_)));
    }
}
