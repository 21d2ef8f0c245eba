use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lostfound_core::{AdminId, DomainError, DomainResult};

/// The (single) administrator account.
///
/// # Invariants
/// - At most one `Admin` exists system-wide (enforced by the store).
/// - `password_credential` is an opaque verifier string and never leaves the
///   service layer.
#[derive(Clone, PartialEq, Eq)]
pub struct Admin {
    pub id: AdminId,
    pub username: String,
    pub password_credential: String,
    pub created_at: DateTime<Utc>,
}

impl Admin {
    pub fn identity(&self) -> AdminIdentity {
        AdminIdentity {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

impl core::fmt::Debug for Admin {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Admin")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_credential", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Public identity of an authenticated administrator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdminIdentity {
    pub id: AdminId,
    pub username: String,
}

/// Username/password pair submitted for registration or login.
#[derive(Clone, Deserialize)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        DomainError::require_non_blank("username", &self.username)?;
        DomainError::require_non_blank("password", &self.password)?;
        Ok(())
    }

    /// Usernames are compared after trimming surrounding whitespace.
    pub fn normalized_username(&self) -> &str {
        self.username.trim()
    }
}

impl core::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_username_or_password_is_rejected() {
        assert_eq!(
            AdminCredentials::new("  ", "secret").validate().unwrap_err(),
            DomainError::validation("username cannot be empty")
        );
        assert_eq!(
            AdminCredentials::new("admin", "").validate().unwrap_err(),
            DomainError::validation("password cannot be empty")
        );
        assert!(AdminCredentials::new("admin", "secret").validate().is_ok());
    }

    #[test]
    fn debug_output_never_contains_secrets() {
        let creds = AdminCredentials::new("admin", "hunter2");
        assert!(!format!("{creds:?}").contains("hunter2"));

        let admin = Admin {
            id: AdminId::new(),
            username: "admin".to_string(),
            password_credential: "$argon2id$v=19$secret".to_string(),
            created_at: Utc::now(),
        };
        assert!(!format!("{admin:?}").contains("argon2id"));
        assert_eq!(admin.identity().username, "admin");
    }
}
