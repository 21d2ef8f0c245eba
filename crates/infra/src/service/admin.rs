use std::sync::{Arc, OnceLock};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use lostfound_auth::{
    Admin, AdminCredentials, AdminIdentity, CredentialVerifier, Hs256TokenCodec,
};
use lostfound_core::AdminId;

use super::{ServiceError, ServiceResult};
use crate::store::AdminStore;

/// A successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub admin: AdminIdentity,
}

/// Password hashed on first use; unknown usernames are verified against it.
const DECOY_PASSWORD: &str = "lostfound-decoy-password";

/// Single-admin provisioning and login.
#[derive(Clone)]
pub struct AdminService {
    admins: Arc<dyn AdminStore>,
    verifier: Arc<dyn CredentialVerifier>,
    tokens: Arc<Hs256TokenCodec>,
    decoy_credential: Arc<OnceLock<String>>,
}

impl AdminService {
    pub fn new(
        admins: Arc<dyn AdminStore>,
        verifier: Arc<dyn CredentialVerifier>,
        tokens: Arc<Hs256TokenCodec>,
    ) -> Self {
        Self {
            admins,
            verifier,
            tokens,
            decoy_credential: Arc::new(OnceLock::new()),
        }
    }

    pub async fn admin_exists(&self) -> ServiceResult<bool> {
        Ok(self.admins.exists().await?)
    }

    /// Register the one and only admin.
    pub async fn register(&self, credentials: AdminCredentials) -> ServiceResult<AdminIdentity> {
        credentials.validate()?;

        // Fast path; the store repeats the check atomically with the insert.
        if self.admins.exists().await? {
            warn!("admin registration refused: an admin already exists");
            return Err(ServiceError::AlreadyExists(
                "an admin is already registered".to_string(),
            ));
        }

        let admin = Admin {
            id: AdminId::new(),
            username: credentials.normalized_username().to_string(),
            password_credential: self.verifier.hash(&credentials.password)?,
            created_at: Utc::now(),
        };
        let admin = self.admins.create_if_absent(admin).await?;

        info!(admin_id = %admin.id, username = %admin.username, "admin registered");
        Ok(admin.identity())
    }

    /// Verify credentials and issue a token.
    ///
    /// Unknown usernames and wrong passwords fail identically, and both pay for
    /// one password verification.
    pub async fn login(&self, credentials: AdminCredentials) -> ServiceResult<AdminSession> {
        if credentials.validate().is_err() {
            return Err(ServiceError::InvalidCredentials);
        }

        let Some(admin) = self
            .admins
            .find_by_username(credentials.normalized_username())
            .await?
        else {
            let decoy = self.decoy_credential()?;
            let _ = self.verifier.verify(&credentials.password, decoy)?;
            warn!("admin login failed");
            return Err(ServiceError::InvalidCredentials);
        };

        if !self
            .verifier
            .verify(&credentials.password, &admin.password_credential)?
        {
            warn!("admin login failed");
            return Err(ServiceError::InvalidCredentials);
        }

        let identity = admin.identity();
        let issued = self.tokens.issue(&identity, Utc::now())?;

        info!(admin_id = %identity.id, "admin logged in");
        Ok(AdminSession {
            token: issued.token,
            expires_at: issued.expires_at,
            admin: identity,
        })
    }

    fn decoy_credential(&self) -> ServiceResult<&str> {
        if let Some(decoy) = self.decoy_credential.get() {
            return Ok(decoy);
        }
        let hashed = self.verifier.hash(DECOY_PASSWORD)?;
        Ok(self.decoy_credential.get_or_init(|| hashed))
    }
}
