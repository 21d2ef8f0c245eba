//! Admin bearer tokens (HS256 JWT).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use lostfound_core::AdminId;

use crate::AdminIdentity;

/// JWT claims carried by an admin token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Subject: the admin id.
    pub sub: AdminId,

    pub username: String,

    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,

    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

impl AdminClaims {
    /// Fails when `issued_at + ttl` is outside the representable time range.
    pub fn new(identity: &AdminIdentity, issued_at: DateTime<Utc>, ttl: Duration) -> Result<Self, TokenError> {
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenError::Signing(format!("token lifetime {ttl} is out of range")))?;
        Ok(Self {
            sub: identity.id,
            username: identity.username.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        })
    }

    pub fn identity(&self) -> AdminIdentity {
        AdminIdentity {
            id: self.sub,
            username: self.username.clone(),
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (iat is in the future)")]
    NotYetValid,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,

    #[error("token rejected: {0}")]
    Malformed(String),

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Deterministically validate token claims against `now`.
///
/// Signature checks happen in the codec; this only looks at the time window.
pub fn validate_claims(claims: &AdminClaims, now: DateTime<Utc>) -> Result<(), TokenError> {
    let now = now.timestamp();
    if claims.exp <= claims.iat {
        return Err(TokenError::InvalidTimeWindow);
    }
    if now < claims.iat {
        return Err(TokenError::NotYetValid);
    }
    if now >= claims.exp {
        return Err(TokenError::Expired);
    }
    Ok(())
}

/// Resolves a caller-presented bearer token to an admin identity.
///
/// Resolution here is purely cryptographic; confirming the admin still exists
/// is the access gate's job.
pub trait TokenResolver: Send + Sync {
    fn resolve_at(&self, token: &str, now: DateTime<Utc>) -> Result<AdminIdentity, TokenError>;

    fn resolve(&self, token: &str) -> Result<AdminIdentity, TokenError> {
        self.resolve_at(token, Utc::now())
    }
}

/// A freshly signed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// HS256 codec: signs tokens on login, verifies them at the gate.
#[derive(Clone)]
pub struct Hs256TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl Hs256TokenCodec {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, identity: &AdminIdentity, now: DateTime<Utc>) -> Result<IssuedToken, TokenError> {
        let claims = AdminClaims::new(identity, now, self.ttl)?;
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;
        Ok(IssuedToken {
            token,
            expires_at: now + self.ttl,
        })
    }

    fn decode(&self, token: &str) -> Result<AdminClaims, TokenError> {
        // Time checks are done by `validate_claims` against an explicit clock.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        decode::<AdminClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| TokenError::Malformed(e.to_string()))
    }
}

impl core::fmt::Debug for Hs256TokenCodec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256TokenCodec")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenResolver for Hs256TokenCodec {
    fn resolve_at(&self, token: &str, now: DateTime<Utc>) -> Result<AdminIdentity, TokenError> {
        let claims = self.decode(token.trim())?;
        validate_claims(&claims, now)?;
        Ok(claims.identity())
    }
}
