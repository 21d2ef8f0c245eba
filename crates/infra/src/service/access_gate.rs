use std::sync::Arc;

use tracing::debug;

use lostfound_auth::{AdminIdentity, TokenResolver};

use super::{ServiceError, ServiceResult};
use crate::store::AdminStore;

/// Resolves a bearer token to the current admin, or refuses.
///
/// A token is accepted only if its signature and time window are valid and
/// the admin it names still exists. Stateless per call.
#[derive(Clone)]
pub struct AccessGate {
    tokens: Arc<dyn TokenResolver>,
    admins: Arc<dyn AdminStore>,
}

impl AccessGate {
    pub fn new(tokens: Arc<dyn TokenResolver>, admins: Arc<dyn AdminStore>) -> Self {
        Self { tokens, admins }
    }

    pub async fn authenticate(&self, bearer: Option<&str>) -> ServiceResult<AdminIdentity> {
        let token = bearer
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ServiceError::Unauthenticated)?;

        let claimed = self.tokens.resolve(token).map_err(|e| {
            debug!(error = %e, "bearer token rejected");
            ServiceError::Unauthenticated
        })?;

        match self.admins.get(claimed.id).await? {
            Some(admin) => Ok(admin.identity()),
            None => {
                debug!(admin_id = %claimed.id, "token names an unknown admin");
                Err(ServiceError::Unauthenticated)
            }
        }
    }
}
