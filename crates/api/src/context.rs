use lostfound_auth::AdminIdentity;

/// Authenticated admin for a request.
///
/// Only the auth middleware inserts this, after the access gate has accepted
/// the bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminContext {
    identity: AdminIdentity,
}

impl AdminContext {
    pub fn new(identity: AdminIdentity) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> &AdminIdentity {
        &self.identity
    }
}
