use std::sync::Arc;

use anyhow::Context;

use lostfound_auth::{Argon2Verifier, CredentialVerifier, Hs256TokenCodec};
use lostfound_infra::store::{
    AdminStore, ClaimStore, InMemoryAdminStore, InMemoryClaimStore, InMemoryItemStore, ItemStore,
    PostgresAdminStore, PostgresClaimStore, PostgresItemStore,
};
use lostfound_infra::{AccessGate, AdminService, Config, LifecycleService, db};

/// Everything the handlers need.
#[derive(Clone)]
pub struct AppServices {
    pub lifecycle: LifecycleService,
    pub admin: AdminService,
    pub gate: AccessGate,
}

impl AppServices {
    /// Postgres when `DATABASE_URL` is set, otherwise in-memory stores.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        match config.database_url.as_deref() {
            Some(url) => {
                let pool = db::connect(url, config.db_max_connections)
                    .await
                    .context("failed to connect to Postgres")?;
                db::bootstrap_schema(&pool)
                    .await
                    .context("failed to bootstrap schema")?;
                tracing::info!("using Postgres stores");

                Ok(Self::assemble(
                    config,
                    Arc::new(PostgresItemStore::new(pool.clone())),
                    Arc::new(PostgresClaimStore::new(pool.clone())),
                    Arc::new(PostgresAdminStore::new(pool)),
                    Arc::new(Argon2Verifier::new()),
                ))
            }
            None => {
                tracing::warn!("DATABASE_URL not set; using in-memory stores (data is lost on restart)");
                Ok(Self::in_memory(config, Arc::new(Argon2Verifier::new())))
            }
        }
    }

    pub fn in_memory(config: &Config, verifier: Arc<dyn CredentialVerifier>) -> Self {
        let items = Arc::new(InMemoryItemStore::new());
        Self::assemble(
            config,
            items.clone(),
            Arc::new(InMemoryClaimStore::new(items)),
            Arc::new(InMemoryAdminStore::new()),
            verifier,
        )
    }

    fn assemble(
        config: &Config,
        items: Arc<dyn ItemStore>,
        claims: Arc<dyn ClaimStore>,
        admins: Arc<dyn AdminStore>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Self {
        let tokens = Arc::new(Hs256TokenCodec::new(config.jwt_secret.as_bytes(), config.token_ttl));

        Self {
            lifecycle: LifecycleService::new(items, claims, config.default_image_url.clone()),
            admin: AdminService::new(admins.clone(), verifier, tokens.clone()),
            gate: AccessGate::new(tokens, admins),
        }
    }
}
