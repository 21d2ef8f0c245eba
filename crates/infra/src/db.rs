//! Database wiring: connection pool and schema bootstrap.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::store::StoreError;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS items (
    id               UUID PRIMARY KEY,
    name             TEXT NOT NULL,
    description      TEXT NOT NULL,
    category         TEXT NOT NULL,
    location         TEXT NOT NULL,
    image_url        TEXT NOT NULL,
    status           TEXT NOT NULL CHECK (status IN ('Lost', 'Found', 'Pending', 'Returned')),
    reported_as      TEXT NOT NULL CHECK (reported_as IN ('Lost', 'Found')),
    reporter_name    TEXT NOT NULL,
    reporter_contact TEXT NOT NULL,
    sender_name      TEXT,
    recipient_name   TEXT,
    returned_at      TIMESTAMPTZ,
    created_at       TIMESTAMPTZ NOT NULL,
    CONSTRAINT items_provenance_iff_returned CHECK (
        (status = 'Returned')
            = (sender_name IS NOT NULL AND recipient_name IS NOT NULL AND returned_at IS NOT NULL)
    )
);

CREATE INDEX IF NOT EXISTS items_created_idx ON items (created_at DESC, id DESC);

CREATE TABLE IF NOT EXISTS claims (
    id                 UUID PRIMARY KEY,
    item_id            UUID NOT NULL REFERENCES items (id),
    claimer_name       TEXT NOT NULL,
    claimer_contact    TEXT NOT NULL,
    proof_of_ownership TEXT NOT NULL,
    status             TEXT NOT NULL CHECK (status IN ('Pending', 'Approved', 'Rejected')),
    created_at         TIMESTAMPTZ NOT NULL
);

CREATE INDEX IF NOT EXISTS claims_item_recency_idx ON claims (item_id, created_at DESC, id DESC);

CREATE UNIQUE INDEX IF NOT EXISTS claims_one_approved_per_item
    ON claims (item_id) WHERE status = 'Approved';

CREATE TABLE IF NOT EXISTS admins (
    id                  UUID PRIMARY KEY,
    singleton           BOOLEAN NOT NULL DEFAULT TRUE UNIQUE CHECK (singleton),
    username            TEXT NOT NULL UNIQUE,
    password_credential TEXT NOT NULL,
    created_at          TIMESTAMPTZ NOT NULL
);
"#;

/// Open a connection pool.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, StoreError> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|e| StoreError::Backend(format!("failed to connect to database: {e}")))
}

/// Create tables and indexes if they do not exist yet.
pub async fn bootstrap_schema(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::raw_sql(SCHEMA)
        .execute(pool)
        .await
        .map_err(|e| StoreError::Backend(format!("schema bootstrap failed: {e}")))?;

    info!("database schema ready");
    Ok(())
}
