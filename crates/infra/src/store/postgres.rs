//! Postgres-backed stores.
//!
//! Queries are runtime-checked (`sqlx::query`) so the crate builds without a
//! live database. The schema lives in [`crate::db`].
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError | Scenario |
//! |------------|----------------------|------------|----------|
//! | Database (unique violation) | `23505` | `AlreadyExists` | Second admin (singleton key) or duplicate id |
//! | Database (foreign key violation) | `23503` | `NotFound` | Claim against a missing item |
//! | Database (check constraint violation) | `23514` | `Invalid` | Status/provenance rule rejected by the schema |
//! | Database (other) | Any other | `Backend` | Other database errors |
//! | PoolClosed / Io / other | N/A | `Backend` | Connectivity failures |
//!
//! A conditional status update that matches no row is resolved with a second
//! read: a missing row is `NotFound`, otherwise `StaleStatus` (or `StaleClaim`)
//! with the status the database currently holds.
//!
//! Claim writes run in one transaction with the item update they accompany.
//! The item row is updated first, so concurrent reviews of the same item
//! serialize on its row lock.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::instrument;
use uuid::Uuid;

use lostfound_auth::Admin;
use lostfound_core::{AdminId, ClaimId, ItemId};
use lostfound_items::{
    Claim, ClaimStatus, ClaimStatusChange, Item, ItemFilter, ItemStatus, Provenance, ReportKind,
    StatusChange,
};

use super::{AdminStore, ClaimStore, ItemStore, StoreError};

const ITEM_COLUMNS: &str = "id, name, description, category, location, image_url, status, \
     reported_as, reporter_name, reporter_contact, sender_name, recipient_name, returned_at, created_at";

const CLAIM_COLUMNS: &str =
    "id, item_id, claimer_name, claimer_contact, proof_of_ownership, status, created_at";

const ADMIN_COLUMNS: &str = "id, username, password_credential, created_at";

// ─────────────────────────────────────────────────────────────────────────────
// Items
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct PostgresItemStore {
    pool: PgPool,
}

impl PostgresItemStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemStore for PostgresItemStore {
    #[instrument(skip(self, item), fields(item_id = %item.id), err)]
    async fn create(&self, item: Item) -> Result<Item, StoreError> {
        let (sender, recipient, returned_at) = provenance_columns(item.provenance.as_ref());

        sqlx::query(
            r#"
            INSERT INTO items (
                id, name, description, category, location, image_url, status, reported_as,
                reporter_name, reporter_contact, sender_name, recipient_name, returned_at, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(item.id.as_uuid())
        .bind(&item.name)
        .bind(&item.description)
        .bind(&item.category)
        .bind(&item.location)
        .bind(&item.image_url)
        .bind(item.status.as_str())
        .bind(item.reported_as.as_status().as_str())
        .bind(&item.reporter_name)
        .bind(&item.reporter_contact)
        .bind(sender)
        .bind(recipient)
        .bind(returned_at)
        .bind(item.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_item", e))?;

        Ok(item)
    }

    #[instrument(skip(self), fields(item_id = %id), err)]
    async fn get(&self, id: ItemId) -> Result<Item, StoreError> {
        let row = sqlx::query(&format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_item", e))?
            .ok_or_else(|| StoreError::NotFound(format!("item {id}")))?;

        item_from_row(&row)
    }

    #[instrument(skip(self), err)]
    async fn list(&self, filter: &ItemFilter) -> Result<Vec<Item>, StoreError> {
        let status = filter.status.map(|s| s.as_str());
        let category = filter
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());
        let search = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(like_pattern);

        let rows = sqlx::query(&format!(
            r#"
            SELECT {ITEM_COLUMNS} FROM items
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::text IS NULL OR lower(category) = lower($2))
              AND ($3::text IS NULL
                   OR name ILIKE $3 OR description ILIKE $3 OR location ILIKE $3)
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(status)
        .bind(category)
        .bind(search)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_items", e))?;

        rows.iter().map(item_from_row).collect()
    }

    #[instrument(
        skip(self, provenance),
        fields(item_id = %change.item_id, from = %change.expected, to = %change.next),
        err
    )]
    async fn update_status_conditional(
        &self,
        change: StatusChange,
        provenance: Option<Provenance>,
    ) -> Result<Item, StoreError> {
        let mut tx = begin(&self.pool).await?;
        let item = update_item_status(&mut tx, change, provenance.as_ref()).await?;
        commit(tx).await?;
        Ok(item)
    }
}

async fn begin(pool: &PgPool) -> Result<Transaction<'static, Postgres>, StoreError> {
    pool.begin()
        .await
        .map_err(|e| map_sqlx_error("begin_transaction", e))
}

async fn commit(tx: Transaction<'_, Postgres>) -> Result<(), StoreError> {
    tx.commit().await.map_err(|e| map_sqlx_error("commit", e))
}

/// Conditional item status write inside `tx`. On a precondition failure the
/// caller drops `tx`, which rolls it back.
async fn update_item_status(
    tx: &mut Transaction<'_, Postgres>,
    change: StatusChange,
    provenance: Option<&Provenance>,
) -> Result<Item, StoreError> {
    change
        .check_provenance(provenance)
        .map_err(|e| StoreError::Invalid(e.to_string()))?;
    let (sender, recipient, returned_at) = provenance_columns(provenance);

    let row = sqlx::query(&format!(
        r#"
        UPDATE items
        SET status = $3,
            sender_name = COALESCE($4, sender_name),
            recipient_name = COALESCE($5, recipient_name),
            returned_at = COALESCE($6, returned_at)
        WHERE id = $1 AND status = $2
        RETURNING {ITEM_COLUMNS}
        "#
    ))
    .bind(change.item_id.as_uuid())
    .bind(change.expected.as_str())
    .bind(change.next.as_str())
    .bind(sender)
    .bind(recipient)
    .bind(returned_at)
    .fetch_optional(&mut **tx)
    .await
    .map_err(|e| map_sqlx_error("update_status_conditional", e))?;

    if let Some(row) = row {
        return item_from_row(&row);
    }

    let actual: Option<String> = sqlx::query_scalar("SELECT status FROM items WHERE id = $1")
        .bind(change.item_id.as_uuid())
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("current_item_status", e))?;

    match actual {
        None => Err(StoreError::NotFound(format!("item {}", change.item_id))),
        Some(actual) => Err(StoreError::StaleStatus {
            expected: change.expected,
            actual: parse_column(ItemStatus::parse(&actual))?,
        }),
    }
}

/// Conditional claim status write inside `tx`.
async fn update_claim_status(
    tx: &mut Transaction<'_, Postgres>,
    change: ClaimStatusChange,
) -> Result<Claim, StoreError> {
    let row = sqlx::query(&format!(
        r#"
        UPDATE claims SET status = $4
        WHERE id = $1 AND item_id = $2 AND status = $3
        RETURNING {CLAIM_COLUMNS}
        "#
    ))
    .bind(change.claim_id.as_uuid())
    .bind(change.item_id.as_uuid())
    .bind(change.expected.as_str())
    .bind(change.next.as_str())
    .fetch_optional(&mut **tx)
    .await
    .map_err(|e| map_sqlx_error("update_claim_status", e))?;

    if let Some(row) = row {
        return claim_from_row(&row);
    }

    let actual: Option<String> =
        sqlx::query_scalar("SELECT status FROM claims WHERE id = $1 AND item_id = $2")
            .bind(change.claim_id.as_uuid())
            .bind(change.item_id.as_uuid())
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| map_sqlx_error("current_claim_status", e))?;

    match actual {
        None => Err(StoreError::NotFound(format!("claim {}", change.claim_id))),
        Some(actual) => Err(StoreError::StaleClaim {
            claim_id: change.claim_id,
            expected: change.expected,
            actual: parse_column(ClaimStatus::parse(&actual))?,
        }),
    }
}

fn provenance_columns(
    provenance: Option<&Provenance>,
) -> (Option<String>, Option<String>, Option<DateTime<Utc>>) {
    match provenance {
        Some(p) => (
            Some(p.sender_name.clone()),
            Some(p.recipient_name.clone()),
            Some(p.returned_at),
        ),
        None => (None, None, None),
    }
}

fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn item_from_row(row: &PgRow) -> Result<Item, StoreError> {
    let id: Uuid = get_column(row, "id")?;
    let status: String = get_column(row, "status")?;
    let reported_as: String = get_column(row, "reported_as")?;
    let sender_name: Option<String> = get_column(row, "sender_name")?;
    let recipient_name: Option<String> = get_column(row, "recipient_name")?;
    let returned_at: Option<DateTime<Utc>> = get_column(row, "returned_at")?;

    let provenance = match (sender_name, recipient_name, returned_at) {
        (Some(sender_name), Some(recipient_name), Some(returned_at)) => Some(Provenance {
            sender_name,
            recipient_name,
            returned_at,
        }),
        _ => None,
    };

    Ok(Item {
        id: ItemId::from_uuid(id),
        name: get_column(row, "name")?,
        description: get_column(row, "description")?,
        category: get_column(row, "category")?,
        location: get_column(row, "location")?,
        image_url: get_column(row, "image_url")?,
        status: parse_column(ItemStatus::parse(&status))?,
        reported_as: parse_column(ReportKind::parse(&reported_as))?,
        reporter_name: get_column(row, "reporter_name")?,
        reporter_contact: get_column(row, "reporter_contact")?,
        provenance,
        created_at: get_column(row, "created_at")?,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Claims
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct PostgresClaimStore {
    pool: PgPool,
}

impl PostgresClaimStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClaimStore for PostgresClaimStore {
    #[instrument(skip(self), fields(claim_id = %id), err)]
    async fn get(&self, id: ClaimId) -> Result<Claim, StoreError> {
        let row = sqlx::query(&format!("SELECT {CLAIM_COLUMNS} FROM claims WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_claim", e))?
            .ok_or_else(|| StoreError::NotFound(format!("claim {id}")))?;

        claim_from_row(&row)
    }

    #[instrument(skip(self), fields(item_id = %item_id), err)]
    async fn list_for_item(&self, item_id: ItemId) -> Result<Vec<Claim>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {CLAIM_COLUMNS} FROM claims WHERE item_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(item_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_claims", e))?;

        rows.iter().map(claim_from_row).collect()
    }

    #[instrument(skip(self), fields(item_id = %item_id), err)]
    async fn latest_for_item(&self, item_id: ItemId) -> Result<Option<Claim>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {CLAIM_COLUMNS} FROM claims WHERE item_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT 1"
        ))
        .bind(item_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("latest_claim", e))?;

        row.as_ref().map(claim_from_row).transpose()
    }

    #[instrument(skip(self), fields(item_id = %item_id), err)]
    async fn latest_pending_for_item(&self, item_id: ItemId) -> Result<Option<Claim>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {CLAIM_COLUMNS} FROM claims WHERE item_id = $1 AND status = 'Pending' \
             ORDER BY created_at DESC, id DESC LIMIT 1"
        ))
        .bind(item_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("latest_pending_claim", e))?;

        row.as_ref().map(claim_from_row).transpose()
    }

    #[instrument(
        skip(self, claim),
        fields(item_id = %change.item_id, claim_id = %claim.id, from = %change.expected),
        err
    )]
    async fn open(&self, change: StatusChange, claim: Claim) -> Result<(Item, Claim), StoreError> {
        if claim.item_id != change.item_id {
            return Err(StoreError::Invalid(format!(
                "claim {} does not belong to item {}",
                claim.id, change.item_id
            )));
        }

        let mut tx = begin(&self.pool).await?;
        let item = update_item_status(&mut tx, change, None).await?;

        sqlx::query(
            r#"
            INSERT INTO claims (
                id, item_id, claimer_name, claimer_contact, proof_of_ownership, status, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(claim.id.as_uuid())
        .bind(claim.item_id.as_uuid())
        .bind(&claim.claimer_name)
        .bind(&claim.claimer_contact)
        .bind(&claim.proof_of_ownership)
        .bind(claim.status.as_str())
        .bind(claim.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("create_claim", e))?;

        commit(tx).await?;
        Ok((item, claim))
    }

    #[instrument(
        skip(self, provenance),
        fields(
            item_id = %change.item_id,
            from = %change.expected,
            to = %change.next,
            claim_id = ?review.map(|r| r.claim_id),
        ),
        err
    )]
    async fn review(
        &self,
        change: StatusChange,
        provenance: Option<Provenance>,
        review: Option<ClaimStatusChange>,
    ) -> Result<(Item, Option<Claim>), StoreError> {
        let mut tx = begin(&self.pool).await?;
        let item = update_item_status(&mut tx, change, provenance.as_ref()).await?;
        let claim = match review {
            Some(review) => Some(update_claim_status(&mut tx, review).await?),
            None => None,
        };
        commit(tx).await?;
        Ok((item, claim))
    }
}

fn claim_from_row(row: &PgRow) -> Result<Claim, StoreError> {
    let id: Uuid = get_column(row, "id")?;
    let item_id: Uuid = get_column(row, "item_id")?;
    let status: String = get_column(row, "status")?;

    Ok(Claim {
        id: ClaimId::from_uuid(id),
        item_id: ItemId::from_uuid(item_id),
        claimer_name: get_column(row, "claimer_name")?,
        claimer_contact: get_column(row, "claimer_contact")?,
        proof_of_ownership: get_column(row, "proof_of_ownership")?,
        status: parse_column(ClaimStatus::parse(&status))?,
        created_at: get_column(row, "created_at")?,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Admin
// ─────────────────────────────────────────────────────────────────────────────

/// The `admins` table carries a `singleton` column that is always TRUE and
/// UNIQUE, so a second insert fails at the database regardless of interleaving.
#[derive(Debug, Clone)]
pub struct PostgresAdminStore {
    pool: PgPool,
}

impl PostgresAdminStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminStore for PostgresAdminStore {
    #[instrument(skip(self), err)]
    async fn exists(&self) -> Result<bool, StoreError> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM admins)")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("admin_exists", e))
    }

    #[instrument(skip(self, admin), fields(admin_id = %admin.id), err)]
    async fn create_if_absent(&self, admin: Admin) -> Result<Admin, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO admins (id, username, password_credential, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(admin.id.as_uuid())
        .bind(&admin.username)
        .bind(&admin.password_credential)
        .bind(admin.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match map_sqlx_error("create_admin", e) {
            StoreError::AlreadyExists(_) => {
                StoreError::AlreadyExists("an admin is already registered".to_string())
            }
            other => other,
        })?;

        Ok(admin)
    }

    #[instrument(skip(self), err)]
    async fn find_by_username(&self, username: &str) -> Result<Option<Admin>, StoreError> {
        let row = sqlx::query(&format!("SELECT {ADMIN_COLUMNS} FROM admins WHERE username = $1"))
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_admin", e))?;

        row.as_ref().map(admin_from_row).transpose()
    }

    #[instrument(skip(self), fields(admin_id = %id), err)]
    async fn get(&self, id: AdminId) -> Result<Option<Admin>, StoreError> {
        let row = sqlx::query(&format!("SELECT {ADMIN_COLUMNS} FROM admins WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_admin", e))?;

        row.as_ref().map(admin_from_row).transpose()
    }
}

fn admin_from_row(row: &PgRow) -> Result<Admin, StoreError> {
    let id: Uuid = get_column(row, "id")?;
    Ok(Admin {
        id: AdminId::from_uuid(id),
        username: get_column(row, "username")?,
        password_credential: get_column(row, "password_credential")?,
        created_at: get_column(row, "created_at")?,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn get_column<'r, T>(row: &'r PgRow, column: &str) -> Result<T, StoreError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(column)
        .map_err(|e| StoreError::Backend(format!("failed to decode column '{column}': {e}")))
}

fn parse_column<T>(parsed: lostfound_core::DomainResult<T>) -> Result<T, StoreError> {
    parsed.map_err(|e| StoreError::Backend(format!("unexpected value in database: {e}")))
}

/// Map SQLx errors to `StoreError`.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") => StoreError::AlreadyExists(msg),
                Some("23503") => StoreError::NotFound(msg),
                Some("23514") => StoreError::Invalid(msg),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {}", operation))
        }
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("bag"), "%bag%");
    }

    #[test]
    fn provenance_columns_are_all_or_nothing() {
        assert_eq!(provenance_columns(None), (None, None, None));

        let at = Utc::now();
        let p = Provenance {
            sender_name: "Alice".to_string(),
            recipient_name: "Bob".to_string(),
            returned_at: at,
        };
        assert_eq!(
            provenance_columns(Some(&p)),
            (Some("Alice".to_string()), Some("Bob".to_string()), Some(at))
        );
    }
}
