//! In-memory stores for tests/dev.
//!
//! Each conditional write runs under a single write-lock acquisition, so the
//! status check and the update cannot interleave with another writer. Claim
//! writes take the item lock first and then the claim lock; nothing takes them
//! in the other order.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use lostfound_auth::Admin;
use lostfound_core::{AdminId, ClaimId, ItemId, sort_newest_first};
use lostfound_items::lifecycle::latest_claim;
use lostfound_items::{Claim, ClaimStatusChange, Item, ItemFilter, Provenance, StatusChange};

use super::{AdminStore, ClaimStore, ItemStore, StoreError};

#[derive(Debug, Default)]
pub struct InMemoryItemStore {
    inner: RwLock<HashMap<ItemId, Item>>,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    async fn create(&self, item: Item) -> Result<Item, StoreError> {
        let mut map = self.inner.write().map_err(|_| StoreError::poisoned())?;
        if map.contains_key(&item.id) {
            return Err(StoreError::AlreadyExists(format!("item {}", item.id)));
        }
        map.insert(item.id, item.clone());
        Ok(item)
    }

    async fn get(&self, id: ItemId) -> Result<Item, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::poisoned())?;
        map.get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("item {id}")))
    }

    async fn list(&self, filter: &ItemFilter) -> Result<Vec<Item>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::poisoned())?;
        let mut items: Vec<Item> = map.values().filter(|i| filter.matches(i)).cloned().collect();
        sort_newest_first(&mut items);
        Ok(items)
    }

    async fn update_status_conditional(
        &self,
        change: StatusChange,
        provenance: Option<Provenance>,
    ) -> Result<Item, StoreError> {
        let mut map = self.inner.write().map_err(|_| StoreError::poisoned())?;
        let item = staged_item(&map, change, provenance)?;
        map.insert(item.id, item.clone());
        Ok(item)
    }
}

/// The item as it would look after `change`; the map is left untouched.
fn staged_item(
    items: &HashMap<ItemId, Item>,
    change: StatusChange,
    provenance: Option<Provenance>,
) -> Result<Item, StoreError> {
    change
        .check_provenance(provenance.as_ref())
        .map_err(|e| StoreError::Invalid(e.to_string()))?;

    let mut item = items
        .get(&change.item_id)
        .cloned()
        .ok_or_else(|| StoreError::NotFound(format!("item {}", change.item_id)))?;

    if item.status != change.expected {
        return Err(StoreError::StaleStatus {
            expected: change.expected,
            actual: item.status,
        });
    }

    item.status = change.next;
    if provenance.is_some() {
        item.provenance = provenance;
    }
    Ok(item)
}

fn staged_claim(claims: &HashMap<ClaimId, Claim>, change: ClaimStatusChange) -> Result<Claim, StoreError> {
    let mut claim = claims
        .get(&change.claim_id)
        .filter(|c| c.item_id == change.item_id)
        .cloned()
        .ok_or_else(|| StoreError::NotFound(format!("claim {}", change.claim_id)))?;

    if claim.status != change.expected {
        return Err(StoreError::StaleClaim {
            claim_id: change.claim_id,
            expected: change.expected,
            actual: claim.status,
        });
    }

    claim.status = change.next;
    Ok(claim)
}

/// Claims for the items held by `items`; claim writes update both under one lock pair.
#[derive(Debug)]
pub struct InMemoryClaimStore {
    items: Arc<InMemoryItemStore>,
    inner: RwLock<HashMap<ClaimId, Claim>>,
}

impl InMemoryClaimStore {
    pub fn new(items: Arc<InMemoryItemStore>) -> Self {
        Self {
            items,
            inner: RwLock::default(),
        }
    }

    fn claims_for(&self, item_id: ItemId) -> Result<Vec<Claim>, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::poisoned())?;
        Ok(map.values().filter(|c| c.item_id == item_id).cloned().collect())
    }
}

#[async_trait]
impl ClaimStore for InMemoryClaimStore {
    async fn get(&self, id: ClaimId) -> Result<Claim, StoreError> {
        let map = self.inner.read().map_err(|_| StoreError::poisoned())?;
        map.get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("claim {id}")))
    }

    async fn list_for_item(&self, item_id: ItemId) -> Result<Vec<Claim>, StoreError> {
        let mut claims = self.claims_for(item_id)?;
        sort_newest_first(&mut claims);
        Ok(claims)
    }

    async fn latest_for_item(&self, item_id: ItemId) -> Result<Option<Claim>, StoreError> {
        let claims = self.claims_for(item_id)?;
        Ok(latest_claim(&claims).cloned())
    }

    async fn open(&self, change: StatusChange, claim: Claim) -> Result<(Item, Claim), StoreError> {
        if claim.item_id != change.item_id {
            return Err(StoreError::Invalid(format!(
                "claim {} does not belong to item {}",
                claim.id, change.item_id
            )));
        }

        let mut items = self.items.inner.write().map_err(|_| StoreError::poisoned())?;
        let mut claims = self.inner.write().map_err(|_| StoreError::poisoned())?;
        if claims.contains_key(&claim.id) {
            return Err(StoreError::AlreadyExists(format!("claim {}", claim.id)));
        }
        let item = staged_item(&items, change, None)?;

        items.insert(item.id, item.clone());
        claims.insert(claim.id, claim.clone());
        Ok((item, claim))
    }

    async fn review(
        &self,
        change: StatusChange,
        provenance: Option<Provenance>,
        review: Option<ClaimStatusChange>,
    ) -> Result<(Item, Option<Claim>), StoreError> {
        let mut items = self.items.inner.write().map_err(|_| StoreError::poisoned())?;
        let mut claims = self.inner.write().map_err(|_| StoreError::poisoned())?;
        let item = staged_item(&items, change, provenance)?;
        let claim = review.map(|r| staged_claim(&claims, r)).transpose()?;

        items.insert(item.id, item.clone());
        if let Some(claim) = &claim {
            claims.insert(claim.id, claim.clone());
        }
        Ok((item, claim))
    }
}

/// Holds at most one admin.
#[derive(Debug, Default)]
pub struct InMemoryAdminStore {
    inner: RwLock<Option<Admin>>,
}

impl InMemoryAdminStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AdminStore for InMemoryAdminStore {
    async fn exists(&self) -> Result<bool, StoreError> {
        let slot = self.inner.read().map_err(|_| StoreError::poisoned())?;
        Ok(slot.is_some())
    }

    async fn create_if_absent(&self, admin: Admin) -> Result<Admin, StoreError> {
        let mut slot = self.inner.write().map_err(|_| StoreError::poisoned())?;
        if slot.is_some() {
            return Err(StoreError::AlreadyExists("an admin is already registered".to_string()));
        }
        *slot = Some(admin.clone());
        Ok(admin)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Admin>, StoreError> {
        let slot = self.inner.read().map_err(|_| StoreError::poisoned())?;
        Ok(slot.as_ref().filter(|a| a.username == username).cloned())
    }

    async fn get(&self, id: AdminId) -> Result<Option<Admin>, StoreError> {
        let slot = self.inner.read().map_err(|_| StoreError::poisoned())?;
        Ok(slot.as_ref().filter(|a| a.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use lostfound_items::{ClaimStatus, ItemStatus, ReportKind};

    fn item(status: ItemStatus, name: &str, age_minutes: i64) -> Item {
        Item {
            id: ItemId::new(),
            name: name.to_string(),
            description: "desc".to_string(),
            category: "Misc".to_string(),
            location: "Lobby".to_string(),
            image_url: "placeholder".to_string(),
            status,
            reported_as: ReportKind::Found,
            reporter_name: "Alice".to_string(),
            reporter_contact: "alice@example.com".to_string(),
            provenance: None,
            created_at: Utc::now() - Duration::minutes(age_minutes),
        }
    }

    #[tokio::test]
    async fn conditional_update_rejects_stale_status() {
        let store = InMemoryItemStore::new();
        let stored = store.create(item(ItemStatus::Found, "Umbrella", 0)).await.unwrap();

        let change = StatusChange {
            item_id: stored.id,
            expected: ItemStatus::Lost,
            next: ItemStatus::Pending,
        };
        let err = store.update_status_conditional(change, None).await.unwrap_err();
        assert_eq!(
            err,
            StoreError::StaleStatus {
                expected: ItemStatus::Lost,
                actual: ItemStatus::Found
            }
        );
        assert_eq!(store.get(stored.id).await.unwrap().status, ItemStatus::Found);
    }

    #[tokio::test]
    async fn conditional_update_requires_provenance_for_returned() {
        let store = InMemoryItemStore::new();
        let stored = store.create(item(ItemStatus::Pending, "Umbrella", 0)).await.unwrap();

        let change = StatusChange {
            item_id: stored.id,
            expected: ItemStatus::Pending,
            next: ItemStatus::Returned,
        };
        assert!(matches!(
            store.update_status_conditional(change, None).await,
            Err(StoreError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn list_is_newest_first_and_filtered() {
        let store = InMemoryItemStore::new();
        store.create(item(ItemStatus::Found, "Old scarf", 30)).await.unwrap();
        store.create(item(ItemStatus::Lost, "Keys", 20)).await.unwrap();
        store.create(item(ItemStatus::Found, "New scarf", 10)).await.unwrap();

        let all = store.list(&ItemFilter::default()).await.unwrap();
        let names: Vec<&str> = all.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["New scarf", "Keys", "Old scarf"]);

        let found = store
            .list(&ItemFilter {
                status: Some(ItemStatus::Found),
                search: Some("scarf".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
    }

    fn claim_for(item: &Item, claimer: &str) -> Claim {
        Claim {
            id: ClaimId::new(),
            item_id: item.id,
            claimer_name: claimer.to_string(),
            claimer_contact: "555-0199".to_string(),
            proof_of_ownership: "Initials on the handle".to_string(),
            status: ClaimStatus::Pending,
            created_at: Utc::now(),
        }
    }

    fn to_pending(item: &Item) -> StatusChange {
        StatusChange {
            item_id: item.id,
            expected: item.status,
            next: ItemStatus::Pending,
        }
    }

    #[tokio::test]
    async fn open_moves_item_and_stores_claim_together() {
        let items = Arc::new(InMemoryItemStore::new());
        let claims = InMemoryClaimStore::new(items.clone());
        let stored = items.create(item(ItemStatus::Found, "Umbrella", 0)).await.unwrap();

        let (item, claim) = claims.open(to_pending(&stored), claim_for(&stored, "Bob")).await.unwrap();
        assert_eq!(item.status, ItemStatus::Pending);
        assert_eq!(claims.get(claim.id).await.unwrap(), claim);

        // Stale precondition: neither the item nor a second claim is written.
        let err = claims
            .open(to_pending(&stored), claim_for(&stored, "Eve"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::StaleStatus { .. }));
        assert_eq!(claims.list_for_item(stored.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn review_of_an_already_reviewed_claim_writes_nothing() {
        let items = Arc::new(InMemoryItemStore::new());
        let claims = InMemoryClaimStore::new(items.clone());
        let stored = items.create(item(ItemStatus::Found, "Umbrella", 0)).await.unwrap();
        let (pending, first) = claims.open(to_pending(&stored), claim_for(&stored, "Mallory")).await.unwrap();

        let reject = ClaimStatusChange {
            claim_id: first.id,
            item_id: stored.id,
            expected: ClaimStatus::Pending,
            next: ClaimStatus::Rejected,
        };
        let back_to_found = StatusChange {
            item_id: stored.id,
            expected: ItemStatus::Pending,
            next: ItemStatus::Found,
        };
        let (found, _) = claims.review(back_to_found, None, Some(reject)).await.unwrap();
        claims.open(to_pending(&found), claim_for(&found, "Bob")).await.unwrap();

        // The item is Pending again, but the first claim is no longer.
        let approve = ClaimStatusChange {
            next: ClaimStatus::Approved,
            ..reject
        };
        let returned = StatusChange {
            item_id: stored.id,
            expected: pending.status,
            next: ItemStatus::Returned,
        };
        let provenance = Provenance {
            sender_name: "Alice".to_string(),
            recipient_name: "Mallory".to_string(),
            returned_at: Utc::now(),
        };
        let err = claims
            .review(returned, Some(provenance), Some(approve))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            StoreError::StaleClaim {
                claim_id: first.id,
                expected: ClaimStatus::Pending,
                actual: ClaimStatus::Rejected,
            }
        );
        let item = items.get(stored.id).await.unwrap();
        assert_eq!(item.status, ItemStatus::Pending);
        assert!(item.provenance.is_none());
        assert_eq!(claims.get(first.id).await.unwrap().status, ClaimStatus::Rejected);
    }

    #[tokio::test]
    async fn second_admin_is_rejected() {
        let store = InMemoryAdminStore::new();
        let admin = |name: &str| Admin {
            id: AdminId::new(),
            username: name.to_string(),
            password_credential: "x".to_string(),
            created_at: Utc::now(),
        };

        let first = store.create_if_absent(admin("root")).await.unwrap();
        assert!(matches!(
            store.create_if_absent(admin("other")).await,
            Err(StoreError::AlreadyExists(_))
        ));
        assert_eq!(store.find_by_username("root").await.unwrap().unwrap().id, first.id);
        assert!(store.find_by_username("other").await.unwrap().is_none());
    }
}
