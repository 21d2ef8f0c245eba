use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use lostfound_auth::AdminIdentity;
use lostfound_core::{ClaimId, ItemId};
use lostfound_items::lifecycle::{
    open_claim, plan_approval, plan_mark_found, plan_override, plan_rejection, report,
    resolve_claim,
};
use lostfound_items::{Claim, Item, ItemFilter, ItemStatus, ReportItem, SubmitClaim};

use super::{ServiceError, ServiceResult};
use crate::store::{ClaimStore, ItemStore, StoreError};

/// Result of a claim submission: the item (now Pending) and the stored claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimSubmission {
    pub item: Item,
    pub claim: Claim,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Approval {
    pub item: Item,
    pub claim: Claim,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub item: Item,
    /// The claim marked Rejected, if the item had one under review.
    pub claim: Option<Claim>,
}

/// Item/claim lifecycle operations.
///
/// Admin-only operations take an [`AdminIdentity`], which only the access gate
/// hands out.
#[derive(Clone)]
pub struct LifecycleService {
    items: Arc<dyn ItemStore>,
    claims: Arc<dyn ClaimStore>,
    default_image_url: String,
}

impl LifecycleService {
    pub fn new(
        items: Arc<dyn ItemStore>,
        claims: Arc<dyn ClaimStore>,
        default_image_url: impl Into<String>,
    ) -> Self {
        Self {
            items,
            claims,
            default_image_url: default_image_url.into(),
        }
    }

    pub async fn report_item(&self, cmd: ReportItem) -> ServiceResult<Item> {
        let item = report(cmd, ItemId::new(), &self.default_image_url, Utc::now())?;
        let item = self.items.create(item).await?;
        info!(item_id = %item.id, status = %item.status, "item reported");
        Ok(item)
    }

    pub async fn list_items(&self, filter: &ItemFilter) -> ServiceResult<Vec<Item>> {
        Ok(self.items.list(filter).await?)
    }

    pub async fn get_item(&self, item_id: ItemId) -> ServiceResult<Item> {
        Ok(self.items.get(item_id).await?)
    }

    /// Submit a claim (Found item) or a found-report (Lost item).
    ///
    /// The item moves to Pending and the claim is stored in one conditional write.
    pub async fn submit_claim(&self, item_id: ItemId, cmd: SubmitClaim) -> ServiceResult<ClaimSubmission> {
        let item = self.items.get(item_id).await?;
        let (change, claim) = open_claim(&item, cmd, ClaimId::new(), Utc::now())
            .inspect_err(|e| debug!(item_id = %item_id, error = %e, "claim submission rejected"))?;

        let (item, claim) = self.claims.open(change, claim).await?;

        info!(
            item_id = %item_id,
            claim_id = %claim.id,
            from = %change.expected,
            to = %change.next,
            "claim submitted"
        );
        Ok(ClaimSubmission { item, claim })
    }

    /// "I have this": Lost → Pending without a claim.
    pub async fn mark_found(&self, item_id: ItemId) -> ServiceResult<Item> {
        let item = self.items.get(item_id).await?;
        let change = plan_mark_found(&item)?;
        let item = self.items.update_status_conditional(change, None).await?;
        info!(item_id = %item_id, from = %change.expected, to = %change.next, "item marked as found");
        Ok(item)
    }

    /// Approve `claim_id`, or the item's latest claim when none is given.
    pub async fn approve_claim(
        &self,
        admin: &AdminIdentity,
        item_id: ItemId,
        claim_id: Option<ClaimId>,
    ) -> ServiceResult<Approval> {
        let item = self.items.get(item_id).await?;
        let candidate = match claim_id {
            Some(id) => self.find_claim(id).await?,
            None => self.claims.latest_for_item(item_id).await?,
        };
        let claim = resolve_claim(&item, claim_id, candidate)?;
        let plan = plan_approval(&item, &claim, Utc::now())?;

        let (item, claim) = self
            .claims
            .review(plan.change, Some(plan.provenance), Some(plan.claim))
            .await
            .inspect_err(|e| warn!(item_id = %item_id, error = %e, "approval lost a concurrent race"))?;
        let claim = claim.ok_or_else(|| {
            error!(item_id = %item_id, claim_id = %plan.claim.claim_id, "store skipped the claim write");
            ServiceError::Infrastructure(format!("claim {} was not updated", plan.claim.claim_id))
        })?;

        info!(
            item_id = %item_id,
            claim_id = %claim.id,
            admin = %admin.username,
            "claim approved; item returned"
        );
        Ok(Approval { item, claim })
    }

    /// Reject `claim_id`, or the latest Pending claim; the item reverts to its reported status.
    pub async fn reject_claim(
        &self,
        admin: &AdminIdentity,
        item_id: ItemId,
        claim_id: Option<ClaimId>,
    ) -> ServiceResult<Rejection> {
        let item = self.items.get(item_id).await?;
        let target = match claim_id {
            Some(id) => {
                let candidate = self.find_claim(id).await?;
                Some(resolve_claim(&item, Some(id), candidate)?)
            }
            None => self.claims.latest_pending_for_item(item_id).await?,
        };
        let plan = plan_rejection(&item, target.as_ref())?;

        let (item, claim) = self
            .claims
            .review(plan.change, None, plan.claim)
            .await
            .inspect_err(|e| warn!(item_id = %item_id, error = %e, "rejection lost a concurrent race"))?;

        info!(
            item_id = %item_id,
            claim_id = ?claim.as_ref().map(|c| c.id),
            to = %plan.change.next,
            admin = %admin.username,
            "claim rejected"
        );
        Ok(Rejection { item, claim })
    }

    pub async fn override_status(
        &self,
        admin: &AdminIdentity,
        item_id: ItemId,
        status: ItemStatus,
    ) -> ServiceResult<Item> {
        let item = self.items.get(item_id).await?;
        let change = plan_override(&item, status)?;
        let item = self.items.update_status_conditional(change, None).await?;
        info!(
            item_id = %item_id,
            from = %change.expected,
            to = %change.next,
            admin = %admin.username,
            "status overridden"
        );
        Ok(item)
    }

    /// Claims for an item, newest first. Claims carry contact details, hence admin-only.
    pub async fn list_claims(&self, _admin: &AdminIdentity, item_id: ItemId) -> ServiceResult<Vec<Claim>> {
        self.items.get(item_id).await?;
        Ok(self.claims.list_for_item(item_id).await?)
    }

    async fn find_claim(&self, id: ClaimId) -> ServiceResult<Option<Claim>> {
        match self.claims.get(id).await {
            Ok(claim) => Ok(Some(claim)),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(ServiceError::from(e)),
        }
    }
}
