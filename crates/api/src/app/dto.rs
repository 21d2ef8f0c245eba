use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lostfound_auth::{AdminCredentials, AdminIdentity};
use lostfound_core::{ClaimId, DomainResult};
use lostfound_infra::{AdminSession, Approval, ClaimSubmission, Rejection};
use lostfound_items::{
    Claim, ClaimStatus, Item, ItemFilter, ItemStatus, ReportItem, ReportKind, SubmitClaim,
};

// -------------------------
// Request DTOs
// -------------------------

// Text fields default to "" so a missing field is reported by domain
// validation ("name cannot be empty") instead of a JSON parse error.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportItemRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub location: String,
    pub image_url: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub reporter_name: String,
    #[serde(default)]
    pub reporter_contact: String,
}

impl ReportItemRequest {
    pub fn into_command(self) -> DomainResult<ReportItem> {
        Ok(ReportItem {
            status: ReportKind::parse(&self.status)?,
            name: self.name,
            description: self.description,
            category: self.category,
            location: self.location,
            image_url: self.image_url,
            reporter_name: self.reporter_name,
            reporter_contact: self.reporter_contact,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitClaimRequest {
    #[serde(default)]
    pub claimer_name: String,
    #[serde(default)]
    pub claimer_contact: String,
    #[serde(default)]
    pub proof_of_ownership: String,
}

impl From<SubmitClaimRequest> for SubmitClaim {
    fn from(value: SubmitClaimRequest) -> Self {
        SubmitClaim {
            claimer_name: value.claimer_name,
            claimer_contact: value.claimer_contact,
            proof_of_ownership: value.proof_of_ownership,
        }
    }
}

/// Body of approve/reject. Omitting `claimId` selects the claim implicitly.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimSelectionRequest {
    pub claim_id: Option<String>,
}

impl ClaimSelectionRequest {
    pub fn claim_id(&self) -> DomainResult<Option<ClaimId>> {
        self.claim_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .map(str::parse::<ClaimId>)
            .transpose()
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusOverrideRequest {
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListItemsQuery {
    pub status: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
}

impl ListItemsQuery {
    pub fn into_filter(self) -> DomainResult<ItemFilter> {
        let status = self
            .status
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(ItemStatus::parse)
            .transpose()?;

        Ok(ItemFilter {
            status,
            category: self.category.filter(|c| !c.trim().is_empty()),
            search: self.search.filter(|s| !s.trim().is_empty()),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct AdminCredentialsRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl From<AdminCredentialsRequest> for AdminCredentials {
    fn from(value: AdminCredentialsRequest) -> Self {
        AdminCredentials::new(value.username, value.password)
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub image_url: String,
    pub status: ItemStatus,
    pub reported_as: ReportKind,
    pub reporter_name: String,
    pub reporter_contact: String,
    pub sender_name: Option<String>,
    pub recipient_name: Option<String>,
    pub returned_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        let (sender_name, recipient_name, returned_at) = match item.provenance {
            Some(p) => (Some(p.sender_name), Some(p.recipient_name), Some(p.returned_at)),
            None => (None, None, None),
        };

        Self {
            id: item.id.to_string(),
            name: item.name,
            description: item.description,
            category: item.category,
            location: item.location,
            image_url: item.image_url,
            status: item.status,
            reported_as: item.reported_as,
            reporter_name: item.reporter_name,
            reporter_contact: item.reporter_contact,
            sender_name,
            recipient_name,
            returned_at,
            created_at: item.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResponse {
    pub id: String,
    pub item_id: String,
    pub claimer_name: String,
    pub claimer_contact: String,
    pub proof_of_ownership: String,
    pub status: ClaimStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Claim> for ClaimResponse {
    fn from(claim: Claim) -> Self {
        Self {
            id: claim.id.to_string(),
            item_id: claim.item_id.to_string(),
            claimer_name: claim.claimer_name,
            claimer_contact: claim.claimer_contact,
            proof_of_ownership: claim.proof_of_ownership,
            status: claim.status,
            created_at: claim.created_at,
        }
    }
}

/// Item plus the claim touched by the operation.
#[derive(Debug, Serialize)]
pub struct ItemWithClaimResponse {
    pub item: ItemResponse,
    pub claim: Option<ClaimResponse>,
}

impl From<ClaimSubmission> for ItemWithClaimResponse {
    fn from(value: ClaimSubmission) -> Self {
        Self {
            item: value.item.into(),
            claim: Some(value.claim.into()),
        }
    }
}

impl From<Approval> for ItemWithClaimResponse {
    fn from(value: Approval) -> Self {
        Self {
            item: value.item.into(),
            claim: Some(value.claim.into()),
        }
    }
}

impl From<Rejection> for ItemWithClaimResponse {
    fn from(value: Rejection) -> Self {
        Self {
            item: value.item.into(),
            claim: value.claim.map(Into::into),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdminResponse {
    pub id: String,
    pub username: String,
}

impl From<AdminIdentity> for AdminResponse {
    fn from(value: AdminIdentity) -> Self {
        Self {
            id: value.id.to_string(),
            username: value.username,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSessionResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub admin: AdminResponse,
}

impl From<AdminSession> for AdminSessionResponse {
    fn from(value: AdminSession) -> Self {
        Self {
            token: value.token,
            expires_at: value.expires_at,
            admin: value.admin.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdminExistsResponse {
    pub exists: bool,
}
