use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lostfound_core::{ClaimId, DomainError, DomainResult, Entity, ItemId};

/// Claim review status.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ClaimStatus {
    Pending,
    Approved,
    Rejected,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Pending => "Pending",
            ClaimStatus::Approved => "Approved",
            ClaimStatus::Rejected => "Rejected",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        let trimmed = s.trim();
        [ClaimStatus::Pending, ClaimStatus::Approved, ClaimStatus::Rejected]
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| DomainError::validation(format!("unknown claim status '{trimmed}'")))
    }
}

impl core::fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ClaimStatus> for String {
    fn from(value: ClaimStatus) -> Self {
        value.as_str().to_string()
    }
}

impl TryFrom<String> for ClaimStatus {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// An assertion of ownership against a Found item, or a found-report against a Lost one.
///
/// Claims belong to their item for lifecycle purposes: their status only moves
/// as a side effect of the item's approval/rejection transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    pub id: ClaimId,
    pub item_id: ItemId,
    pub claimer_name: String,
    pub claimer_contact: String,
    pub proof_of_ownership: String,
    pub status: ClaimStatus,
    pub created_at: DateTime<Utc>,
}

impl Claim {
    pub fn is_pending(&self) -> bool {
        self.status == ClaimStatus::Pending
    }
}

impl Entity for Claim {
    type Id = ClaimId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Command: submit a claim against an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitClaim {
    pub claimer_name: String,
    pub claimer_contact: String,
    pub proof_of_ownership: String,
}

impl SubmitClaim {
    pub fn validate(&self) -> DomainResult<()> {
        DomainError::require_non_blank("claimerName", &self.claimer_name)?;
        DomainError::require_non_blank("claimerContact", &self.claimer_contact)?;
        DomainError::require_non_blank("proofOfOwnership", &self.proof_of_ownership)?;
        Ok(())
    }
}
