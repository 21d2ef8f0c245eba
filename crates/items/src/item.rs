use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lostfound_core::{DomainError, DomainResult, Entity, ItemId};

// ─────────────────────────────────────────────────────────────────────────────
// Item Status
// ─────────────────────────────────────────────────────────────────────────────

/// Lifecycle status of an item.
///
/// This is a closed set. Free-text statuses are parsed case-insensitively at the
/// boundary (`"lost"` and `"Lost"` are the same) and anything else is rejected.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ItemStatus {
    Lost,
    Found,
    Pending,
    Returned,
}

impl ItemStatus {
    pub const ALL: [ItemStatus; 4] = [
        ItemStatus::Lost,
        ItemStatus::Found,
        ItemStatus::Pending,
        ItemStatus::Returned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Lost => "Lost",
            ItemStatus::Found => "Found",
            ItemStatus::Pending => "Pending",
            ItemStatus::Returned => "Returned",
        }
    }

    /// Parse a status string, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> DomainResult<Self> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| {
                DomainError::validation(format!(
                    "unknown item status '{trimmed}' (expected one of: Lost, Found, Pending, Returned)"
                ))
            })
    }
}

impl core::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for ItemStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<ItemStatus> for String {
    fn from(value: ItemStatus) -> Self {
        value.as_str().to_string()
    }
}

impl TryFrom<String> for ItemStatus {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// The status an item may be reported with. Immutable after creation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ReportKind {
    Lost,
    Found,
}

impl ReportKind {
    pub fn as_status(&self) -> ItemStatus {
        match self {
            ReportKind::Lost => ItemStatus::Lost,
            ReportKind::Found => ItemStatus::Found,
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match ItemStatus::parse(s)? {
            ItemStatus::Lost => Ok(ReportKind::Lost),
            ItemStatus::Found => Ok(ReportKind::Found),
            other => Err(DomainError::validation(format!(
                "items can only be reported as Lost or Found, not {other}"
            ))),
        }
    }
}

impl core::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_status().as_str())
    }
}

impl From<ReportKind> for String {
    fn from(value: ReportKind) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for ReportKind {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Item
// ─────────────────────────────────────────────────────────────────────────────

/// Who handed the item over, who received it, and when.
///
/// Written exactly once, by the approval transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    pub sender_name: String,
    pub recipient_name: String,
    pub returned_at: DateTime<Utc>,
}

/// A reported lost or found object.
///
/// # Invariants
/// - `provenance` is `Some` exactly when `status == Returned`.
/// - `id`, `reported_as`, reporter identity and `created_at` never change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub image_url: String,
    pub status: ItemStatus,
    pub reported_as: ReportKind,
    pub reporter_name: String,
    pub reporter_contact: String,
    pub provenance: Option<Provenance>,
    pub created_at: DateTime<Utc>,
}

impl Item {
    pub fn sender_name(&self) -> Option<&str> {
        self.provenance.as_ref().map(|p| p.sender_name.as_str())
    }

    pub fn recipient_name(&self) -> Option<&str> {
        self.provenance.as_ref().map(|p| p.recipient_name.as_str())
    }

    pub fn returned_at(&self) -> Option<DateTime<Utc>> {
        self.provenance.as_ref().map(|p| p.returned_at)
    }

    pub fn is_resolved(&self) -> bool {
        self.status == ItemStatus::Returned
    }

    /// Check the provenance/status invariant.
    pub fn check_invariants(&self) -> DomainResult<()> {
        match (self.status, &self.provenance) {
            (ItemStatus::Returned, None) => Err(DomainError::validation(
                "returned item is missing sender/recipient",
            )),
            (status, Some(_)) if status != ItemStatus::Returned => Err(DomainError::validation(
                format!("{status} item must not carry sender/recipient"),
            )),
            _ => Ok(()),
        }
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Command: report a lost or found item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportItem {
    pub name: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub image_url: Option<String>,
    pub status: ReportKind,
    pub reporter_name: String,
    pub reporter_contact: String,
}

impl ReportItem {
    pub fn validate(&self) -> DomainResult<()> {
        DomainError::require_non_blank("name", &self.name)?;
        DomainError::require_non_blank("description", &self.description)?;
        DomainError::require_non_blank("category", &self.category)?;
        DomainError::require_non_blank("location", &self.location)?;
        DomainError::require_non_blank("reporterName", &self.reporter_name)?;
        DomainError::require_non_blank("reporterContact", &self.reporter_contact)?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Listing
// ─────────────────────────────────────────────────────────────────────────────

/// Optional filters for listing items. All present filters must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub status: Option<ItemStatus>,
    /// Case-insensitive exact match.
    pub category: Option<String>,
    /// Case-insensitive substring over name, description and location.
    pub search: Option<String>,
}

impl ItemFilter {
    pub fn matches(&self, item: &Item) -> bool {
        if let Some(status) = self.status {
            if item.status != status {
                return false;
            }
        }

        if let Some(category) = self.category.as_deref() {
            if !item.category.eq_ignore_ascii_case(category.trim()) {
                return false;
            }
        }

        if let Some(search) = self.search.as_deref() {
            let needle = search.trim().to_lowercase();
            if !needle.is_empty() {
                let hit = [&item.name, &item.description, &item.location]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle));
                if !hit {
                    return false;
                }
            }
        }

        true
    }
}
