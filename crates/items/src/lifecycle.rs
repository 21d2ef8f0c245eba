//! Lifecycle engine: decides item status transitions and their claim side effects.
//!
//! Every function here is pure. It looks at the item (and claim) as last read
//! from storage and either rejects the request or returns a plan. Plans carry
//! the status the decision was made against, so persisting them is a
//! compare-and-swap: if another request moved the item in between, the write
//! fails with `Conflict` instead of silently overwriting.
//!
//! ```text
//!   report(Lost) ──► Lost ──claim / markFound──► Pending ──approve──► Returned
//!   report(Found) ─► Found ──claim────────────► Pending
//!                                                 │
//!                                                 └──reject──► reported_as (Lost | Found)
//! ```
//!
//! Admin overrides may move an unresolved item between Lost, Found and Pending.
//! Nothing leaves Returned, and only approval enters it.

use chrono::{DateTime, Utc};

use lostfound_core::{ClaimId, DomainError, DomainResult, ItemId, most_recent};

use crate::claim::{Claim, ClaimStatus, SubmitClaim};
use crate::item::{Item, ItemStatus, Provenance, ReportItem};

const ALREADY_RESOLVED: &str = "item already resolved";

/// A conditional status write: applies only while the item is still at `expected`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub item_id: ItemId,
    pub expected: ItemStatus,
    pub next: ItemStatus,
}

impl StatusChange {
    /// Provenance must accompany the transition into Returned and nothing else.
    pub fn check_provenance(&self, provenance: Option<&Provenance>) -> DomainResult<()> {
        match (self.next, provenance) {
            (ItemStatus::Returned, None) => Err(DomainError::validation(
                "transition into Returned requires sender and recipient",
            )),
            (next, Some(_)) if next != ItemStatus::Returned => Err(DomainError::validation(
                "sender and recipient can only be written by approval",
            )),
            _ => Ok(()),
        }
    }

    /// Compare-and-swap the change onto an in-memory item.
    pub fn apply(&self, item: &mut Item, provenance: Option<Provenance>) -> DomainResult<()> {
        if item.id != self.item_id {
            return Err(DomainError::not_found(format!("item {}", self.item_id)));
        }
        self.check_provenance(provenance.as_ref())?;
        if item.status != self.expected {
            return Err(stale_status(self.expected, item.status));
        }

        item.status = self.next;
        if provenance.is_some() {
            item.provenance = provenance;
        }
        Ok(())
    }
}

/// Conflict reported when the stored status no longer matches the decision's precondition.
pub fn stale_status(expected: ItemStatus, actual: ItemStatus) -> DomainError {
    if actual == ItemStatus::Returned {
        return DomainError::conflict(ALREADY_RESOLVED);
    }
    DomainError::conflict(format!(
        "item status changed concurrently (expected {expected}, found {actual})"
    ))
}

/// A conditional claim status write, persisted together with the item's [`StatusChange`].
///
/// Guards against the item passing through the same status twice (reject, then
/// a new claim) between the decision and the write.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ClaimStatusChange {
    pub claim_id: ClaimId,
    pub item_id: ItemId,
    pub expected: ClaimStatus,
    pub next: ClaimStatus,
}

impl ClaimStatusChange {
    fn review(claim: &Claim, next: ClaimStatus) -> Self {
        Self {
            claim_id: claim.id,
            item_id: claim.item_id,
            expected: ClaimStatus::Pending,
            next,
        }
    }

    /// Compare-and-swap the change onto an in-memory claim.
    pub fn apply(&self, claim: &mut Claim) -> DomainResult<()> {
        if claim.id != self.claim_id || claim.item_id != self.item_id {
            return Err(DomainError::not_found(format!(
                "claim {} for item {}",
                self.claim_id, self.item_id
            )));
        }
        if claim.status != self.expected {
            return Err(stale_claim(self.claim_id, claim.status));
        }
        claim.status = self.next;
        Ok(())
    }
}

/// Conflict reported when a claim has already been reviewed.
pub fn stale_claim(claim_id: ClaimId, actual: ClaimStatus) -> DomainError {
    DomainError::conflict(format!("claim {claim_id} is already {actual}"))
}

/// Approve a claim: item Pending → Returned, claim Pending → Approved, provenance written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalPlan {
    pub change: StatusChange,
    pub claim: ClaimStatusChange,
    pub provenance: Provenance,
}

/// Reject a claim: item Pending → its reported status, targeted claim (if any) → Rejected.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RejectionPlan {
    pub change: StatusChange,
    pub claim: Option<ClaimStatusChange>,
}

fn ensure_unresolved(item: &Item) -> DomainResult<()> {
    if item.is_resolved() {
        return Err(DomainError::conflict(ALREADY_RESOLVED));
    }
    Ok(())
}

fn ensure_pending(item: &Item) -> DomainResult<()> {
    ensure_unresolved(item)?;
    if item.status != ItemStatus::Pending {
        return Err(DomainError::conflict(format!(
            "item is {}, expected Pending",
            item.status
        )));
    }
    Ok(())
}

fn ensure_claim_pending(claim: &Claim) -> DomainResult<()> {
    if claim.status != ClaimStatus::Pending {
        return Err(stale_claim(claim.id, claim.status));
    }
    Ok(())
}

/// Create a new item from a lost/found report.
pub fn report(
    cmd: ReportItem,
    id: ItemId,
    default_image_url: &str,
    now: DateTime<Utc>,
) -> DomainResult<Item> {
    cmd.validate()?;

    let image_url = cmd
        .image_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .unwrap_or(default_image_url)
        .to_string();

    Ok(Item {
        id,
        name: cmd.name.trim().to_string(),
        description: cmd.description.trim().to_string(),
        category: cmd.category.trim().to_string(),
        location: cmd.location.trim().to_string(),
        image_url,
        status: cmd.status.as_status(),
        reported_as: cmd.status,
        reporter_name: cmd.reporter_name.trim().to_string(),
        reporter_contact: cmd.reporter_contact.trim().to_string(),
        provenance: None,
        created_at: now,
    })
}

/// Open a claim against a Found (ownership claim) or Lost (found-report) item.
///
/// Returns the status change and the new claim; both are persisted together.
pub fn open_claim(
    item: &Item,
    cmd: SubmitClaim,
    id: ClaimId,
    now: DateTime<Utc>,
) -> DomainResult<(StatusChange, Claim)> {
    cmd.validate()?;

    match item.status {
        ItemStatus::Found | ItemStatus::Lost => {}
        ItemStatus::Pending => {
            return Err(DomainError::conflict("item already has a claim under review"));
        }
        ItemStatus::Returned => return Err(DomainError::conflict(ALREADY_RESOLVED)),
    }

    let change = StatusChange {
        item_id: item.id,
        expected: item.status,
        next: ItemStatus::Pending,
    };
    let claim = Claim {
        id,
        item_id: item.id,
        claimer_name: cmd.claimer_name.trim().to_string(),
        claimer_contact: cmd.claimer_contact.trim().to_string(),
        proof_of_ownership: cmd.proof_of_ownership.trim().to_string(),
        status: ClaimStatus::Pending,
        created_at: now,
    };
    Ok((change, claim))
}

/// "I have this": a Lost item moves to Pending without a claim.
pub fn plan_mark_found(item: &Item) -> DomainResult<StatusChange> {
    ensure_unresolved(item)?;
    if item.status != ItemStatus::Lost {
        return Err(DomainError::conflict(format!(
            "only Lost items can be marked as found (item is {})",
            item.status
        )));
    }
    Ok(StatusChange {
        item_id: item.id,
        expected: ItemStatus::Lost,
        next: ItemStatus::Pending,
    })
}

/// Resolve the claim an approval/rejection refers to.
///
/// `claim` is what storage returned for `requested` (or for "latest" when no id
/// was given). A claim that exists but belongs to another item is reported as
/// not found for this item.
pub fn resolve_claim(
    item: &Item,
    requested: Option<ClaimId>,
    claim: Option<Claim>,
) -> DomainResult<Claim> {
    let Some(claim) = claim else {
        return Err(match requested {
            Some(id) => DomainError::not_found(format!("claim {id}")),
            None => DomainError::not_found(format!("no claim found for item {}", item.id)),
        });
    };

    if claim.item_id != item.id {
        return Err(DomainError::not_found(format!(
            "claim {} for item {}",
            claim.id, item.id
        )));
    }
    Ok(claim)
}

/// The most recently created claim (creation time, then id).
pub fn latest_claim(claims: &[Claim]) -> Option<&Claim> {
    most_recent(claims)
}

/// The most recently created claim that is still under review.
pub fn latest_pending_claim(claims: &[Claim]) -> Option<&Claim> {
    most_recent(claims.iter().filter(|c| c.is_pending()))
}

/// Decide an approval of `claim` for `item`.
pub fn plan_approval(item: &Item, claim: &Claim, now: DateTime<Utc>) -> DomainResult<ApprovalPlan> {
    ensure_pending(item)?;
    if claim.item_id != item.id {
        return Err(DomainError::not_found(format!(
            "claim {} for item {}",
            claim.id, item.id
        )));
    }
    ensure_claim_pending(claim)?;

    Ok(ApprovalPlan {
        change: StatusChange {
            item_id: item.id,
            expected: ItemStatus::Pending,
            next: ItemStatus::Returned,
        },
        claim: ClaimStatusChange::review(claim, ClaimStatus::Approved),
        provenance: Provenance {
            sender_name: item.reporter_name.clone(),
            recipient_name: claim.claimer_name.clone(),
            returned_at: now,
        },
    })
}

/// Decide a rejection. `claim` is the claim to mark Rejected, if any.
pub fn plan_rejection(item: &Item, claim: Option<&Claim>) -> DomainResult<RejectionPlan> {
    ensure_pending(item)?;
    if let Some(claim) = claim {
        if claim.item_id != item.id {
            return Err(DomainError::not_found(format!(
                "claim {} for item {}",
                claim.id, item.id
            )));
        }
        ensure_claim_pending(claim)?;
    }

    Ok(RejectionPlan {
        change: StatusChange {
            item_id: item.id,
            expected: ItemStatus::Pending,
            next: item.reported_as.as_status(),
        },
        claim: claim.map(|c| ClaimStatusChange::review(c, ClaimStatus::Rejected)),
    })
}

/// Decide a direct admin status override.
pub fn plan_override(item: &Item, target: ItemStatus) -> DomainResult<StatusChange> {
    ensure_unresolved(item)?;
    if target == ItemStatus::Returned {
        return Err(DomainError::validation(
            "items can only become Returned by approving a claim",
        ));
    }
    Ok(StatusChange {
        item_id: item.id,
        expected: item.status,
        next: target,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ReportKind;
    use chrono::Duration;
    use proptest::prelude::*;

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-01T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn report_cmd(kind: ReportKind, reporter: &str) -> ReportItem {
        ReportItem {
            name: "Blue Backpack".to_string(),
            description: "Canvas bag with a laptop sleeve".to_string(),
            category: "Bags".to_string(),
            location: "Library".to_string(),
            image_url: None,
            status: kind,
            reporter_name: reporter.to_string(),
            reporter_contact: format!("{}@example.com", reporter.to_lowercase()),
        }
    }

    fn claim_cmd(claimer: &str) -> SubmitClaim {
        SubmitClaim {
            claimer_name: claimer.to_string(),
            claimer_contact: format!("{}@example.com", claimer.to_lowercase()),
            proof_of_ownership: "Name tag inside the front pocket".to_string(),
        }
    }

    fn found_item(reporter: &str) -> Item {
        report(report_cmd(ReportKind::Found, reporter), ItemId::new(), "placeholder", t0()).unwrap()
    }

    fn claimed(item: &mut Item, claimer: &str, at: DateTime<Utc>) -> Claim {
        let (change, claim) = open_claim(item, claim_cmd(claimer), ClaimId::new(), at).unwrap();
        change.apply(item, None).unwrap();
        claim
    }

    #[test]
    fn report_sets_origin_and_default_image() {
        let item = report(
            report_cmd(ReportKind::Lost, "Carol"),
            ItemId::new(),
            "https://placehold.co/600x400",
            t0(),
        )
        .unwrap();

        assert_eq!(item.status, ItemStatus::Lost);
        assert_eq!(item.reported_as, ReportKind::Lost);
        assert_eq!(item.image_url, "https://placehold.co/600x400");
        assert!(item.provenance.is_none());
    }

    #[test]
    fn report_rejects_blank_location() {
        let mut cmd = report_cmd(ReportKind::Found, "Alice");
        cmd.location = "   ".to_string();

        let err = report(cmd, ItemId::new(), "placeholder", t0()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("location")));
    }

    #[test]
    fn found_claim_approve_scenario() {
        let mut item = found_item("Alice");
        let mut claim = claimed(&mut item, "Bob", t0());
        assert_eq!(item.status, ItemStatus::Pending);
        assert_eq!(claim.status, ClaimStatus::Pending);

        let plan = plan_approval(&item, &claim, t0() + Duration::hours(1)).unwrap();
        plan.change.apply(&mut item, Some(plan.provenance.clone())).unwrap();
        plan.claim.apply(&mut claim).unwrap();

        assert_eq!(item.status, ItemStatus::Returned);
        assert_eq!(item.sender_name(), Some("Alice"));
        assert_eq!(item.recipient_name(), Some("Bob"));
        assert_eq!(claim.status, ClaimStatus::Approved);
    }

    #[test]
    fn approval_plan_fails_once_its_claim_was_reviewed() {
        let mut item = found_item("Alice");
        let mut first = claimed(&mut item, "Mallory", t0());
        let approval = plan_approval(&item, &first, t0()).unwrap();

        // Meanwhile: reject the first claim, and a second claimant puts the item back to Pending.
        let rejection = plan_rejection(&item, Some(&first)).unwrap();
        rejection.change.apply(&mut item, None).unwrap();
        rejection.claim.unwrap().apply(&mut first).unwrap();
        claimed(&mut item, "Bob", t0() + Duration::minutes(1));

        // The item-level precondition holds again; the claim-level one does not.
        let mut current = item.clone();
        approval.change.apply(&mut current, Some(approval.provenance.clone())).unwrap();
        let err = approval.claim.apply(&mut first).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(msg) if msg.contains("Rejected")));
        assert_eq!(first.status, ClaimStatus::Rejected);
    }

    #[test]
    fn claims_on_lost_items_are_found_reports() {
        let mut item =
            report(report_cmd(ReportKind::Lost, "Dana"), ItemId::new(), "placeholder", t0()).unwrap();
        let (change, _claim) = open_claim(&item, claim_cmd("Eve"), ClaimId::new(), t0()).unwrap();

        assert_eq!(change.expected, ItemStatus::Lost);
        change.apply(&mut item, None).unwrap();
        assert_eq!(item.status, ItemStatus::Pending);
    }

    #[test]
    fn second_claim_while_pending_conflicts() {
        let mut item = found_item("Alice");
        claimed(&mut item, "Bob", t0());

        let err = open_claim(&item, claim_cmd("Mallory"), ClaimId::new(), t0()).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn claims_against_returned_items_report_already_resolved() {
        let mut item = found_item("Alice");
        let claim = claimed(&mut item, "Bob", t0());
        let plan = plan_approval(&item, &claim, t0()).unwrap();
        plan.change.apply(&mut item, Some(plan.provenance)).unwrap();

        let err = open_claim(&item, claim_cmd("Mallory"), ClaimId::new(), t0()).unwrap_err();
        assert_eq!(err, DomainError::conflict("item already resolved"));
    }

    #[test]
    fn re_approval_is_rejected() {
        let mut item = found_item("Alice");
        let claim = claimed(&mut item, "Bob", t0());
        let plan = plan_approval(&item, &claim, t0()).unwrap();
        plan.change.apply(&mut item, Some(plan.provenance)).unwrap();

        let err = plan_approval(&item, &claim, t0()).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(item.recipient_name(), Some("Bob"));
    }

    #[test]
    fn stale_plan_fails_compare_and_swap() {
        let mut item = found_item("Alice");
        let claim = claimed(&mut item, "Bob", t0());

        // Two approvals decided against the same Pending snapshot.
        let first = plan_approval(&item, &claim, t0()).unwrap();
        let second = plan_approval(&item, &claim, t0()).unwrap();

        first.change.apply(&mut item, Some(first.provenance)).unwrap();
        let err = second.change.apply(&mut item, Some(second.provenance)).unwrap_err();
        assert_eq!(err, DomainError::conflict("item already resolved"));
    }

    #[test]
    fn resolve_claim_without_any_claim_is_not_found() {
        let item = found_item("Alice");
        let err = resolve_claim(&item, None, None).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn resolve_claim_rejects_claims_of_other_items() {
        let mut item = found_item("Alice");
        let mut other = found_item("Zed");
        let foreign = claimed(&mut other, "Bob", t0());
        claimed(&mut item, "Carl", t0());

        let err = resolve_claim(&item, Some(foreign.id), Some(foreign)).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn latest_claim_breaks_timestamp_ties_by_id() {
        let item = found_item("Alice");
        let at = t0();
        let mut claims: Vec<Claim> = (0..3)
            .map(|_| open_claim(&item, claim_cmd("Bob"), ClaimId::new(), at).unwrap().1)
            .collect();
        claims.sort_by_key(|c| c.id);
        let highest = claims.last().unwrap().id;
        claims.reverse();

        assert_eq!(latest_claim(&claims).unwrap().id, highest);
    }

    #[test]
    fn latest_pending_claim_skips_reviewed_claims() {
        let item = found_item("Alice");
        let (_, older) = open_claim(&item, claim_cmd("Bob"), ClaimId::new(), t0()).unwrap();
        let (_, mut newer) =
            open_claim(&item, claim_cmd("Carl"), ClaimId::new(), t0() + Duration::minutes(5)).unwrap();
        newer.status = ClaimStatus::Rejected;

        let claims = vec![older.clone(), newer];
        assert_eq!(latest_pending_claim(&claims).unwrap().id, older.id);
    }

    #[test]
    fn rejection_reverts_to_reported_status() {
        let mut lost =
            report(report_cmd(ReportKind::Lost, "Dana"), ItemId::new(), "placeholder", t0()).unwrap();
        plan_mark_found(&lost).unwrap().apply(&mut lost, None).unwrap();

        let plan = plan_rejection(&lost, None).unwrap();
        assert_eq!(plan.change.next, ItemStatus::Lost);
        assert_eq!(plan.claim, None);

        let mut found = found_item("Alice");
        let claim = claimed(&mut found, "Bob", t0());
        let plan = plan_rejection(&found, Some(&claim)).unwrap();
        assert_eq!(plan.change.next, ItemStatus::Found);
        assert_eq!(plan.claim.map(|c| c.claim_id), Some(claim.id));
        assert_eq!(plan.claim.map(|c| c.next), Some(ClaimStatus::Rejected));
    }

    #[test]
    fn mark_found_only_applies_to_lost_items() {
        let item = found_item("Alice");
        assert!(matches!(plan_mark_found(&item).unwrap_err(), DomainError::Conflict(_)));
    }

    #[test]
    fn override_cannot_enter_or_leave_returned() {
        let mut item = found_item("Alice");
        assert!(matches!(
            plan_override(&item, ItemStatus::Returned).unwrap_err(),
            DomainError::Validation(_)
        ));

        let claim = claimed(&mut item, "Bob", t0());
        let plan = plan_approval(&item, &claim, t0()).unwrap();
        plan.change.apply(&mut item, Some(plan.provenance)).unwrap();

        assert!(matches!(
            plan_override(&item, ItemStatus::Found).unwrap_err(),
            DomainError::Conflict(_)
        ));
    }

    #[test]
    fn provenance_is_only_accepted_with_returned() {
        let mut item = found_item("Alice");
        let change = plan_override(&item, ItemStatus::Lost).unwrap();
        let provenance = Provenance {
            sender_name: "Alice".to_string(),
            recipient_name: "Bob".to_string(),
            returned_at: t0(),
        };

        assert!(change.apply(&mut item, Some(provenance)).is_err());
        assert_eq!(item.status, ItemStatus::Found);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Property: arbitrary request sequences never break the item invariants.
    // ─────────────────────────────────────────────────────────────────────

    #[derive(Debug, Clone)]
    enum Action {
        Claim(usize),
        MarkFound,
        ApproveLatest,
        ApproveNth(usize),
        Reject,
        Override(usize),
    }

    fn action() -> impl Strategy<Value = Action> {
        prop_oneof![
            (0usize..4).prop_map(Action::Claim),
            Just(Action::MarkFound),
            Just(Action::ApproveLatest),
            (0usize..8).prop_map(Action::ApproveNth),
            Just(Action::Reject),
            (0usize..4).prop_map(Action::Override),
        ]
    }

    const CLAIMERS: [&str; 4] = ["Bob", "Carl", "Dora", "Eli"];

    fn step(item: &mut Item, claims: &mut Vec<Claim>, action: Action, at: DateTime<Utc>) {
        match action {
            Action::Claim(who) => {
                if let Ok((change, claim)) =
                    open_claim(item, claim_cmd(CLAIMERS[who]), ClaimId::new(), at)
                {
                    change.apply(item, None).unwrap();
                    claims.push(claim);
                }
            }
            Action::MarkFound => {
                if let Ok(change) = plan_mark_found(item) {
                    change.apply(item, None).unwrap();
                }
            }
            Action::ApproveLatest | Action::ApproveNth(_) => {
                let (requested, found) = match action {
                    Action::ApproveNth(n) => {
                        let c = claims.get(n).cloned();
                        (c.as_ref().map(|c| c.id), c)
                    }
                    _ => (None, latest_claim(claims).cloned()),
                };
                let Ok(claim) = resolve_claim(item, requested, found) else {
                    return;
                };
                if let Ok(plan) = plan_approval(item, &claim, at) {
                    plan.change.apply(item, Some(plan.provenance)).unwrap();
                    let stored = claims.iter_mut().find(|c| c.id == plan.claim.claim_id).unwrap();
                    plan.claim.apply(stored).unwrap();
                }
            }
            Action::Reject => {
                let target = latest_pending_claim(claims).cloned();
                if let Ok(plan) = plan_rejection(item, target.as_ref()) {
                    plan.change.apply(item, None).unwrap();
                    if let Some(change) = plan.claim {
                        let stored = claims.iter_mut().find(|c| c.id == change.claim_id).unwrap();
                        change.apply(stored).unwrap();
                    }
                }
            }
            Action::Override(n) => {
                if let Ok(change) = plan_override(item, ItemStatus::ALL[n]) {
                    change.apply(item, None).unwrap();
                }
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        #[test]
        fn lifecycle_invariants_hold_for_any_request_sequence(
            found in any::<bool>(),
            actions in prop::collection::vec(action(), 1..40)
        ) {
            let kind = if found { ReportKind::Found } else { ReportKind::Lost };
            let mut item = report(report_cmd(kind, "Alice"), ItemId::new(), "placeholder", t0()).unwrap();
            let mut claims: Vec<Claim> = Vec::new();
            let mut was_returned = false;
            let mut first_recipient: Option<String> = None;

            for (i, action) in actions.into_iter().enumerate() {
                step(&mut item, &mut claims, action, t0() + Duration::seconds(i as i64));

                prop_assert!(ItemStatus::ALL.contains(&item.status));
                prop_assert!(item.check_invariants().is_ok());

                let approved: Vec<&Claim> =
                    claims.iter().filter(|c| c.status == ClaimStatus::Approved).collect();
                prop_assert!(approved.len() <= 1);

                if was_returned {
                    prop_assert_eq!(item.status, ItemStatus::Returned);
                    prop_assert_eq!(item.recipient_name().map(str::to_string), first_recipient.clone());
                }
                if item.is_resolved() {
                    prop_assert_eq!(approved.len(), 1);
                    prop_assert_eq!(item.sender_name(), Some("Alice"));
                    prop_assert_eq!(item.recipient_name(), Some(approved[0].claimer_name.as_str()));
                    if !was_returned {
                        first_recipient = item.recipient_name().map(str::to_string);
                    }
                    was_returned = true;
                }
            }
        }
    }
}
