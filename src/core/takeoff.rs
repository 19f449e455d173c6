//! Takeoff verification workflow - contractor submission and admin review.
//!
//! Contractors upload quantity takeoffs derived from architectural drawings;
//! admins move them through pending → verified / disputed / revision_required.
//! Bulk review applies identical field semantics to a list of takeoffs and
//! reports per-item outcomes instead of failing the whole batch.

use crate::{
    entities::{BoqTakeoff, boq_takeoff, enums::VerificationStatus},
    errors::{Error, Result},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{Set, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Admin decision fields applied to one takeoff (single or bulk review).
#[derive(Debug, Clone, Deserialize)]
pub struct TakeoffReview {
    pub status: VerificationStatus,
    /// Optional admin override of the takeoff quantity
    pub verified_quantity: Option<Decimal>,
    /// Optional estimated unit rate
    pub estimated_rate: Option<Decimal>,
    pub admin_notes: Option<String>,
}

/// Marks an existing takeoff as pending verification.
///
/// The takeoff row must already exist for (project, file name, contractor);
/// submission never creates one. Fails with not-found otherwise.
pub async fn submit_for_verification(
    db: &DatabaseConnection,
    project_id: i64,
    contractor_id: &str,
    file_name: &str,
) -> Result<boq_takeoff::Model> {
    let takeoff = BoqTakeoff::find()
        .filter(boq_takeoff::Column::ProjectId.eq(project_id))
        .filter(boq_takeoff::Column::ContractorId.eq(contractor_id))
        .filter(boq_takeoff::Column::FileName.eq(file_name))
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("takeoff", format!("{project_id}/{file_name}")))?;

    let next = takeoff
        .verification_status
        .transition(VerificationStatus::Pending)?;

    let mut active: boq_takeoff::ActiveModel = takeoff.into();
    active.verification_status = Set(next);
    active.submitted_at = Set(Some(Utc::now()));
    let updated = active.update(db).await?;

    info!(takeoff_id = updated.id, project_id, "takeoff submitted for verification");
    Ok(updated)
}

/// Applies one admin review to a pending takeoff.
///
/// The verified-quantity override is accepted without bounds-checking against
/// the submitted item count; an override larger than the submitted count is
/// logged at WARN so it can be audited.
pub async fn review(
    db: &DatabaseConnection,
    takeoff_id: i64,
    decision: &TakeoffReview,
    admin_id: &str,
) -> Result<boq_takeoff::Model> {
    let takeoff = BoqTakeoff::find_by_id(takeoff_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("takeoff", takeoff_id))?;
    apply_review(db, takeoff, decision, admin_id).await
}

async fn apply_review(
    db: &DatabaseConnection,
    takeoff: boq_takeoff::Model,
    decision: &TakeoffReview,
    admin_id: &str,
) -> Result<boq_takeoff::Model> {
    let next = takeoff.verification_status.transition(decision.status)?;

    if let Some(quantity) = decision.verified_quantity {
        if quantity < Decimal::ZERO {
            return Err(Error::validation(format!(
                "verified quantity cannot be negative, got {quantity}"
            )));
        }
        if quantity > Decimal::from(takeoff.item_count) {
            warn!(
                takeoff_id = takeoff.id,
                %quantity,
                item_count = takeoff.item_count,
                "verified quantity override exceeds submitted item count"
            );
        }
    }

    let mut active: boq_takeoff::ActiveModel = takeoff.into();
    active.verification_status = Set(next);
    active.verified_quantity = Set(decision.verified_quantity);
    active.estimated_rate = Set(decision.estimated_rate);
    active.admin_notes = Set(decision.admin_notes.clone());
    active.verified_by = Set(Some(admin_id.to_string()));
    active.verified_at = Set(Some(Utc::now()));
    active.update(db).await.map_err(Into::into)
}

/// Per-takeoff outcome of a bulk review.
#[derive(Debug, Clone, Serialize)]
pub struct BulkReviewOutcome {
    pub takeoff_id: i64,
    pub success: bool,
    pub error: Option<String>,
}

/// Aggregate result of a bulk review pass.
#[derive(Debug, Clone, Serialize)]
pub struct BulkReviewReport {
    pub reviewed: usize,
    pub failures: usize,
    pub outcomes: Vec<BulkReviewOutcome>,
}

/// Applies the same review decision to a list of takeoffs.
///
/// Each takeoff succeeds or fails independently; one bad id never blocks the
/// rest of the batch.
pub async fn bulk_review(
    db: &DatabaseConnection,
    takeoff_ids: &[i64],
    decision: &TakeoffReview,
    admin_id: &str,
) -> Result<BulkReviewReport> {
    if takeoff_ids.is_empty() {
        return Err(Error::validation("bulk review requires at least one takeoff id"));
    }

    let mut outcomes = Vec::with_capacity(takeoff_ids.len());
    let mut reviewed = 0usize;
    let mut failures = 0usize;

    for &takeoff_id in takeoff_ids {
        match review(db, takeoff_id, decision, admin_id).await {
            Ok(_) => {
                reviewed += 1;
                outcomes.push(BulkReviewOutcome {
                    takeoff_id,
                    success: true,
                    error: None,
                });
            }
            // Database failures abort the batch; domain failures are per-item.
            Err(err @ Error::Database(_)) => return Err(err),
            Err(err) => {
                failures += 1;
                outcomes.push(BulkReviewOutcome {
                    takeoff_id,
                    success: false,
                    error: Some(err.to_string()),
                });
            }
        }
    }

    Ok(BulkReviewReport {
        reviewed,
        failures,
        outcomes,
    })
}

/// Live takeoff counts by verification status, for dashboards.
///
/// Computed from current row states on every call; never cached.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VerificationSummary {
    pub pending: u64,
    pub verified: u64,
    pub disputed: u64,
    pub revision_required: u64,
}

pub async fn verification_summary(
    db: &DatabaseConnection,
    project_id: Option<i64>,
) -> Result<VerificationSummary> {
    let count_for = |status: VerificationStatus| {
        let mut query =
            BoqTakeoff::find().filter(boq_takeoff::Column::VerificationStatus.eq(status));
        if let Some(project_id) = project_id {
            query = query.filter(boq_takeoff::Column::ProjectId.eq(project_id));
        }
        query.count(db)
    };

    Ok(VerificationSummary {
        pending: count_for(VerificationStatus::Pending).await?,
        verified: count_for(VerificationStatus::Verified).await?,
        disputed: count_for(VerificationStatus::Disputed).await?,
        revision_required: count_for(VerificationStatus::RevisionRequired).await?,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use rust_decimal::Decimal;

    fn verified_review(notes: &str) -> TakeoffReview {
        TakeoffReview {
            status: VerificationStatus::Verified,
            verified_quantity: None,
            estimated_rate: None,
            admin_notes: Some(notes.to_string()),
        }
    }

    #[tokio::test]
    async fn test_submit_requires_existing_row() -> Result<()> {
        let (db, project) = setup_with_project().await?;

        let err = submit_for_verification(&db, project.id, TEST_CONTRACTOR, "missing.pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_submit_sets_pending_and_timestamp() -> Result<()> {
        let (db, project) = setup_with_project().await?;
        let takeoff = create_test_takeoff(&db, project.id, "ground-floor.pdf").await?;
        assert_eq!(takeoff.verification_status, VerificationStatus::None);

        let submitted =
            submit_for_verification(&db, project.id, TEST_CONTRACTOR, "ground-floor.pdf").await?;
        assert_eq!(submitted.verification_status, VerificationStatus::Pending);
        assert!(submitted.submitted_at.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_submit_does_not_match_foreign_contractor() -> Result<()> {
        let (db, project) = setup_with_project().await?;
        create_test_takeoff(&db, project.id, "ground-floor.pdf").await?;

        let err = submit_for_verification(&db, project.id, "someone_else", "ground-floor.pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_single_review() -> Result<()> {
        let (db, takeoff) = setup_with_pending_takeoff().await?;

        let decision = TakeoffReview {
            status: VerificationStatus::Verified,
            verified_quantity: Some(Decimal::from(12)),
            estimated_rate: Some(Decimal::from(450)),
            admin_notes: Some("checked against drawing rev C".to_string()),
        };
        let reviewed = review(&db, takeoff.id, &decision, TEST_ADMIN).await?;

        assert_eq!(reviewed.verification_status, VerificationStatus::Verified);
        assert_eq!(reviewed.verified_quantity, Some(Decimal::from(12)));
        assert_eq!(reviewed.verified_by.as_deref(), Some(TEST_ADMIN));
        assert!(reviewed.verified_at.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_review_rejects_negative_override() -> Result<()> {
        let (db, takeoff) = setup_with_pending_takeoff().await?;

        let decision = TakeoffReview {
            status: VerificationStatus::Verified,
            verified_quantity: Some(Decimal::from(-5)),
            estimated_rate: None,
            admin_notes: None,
        };
        let err = review(&db, takeoff.id, &decision, TEST_ADMIN).await.unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_review_requires_pending() -> Result<()> {
        let (db, project) = setup_with_project().await?;
        let takeoff = create_test_takeoff(&db, project.id, "plan.pdf").await?;

        let err = review(&db, takeoff.id, &verified_review("n/a"), TEST_ADMIN)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::State { ref current, .. } if current == "none"));
        Ok(())
    }

    #[tokio::test]
    async fn test_resubmission_after_revision_required() -> Result<()> {
        let (db, takeoff) = setup_with_pending_takeoff().await?;

        let decision = TakeoffReview {
            status: VerificationStatus::RevisionRequired,
            verified_quantity: None,
            estimated_rate: None,
            admin_notes: Some("missing basement sheets".to_string()),
        };
        review(&db, takeoff.id, &decision, TEST_ADMIN).await?;

        let resubmitted =
            submit_for_verification(&db, takeoff.project_id, TEST_CONTRACTOR, &takeoff.file_name)
                .await?;
        assert_eq!(resubmitted.verification_status, VerificationStatus::Pending);
        Ok(())
    }

    #[tokio::test]
    async fn test_bulk_review_applies_same_fields() -> Result<()> {
        let (db, project) = setup_with_project().await?;
        let mut ids = Vec::new();
        for name in ["a.pdf", "b.pdf", "c.pdf"] {
            create_test_takeoff(&db, project.id, name).await?;
            let t = submit_for_verification(&db, project.id, TEST_CONTRACTOR, name).await?;
            ids.push(t.id);
        }

        let report = bulk_review(&db, &ids, &verified_review("bulk pass"), TEST_ADMIN).await?;
        assert_eq!(report.reviewed, 3);
        assert_eq!(report.failures, 0);

        for id in ids {
            let stored = BoqTakeoff::find_by_id(id).one(&db).await?.unwrap();
            assert_eq!(stored.verification_status, VerificationStatus::Verified);
            assert_eq!(stored.admin_notes.as_deref(), Some("bulk pass"));
            assert_eq!(stored.verified_by.as_deref(), Some(TEST_ADMIN));
            assert!(stored.verified_at.is_some());
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_bulk_review_isolates_bad_ids() -> Result<()> {
        let (db, takeoff) = setup_with_pending_takeoff().await?;

        let report = bulk_review(
            &db,
            &[takeoff.id, 9999],
            &verified_review("partial"),
            TEST_ADMIN,
        )
        .await?;
        assert_eq!(report.reviewed, 1);
        assert_eq!(report.failures, 1);
        let failed = report.outcomes.iter().find(|o| !o.success).unwrap();
        assert_eq!(failed.takeoff_id, 9999);
        assert!(failed.error.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_verification_summary_counts_live_state() -> Result<()> {
        let (db, project) = setup_with_project().await?;
        for name in ["a.pdf", "b.pdf", "c.pdf"] {
            create_test_takeoff(&db, project.id, name).await?;
            submit_for_verification(&db, project.id, TEST_CONTRACTOR, name).await?;
        }

        let before = verification_summary(&db, Some(project.id)).await?;
        assert_eq!(before.pending, 3);
        assert_eq!(before.verified, 0);

        let first = BoqTakeoff::find()
            .filter(boq_takeoff::Column::FileName.eq("a.pdf"))
            .one(&db)
            .await?
            .unwrap();
        review(&db, first.id, &verified_review("ok"), TEST_ADMIN).await?;

        let after = verification_summary(&db, Some(project.id)).await?;
        assert_eq!(after.pending, 2);
        assert_eq!(after.verified, 1);
        Ok(())
    }
}
