//! Investor capital management - payment submissions and capital transactions.
//!
//! Approval is the one genuinely multi-step write in the system: ensure the
//! investor's account exists, create the inflow capital transaction, then
//! link and approve the submission. All three steps run inside a single
//! database transaction so a crash can never leave an approved-looking
//! transaction unlinked from its submission.

use crate::{
    entities::{
        InvestorAccount, PaymentSubmission,
        capital_transaction,
        enums::{SubmissionStatus, TransactionStatus, TransactionType},
        investor_account, payment_submission,
    },
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Records an investor's payment proof as a pending submission.
pub async fn create_submission(
    db: &DatabaseConnection,
    investor_id: &str,
    amount: Decimal,
    payment_date: NaiveDate,
    method: &str,
    reference: Option<String>,
    proof_path: Option<String>,
) -> Result<payment_submission::Model> {
    if amount <= Decimal::ZERO {
        return Err(Error::validation(format!(
            "payment amount must be positive, got {amount}"
        )));
    }
    if method.trim().is_empty() {
        return Err(Error::validation("payment method cannot be empty"));
    }

    payment_submission::ActiveModel {
        investor_id: Set(investor_id.to_string()),
        amount: Set(amount),
        payment_date: Set(payment_date),
        method: Set(method.trim().to_string()),
        reference: Set(reference),
        proof_path: Set(proof_path),
        status: Set(SubmissionStatus::Pending),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Approves a pending submission: ensures the investor account exists,
/// creates a completed inflow capital transaction, and links it to the
/// submission - all in one database transaction.
pub async fn approve_submission(
    db: &DatabaseConnection,
    submission_id: i64,
    admin_id: &str,
    description: Option<String>,
) -> Result<payment_submission::Model> {
    let txn = db.begin().await?;

    let submission = PaymentSubmission::find_by_id(submission_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("payment submission", submission_id))?;
    if submission.status != SubmissionStatus::Pending {
        return Err(Error::state("approve payment submission", submission.status));
    }

    let account = ensure_account(&txn, &submission.investor_id).await?;

    let description = description
        .or_else(|| Some(format!("Capital inflow via {}", submission.method)));
    let transaction = capital_transaction::ActiveModel {
        investor_account_id: Set(account.id),
        transaction_type: Set(TransactionType::Inflow),
        amount: Set(submission.amount),
        status: Set(TransactionStatus::Completed),
        description: Set(description),
        transacted_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut active: payment_submission::ActiveModel = submission.into();
    active.status = Set(SubmissionStatus::Approved);
    active.reviewed_by = Set(Some(admin_id.to_string()));
    active.reviewed_at = Set(Some(Utc::now()));
    active.capital_transaction_id = Set(Some(transaction.id));
    let updated = active.update(&txn).await?;

    txn.commit().await?;
    info!(
        submission_id,
        capital_transaction_id = transaction.id,
        "payment submission approved"
    );
    Ok(updated)
}

/// Rejects a pending submission. No side effects beyond status and notes.
pub async fn reject_submission(
    db: &DatabaseConnection,
    submission_id: i64,
    admin_id: &str,
    notes: Option<String>,
) -> Result<payment_submission::Model> {
    let submission = PaymentSubmission::find_by_id(submission_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("payment submission", submission_id))?;
    if submission.status != SubmissionStatus::Pending {
        return Err(Error::state("reject payment submission", submission.status));
    }

    let mut active: payment_submission::ActiveModel = submission.into();
    active.status = Set(SubmissionStatus::Rejected);
    active.review_notes = Set(notes);
    active.reviewed_by = Set(Some(admin_id.to_string()));
    active.reviewed_at = Set(Some(Utc::now()));
    active.update(db).await.map_err(Into::into)
}

/// Finds or creates the capital account for an investor.
async fn ensure_account<C>(db: &C, investor_id: &str) -> Result<investor_account::Model>
where
    C: ConnectionTrait,
{
    let existing = InvestorAccount::find()
        .filter(investor_account::Column::InvestorId.eq(investor_id))
        .one(db)
        .await?;
    if let Some(account) = existing {
        return Ok(account);
    }

    investor_account::ActiveModel {
        investor_id: Set(investor_id.to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::CapitalTransaction;
    use crate::test_utils::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn test_create_submission_validates_amount() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_submission(
            &db,
            TEST_INVESTOR,
            Decimal::ZERO,
            date("2024-06-01"),
            "bank_transfer",
            None,
            None,
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_approve_missing_submission() -> Result<()> {
        // Configure MockDatabase to return no submission (simulating not found)
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([Vec::<payment_submission::Model>::new()])
            .into_connection();

        let err = approve_submission(&db, 999, TEST_ADMIN, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_approval_creates_and_links_inflow() -> Result<()> {
        let db = setup_test_db().await?;
        let submission = create_submission(
            &db,
            TEST_INVESTOR,
            Decimal::from(50_000),
            date("2024-06-01"),
            "bank_transfer",
            Some("UTR-881".to_string()),
            None,
        )
        .await?;
        assert_eq!(submission.status, SubmissionStatus::Pending);

        let approved = approve_submission(&db, submission.id, TEST_ADMIN, None).await?;
        assert_eq!(approved.status, SubmissionStatus::Approved);
        assert_eq!(approved.reviewed_by.as_deref(), Some(TEST_ADMIN));

        let transaction_id = approved.capital_transaction_id.unwrap();
        let transaction = CapitalTransaction::find_by_id(transaction_id)
            .one(&db)
            .await?
            .unwrap();
        assert_eq!(transaction.transaction_type, TransactionType::Inflow);
        assert_eq!(transaction.amount, Decimal::from(50_000));
        assert_eq!(transaction.status, TransactionStatus::Completed);
        assert_eq!(
            transaction.description.as_deref(),
            Some("Capital inflow via bank_transfer")
        );

        // The account was created lazily for this investor.
        let account = InvestorAccount::find_by_id(transaction.investor_account_id)
            .one(&db)
            .await?
            .unwrap();
        assert_eq!(account.investor_id, TEST_INVESTOR);
        Ok(())
    }

    #[tokio::test]
    async fn test_approval_reuses_existing_account() -> Result<()> {
        let db = setup_test_db().await?;
        let first = create_submission(
            &db,
            TEST_INVESTOR,
            Decimal::from(10_000),
            date("2024-06-01"),
            "bank_transfer",
            None,
            None,
        )
        .await?;
        let second = create_submission(
            &db,
            TEST_INVESTOR,
            Decimal::from(20_000),
            date("2024-07-01"),
            "upi",
            None,
            None,
        )
        .await?;

        approve_submission(&db, first.id, TEST_ADMIN, None).await?;
        approve_submission(&db, second.id, TEST_ADMIN, None).await?;

        let accounts = InvestorAccount::find().all(&db).await?;
        assert_eq!(accounts.len(), 1);
        let transactions = CapitalTransaction::find().all(&db).await?;
        assert_eq!(transactions.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_double_approval_is_state_error() -> Result<()> {
        let db = setup_test_db().await?;
        let submission = create_submission(
            &db,
            TEST_INVESTOR,
            Decimal::from(5_000),
            date("2024-06-01"),
            "bank_transfer",
            None,
            None,
        )
        .await?;
        approve_submission(&db, submission.id, TEST_ADMIN, None).await?;

        let err = approve_submission(&db, submission.id, TEST_ADMIN, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::State { ref current, .. } if current == "approved"));

        // No second transaction was created.
        let transactions = CapitalTransaction::find().all(&db).await?;
        assert_eq!(transactions.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_rejection_has_no_side_effects() -> Result<()> {
        let db = setup_test_db().await?;
        let submission = create_submission(
            &db,
            TEST_INVESTOR,
            Decimal::from(5_000),
            date("2024-06-01"),
            "bank_transfer",
            None,
            None,
        )
        .await?;

        let rejected = reject_submission(
            &db,
            submission.id,
            TEST_ADMIN,
            Some("proof image unreadable".to_string()),
        )
        .await?;
        assert_eq!(rejected.status, SubmissionStatus::Rejected);
        assert_eq!(
            rejected.review_notes.as_deref(),
            Some("proof image unreadable")
        );
        assert!(rejected.capital_transaction_id.is_none());

        assert!(CapitalTransaction::find().all(&db).await?.is_empty());
        assert!(InvestorAccount::find().all(&db).await?.is_empty());
        Ok(())
    }
}
