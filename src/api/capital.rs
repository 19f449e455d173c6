//! Investor capital endpoints - payment submissions and admin review.

use super::{AppState, auth::Identity};
use crate::{
    core::capital,
    errors::{Error, Result},
};
use axum::{Json, extract::State};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateSubmissionBody {
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    pub method: String,
    pub reference: Option<String>,
    pub proof_path: Option<String>,
}

/// POST /capital/payment-submissions - investor records a payment proof.
pub async fn create_submission(
    State(state): State<AppState>,
    identity: Identity,
    Json(body): Json<CreateSubmissionBody>,
) -> Result<Json<crate::entities::PaymentSubmissionModel>> {
    let investor_id = identity.require_investor()?;
    let submission = capital::create_submission(
        &state.db,
        investor_id,
        body.amount,
        body.payment_date,
        &body.method,
        body.reference,
        body.proof_path,
    )
    .await?;
    Ok(Json(submission))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    Approve,
    Reject,
}

#[derive(Debug, Deserialize)]
pub struct ReviewSubmissionBody {
    pub submission_id: i64,
    pub action: ReviewAction,
    /// Overriding transaction description on approve; review notes on reject
    pub notes: Option<String>,
}

/// PATCH /admin/capital/payment-submissions - approve or reject a pending
/// submission.
pub async fn review_submission(
    State(state): State<AppState>,
    identity: Identity,
    Json(body): Json<ReviewSubmissionBody>,
) -> Result<Json<crate::entities::PaymentSubmissionModel>> {
    let admin_id = identity.require_admin()?;
    if body.submission_id <= 0 {
        return Err(Error::validation("submission_id must be positive"));
    }

    let updated = match body.action {
        ReviewAction::Approve => {
            capital::approve_submission(&state.db, body.submission_id, admin_id, body.notes).await?
        }
        ReviewAction::Reject => {
            capital::reject_submission(&state.db, body.submission_id, admin_id, body.notes).await?
        }
    };
    Ok(Json(updated))
}
