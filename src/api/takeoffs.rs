//! Takeoff verification endpoints - contractor submission and admin review.

use super::{AppState, auth::Identity};
use crate::{
    core::takeoff::{self, TakeoffReview},
    entities::enums::VerificationStatus,
    errors::Result,
};
use axum::{
    Json,
    extract::{Query, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SubmitBody {
    pub project_id: i64,
    pub file_name: String,
}

/// POST /takeoff-verification - contractor submits an existing takeoff for
/// review.
pub async fn submit(
    State(state): State<AppState>,
    identity: Identity,
    Json(body): Json<SubmitBody>,
) -> Result<Json<crate::entities::TakeoffModel>> {
    let contractor_id = identity.require_contractor()?;
    let updated = takeoff::submit_for_verification(
        &state.db,
        body.project_id,
        contractor_id,
        &body.file_name,
    )
    .await?;
    Ok(Json(updated))
}

#[derive(Debug, Deserialize)]
pub struct SingleReviewBody {
    pub takeoff_id: i64,
    pub status: VerificationStatus,
    pub verified_quantity: Option<Decimal>,
    pub estimated_rate: Option<Decimal>,
    pub admin_notes: Option<String>,
}

/// PUT /admin/takeoff-verification - review one takeoff.
pub async fn review_single(
    State(state): State<AppState>,
    identity: Identity,
    Json(body): Json<SingleReviewBody>,
) -> Result<Json<crate::entities::TakeoffModel>> {
    let admin_id = identity.require_admin()?;
    let decision = TakeoffReview {
        status: body.status,
        verified_quantity: body.verified_quantity,
        estimated_rate: body.estimated_rate,
        admin_notes: body.admin_notes,
    };
    let updated = takeoff::review(&state.db, body.takeoff_id, &decision, admin_id).await?;
    Ok(Json(updated))
}

#[derive(Debug, Deserialize)]
pub struct BulkReviewBody {
    pub takeoff_ids: Vec<i64>,
    pub status: VerificationStatus,
    pub verified_quantity: Option<Decimal>,
    pub estimated_rate: Option<Decimal>,
    pub admin_notes: Option<String>,
}

/// POST /admin/takeoff-verification - review a batch of takeoffs with
/// identical field semantics, reporting per-item outcomes.
pub async fn review_bulk(
    State(state): State<AppState>,
    identity: Identity,
    Json(body): Json<BulkReviewBody>,
) -> Result<Json<takeoff::BulkReviewReport>> {
    let admin_id = identity.require_admin()?;
    let decision = TakeoffReview {
        status: body.status,
        verified_quantity: body.verified_quantity,
        estimated_rate: body.estimated_rate,
        admin_notes: body.admin_notes,
    };
    let report = takeoff::bulk_review(&state.db, &body.takeoff_ids, &decision, admin_id).await?;
    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub project_id: Option<i64>,
}

/// GET /admin/takeoff-verification/summary - live counts by status.
pub async fn summary(
    State(state): State<AppState>,
    identity: Identity,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<takeoff::VerificationSummary>> {
    identity.require_admin()?;
    let summary = takeoff::verification_summary(&state.db, query.project_id).await?;
    Ok(Json(summary))
}
