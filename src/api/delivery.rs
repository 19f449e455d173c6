//! Delivery endpoints - dispatch, dispute, listing, and the scheduler-driven
//! deemed-delivery sweep.

use super::{AppState, auth};
use crate::{
    core::delivery::{self, DisputeRaiser},
    entities::enums::DeliveryStatus,
    errors::Result,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct DispatchBody {
    pub purchase_request_id: i64,
    /// Requested dispute window; clamped into [24, 72], falling back to the
    /// configured default. Typed as an integer: a non-numeric value is a 400
    /// at deserialization, not silently coerced to the default.
    pub dispute_window_hours: Option<i64>,
}

/// PATCH /admin/delivery - dispatch a request and open its dispute window.
pub async fn dispatch(
    State(state): State<AppState>,
    identity: auth::Identity,
    Json(body): Json<DispatchBody>,
) -> Result<Json<crate::entities::PurchaseRequestModel>> {
    identity.require_admin()?;
    let updated = delivery::dispatch(
        &state.db,
        body.purchase_request_id,
        body.dispute_window_hours,
        state.config.default_dispute_window_hours,
    )
    .await?;
    Ok(Json(updated))
}

#[derive(Debug, Deserialize)]
pub struct DisputeBody {
    pub reason: String,
}

/// POST /delivery/{id}/dispute - contractor or admin raises a dispute.
pub async fn dispute(
    State(state): State<AppState>,
    identity: auth::Identity,
    Path(request_id): Path<i64>,
    Json(body): Json<DisputeBody>,
) -> Result<Json<crate::entities::PurchaseRequestModel>> {
    let raiser = match identity.role {
        auth::Role::Admin => DisputeRaiser::Admin,
        auth::Role::Contractor => DisputeRaiser::Contractor(identity.user_id.clone()),
        auth::Role::Investor => {
            return Err(crate::errors::Error::Forbidden {
                required: "admin or contractor".to_string(),
            });
        }
    };
    let updated = delivery::raise_dispute(&state.db, request_id, &body.reason, &raiser).await?;
    Ok(Json(updated))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<DeliveryStatus>,
    pub contractor_id: Option<String>,
}

/// GET /admin/delivery - every request in the delivery timeline, newest
/// dispatch first.
pub async fn list(
    State(state): State<AppState>,
    identity: auth::Identity,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<crate::entities::PurchaseRequestModel>>> {
    identity.require_admin()?;
    let rows = delivery::list_deliveries(
        &state.db,
        query.status,
        query.contractor_id.as_deref(),
    )
    .await?;
    Ok(Json(rows))
}

/// GET /cron/check-deemed-delivery - scheduler-triggered sweep, bearer-secret
/// protected.
pub async fn cron_sweep(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<delivery::SweepReport>> {
    auth::require_cron_secret(&headers, &state.config.cron_secret)?;
    let report = delivery::run_deemed_delivery_sweep(&state.db, &state.invoice_generator).await?;
    Ok(Json(report))
}
