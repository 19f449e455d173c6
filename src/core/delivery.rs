//! Delivery & dispute workflow - dispatch, dispute window, deemed delivery.
//!
//! After procurement, a purchase request enters the physical delivery
//! timeline: an admin marks it dispatched, which opens a contractual dispute
//! window (default 48 hours, clamped to [24, 72]). The contractor may raise a
//! dispute before the deadline; otherwise a scheduled sweep treats the
//! delivery as accepted ("deemed delivery") and triggers invoice generation.
//!
//! The sweep claims each row with a conditional UPDATE before calling the
//! external invoice generator, so two overlapping sweep runs cannot invoice
//! the same request twice.

use crate::{
    config::{MAX_DISPUTE_WINDOW_HOURS, MIN_DISPUTE_WINDOW_HOURS},
    entities::{PurchaseRequest, enums::DeliveryStatus, purchase_request},
    errors::{Error, Result},
};
use chrono::{Duration, Utc};
use sea_orm::{QueryOrder, Set, prelude::*, sea_query::Expr};
use serde::Serialize;
use tracing::{info, warn};

/// External collaborator that turns a deemed-delivered purchase request into
/// an invoice. Failures are reported as opaque message strings; the sweep
/// never retries them.
pub trait InvoiceGenerator {
    fn generate(
        &self,
        purchase_request_id: i64,
    ) -> impl Future<Output = std::result::Result<(), String>> + Send;
}

/// Production stand-in for the invoicing service: records the call in the
/// log and acknowledges. Swap point for a real downstream client.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcknowledgingInvoiceGenerator;

impl InvoiceGenerator for AcknowledgingInvoiceGenerator {
    async fn generate(&self, purchase_request_id: i64) -> std::result::Result<(), String> {
        info!(purchase_request_id, "invoice generation acknowledged");
        Ok(())
    }
}

/// Clamps a requested dispute window into the contractual [24, 72] hour
/// range; `None` (or absent input) means `default_hours` (the deployment's
/// `DEFAULT_DISPUTE_WINDOW_HOURS`), itself clamped.
#[must_use]
pub fn clamp_dispute_window(hours: Option<i64>, default_hours: i64) -> i64 {
    hours
        .unwrap_or(default_hours)
        .clamp(MIN_DISPUTE_WINDOW_HOURS, MAX_DISPUTE_WINDOW_HOURS)
}

/// Marks a purchase request dispatched and opens its dispute window.
///
/// `default_window_hours` comes from [`crate::config::AppConfig`] and is used
/// when the dispatching admin supplies no explicit window. Fails with a state
/// error naming the current delivery status unless the request is exactly
/// `not_dispatched`.
pub async fn dispatch(
    db: &DatabaseConnection,
    request_id: i64,
    window_hours: Option<i64>,
    default_window_hours: i64,
) -> Result<purchase_request::Model> {
    let request = PurchaseRequest::find_by_id(request_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("purchase request", request_id))?;
    let next = request.delivery_status.transition(DeliveryStatus::Dispatched)?;

    let effective_hours = clamp_dispute_window(window_hours, default_window_hours);
    let now = Utc::now();

    let mut active: purchase_request::ActiveModel = request.into();
    active.delivery_status = Set(next);
    active.dispatched_at = Set(Some(now));
    active.dispute_deadline = Set(Some(now + Duration::hours(effective_hours)));
    let updated = active.update(db).await?;

    info!(
        request_id,
        effective_hours, "purchase request dispatched, dispute window open"
    );
    Ok(updated)
}

/// Who is raising a delivery dispute.
#[derive(Debug, Clone)]
pub enum DisputeRaiser {
    /// Platform admin; may dispute any request
    Admin,
    /// Contractor; may only dispute requests they own
    Contractor(String),
}

/// Records a dispute on a dispatched request before its deadline lapses.
pub async fn raise_dispute(
    db: &DatabaseConnection,
    request_id: i64,
    reason: &str,
    raised_by: &DisputeRaiser,
) -> Result<purchase_request::Model> {
    if reason.trim().is_empty() {
        return Err(Error::validation("dispute reason cannot be empty"));
    }

    let request = PurchaseRequest::find_by_id(request_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("purchase request", request_id))?;
    if let DisputeRaiser::Contractor(contractor_id) = raised_by {
        if &request.contractor_id != contractor_id {
            return Err(Error::not_found("purchase request", request_id));
        }
    }

    let next = request.delivery_status.transition(DeliveryStatus::Disputed)?;

    let now = Utc::now();
    match request.dispute_deadline {
        Some(deadline) if now < deadline => {}
        Some(deadline) => {
            return Err(Error::state(
                "raise dispute",
                format!("dispatched, window lapsed at {deadline}"),
            ));
        }
        None => {
            return Err(Error::state("raise dispute", request.delivery_status));
        }
    }

    let mut active: purchase_request::ActiveModel = request.into();
    active.delivery_status = Set(next);
    active.dispute_reason = Set(Some(reason.trim().to_string()));
    active.disputed_at = Set(Some(now));
    let updated = active.update(db).await?;

    info!(request_id, "delivery dispute raised");
    Ok(updated)
}

/// Read-only listing of every request that has entered the delivery
/// timeline, newest dispatch first.
pub async fn list_deliveries(
    db: &DatabaseConnection,
    status: Option<DeliveryStatus>,
    contractor_id: Option<&str>,
) -> Result<Vec<purchase_request::Model>> {
    let mut query = PurchaseRequest::find()
        .filter(purchase_request::Column::DeliveryStatus.ne(DeliveryStatus::NotDispatched));
    if let Some(status) = status {
        query = query.filter(purchase_request::Column::DeliveryStatus.eq(status));
    }
    if let Some(contractor_id) = contractor_id {
        query = query.filter(purchase_request::Column::ContractorId.eq(contractor_id));
    }
    query
        .order_by_desc(purchase_request::Column::DispatchedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Per-request outcome of one deemed-delivery sweep.
#[derive(Debug, Clone, Serialize)]
pub struct SweepOutcome {
    pub purchase_request_id: i64,
    pub success: bool,
    /// Opaque message from the invoice generator when `success` is false
    pub error: Option<String>,
}

/// Aggregate result of one deemed-delivery sweep run.
#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    /// Candidates the run attempted (claimed rows only)
    pub processed: usize,
    pub invoices_generated: usize,
    pub failures: usize,
    pub outcomes: Vec<SweepOutcome>,
}

/// Scans dispatched requests whose dispute deadline has lapsed without a
/// dispute and triggers invoice generation for each ("deemed delivery").
///
/// Each candidate is claimed by a conditional UPDATE stamping
/// `invoice_generated_at` (guarded on `delivery_status = dispatched` and
/// `invoice_generated_at IS NULL`); a row another run already claimed is
/// skipped. A failed generator call un-claims the row and is reported in the
/// outcome list without halting the batch.
pub async fn run_deemed_delivery_sweep<G: InvoiceGenerator>(
    db: &DatabaseConnection,
    generator: &G,
) -> Result<SweepReport> {
    let now = Utc::now();
    let candidates = PurchaseRequest::find()
        .filter(purchase_request::Column::DeliveryStatus.eq(DeliveryStatus::Dispatched))
        .filter(purchase_request::Column::DisputeDeadline.lt(now))
        .filter(purchase_request::Column::InvoiceGeneratedAt.is_null())
        .all(db)
        .await?;

    let mut outcomes = Vec::with_capacity(candidates.len());
    let mut invoices_generated = 0usize;
    let mut failures = 0usize;

    for request in candidates {
        // Claim the row; a concurrent run that got here first wins.
        let claim = PurchaseRequest::update_many()
            .col_expr(
                purchase_request::Column::InvoiceGeneratedAt,
                Expr::value(Some(now)),
            )
            .filter(purchase_request::Column::Id.eq(request.id))
            .filter(purchase_request::Column::DeliveryStatus.eq(DeliveryStatus::Dispatched))
            .filter(purchase_request::Column::InvoiceGeneratedAt.is_null())
            .exec(db)
            .await?;
        if claim.rows_affected == 0 {
            continue;
        }

        match generator.generate(request.id).await {
            Ok(()) => {
                let next = request.delivery_status.transition(DeliveryStatus::Delivered)?;
                let mut active: purchase_request::ActiveModel = request.clone().into();
                active.delivery_status = Set(next);
                active.delivered_at = Set(Some(now));
                active.invoice_generated_at = Set(Some(now));
                active.update(db).await?;

                invoices_generated += 1;
                outcomes.push(SweepOutcome {
                    purchase_request_id: request.id,
                    success: true,
                    error: None,
                });
            }
            Err(message) => {
                // Un-claim so a later run retries this request.
                PurchaseRequest::update_many()
                    .col_expr(
                        purchase_request::Column::InvoiceGeneratedAt,
                        Expr::value(None::<chrono::DateTime<Utc>>),
                    )
                    .filter(purchase_request::Column::Id.eq(request.id))
                    .exec(db)
                    .await?;

                warn!(
                    purchase_request_id = request.id,
                    %message,
                    "invoice generation failed during deemed-delivery sweep"
                );
                failures += 1;
                outcomes.push(SweepOutcome {
                    purchase_request_id: request.id,
                    success: false,
                    error: Some(message),
                });
            }
        }
    }

    let report = SweepReport {
        processed: outcomes.len(),
        invoices_generated,
        failures,
        outcomes,
    };
    info!(
        processed = report.processed,
        invoices_generated = report.invoices_generated,
        failures = report.failures,
        "deemed-delivery sweep finished"
    );
    Ok(report)
}
