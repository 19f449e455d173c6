//! Purchase request lifecycle - create, submit, review, fund.
//!
//! A purchase request aggregates line items against project materials and
//! moves draft → submitted → approved → funded → po_generated → completed
//! (or rejected). Status moves go through the central transition table on
//! [`RequestStatus`]. This module never mutates `ProjectMaterial` rows;
//! quantity rollups are always derived at read time (see
//! [`crate::core::availability`]).

use crate::{
    entities::{
        Project, ProjectMaterial, PurchaseRequest, PurchaseRequestItem,
        enums::{ItemStatus, RequestStatus},
        project, purchase_request, purchase_request_item,
    },
    errors::{Error, Result},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{Set, TransactionTrait, prelude::*};
use serde::Deserialize;
use tracing::info;

/// One requested material line in a draft purchase request.
#[derive(Debug, Clone, Deserialize)]
pub struct NewItem {
    pub project_material_id: i64,
    pub requested_qty: Decimal,
    pub unit_rate: Option<Decimal>,
    pub tax_percent: Option<Decimal>,
}

/// One admin decision on a line item during review.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemReview {
    pub item_id: i64,
    /// true = approve the line, false = reject it
    pub approve: bool,
    /// Approved quantity; defaults to the requested quantity when approving
    pub approved_qty: Option<Decimal>,
}

/// Creates a purchase request in `draft` status with its line items `pending`.
///
/// Fails with a validation error on an empty item list, a non-positive
/// requested quantity, or a material that does not belong to the given
/// project; fails with not-found when the project is absent or owned by a
/// different contractor. Request and items are inserted in one database
/// transaction.
pub async fn create_draft(
    db: &DatabaseConnection,
    project_id: i64,
    contractor_id: &str,
    remarks: Option<String>,
    items: Vec<NewItem>,
) -> Result<(
    purchase_request::Model,
    Vec<purchase_request_item::Model>,
)> {
    if items.is_empty() {
        return Err(Error::validation(
            "purchase request must contain at least one item",
        ));
    }
    for item in &items {
        if item.requested_qty <= Decimal::ZERO {
            return Err(Error::validation(format!(
                "requested quantity must be positive, got {} for material {}",
                item.requested_qty, item.project_material_id
            )));
        }
    }

    let txn = db.begin().await?;

    let project = Project::find_by_id(project_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("project", project_id))?;
    if project.contractor_id != contractor_id {
        return Err(Error::not_found("project", project_id));
    }

    // Every referenced material must sit on this project.
    for item in &items {
        let material = ProjectMaterial::find_by_id(item.project_material_id)
            .one(&txn)
            .await?
            .ok_or_else(|| Error::not_found("project material", item.project_material_id))?;
        if material.project_id != project_id {
            return Err(Error::validation(format!(
                "material {} does not belong to project {project_id}",
                item.project_material_id
            )));
        }
    }

    let now = Utc::now();
    let request = purchase_request::ActiveModel {
        project_id: Set(project_id),
        contractor_id: Set(contractor_id.to_string()),
        status: Set(RequestStatus::Draft),
        remarks: Set(remarks),
        created_at: Set(now),
        delivery_status: Set(crate::entities::enums::DeliveryStatus::NotDispatched),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut created_items = Vec::with_capacity(items.len());
    for item in items {
        let row = purchase_request_item::ActiveModel {
            purchase_request_id: Set(request.id),
            project_material_id: Set(item.project_material_id),
            requested_qty: Set(item.requested_qty),
            unit_rate: Set(item.unit_rate),
            tax_percent: Set(item.tax_percent),
            status: Set(ItemStatus::Pending),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        created_items.push(row);
    }

    txn.commit().await?;
    info!(
        request_id = request.id,
        project_id,
        items = created_items.len(),
        "created draft purchase request"
    );
    Ok((request, created_items))
}

/// Transitions a draft request to `submitted` and stamps the submission time.
pub async fn submit(
    db: &DatabaseConnection,
    request_id: i64,
    contractor_id: &str,
) -> Result<purchase_request::Model> {
    let request = find_owned(db, request_id, contractor_id).await?;
    let next = request.status.transition(RequestStatus::Submitted)?;

    let mut active: purchase_request::ActiveModel = request.into();
    active.status = Set(next);
    active.submitted_at = Set(Some(Utc::now()));
    active.update(db).await.map_err(Into::into)
}

/// Applies admin review decisions to line items of a submitted request.
///
/// Each approved quantity must be positive and no greater than the requested
/// quantity. The aggregate request becomes `approved` exactly when every item
/// carries a terminal review status; partial review leaves it `submitted`.
pub async fn review_items(
    db: &DatabaseConnection,
    request_id: i64,
    reviews: Vec<ItemReview>,
    admin_id: &str,
) -> Result<purchase_request::Model> {
    if reviews.is_empty() {
        return Err(Error::validation("review must cover at least one item"));
    }

    let txn = db.begin().await?;

    let request = PurchaseRequest::find_by_id(request_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("purchase request", request_id))?;
    if request.status != RequestStatus::Submitted {
        return Err(Error::state("review purchase request", request.status));
    }

    for review in &reviews {
        let item = PurchaseRequestItem::find_by_id(review.item_id)
            .one(&txn)
            .await?
            .ok_or_else(|| Error::not_found("purchase request item", review.item_id))?;
        if item.purchase_request_id != request_id {
            return Err(Error::validation(format!(
                "item {} does not belong to request {request_id}",
                review.item_id
            )));
        }

        let target = if review.approve {
            ItemStatus::Approved
        } else {
            ItemStatus::Rejected
        };
        let next = item.status.transition(target)?;

        let approved_qty = if review.approve {
            let qty = review.approved_qty.unwrap_or(item.requested_qty);
            if qty <= Decimal::ZERO || qty > item.requested_qty {
                return Err(Error::validation(format!(
                    "approved quantity {qty} must be in (0, {}] for item {}",
                    item.requested_qty, review.item_id
                )));
            }
            Some(qty)
        } else {
            None
        };

        let mut active: purchase_request_item::ActiveModel = item.into();
        active.status = Set(next);
        active.approved_qty = Set(approved_qty);
        active.update(&txn).await?;
    }

    // Aggregate status: approved iff every item has a terminal review status.
    let items = PurchaseRequestItem::find()
        .filter(purchase_request_item::Column::PurchaseRequestId.eq(request_id))
        .all(&txn)
        .await?;
    let all_reviewed = items.iter().all(|i| i.status.is_reviewed());

    let updated = if all_reviewed {
        let next = request.status.transition(RequestStatus::Approved)?;
        let mut active: purchase_request::ActiveModel = request.into();
        active.status = Set(next);
        active.approved_at = Set(Some(Utc::now()));
        active.approved_by = Set(Some(admin_id.to_string()));
        active.update(&txn).await?
    } else {
        request
    };

    txn.commit().await?;
    Ok(updated)
}

/// Rejects a submitted request outright, without reviewing individual items.
///
/// Line items keep their statuses; availability ignores every line of a
/// rejected request, so the requested quantities are released immediately.
pub async fn reject(db: &DatabaseConnection, request_id: i64) -> Result<purchase_request::Model> {
    let request = PurchaseRequest::find_by_id(request_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("purchase request", request_id))?;
    let next = request.status.transition(RequestStatus::Rejected)?;

    let mut active: purchase_request::ActiveModel = request.into();
    active.status = Set(next);
    active.update(db).await.map_err(Into::into)
}

/// Marks an approved request as funded, stamping the funding time.
///
/// Follows an external capital-allocation decision; this function only
/// records the outcome.
pub async fn fund(db: &DatabaseConnection, request_id: i64) -> Result<purchase_request::Model> {
    let request = PurchaseRequest::find_by_id(request_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("purchase request", request_id))?;
    let next = request.status.transition(RequestStatus::Funded)?;

    let mut active: purchase_request::ActiveModel = request.into();
    active.status = Set(next);
    active.funded_at = Set(Some(Utc::now()));
    active.update(db).await.map_err(Into::into)
}

/// Records PO generation: moves the request to `po_generated` and stores the
/// PO number on the owning project.
pub async fn record_po_generated(
    db: &DatabaseConnection,
    request_id: i64,
    po_number: &str,
) -> Result<purchase_request::Model> {
    if po_number.trim().is_empty() {
        return Err(Error::validation("PO number cannot be empty"));
    }

    let txn = db.begin().await?;

    let request = PurchaseRequest::find_by_id(request_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("purchase request", request_id))?;
    let next = request.status.transition(RequestStatus::PoGenerated)?;

    let project = Project::find_by_id(request.project_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("project", request.project_id))?;
    let mut project_active: project::ActiveModel = project.into();
    project_active.po_number = Set(Some(po_number.trim().to_string()));
    project_active.updated_at = Set(Utc::now());
    project_active.update(&txn).await?;

    let mut active: purchase_request::ActiveModel = request.into();
    active.status = Set(next);
    let updated = active.update(&txn).await?;

    txn.commit().await?;
    Ok(updated)
}

/// Marks a po_generated request completed. Completed requests are immutable.
pub async fn complete(db: &DatabaseConnection, request_id: i64) -> Result<purchase_request::Model> {
    let request = PurchaseRequest::find_by_id(request_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("purchase request", request_id))?;
    let next = request.status.transition(RequestStatus::Completed)?;

    let mut active: purchase_request::ActiveModel = request.into();
    active.status = Set(next);
    active.update(db).await.map_err(Into::into)
}

/// Loads a request and enforces contractor ownership (not-found on mismatch,
/// so callers cannot probe other contractors' requests).
async fn find_owned(
    db: &DatabaseConnection,
    request_id: i64,
    contractor_id: &str,
) -> Result<purchase_request::Model> {
    let request = PurchaseRequest::find_by_id(request_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("purchase request", request_id))?;
    if request.contractor_id != contractor_id {
        return Err(Error::not_found("purchase request", request_id));
    }
    Ok(request)
}
