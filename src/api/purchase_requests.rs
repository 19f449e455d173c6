//! Purchase request endpoints - creation, submission, review, funding,
//! and the derived material-availability read.

use super::{AppState, auth::Identity};
use crate::{
    core::{availability, purchase_request},
    entities::{Project, PurchaseRequestItem, purchase_request_item},
    errors::{Error, Result},
};
use axum::{
    Json,
    extract::{Path, State},
};
use sea_orm::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, Deserialize)]
pub struct CreateRequestBody {
    pub project_id: i64,
    pub remarks: Option<String>,
    pub items: Vec<purchase_request::NewItem>,
}

#[derive(Debug, Serialize)]
pub struct RequestWithItems {
    #[serde(flatten)]
    pub request: crate::entities::PurchaseRequestModel,
    pub items: Vec<crate::entities::PurchaseRequestItemModel>,
}

/// POST /purchase-requests - contractor creates a draft request.
pub async fn create(
    State(state): State<AppState>,
    identity: Identity,
    Json(body): Json<CreateRequestBody>,
) -> Result<Json<RequestWithItems>> {
    let contractor_id = identity.require_contractor()?;
    let (request, items) = purchase_request::create_draft(
        &state.db,
        body.project_id,
        contractor_id,
        body.remarks,
        body.items,
    )
    .await?;
    Ok(Json(RequestWithItems { request, items }))
}

/// POST /purchase-requests/{id}/submit - contractor submits a draft.
pub async fn submit(
    State(state): State<AppState>,
    identity: Identity,
    Path(request_id): Path<i64>,
) -> Result<Json<crate::entities::PurchaseRequestModel>> {
    let contractor_id = identity.require_contractor()?;
    let updated = purchase_request::submit(&state.db, request_id, contractor_id).await?;
    Ok(Json(updated))
}

#[derive(Debug, Deserialize)]
pub struct ReviewBody {
    pub reviews: Vec<purchase_request::ItemReview>,
}

/// POST /admin/purchase-requests/{id}/review - admin reviews line items.
pub async fn review(
    State(state): State<AppState>,
    identity: Identity,
    Path(request_id): Path<i64>,
    Json(body): Json<ReviewBody>,
) -> Result<Json<RequestWithItems>> {
    let admin_id = identity.require_admin()?;
    let request =
        purchase_request::review_items(&state.db, request_id, body.reviews, admin_id).await?;

    let items = PurchaseRequestItem::find()
        .filter(purchase_request_item::Column::PurchaseRequestId.eq(request_id))
        .all(state.db.as_ref())
        .await?;
    Ok(Json(RequestWithItems { request, items }))
}

/// POST /admin/purchase-requests/{id}/reject - rejects a submitted request
/// outright, releasing its requested quantities.
pub async fn reject(
    State(state): State<AppState>,
    identity: Identity,
    Path(request_id): Path<i64>,
) -> Result<Json<crate::entities::PurchaseRequestModel>> {
    identity.require_admin()?;
    let updated = purchase_request::reject(&state.db, request_id).await?;
    Ok(Json(updated))
}

/// POST /admin/purchase-requests/{id}/fund - records the funding decision.
pub async fn fund(
    State(state): State<AppState>,
    identity: Identity,
    Path(request_id): Path<i64>,
) -> Result<Json<crate::entities::PurchaseRequestModel>> {
    identity.require_admin()?;
    let updated = purchase_request::fund(&state.db, request_id).await?;
    Ok(Json(updated))
}

/// GET /projects/{id}/materials/{mid}/availability - derived remainder.
///
/// Contractors only see materials of their own projects; admins see all.
pub async fn availability(
    State(state): State<AppState>,
    identity: Identity,
    Path((project_id, material_id)): Path<(i64, i64)>,
) -> Result<Json<Value>> {
    let project = Project::find_by_id(project_id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| Error::not_found("project", project_id))?;
    if let Ok(contractor_id) = identity.require_contractor() {
        if project.contractor_id != contractor_id {
            return Err(Error::not_found("project", project_id));
        }
    } else {
        identity.require_admin()?;
    }

    // A material path under a foreign project must not resolve.
    let material = crate::entities::ProjectMaterial::find_by_id(material_id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| Error::not_found("project material", material_id))?;
    if material.project_id != project_id {
        return Err(Error::not_found("project material", material_id));
    }

    let figures = availability::material_availability(&state.db, material_id).await?;
    Ok(Json(json!(figures)))
}
