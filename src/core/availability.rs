//! Material availability - the derived "max requestable" computation.
//!
//! The requestable remainder of a project material is never stored. Every
//! call site derives it from the current purchase-request items through the
//! single pure function [`max_requestable`], so all endpoints share one
//! definition of "active" and there is no cache to go stale.
//!
//! Policy: draft (unsubmitted) requests DO count toward the active requested
//! quantity. Two drafts against the same material therefore cannot jointly
//! promise more than the remainder.

use crate::{
    entities::{
        ProjectMaterial, PurchaseRequest, PurchaseRequestItem,
        enums::{ItemStatus, RequestStatus},
        project_material, purchase_request_item,
    },
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::prelude::*;
use serde::Serialize;

/// One purchase-request line considered by the availability formula.
#[derive(Debug, Clone, Copy)]
pub struct RequestLine {
    /// Quantity the contractor asked for
    pub requested_qty: Decimal,
    /// Quantity approved on review, if reviewed
    pub approved_qty: Option<Decimal>,
    /// Status of the parent purchase request
    pub request_status: RequestStatus,
    /// Status of the line itself
    pub item_status: ItemStatus,
}

impl RequestLine {
    /// A line is active unless its request or the line itself was rejected.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self.request_status, RequestStatus::Rejected)
            && !matches!(self.item_status, ItemStatus::Rejected)
    }

    /// True once the line has been placed with a supplier.
    #[must_use]
    pub const fn is_ordered(&self) -> bool {
        matches!(self.item_status, ItemStatus::Ordered | ItemStatus::Received)
    }
}

/// Derived availability figures for one project material.
#[derive(Debug, Clone, Serialize)]
pub struct MaterialAvailability {
    pub project_material_id: i64,
    pub required_qty: Decimal,
    pub available_qty: Decimal,
    /// Sum of requested quantities on active, not-yet-ordered lines
    pub active_requested_qty: Decimal,
    /// Sum of quantities on ordered/received lines (approved qty where set)
    pub ordered_qty: Decimal,
    /// `required − available − active_requested − ordered`; may be negative
    /// when historical writes over-allocated
    pub max_requestable: Decimal,
}

/// Computes `max_requestable = required − available − Σ active requested − Σ ordered`.
///
/// Rejected lines and lines of rejected requests contribute nothing. Ordered
/// and received lines contribute their approved quantity (falling back to the
/// requested quantity); all other active lines contribute their requested
/// quantity, drafts included.
#[must_use]
pub fn max_requestable(
    required_qty: Decimal,
    available_qty: Decimal,
    lines: &[RequestLine],
) -> Decimal {
    let (active_requested, ordered) = split_quantities(lines);
    required_qty - available_qty - active_requested - ordered
}

fn split_quantities(lines: &[RequestLine]) -> (Decimal, Decimal) {
    let mut active_requested = Decimal::ZERO;
    let mut ordered = Decimal::ZERO;
    for line in lines.iter().filter(|l| l.is_active()) {
        if line.is_ordered() {
            ordered += line.approved_qty.unwrap_or(line.requested_qty);
        } else {
            active_requested += line.requested_qty;
        }
    }
    (active_requested, ordered)
}

/// Derives the availability of one project material from current row state.
///
/// Recomputed on every call; never cached (a stale value here is exactly the
/// over-allocation window the formula exists to close).
pub async fn material_availability(
    db: &DatabaseConnection,
    project_material_id: i64,
) -> Result<MaterialAvailability> {
    let material = ProjectMaterial::find_by_id(project_material_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("project material", project_material_id))?;

    let lines = load_request_lines(db, project_material_id).await?;
    let (active_requested_qty, ordered_qty) = split_quantities(&lines);

    Ok(MaterialAvailability {
        project_material_id,
        required_qty: material.required_qty,
        available_qty: material.available_qty,
        active_requested_qty,
        ordered_qty,
        max_requestable: material.required_qty
            - material.available_qty
            - active_requested_qty
            - ordered_qty,
    })
}

async fn load_request_lines(
    db: &DatabaseConnection,
    project_material_id: i64,
) -> Result<Vec<RequestLine>> {
    let rows = PurchaseRequestItem::find()
        .filter(purchase_request_item::Column::ProjectMaterialId.eq(project_material_id))
        .find_also_related(PurchaseRequest)
        .all(db)
        .await?;

    rows.into_iter()
        .map(|(item, request)| {
            let request = request.ok_or_else(|| {
                Error::not_found("purchase request", item.purchase_request_id)
            })?;
            Ok(RequestLine {
                requested_qty: item.requested_qty,
                approved_qty: item.approved_qty,
                request_status: request.status,
                item_status: item.status,
            })
        })
        .collect()
}

/// Convenience: all availability rows for a project, for BOQ dashboards.
pub async fn project_availability(
    db: &DatabaseConnection,
    project_id: i64,
) -> Result<Vec<MaterialAvailability>> {
    let materials = ProjectMaterial::find()
        .filter(project_material::Column::ProjectId.eq(project_id))
        .all(db)
        .await?;

    let mut out = Vec::with_capacity(materials.len());
    for material in materials {
        out.push(material_availability(db, material.id).await?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use rust_decimal::Decimal;

    fn dec(v: i64) -> Decimal {
        Decimal::from(v)
    }

    fn line(
        requested: i64,
        approved: Option<i64>,
        request_status: RequestStatus,
        item_status: ItemStatus,
    ) -> RequestLine {
        RequestLine {
            requested_qty: dec(requested),
            approved_qty: approved.map(dec),
            request_status,
            item_status,
        }
    }

    #[test]
    fn no_lines_leaves_full_remainder() {
        assert_eq!(max_requestable(dec(80), dec(0), &[]), dec(80));
        assert_eq!(max_requestable(dec(80), dec(30), &[]), dec(50));
    }

    #[test]
    fn draft_requests_count_as_active() {
        let lines = [line(
            100,
            None,
            RequestStatus::Draft,
            ItemStatus::Pending,
        )];
        assert_eq!(max_requestable(dec(80), dec(0), &lines), dec(-20));
    }

    #[test]
    fn rejected_lines_are_ignored() {
        let lines = [
            line(40, None, RequestStatus::Rejected, ItemStatus::Pending),
            line(40, None, RequestStatus::Submitted, ItemStatus::Rejected),
        ];
        assert_eq!(max_requestable(dec(80), dec(0), &lines), dec(80));
    }

    #[test]
    fn ordered_lines_use_approved_quantity() {
        let lines = [line(
            50,
            Some(30),
            RequestStatus::Funded,
            ItemStatus::Ordered,
        )];
        assert_eq!(max_requestable(dec(100), dec(10), &lines), dec(60));
    }

    #[test]
    fn ordered_without_approved_falls_back_to_requested() {
        let lines = [line(50, None, RequestStatus::Funded, ItemStatus::Received)];
        assert_eq!(max_requestable(dec(100), dec(0), &lines), dec(50));
    }

    #[test]
    fn mixed_lines_sum_independently() {
        let lines = [
            line(20, None, RequestStatus::Submitted, ItemStatus::Pending),
            line(15, Some(10), RequestStatus::Funded, ItemStatus::Ordered),
            line(30, None, RequestStatus::Rejected, ItemStatus::Pending),
        ];
        // 100 - 5 - 20 - 10 = 65
        assert_eq!(max_requestable(dec(100), dec(5), &lines), dec(65));
    }
}
