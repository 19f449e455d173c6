//! Purchase request entity - A contractor's request to procure project materials.
//!
//! The aggregate status ([`RequestStatus`]) tracks the procurement lifecycle;
//! the embedded delivery fields ([`DeliveryStatus`], dispatch/dispute/invoice
//! timestamps) track the physical delivery timeline after a PO is fulfilled.
//! Invariants: `dispute_deadline` is only meaningful while the delivery status
//! is `dispatched`; `invoice_generated_at` is set at most once and implies the
//! request has left the disputable state.

use super::enums::{DeliveryStatus, RequestStatus};
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Purchase request database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Project the requested materials belong to
    pub project_id: i64,
    /// Identity-provider id of the requesting contractor
    pub contractor_id: String,
    /// Aggregate lifecycle status
    pub status: RequestStatus,
    /// Free-text remarks from the contractor
    pub remarks: Option<String>,
    /// Admin who approved the request, once reviewed
    pub approved_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub funded_at: Option<DateTime<Utc>>,

    // Delivery & dispute workflow fields
    /// Physical delivery state (not_dispatched → dispatched → disputed|delivered)
    pub delivery_status: DeliveryStatus,
    pub dispatched_at: Option<DateTime<Utc>>,
    /// End of the contractual dispute window; dispatch time + clamped hours
    pub dispute_deadline: Option<DateTime<Utc>>,
    pub dispute_reason: Option<String>,
    pub disputed_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    /// Set exactly once, by the deemed-delivery sweep or manual invoicing
    pub invoice_generated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::project::Entity",
        from = "Column::ProjectId",
        to = "super::project::Column::Id"
    )]
    Project,
    #[sea_orm(has_many = "super::purchase_request_item::Entity")]
    Items,
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::purchase_request_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
