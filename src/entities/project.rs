//! Project entity - A construction project owned by a contractor.
//!
//! Projects carry the financial envelope (estimated value, funding required)
//! that purchase requests and takeoffs are tracked against. Projects are never
//! hard-deleted; lifecycle is driven by [`ProjectStatus`].

use super::enums::ProjectStatus;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Project database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    /// Unique identifier for the project
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Identity-provider id of the owning contractor
    pub contractor_id: String,
    /// Human-readable project name
    pub name: String,
    /// End client the project is executed for
    pub client_name: String,
    /// Lifecycle status (draft through completed/cancelled)
    pub status: ProjectStatus,
    /// Total estimated contract value
    pub estimated_value: Decimal,
    /// Capital sought from investors; must not exceed `estimated_value`
    pub funding_required: Decimal,
    /// Free-form funding progress marker (e.g. "unfunded", "partially_funded")
    pub funding_status: String,
    /// Purchase-order number, set once a PO is generated
    pub po_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::project_material::Entity")]
    Materials,
    #[sea_orm(has_many = "super::purchase_request::Entity")]
    PurchaseRequests,
    #[sea_orm(has_many = "super::boq_takeoff::Entity")]
    Takeoffs,
}

impl Related<super::project_material::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Materials.def()
    }
}

impl Related<super::purchase_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseRequests.def()
    }
}

impl Related<super::boq_takeoff::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Takeoffs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
