//! Purchase request item entity - One material line on a purchase request.

use super::enums::ItemStatus;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Purchase request item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_request_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Parent purchase request
    pub purchase_request_id: i64,
    /// Project material this line requests
    pub project_material_id: i64,
    /// Quantity the contractor asked for; always > 0
    pub requested_qty: Decimal,
    /// Quantity the admin approved; ≤ `requested_qty`, set on review
    pub approved_qty: Option<Decimal>,
    /// Unit rate quoted by the contractor, if any
    pub unit_rate: Option<Decimal>,
    /// Tax percentage applied on top of the rate
    pub tax_percent: Option<Decimal>,
    /// Line-level review/fulfilment status
    pub status: ItemStatus,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::purchase_request::Entity",
        from = "Column::PurchaseRequestId",
        to = "super::purchase_request::Column::Id"
    )]
    PurchaseRequest,
    #[sea_orm(
        belongs_to = "super::project_material::Entity",
        from = "Column::ProjectMaterialId",
        to = "super::project_material::Column::Id"
    )]
    ProjectMaterial,
}

impl Related<super::purchase_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseRequest.def()
    }
}

impl Related<super::project_material::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProjectMaterial.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
