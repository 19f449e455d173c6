//! Project material entity - A material line on a project's bill of quantities.
//!
//! `required_qty` is the total the project needs; `available_qty` is what the
//! contractor already has on site. The requestable remainder is never stored;
//! it is derived on every read from active purchase-request items (see
//! `core::availability`).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Project material database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "project_materials")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning project
    pub project_id: i64,
    /// Display name of the material
    pub material_name: String,
    /// Reference into the shared material catalog
    pub catalog_ref: Option<String>,
    /// Total quantity the project requires
    pub required_qty: Decimal,
    /// Quantity already available on site (not to be procured)
    pub available_qty: Decimal,
    /// Provenance of the row ("boq_upload", "manual", ...)
    pub source_type: String,
    /// Source file the row was imported from, if any
    pub source_file: Option<String>,
    pub created_at: DateTime<Utc>,
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
    RequestItems,
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::purchase_request_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RequestItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
