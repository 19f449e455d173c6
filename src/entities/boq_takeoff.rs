//! BOQ takeoff entity - A quantity takeoff derived from architectural drawings.
//!
//! Created when a contractor uploads a takeoff file; moved through admin
//! verification via [`VerificationStatus`]. The structured line data stays
//! serialized - the verification workflow only reads counts and statuses.

use super::enums::VerificationStatus;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// BOQ takeoff database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "boq_takeoffs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub project_id: i64,
    /// Identity-provider id of the submitting contractor
    pub contractor_id: String,
    /// Name of the uploaded takeoff file; lookup key for submission
    pub file_name: String,
    /// Object-storage URL of the file (signing handled outside this service)
    pub file_url: Option<String>,
    /// Serialized takeoff line data (JSON)
    pub takeoff_data: String,
    /// Number of takeoff lines in `takeoff_data`
    pub item_count: i32,
    pub verification_status: VerificationStatus,
    /// Admin override of the total takeoff quantity, if any
    pub verified_quantity: Option<Decimal>,
    /// Admin's estimated unit rate for the takeoff scope
    pub estimated_rate: Option<Decimal>,
    pub admin_notes: Option<String>,
    /// Admin who performed the review
    pub verified_by: Option<String>,
    pub verified_at: Option<DateTime<Utc>>,
    pub submitted_at: Option<DateTime<Utc>>,
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
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
