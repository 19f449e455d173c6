//! Payment submission entity - An investor's proof of a capital payment.
//!
//! Approval links the submission to the capital transaction it produced via
//! `capital_transaction_id`; the link is set in the same database transaction
//! that creates the capital transaction, so an approved submission is never
//! observed unlinked.

use super::enums::SubmissionStatus;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payment_submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Identity-provider id of the submitting investor
    pub investor_id: String,
    pub amount: Decimal,
    /// Date the payment was made, as stated by the investor
    pub payment_date: NaiveDate,
    /// Payment method, e.g. "bank_transfer"
    pub method: String,
    /// Bank/UPI reference supplied by the investor
    pub reference: Option<String>,
    /// Object-storage path of the uploaded payment proof
    pub proof_path: Option<String>,
    pub status: SubmissionStatus,
    pub review_notes: Option<String>,
    /// Admin who reviewed the submission
    pub reviewed_by: Option<String>,
    /// Linked capital transaction; set only on approval
    pub capital_transaction_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::capital_transaction::Entity",
        from = "Column::CapitalTransactionId",
        to = "super::capital_transaction::Column::Id"
    )]
    CapitalTransaction,
}

impl Related<super::capital_transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CapitalTransaction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
