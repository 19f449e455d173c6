//! Capital transaction entity - An inflow or outflow on an investor account.

use super::enums::{TransactionStatus, TransactionType};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "capital_transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub investor_account_id: i64,
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub status: TransactionStatus,
    pub description: Option<String>,
    pub transacted_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::investor_account::Entity",
        from = "Column::InvestorAccountId",
        to = "super::investor_account::Column::Id"
    )]
    Account,
}

impl Related<super::investor_account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
