//! Status enums shared across entities.
//!
//! Every lifecycle in the system (purchase request, delivery, takeoff
//! verification) is a typed enum with a single `transition` function that
//! rejects invalid moves centrally. Handlers never re-check state ad hoc;
//! they call `transition` and propagate the [`Error::State`] it produces.

use crate::errors::{Error, Result};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Project lifecycle status.
#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "tendering")]
    Tendering,
    #[sea_orm(string_value = "awarded")]
    Awarded,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Purchase request aggregate status.
#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "submitted")]
    Submitted,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "funded")]
    Funded,
    #[sea_orm(string_value = "po_generated")]
    PoGenerated,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl RequestStatus {
    /// Validates a status move, returning the new status or a state error
    /// naming the conflicting current status.
    pub fn transition(self, to: Self) -> Result<Self> {
        let allowed = matches!(
            (self, to),
            (Self::Draft, Self::Submitted)
                | (Self::Submitted, Self::Approved | Self::Rejected)
                | (Self::Approved, Self::Funded)
                | (Self::Funded, Self::PoGenerated)
                | (Self::PoGenerated, Self::Completed)
        );
        if allowed {
            Ok(to)
        } else {
            Err(Error::state(format!("move request to '{to}'"), self))
        }
    }
}

/// Per-line-item review status on a purchase request.
#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "ordered")]
    Ordered,
    #[sea_orm(string_value = "received")]
    Received,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl ItemStatus {
    /// True once an admin has reviewed the item (approved or rejected).
    #[must_use]
    pub const fn is_reviewed(self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn transition(self, to: Self) -> Result<Self> {
        let allowed = matches!(
            (self, to),
            (Self::Pending, Self::Approved | Self::Rejected)
                | (Self::Approved, Self::Ordered)
                | (Self::Ordered, Self::Received)
        );
        if allowed {
            Ok(to)
        } else {
            Err(Error::state(format!("move item to '{to}'"), self))
        }
    }
}

/// Post-procurement delivery status embedded on the purchase request.
#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    #[sea_orm(string_value = "not_dispatched")]
    NotDispatched,
    #[sea_orm(string_value = "dispatched")]
    Dispatched,
    #[sea_orm(string_value = "disputed")]
    Disputed,
    #[sea_orm(string_value = "delivered")]
    Delivered,
}

impl DeliveryStatus {
    pub fn transition(self, to: Self) -> Result<Self> {
        let allowed = matches!(
            (self, to),
            (Self::NotDispatched, Self::Dispatched)
                | (Self::Dispatched, Self::Disputed | Self::Delivered)
        );
        if allowed {
            Ok(to)
        } else {
            Err(Error::state(format!("move delivery to '{to}'"), self))
        }
    }
}

/// BOQ takeoff verification status.
#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    #[sea_orm(string_value = "none")]
    None,
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "verified")]
    Verified,
    #[sea_orm(string_value = "disputed")]
    Disputed,
    #[sea_orm(string_value = "revision_required")]
    RevisionRequired,
}

impl VerificationStatus {
    pub fn transition(self, to: Self) -> Result<Self> {
        // RevisionRequired -> Pending covers a contractor resubmitting after rework.
        let allowed = matches!(
            (self, to),
            (Self::None | Self::RevisionRequired, Self::Pending)
                | (
                    Self::Pending,
                    Self::Verified | Self::Disputed | Self::RevisionRequired
                )
        );
        if allowed {
            Ok(to)
        } else {
            Err(Error::state(format!("move verification to '{to}'"), self))
        }
    }
}

/// Investor payment submission review status.
#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// Direction of a capital transaction.
#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    #[sea_orm(string_value = "inflow")]
    Inflow,
    #[sea_orm(string_value = "outflow")]
    Outflow,
}

/// Settlement status of a capital transaction.
#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "failed")]
    Failed,
}

macro_rules! display_via_str {
    ($($ty:ty => { $($variant:ident => $name:literal),+ $(,)? })+) => {$(
        impl $ty {
            /// Wire name of the status, matching its database string value.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    )+};
}

display_via_str! {
    ProjectStatus => {
        Draft => "draft", Tendering => "tendering", Awarded => "awarded",
        InProgress => "in_progress", Completed => "completed", Cancelled => "cancelled",
    }
    RequestStatus => {
        Draft => "draft", Submitted => "submitted", Approved => "approved",
        Funded => "funded", PoGenerated => "po_generated", Completed => "completed",
        Rejected => "rejected",
    }
    ItemStatus => {
        Pending => "pending", Approved => "approved", Ordered => "ordered",
        Received => "received", Rejected => "rejected",
    }
    DeliveryStatus => {
        NotDispatched => "not_dispatched", Dispatched => "dispatched",
        Disputed => "disputed", Delivered => "delivered",
    }
    VerificationStatus => {
        None => "none", Pending => "pending", Verified => "verified",
        Disputed => "disputed", RevisionRequired => "revision_required",
    }
    SubmissionStatus => {
        Pending => "pending", Approved => "approved", Rejected => "rejected",
    }
    TransactionType => { Inflow => "inflow", Outflow => "outflow" }
    TransactionStatus => { Pending => "pending", Completed => "completed", Failed => "failed" }
}
