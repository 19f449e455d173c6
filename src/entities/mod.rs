//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod boq_takeoff;
pub mod capital_transaction;
pub mod enums;
pub mod investor_account;
pub mod payment_submission;
pub mod project;
pub mod project_material;
pub mod purchase_request;
pub mod purchase_request_item;

// Re-export specific types to avoid conflicts
pub use boq_takeoff::{Column as TakeoffColumn, Entity as BoqTakeoff, Model as TakeoffModel};
pub use capital_transaction::{
    Column as CapitalTransactionColumn, Entity as CapitalTransaction,
    Model as CapitalTransactionModel,
};
pub use investor_account::{
    Column as InvestorAccountColumn, Entity as InvestorAccount, Model as InvestorAccountModel,
};
pub use payment_submission::{
    Column as PaymentSubmissionColumn, Entity as PaymentSubmission, Model as PaymentSubmissionModel,
};
pub use project::{Column as ProjectColumn, Entity as Project, Model as ProjectModel};
pub use project_material::{
    Column as ProjectMaterialColumn, Entity as ProjectMaterial, Model as ProjectMaterialModel,
};
pub use purchase_request::{
    Column as PurchaseRequestColumn, Entity as PurchaseRequest, Model as PurchaseRequestModel,
};
pub use purchase_request_item::{
    Column as PurchaseRequestItemColumn, Entity as PurchaseRequestItem,
    Model as PurchaseRequestItemModel,
};
