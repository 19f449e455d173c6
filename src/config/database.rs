//! Database configuration module for Finverno.
//!
//! Handles database connection and table creation using `SeaORM`. Tables are
//! generated from the entity definitions via `Schema::create_table_from_entity`
//! so the schema always matches the Rust struct definitions without manual SQL.

use crate::entities::{
    BoqTakeoff, CapitalTransaction, InvestorAccount, PaymentSubmission, Project, ProjectMaterial,
    PurchaseRequest, PurchaseRequestItem,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from the environment or returns the default
/// local `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/finverno.sqlite".to_string())
}

/// Establishes a connection to the database at `url`.
pub async fn create_connection(url: &str) -> Result<DatabaseConnection> {
    Database::connect(url).await.map_err(Into::into)
}

/// Creates all tables from the entity definitions.
///
/// Used at startup for the `SQLite` backend and by every test against an
/// in-memory database.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    db.execute(builder.build(&schema.create_table_from_entity(Project)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(ProjectMaterial)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(PurchaseRequest)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(PurchaseRequestItem)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(BoqTakeoff)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(InvestorAccount)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(CapitalTransaction)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(PaymentSubmission)))
        .await?;

    Ok(())
}
