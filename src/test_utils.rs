//! Shared test utilities for Finverno.
//!
//! Common helpers for setting up in-memory test databases and creating test
//! entities with sensible defaults.

use crate::{
    core::purchase_request::{self, NewItem},
    entities::{
        boq_takeoff,
        enums::{ProjectStatus, VerificationStatus},
        project, project_material, purchase_request as pr_entity, purchase_request_item,
    },
    errors::Result,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, Set, prelude::*};

/// Identity-provider id used for the default test contractor.
pub const TEST_CONTRACTOR: &str = "contractor_test";
/// Identity-provider id used for the default test admin.
pub const TEST_ADMIN: &str = "admin_test";
/// Identity-provider id used for the default test investor.
pub const TEST_INVESTOR: &str = "investor_test";

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test project owned by the given contractor.
pub async fn create_test_project(
    db: &DatabaseConnection,
    contractor_id: &str,
    name: &str,
) -> Result<project::Model> {
    let now = Utc::now();
    project::ActiveModel {
        contractor_id: Set(contractor_id.to_string()),
        name: Set(name.to_string()),
        client_name: Set("Test Client".to_string()),
        status: Set(ProjectStatus::Awarded),
        estimated_value: Set(Decimal::from(1_000_000)),
        funding_required: Set(Decimal::from(400_000)),
        funding_status: Set("unfunded".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates a project material with the given required/available quantities.
pub async fn create_test_material(
    db: &DatabaseConnection,
    project_id: i64,
    name: &str,
    required: i64,
    available: i64,
) -> Result<project_material::Model> {
    project_material::ActiveModel {
        project_id: Set(project_id),
        material_name: Set(name.to_string()),
        required_qty: Set(Decimal::from(required)),
        available_qty: Set(Decimal::from(available)),
        source_type: Set("manual".to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates a draft purchase request on the project with one 10-unit line
/// against a fresh 100-unit material. Owned by [`TEST_CONTRACTOR`].
pub async fn create_test_request(
    db: &DatabaseConnection,
    project_id: i64,
) -> Result<pr_entity::Model> {
    let material = create_test_material(db, project_id, "Test Material", 100, 0).await?;
    let (request, _items) = purchase_request::create_draft(
        db,
        project_id,
        TEST_CONTRACTOR,
        None,
        vec![NewItem {
            project_material_id: material.id,
            requested_qty: Decimal::from(10),
            unit_rate: None,
            tax_percent: None,
        }],
    )
    .await?;
    Ok(request)
}

/// Creates a takeoff row for the project, owned by [`TEST_CONTRACTOR`], in
/// the initial `none` verification state.
pub async fn create_test_takeoff(
    db: &DatabaseConnection,
    project_id: i64,
    file_name: &str,
) -> Result<boq_takeoff::Model> {
    boq_takeoff::ActiveModel {
        project_id: Set(project_id),
        contractor_id: Set(TEST_CONTRACTOR.to_string()),
        file_name: Set(file_name.to_string()),
        takeoff_data: Set("[]".to_string()),
        item_count: Set(10),
        verification_status: Set(VerificationStatus::None),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Overwrites a request's dispute deadline; lets tests move a dispatched
/// request past its window without waiting.
pub async fn set_dispute_deadline(
    db: &DatabaseConnection,
    request_id: i64,
    deadline: DateTime<Utc>,
) -> Result<()> {
    let request = crate::entities::PurchaseRequest::find_by_id(request_id)
        .one(db)
        .await?
        .ok_or_else(|| crate::errors::Error::not_found("purchase request", request_id))?;
    let mut active: pr_entity::ActiveModel = request.into();
    active.dispute_deadline = Set(Some(deadline));
    active.update(db).await?;
    Ok(())
}

/// Sets up a database with one awarded project owned by [`TEST_CONTRACTOR`].
pub async fn setup_with_project() -> Result<(DatabaseConnection, project::Model)> {
    let db = setup_test_db().await?;
    let project = create_test_project(&db, TEST_CONTRACTOR, "Test Project").await?;
    Ok((db, project))
}

/// Sets up a database with a project and one draft purchase request.
pub async fn setup_with_request() -> Result<(DatabaseConnection, pr_entity::Model)> {
    let (db, project) = setup_with_project().await?;
    let request = create_test_request(&db, project.id).await?;
    Ok((db, request))
}

/// Sets up a submitted purchase request with one line per entry in
/// `quantities`, each against its own 100-unit material.
pub async fn setup_submitted_request(
    quantities: &[i64],
) -> Result<(
    DatabaseConnection,
    pr_entity::Model,
    Vec<purchase_request_item::Model>,
)> {
    let (db, project) = setup_with_project().await?;

    let mut items = Vec::with_capacity(quantities.len());
    for (index, &qty) in quantities.iter().enumerate() {
        let material =
            create_test_material(&db, project.id, &format!("Material {index}"), 100, 0).await?;
        items.push(NewItem {
            project_material_id: material.id,
            requested_qty: Decimal::from(qty),
            unit_rate: None,
            tax_percent: None,
        });
    }

    let (request, created_items) =
        purchase_request::create_draft(&db, project.id, TEST_CONTRACTOR, None, items).await?;
    let request = purchase_request::submit(&db, request.id, TEST_CONTRACTOR).await?;
    Ok((db, request, created_items))
}

/// Sets up a takeoff already submitted for verification (`pending`).
pub async fn setup_with_pending_takeoff() -> Result<(DatabaseConnection, boq_takeoff::Model)> {
    let (db, project) = setup_with_project().await?;
    create_test_takeoff(&db, project.id, "takeoff.pdf").await?;
    let takeoff = crate::core::takeoff::submit_for_verification(
        &db,
        project.id,
        TEST_CONTRACTOR,
        "takeoff.pdf",
    )
    .await?;
    Ok((db, takeoff))
}
