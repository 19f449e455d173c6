//! Project listing endpoint - the one read served through the TTL cache.
//!
//! The listing fronts a low-write-rate source, so a bounded staleness window
//! is acceptable here. Transactional reads (availability, summaries) never
//! go through this cache.

use super::{AppState, auth::{Identity, Role}};
use crate::{
    entities::{Project, project},
    errors::Result,
};
use axum::{Json, extract::State};
use sea_orm::{QueryOrder, prelude::*};

/// GET /projects - contractors see their own projects, admins and investors
/// see all. Cached per scope with the configured TTL.
pub async fn list(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<project::Model>>> {
    let (cache_key, contractor_filter) = match identity.role {
        Role::Contractor => (
            format!("contractor:{}", identity.user_id),
            Some(identity.user_id.clone()),
        ),
        Role::Admin | Role::Investor => ("all".to_string(), None),
    };

    let db = state.db.clone();
    let projects = state
        .project_cache
        .get_or_refresh(cache_key, move || async move {
            let mut query = Project::find();
            if let Some(contractor_id) = contractor_filter {
                query = query.filter(project::Column::ContractorId.eq(contractor_id));
            }
            query
                .order_by_desc(project::Column::CreatedAt)
                .all(db.as_ref())
                .await
                .map_err(crate::errors::Error::from)
        })
        .await?;

    Ok(Json(projects))
}
