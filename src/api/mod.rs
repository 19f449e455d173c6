//! HTTP API surface - thin axum handlers over the core workflows.
//!
//! One handler per endpoint: parse the request, gate on the caller's role,
//! call into `core`, shape the JSON response. Authentication itself lives in
//! the external identity provider; this layer consumes the trusted gateway
//! headers it forwards (see [`auth`]). Errors map onto a fixed response
//! contract: a machine-stable `code` plus a human-readable `message`.

pub mod auth;
pub mod capital;
pub mod delivery;
pub mod projects;
pub mod purchase_requests;
pub mod takeoffs;

use crate::{
    cache::TtlCache,
    config::AppConfig,
    core::delivery::AcknowledgingInvoiceGenerator,
    entities::project,
    errors::Error,
};
use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post, put},
};
use sea_orm::DatabaseConnection;
use serde_json::json;
use std::{sync::Arc, time::Duration};
use tower_http::cors::CorsLayer;
use tracing::error;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: Arc<AppConfig>,
    /// Time-boxed cache for the project listing (fronts a low-write source)
    pub project_cache: Arc<TtlCache<String, Vec<project::Model>>>,
    /// Seam for the external invoicing service used by the deemed-delivery sweep
    pub invoice_generator: AcknowledgingInvoiceGenerator,
}

impl AppState {
    #[must_use]
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        let ttl = Duration::from_secs(config.project_cache_ttl_secs);
        Self {
            db: Arc::new(db),
            config: Arc::new(config),
            project_cache: Arc::new(TtlCache::new(ttl)),
            invoice_generator: AcknowledgingInvoiceGenerator,
        }
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/projects", get(projects::list))
        .route(
            "/projects/:project_id/materials/:material_id/availability",
            get(purchase_requests::availability),
        )
        .route("/purchase-requests", post(purchase_requests::create))
        .route(
            "/purchase-requests/:id/submit",
            post(purchase_requests::submit),
        )
        .route(
            "/admin/purchase-requests/:id/review",
            post(purchase_requests::review),
        )
        .route(
            "/admin/purchase-requests/:id/reject",
            post(purchase_requests::reject),
        )
        .route(
            "/admin/purchase-requests/:id/fund",
            post(purchase_requests::fund),
        )
        .route(
            "/admin/delivery",
            get(delivery::list).patch(delivery::dispatch),
        )
        .route("/delivery/:id/dispute", post(delivery::dispute))
        .route("/cron/check-deemed-delivery", get(delivery::cron_sweep))
        .route("/takeoff-verification", post(takeoffs::submit))
        .route(
            "/admin/takeoff-verification",
            put(takeoffs::review_single).post(takeoffs::review_bulk),
        )
        .route(
            "/admin/takeoff-verification/summary",
            get(takeoffs::summary),
        )
        .route(
            "/capital/payment-submissions",
            post(capital::create_submission),
        )
        .route(
            "/admin/capital/payment-submissions",
            patch(capital::review_submission),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Unauthenticated => StatusCode::UNAUTHORIZED,
            Error::Forbidden { .. } => StatusCode::FORBIDDEN,
            Error::Validation { .. } | Error::State { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Config { .. } | Error::Database(_) | Error::Io(_) | Error::EnvVar(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Internal failures keep their detail in the logs, not the response.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "request failed with internal error");
            "internal error".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({"error": {"code": self.code(), "message": message}}));
        (status, body).into_response()
    }
}
