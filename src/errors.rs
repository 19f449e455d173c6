//! Unified error types for Finverno.
//!
//! Every fallible operation in the crate returns [`Result`]. The variants map
//! one-to-one onto the HTTP failure classes the API layer emits: callers can
//! match on the variant without parsing message strings.

use thiserror::Error;

/// Unified error type for all Finverno operations.
#[derive(Debug, Error)]
pub enum Error {
    /// No valid identity on the request.
    #[error("Authentication required")]
    Unauthenticated,

    /// Valid identity, wrong role for the operation.
    #[error("Role '{required}' required")]
    Forbidden {
        /// The role the operation demands
        required: String,
    },

    /// Missing/malformed input or an out-of-range value.
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable description of what was wrong
        message: String,
    },

    /// Referenced entity is absent or not owned by the caller.
    #[error("{entity} not found: {reference}")]
    NotFound {
        /// Entity kind, e.g. "purchase request"
        entity: String,
        /// The identifier or key that failed to resolve
        reference: String,
    },

    /// Operation is invalid for the entity's current lifecycle state.
    #[error("Cannot {operation}: current status is '{current}'")]
    State {
        /// The attempted operation, e.g. "dispatch"
        operation: String,
        /// The conflicting current state name
        current: String,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl Error {
    /// Short machine-stable reason string, kept stable for API clients.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Forbidden { .. } => "forbidden",
            Self::Validation { .. } => "validation_failed",
            Self::NotFound { .. } => "not_found",
            Self::State { .. } => "invalid_state",
            Self::Config { .. } => "config_error",
            Self::Database(_) | Self::Io(_) | Self::EnvVar(_) => "internal_error",
        }
    }

    /// Shorthand for a validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for a not-found failure.
    pub fn not_found(entity: impl Into<String>, reference: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity: entity.into(),
            reference: reference.to_string(),
        }
    }

    /// Shorthand for a lifecycle-state conflict.
    pub fn state(operation: impl Into<String>, current: impl std::fmt::Display) -> Self {
        Self::State {
            operation: operation.into(),
            current: current.to_string(),
        }
    }
}

/// Convenience `Result` type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
