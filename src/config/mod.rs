//! Configuration management for Finverno.
//!
//! All runtime configuration comes from environment variables (loaded from a
//! `.env` file in development via `dotenvy`). The one piece of configuration
//! the core logic consumes directly is the default dispute-window length,
//! which is always clamped into the contractual [24, 72] hour range.

/// Database configuration and connection management
pub mod database;

use crate::errors::{Error, Result};

/// Hard lower bound on the delivery dispute window, in hours.
pub const MIN_DISPUTE_WINDOW_HOURS: i64 = 24;
/// Hard upper bound on the delivery dispute window, in hours.
pub const MAX_DISPUTE_WINDOW_HOURS: i64 = 72;
/// Dispute window used when the dispatching admin supplies none.
pub const DEFAULT_DISPUTE_WINDOW_HOURS: i64 = 48;

/// Application configuration resolved at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Database connection string
    pub database_url: String,
    /// Address the HTTP server binds to
    pub bind_addr: String,
    /// Shared secret the scheduler presents as a bearer token
    pub cron_secret: String,
    /// Default dispute window in hours, already clamped to [24, 72]
    pub default_dispute_window_hours: i64,
    /// TTL for the project-listing cache, in seconds
    pub project_cache_ttl_secs: u64,
}

impl AppConfig {
    /// Loads configuration from the environment.
    ///
    /// `CRON_SECRET` is required (the sweep endpoint cannot be left open);
    /// everything else has a development default.
    pub fn from_env() -> Result<Self> {
        let cron_secret = std::env::var("CRON_SECRET").map_err(|_| Error::Config {
            message: "CRON_SECRET must be set".to_string(),
        })?;

        let default_dispute_window_hours = std::env::var("DEFAULT_DISPUTE_WINDOW_HOURS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(DEFAULT_DISPUTE_WINDOW_HOURS)
            .clamp(MIN_DISPUTE_WINDOW_HOURS, MAX_DISPUTE_WINDOW_HOURS);

        let project_cache_ttl_secs = std::env::var("PROJECT_CACHE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(300);

        Ok(Self {
            database_url: database::get_database_url(),
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            cron_secret,
            default_dispute_window_hours,
            project_cache_ttl_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_within_bounds() {
        assert!(DEFAULT_DISPUTE_WINDOW_HOURS >= MIN_DISPUTE_WINDOW_HOURS);
        assert!(DEFAULT_DISPUTE_WINDOW_HOURS <= MAX_DISPUTE_WINDOW_HOURS);
    }
}
