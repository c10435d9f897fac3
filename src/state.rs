//! Application state for Axum web framework.
//!
//! Contains shared services and resources that are accessible
//! across all request handlers.

use std::time::Duration;

use crate::config::Settings;
use crate::db::AsyncDbPool;
use crate::error::AppResult;
use crate::repositories::Repositories;
use crate::services::Services;

/// Application state shared by every handler.
///
/// Cloning is cheap; services and repositories only hold `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    /// Store handles, used directly by the health checks
    pub repos: Repositories,
    pub version: String,
    /// Deadline for a single request, from `server.request_timeout`
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(repos: Repositories, settings: &Settings) -> AppResult<Self> {
        let services = Services::new(&repos, settings)?;
        Ok(Self {
            services,
            repos,
            version: settings.application.version.clone(),
            request_timeout: Duration::from_secs(settings.server.request_timeout),
        })
    }

    /// State backed by PostgreSQL through the given pool.
    pub fn postgres(pool: AsyncDbPool, settings: &Settings) -> AppResult<Self> {
        Self::new(Repositories::postgres(pool), settings)
    }

    /// State backed by a fresh in-process store.
    pub fn memory(settings: &Settings) -> AppResult<Self> {
        Self::new(Repositories::memory(), settings)
    }
}
