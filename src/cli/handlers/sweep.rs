//! Sweep command handler
//!
//! Runs one expiry sweep against the configured store, the same operation
//! the daily job and `POST /api/admin/sweep` perform.

use jiff::Timestamp;

use crate::config::Settings;
use crate::error::{AppError, AppResult};
use crate::server::build_repositories;
use crate::services::{Services, SweepReport};

pub struct SweepCommandHandler {
    config: Settings,
}

impl SweepCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Sweeps at `at` (now when absent) and prints the report as JSON.
    pub async fn execute(&self, at: Option<Timestamp>) -> AppResult<SweepReport> {
        let repos = build_repositories(&self.config).await?;
        let services = Services::new(&repos, &self.config)?;

        let report = services
            .lifecycle
            .sweep_expired(at.unwrap_or_else(Timestamp::now))
            .await?;

        let json = serde_json::to_string_pretty(&report).map_err(|e| AppError::Internal {
            source: anyhow::Error::from(e),
        })?;
        println!("{}", json);
        Ok(report)
    }
}
