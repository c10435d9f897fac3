//! Serve command handler
//!
//! Validates the configuration for `serve --dry-run` and otherwise hands the
//! settings to [`Server`].

use crate::config::{Environment, Settings, StoreBackend};
use crate::error::AppResult;
use crate::server::Server;

pub struct ServeCommandHandler {
    config: Settings,
    environment: Environment,
}

impl ServeCommandHandler {
    pub fn new(config: Settings, environment: Environment) -> Self {
        Self {
            config,
            environment,
        }
    }

    /// Validates and exits on `dry_run`, otherwise runs until shutdown.
    pub async fn execute(self, dry_run: bool) -> anyhow::Result<()> {
        if dry_run {
            self.validate_only()?;
            return Ok(());
        }

        Server::new(self.config, self.environment).run().await
    }

    /// Checks everything the server checks before binding, including the
    /// JWT secret that offline commands do not need.
    pub fn validate_only(&self) -> AppResult<()> {
        self.config.validate_for(self.environment)?;
        self.config.jwt.validate()?;

        println!("✓ Configuration is valid ({})", self.environment);
        println!("✓ Server would bind to: {}", self.config.server.address());
        match self.config.database.backend {
            StoreBackend::Postgres => println!("✓ Store: postgres"),
            StoreBackend::Memory => println!("! Store: memory (data is lost on restart)"),
        }
        println!(
            "✓ Listings are shown for {} day(s) by default",
            self.config.listings.default_display_days
        );
        if self.config.jobs.enabled {
            println!("✓ Expiry sweep scheduled: {}", self.config.jobs.expire_cron);
        }
        println!("Dry run completed successfully");
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
