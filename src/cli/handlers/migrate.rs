//! Migrate command handler
//!
//! Applies, previews or reverts the embedded schema migrations.

use crate::config::{Settings, StoreBackend};
use crate::db::{pending_migrations, revert_migrations, run_pending_migrations};
use crate::error::{AppError, AppResult};

pub struct MigrateCommandHandler {
    config: Settings,
}

impl MigrateCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// # Errors
    /// - the memory backend is configured
    /// - the database is unreachable
    /// - a migration fails
    pub async fn execute(&self, dry_run: bool, rollback: Option<u32>) -> AppResult<()> {
        self.ensure_postgres()?;
        let database_url = self.config.database.url.clone();

        if dry_run {
            return self.show_pending_migrations(database_url).await;
        }

        match rollback {
            Some(steps) => self.rollback_migrations(database_url, steps).await,
            None => self.run_migrations(database_url).await,
        }
    }

    fn ensure_postgres(&self) -> AppResult<()> {
        if self.config.database.backend != StoreBackend::Postgres {
            return Err(AppError::invalid_argument(
                "database.backend",
                "Migrations only apply to the postgres backend",
            ));
        }
        self.config.database.validate()?;
        Ok(())
    }

    async fn show_pending_migrations(&self, database_url: String) -> AppResult<()> {
        println!("Checking for pending migrations...");
        let pending = pending_migrations(database_url).await?;

        if pending.is_empty() {
            println!("✓ No pending migrations found - database is up to date");
        } else {
            println!("Found {} pending migration(s):", pending.len());
            for name in &pending {
                println!("  - {}", name);
            }
            println!("\nRun without --dry-run to apply these migrations");
        }
        Ok(())
    }

    async fn run_migrations(&self, database_url: String) -> AppResult<()> {
        println!("Running database migrations...");
        let applied = run_pending_migrations(database_url).await?;

        if applied.is_empty() {
            println!("✓ No migrations to apply - database is already up to date");
        } else {
            println!("✓ Applied {} migration(s):", applied.len());
            for version in &applied {
                println!("  - {}", version);
            }
        }
        tracing::info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    async fn rollback_migrations(&self, database_url: String, steps: u32) -> AppResult<()> {
        println!("Rolling back {} migration(s)...", steps);
        let reverted = revert_migrations(database_url, steps).await?;

        if reverted.is_empty() {
            println!("✓ No migrations to revert");
        } else {
            println!("✓ Reverted {} migration(s):", reverted.len());
            for version in &reverted {
                println!("  - {}", version);
            }
        }
        tracing::warn!(count = reverted.len(), "Migrations reverted");
        Ok(())
    }
}
