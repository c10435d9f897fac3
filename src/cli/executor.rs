//! Dispatches a parsed command to its handler.

use super::handlers::{MigrateCommandHandler, ServeCommandHandler, SweepCommandHandler, hash_password};
use super::parser::{Cli, Commands};
use crate::config::{Environment, Settings};
use crate::error::AppError;

/// Runs the command. No command means `serve`.
///
/// `settings` is `None` only for commands where [`Cli::needs_config`] is false.
pub async fn execute_command(
    cli: &Cli,
    settings: Option<Settings>,
    environment: Environment,
) -> anyhow::Result<()> {
    cli.validate()
        .map_err(|reason| AppError::invalid_argument("cli_arguments", reason))?;

    if let Some(Commands::HashPassword { password }) = &cli.command {
        hash_password::execute(password.as_deref(), std::io::stdin().lock())?;
        return Ok(());
    }

    let settings = settings.ok_or_else(|| {
        AppError::invalid_argument("config", "Configuration is required for this command")
    })?;

    match &cli.command {
        None => ServeCommandHandler::new(settings, environment).execute(false).await,
        Some(Commands::Serve { dry_run, .. }) => {
            warn_privileged_port(&settings);
            ServeCommandHandler::new(settings, environment)
                .execute(*dry_run)
                .await
        }
        Some(Commands::Migrate { dry_run, rollback }) => {
            MigrateCommandHandler::new(settings)
                .execute(*dry_run, *rollback)
                .await?;
            Ok(())
        }
        Some(Commands::Sweep { at }) => {
            SweepCommandHandler::new(settings).execute(*at).await?;
            Ok(())
        }
        Some(Commands::HashPassword { .. }) => Ok(()),
    }
}

fn warn_privileged_port(settings: &Settings) {
    if settings.server.port < 1024 {
        tracing::warn!(
            port = settings.server.port,
            "Binding to a port below 1024 usually requires elevated privileges"
        );
    }
}
