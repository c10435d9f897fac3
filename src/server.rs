//! Server module for managing HTTP server lifecycle
//!
//! This module handles store selection, server startup, the housekeeping
//! scheduler and graceful shutdown.

use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;

use crate::api::routes::create_router;
use crate::config::{Environment, Settings, StoreBackend};
use crate::db::{establish_async_connection_pool, run_pending_migrations};
use crate::error::AppResult;
use crate::jobs::JobScheduler;
use crate::repositories::Repositories;
use crate::state::AppState;

/// HTTP server manager
pub struct Server {
    settings: Settings,
    environment: Environment,
}

impl Server {
    pub fn new(settings: Settings, environment: Environment) -> Self {
        Self {
            settings,
            environment,
        }
    }

    /// Start the server and run until a shutdown signal arrives
    ///
    /// # Errors
    /// - Invalid JWT settings
    /// - Store initialization or migration failures
    /// - Address binding errors
    pub async fn run(self) -> anyhow::Result<()> {
        tracing::info!(
            app_name = %self.settings.application.name,
            app_version = %self.settings.application.version,
            environment = %self.environment.as_str(),
            "Application starting"
        );

        tracing::info!(
            host = %self.settings.server.host,
            port = %self.settings.server.port,
            request_timeout = %self.settings.server.request_timeout,
            "Server configuration loaded"
        );

        tracing::info!(
            access_token_expiration = %self.settings.jwt.access_token_expiration,
            refresh_token_expiration = %self.settings.jwt.refresh_token_expiration,
            secret_configured = %(!self.settings.jwt.secret.is_empty()),
            admin_login_enabled = %(!self.settings.admin.password_hash.is_empty()),
            "Auth configuration loaded"
        );

        self.settings.jwt.validate().map_err(|e| {
            tracing::error!(error = %e, "JWT configuration validation failed");
            anyhow::anyhow!("JWT configuration validation failed: {}", e)
        })?;

        let repos = build_repositories(&self.settings).await?;
        let state = AppState::new(repos, &self.settings)?;
        tracing::info!(
            default_display_days = state.services.policy.display_days(),
            "Application state created"
        );

        let shutdown = CancellationToken::new();
        let scheduler = if self.settings.jobs.enabled {
            let scheduler = JobScheduler::new(
                state.services.clone(),
                self.settings.jobs.clone(),
                shutdown.child_token(),
            )
            .await?;
            scheduler.start().await?;
            Some(scheduler)
        } else {
            tracing::info!("Scheduled jobs disabled");
            None
        };

        let router = create_router(state);

        let address = self.settings.server.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(error = %e, address = %address, "Failed to bind to address");
            anyhow::anyhow!("Failed to bind to {}: {}", address, e)
        })?;

        tracing::info!(address = %address, "Server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
            .await?;

        shutdown.cancel();
        if let Some(scheduler) = scheduler {
            if let Err(e) = scheduler.stop().await {
                tracing::warn!(error = %e, "Job scheduler did not stop cleanly");
            }
        }

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

/// Opens the configured store, applying pending migrations first when
/// `database.auto_migrate` is set.
pub async fn build_repositories(settings: &Settings) -> AppResult<Repositories> {
    match settings.database.backend {
        StoreBackend::Postgres => {
            tracing::info!(
                max_connections = %settings.database.max_connections,
                min_connections = %settings.database.min_connections,
                connection_timeout = %settings.database.connection_timeout,
                "Initializing database connection pool"
            );

            if settings.database.auto_migrate {
                let applied = run_pending_migrations(settings.database.url.clone()).await?;
                tracing::info!(count = applied.len(), migrations = ?applied, "Migrations applied");
            }

            let pool = establish_async_connection_pool(&settings.database).await?;
            Ok(Repositories::postgres(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on restart");
            Ok(Repositories::memory())
        }
    }
}

/// Waits for Ctrl+C, SIGTERM or cancellation of `shutdown`.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
        _ = shutdown.cancelled() => {
            tracing::info!("Shutdown requested");
        }
    }
}
