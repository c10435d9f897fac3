use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler as TokioCronScheduler};
use tokio_util::sync::CancellationToken;

use crate::config::JobsConfig;
use crate::error::{AppError, AppResult};
use crate::jobs::executor::JobExecutor;
use crate::jobs::tasks::ExpireListingsTask;
use crate::jobs::types::JobTask;
use crate::services::Services;

/// Wrapper around tokio-cron-scheduler holding the housekeeping jobs
pub struct JobScheduler {
    scheduler: Arc<Mutex<TokioCronScheduler>>,
    executor: JobExecutor,
    config: JobsConfig,
}

impl JobScheduler {
    pub async fn new(
        services: Services,
        config: JobsConfig,
        cancellation_token: CancellationToken,
    ) -> AppResult<Self> {
        let scheduler = TokioCronScheduler::new()
            .await
            .map_err(|e| AppError::Internal {
                source: anyhow::Error::from(e),
            })?;

        Ok(Self {
            scheduler: Arc::new(Mutex::new(scheduler)),
            executor: JobExecutor::new(
                services,
                Duration::from_secs(config.job_timeout),
                cancellation_token,
            ),
            config,
        })
    }

    /// Registers the configured jobs and starts ticking.
    pub async fn start(&self) -> AppResult<()> {
        self.schedule(Arc::new(ExpireListingsTask), &self.config.expire_cron)
            .await?;

        self.scheduler
            .lock()
            .await
            .start()
            .await
            .map_err(|e| AppError::Internal {
                source: anyhow::Error::from(e),
            })?;

        tracing::info!(expire_cron = %self.config.expire_cron, "Job scheduler started");
        Ok(())
    }

    /// Stops ticking, then waits for a run in progress for up to the job timeout.
    pub async fn stop(&self) -> AppResult<()> {
        self.scheduler
            .lock()
            .await
            .shutdown()
            .await
            .map_err(|e| AppError::Internal {
                source: anyhow::Error::from(e),
            })?;

        let grace = Duration::from_secs(self.config.job_timeout);
        if !self.executor.drain(grace).await {
            tracing::warn!(grace_secs = grace.as_secs(), "Job still running at shutdown");
        }

        tracing::info!("Job scheduler stopped");
        Ok(())
    }

    async fn schedule(&self, task: Arc<dyn JobTask>, cron_expression: &str) -> AppResult<()> {
        let executor = self.executor.clone();
        let name = task.name();
        let task_description = task.description();

        let cron_job = Job::new_async(cron_expression, move |_uuid, _lock| {
            let executor = executor.clone();
            let task = Arc::clone(&task);
            Box::pin(async move {
                executor.execute_job(task).await;
            })
        })
        .map_err(|e| AppError::invalid_argument(
            "jobs.expire_cron",
            format!("Invalid cron expression '{}': {}", cron_expression, e),
        ))?;

        self.scheduler
            .lock()
            .await
            .add(cron_job)
            .await
            .map_err(|e| AppError::Internal {
                source: anyhow::Error::from(e),
            })?;

        tracing::info!(
            job = name,
            cron = cron_expression,
            description = task_description.as_deref().unwrap_or(""),
            "Job scheduled"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::repositories::Repositories;

    fn services() -> Services {
        Services::new(&Repositories::memory(), &Settings::default()).unwrap()
    }

    #[tokio::test]
    async fn test_rejects_invalid_cron() {
        let config = JobsConfig {
            expire_cron: "every midnight".to_string(),
            ..Default::default()
        };
        let scheduler = JobScheduler::new(services(), config, CancellationToken::new())
            .await
            .unwrap();

        assert!(matches!(
            scheduler.start().await,
            Err(AppError::InvalidArgument { .. })
        ));
    }

    #[tokio::test]
    async fn test_start_and_stop_with_default_schedule() {
        let scheduler =
            JobScheduler::new(services(), JobsConfig::default(), CancellationToken::new())
                .await
                .unwrap();

        scheduler.start().await.unwrap();
        scheduler.stop().await.unwrap();
    }
}
