use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use uuid::Uuid;

use crate::jobs::types::{JobContext, JobStatus, JobTask};
use crate::services::Services;

/// Names of jobs currently running
#[derive(Clone, Default)]
pub struct ConcurrencyTracker {
    running: Arc<Mutex<HashSet<&'static str>>>,
}

impl ConcurrencyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `name` as running; `false` when it already is.
    pub async fn try_acquire(&self, name: &'static str) -> bool {
        self.running.lock().await.insert(name)
    }

    pub async fn release(&self, name: &'static str) {
        self.running.lock().await.remove(name);
    }
}

/// Runs tasks with a timeout and no overlapping runs.
///
/// No run starts once shutdown is requested. A run already in progress is
/// left to finish (or time out) so a committed sweep is still reported;
/// [`JobExecutor::drain`] waits for it. Failures are logged and reported as
/// a status; the next scheduled run is the retry.
#[derive(Clone)]
pub struct JobExecutor {
    services: Services,
    concurrency: ConcurrencyTracker,
    in_flight: TaskTracker,
    cancellation_token: CancellationToken,
    timeout: Duration,
}

impl JobExecutor {
    pub fn new(services: Services, timeout: Duration, cancellation_token: CancellationToken) -> Self {
        Self {
            services,
            concurrency: ConcurrencyTracker::new(),
            in_flight: TaskTracker::new(),
            cancellation_token,
            timeout,
        }
    }

    pub async fn execute_job(&self, task: Arc<dyn JobTask>) -> JobStatus {
        let name = task.name();
        if self.cancellation_token.is_cancelled() {
            tracing::info!(job = name, "Shutdown requested, not starting job");
            return JobStatus::Cancelled;
        }
        if !self.concurrency.try_acquire(name).await {
            tracing::warn!(job = name, "Previous run still in progress, skipping");
            return JobStatus::Skipped;
        }

        let status = self.in_flight.track_future(self.run(task)).await;
        self.concurrency.release(name).await;
        status
    }

    /// Waits up to `grace` for runs in progress. Returns `false` on timeout.
    pub async fn drain(&self, grace: Duration) -> bool {
        self.in_flight.close();
        let drained = tokio::time::timeout(grace, self.in_flight.wait()).await.is_ok();
        self.in_flight.reopen();
        drained
    }

    async fn run(&self, task: Arc<dyn JobTask>) -> JobStatus {
        let execution_id = Uuid::new_v4();
        let name = task.name();
        let ctx = JobContext {
            execution_id,
            services: self.services.clone(),
        };

        tracing::info!(job = name, %execution_id, "Job started");
        let start_time = Instant::now();

        // A timeout drops the run; ids of rows it already committed are not logged.
        let status = match tokio::time::timeout(self.timeout, task.execute(ctx)).await {
            Ok(Ok(())) => JobStatus::Success,
            Ok(Err(e)) => {
                tracing::error!(job = name, %execution_id, error = %e, "Job failed");
                JobStatus::Failed
            }
            Err(_) => {
                tracing::error!(
                    job = name,
                    %execution_id,
                    timeout_secs = self.timeout.as_secs(),
                    "Job timed out"
                );
                JobStatus::Timeout
            }
        };

        tracing::info!(
            job = name,
            %execution_id,
            %status,
            duration_ms = start_time.elapsed().as_millis() as u64,
            "Job finished"
        );
        status
    }
}
