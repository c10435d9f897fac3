use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::Services;

/// Job execution context passed to tasks
#[derive(Clone)]
pub struct JobContext {
    pub execution_id: Uuid,
    pub services: Services,
}

/// Outcome of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Success,
    Failed,
    Timeout,
    Cancelled,
    /// The previous run of the same job was still in progress
    Skipped,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Success => write!(f, "success"),
            JobStatus::Failed => write!(f, "failed"),
            JobStatus::Timeout => write!(f, "timeout"),
            JobStatus::Cancelled => write!(f, "cancelled"),
            JobStatus::Skipped => write!(f, "skipped"),
        }
    }
}

/// Trait that all scheduled tasks implement
#[async_trait]
pub trait JobTask: Send + Sync + fmt::Debug {
    /// Stable name used in logs and for overlap tracking
    fn name(&self) -> &'static str;

    async fn execute(&self, ctx: JobContext) -> AppResult<()>;

    fn description(&self) -> Option<String> {
        None
    }
}
