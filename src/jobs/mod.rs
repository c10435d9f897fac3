//! Cron-driven housekeeping.

pub mod executor;
pub mod scheduler;
pub mod tasks;
pub mod types;

pub use executor::{ConcurrencyTracker, JobExecutor};
pub use scheduler::JobScheduler;
pub use types::{JobContext, JobStatus, JobTask};
