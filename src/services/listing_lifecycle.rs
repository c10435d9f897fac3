//! Status and expiry transitions of job posts.
//!
//! `expires_at` is the source of truth for timing. The stored `active` →
//! `expired` flip only happens here, in [`ListingLifecycle::sweep_expired`].

use std::sync::Arc;

use jiff::Timestamp;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{JobPost, expiry_after};
use crate::repositories::JobPostStore;
use crate::services::ListingPolicy;

/// Compare-and-set attempts before giving up on a contended row
const MAX_STATUS_ATTEMPTS: usize = 3;

/// Posts flipped to `expired` by one sweep
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct SweepReport {
    pub count: usize,
    pub ids: Vec<Uuid>,
}

#[derive(Clone)]
pub struct ListingLifecycle {
    posts: Arc<dyn JobPostStore>,
    policy: ListingPolicy,
}

impl ListingLifecycle {
    pub fn new(posts: Arc<dyn JobPostStore>, policy: ListingPolicy) -> Self {
        Self { posts, policy }
    }

    /// Expires every `active` post whose deadline is before `now`.
    ///
    /// Re-running with the same `now` reports nothing. Hidden and expired
    /// posts and every `expires_at` are left untouched.
    pub async fn sweep_expired(&self, now: Timestamp) -> AppResult<SweepReport> {
        let ids = self.posts.expire_overdue(now).await.inspect_err(|e| {
            tracing::error!(error = %e, %now, "Expiry sweep failed");
        })?;

        tracing::info!(count = ids.len(), ids = ?ids, %now, "Expiry sweep finished");
        Ok(SweepReport {
            count: ids.len(),
            ids,
        })
    }

    /// Sets `expires_at = now + days` and forces the post back to `active`,
    /// whatever its current status.
    pub async fn extend(&self, id: Uuid, days: i64, now: Timestamp) -> AppResult<JobPost> {
        let expires_at = expiry_after(now, days)?;

        let post = self
            .posts
            .reactivate(id, expires_at)
            .await?
            .ok_or_else(|| AppError::not_found("JobPost", "id", id))?;

        tracing::info!(job_id = %id, days, %expires_at, "Job post extended");
        Ok(post)
    }

    /// [`extend`](Self::extend) by the current default display days.
    pub async fn extend_by_default(&self, id: Uuid, now: Timestamp) -> AppResult<JobPost> {
        self.extend(id, self.policy.display_days(), now).await
    }

    /// Hides an active post. Already hidden posts are returned unchanged;
    /// expired posts cannot be hidden.
    pub async fn hide(&self, id: Uuid) -> AppResult<JobPost> {
        for _ in 0..MAX_STATUS_ATTEMPTS {
            let post = self
                .posts
                .find_by_id(id)
                .await?
                .ok_or_else(|| AppError::not_found("JobPost", "id", id))?;

            let Some(target) = post.status.hide()? else {
                return Ok(post);
            };

            if let Some(hidden) = self.posts.update_status(id, post.status, target).await? {
                tracing::info!(job_id = %id, from = %post.status, "Job post hidden");
                return Ok(hidden);
            }
            tracing::debug!(job_id = %id, "Job post changed concurrently, retrying hide");
        }

        Err(AppError::Internal {
            source: anyhow::anyhow!("job post {} kept changing while hiding it", id),
        })
    }
}
