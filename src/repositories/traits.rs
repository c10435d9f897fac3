use async_trait::async_trait;
use jiff::Timestamp;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{
    AdminView, JobKind, JobPost, JobPostStatus, JobPostWithHouse, NewJobPost, NewSoftwareHouse,
    SoftwareHouse, SoftwareHouseStatus,
};

/// Public browse criteria, already resolved to a row window
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowseFilter {
    /// Matched case-insensitively against the job title or the house name
    pub search: Option<String>,
    pub kind: Option<JobKind>,
    pub offset: i64,
    pub limit: i64,
}

#[async_trait]
pub trait SoftwareHouseStore: Send + Sync {
    /// Inserts a `pending` house.
    async fn create(&self, new_house: NewSoftwareHouse, now: Timestamp) -> AppResult<SoftwareHouse>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SoftwareHouse>>;

    /// Newest first.
    async fn list_by_status(&self, status: SoftwareHouseStatus) -> AppResult<Vec<SoftwareHouse>>;

    /// Sets `to` only while the house is still in `from`; `None` when nothing matched.
    async fn update_status(
        &self,
        id: Uuid,
        from: SoftwareHouseStatus,
        to: SoftwareHouseStatus,
    ) -> AppResult<Option<SoftwareHouse>>;
}

#[async_trait]
pub trait JobPostStore: Send + Sync {
    /// Inserts an `active` post. Fails with `NotFound` when the house does not exist.
    async fn create(&self, new_post: NewJobPost) -> AppResult<JobPost>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<JobPost>>;

    /// The post only if it is visible at `now`.
    async fn find_visible(&self, id: Uuid, now: Timestamp) -> AppResult<Option<JobPostWithHouse>>;

    /// One page of visible posts, newest first, with the total match count.
    async fn browse(
        &self,
        filter: &BrowseFilter,
        now: Timestamp,
    ) -> AppResult<(Vec<JobPostWithHouse>, i64)>;

    /// Every post of the house regardless of status, newest first.
    async fn list_for_house(&self, software_house_id: Uuid) -> AppResult<Vec<JobPost>>;

    async fn list_for_admin(&self, view: AdminView, now: Timestamp) -> AppResult<Vec<JobPostWithHouse>>;

    /// Flips every `active` post with `expires_at < now` to `expired` and
    /// returns the ids flipped by this call.
    async fn expire_overdue(&self, now: Timestamp) -> AppResult<Vec<Uuid>>;

    /// Sets `expires_at` and forces `active`; `None` when the post does not exist.
    async fn reactivate(&self, id: Uuid, expires_at: Timestamp) -> AppResult<Option<JobPost>>;

    /// Sets `to` only while the post is still in `from`; `None` when nothing matched.
    async fn update_status(
        &self,
        id: Uuid,
        from: JobPostStatus,
        to: JobPostStatus,
    ) -> AppResult<Option<JobPost>>;

    /// `false` when the post did not exist.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Deletes only when the post belongs to the house.
    async fn delete_owned(&self, software_house_id: Uuid, id: Uuid) -> AppResult<bool>;
}

/// Connectivity check used by the readiness endpoint
#[async_trait]
pub trait StoreHealth: Send + Sync {
    fn backend(&self) -> &'static str;

    async fn ping(&self) -> AppResult<()>;
}
