//! Job board: posting, public browsing and listing management.

use std::sync::Arc;

use jiff::Timestamp;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{AdminView, JobKind, JobPost, JobPostWithHouse, NewJobPost, expiry_after};
use crate::repositories::{BrowseFilter, JobPostStore, SoftwareHouseStore};
use crate::services::ListingPolicy;

/// Content of a new post as submitted by its house
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPostInput {
    pub title: String,
    pub image_url: String,
    pub youtube_url: Option<String>,
    pub contact_info: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowseQuery {
    pub search: Option<String>,
    pub kind: Option<JobKind>,
    /// 1-based
    pub page: i64,
    pub page_size: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowsePage {
    pub items: Vec<JobPostWithHouse>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

#[derive(Clone)]
pub struct JobPostService {
    posts: Arc<dyn JobPostStore>,
    houses: Arc<dyn SoftwareHouseStore>,
    policy: ListingPolicy,
}

impl JobPostService {
    pub fn new(
        posts: Arc<dyn JobPostStore>,
        houses: Arc<dyn SoftwareHouseStore>,
        policy: ListingPolicy,
    ) -> Self {
        Self {
            posts,
            houses,
            policy,
        }
    }

    /// Publishes a post for an approved house, visible for the current
    /// default display days.
    pub async fn post_job(&self, house_id: Uuid, input: JobPostInput, now: Timestamp) -> AppResult<JobPost> {
        let house = self
            .houses
            .find_by_id(house_id)
            .await?
            .ok_or_else(|| AppError::not_found("SoftwareHouse", "id", house_id))?;

        if !house.is_approved() {
            return Err(AppError::Forbidden {
                message: format!(
                    "Software house is {}; only approved houses can post jobs",
                    house.status
                ),
            });
        }

        let display_days = self.policy.display_days();
        let post = self
            .posts
            .create(NewJobPost {
                software_house_id: house_id,
                title: input.title,
                image_url: input.image_url,
                youtube_url: input.youtube_url,
                contact_info: input.contact_info,
                created_at: now,
                expires_at: expiry_after(now, display_days)?,
            })
            .await?;

        tracing::info!(
            job_id = %post.id,
            software_house_id = %house_id,
            display_days,
            expires_at = %post.expires_at,
            "Job post created"
        );
        Ok(post)
    }

    pub async fn browse(&self, query: BrowseQuery, now: Timestamp) -> AppResult<BrowsePage> {
        let page = query.page.max(1);
        let page_size = query.page_size.max(1);
        let filter = BrowseFilter {
            search: query.search,
            kind: query.kind,
            offset: (page - 1).saturating_mul(page_size),
            limit: page_size,
        };

        let (items, total) = self.posts.browse(&filter, now).await?;
        Ok(BrowsePage {
            items,
            total,
            page,
            page_size,
        })
    }

    /// Public detail view; hidden and expired posts read as absent.
    pub async fn get_visible(&self, id: Uuid, now: Timestamp) -> AppResult<JobPostWithHouse> {
        self.posts
            .find_visible(id, now)
            .await?
            .ok_or_else(|| AppError::not_found("JobPost", "id", id))
    }

    pub async fn list_for_house(&self, house_id: Uuid) -> AppResult<Vec<JobPost>> {
        self.posts.list_for_house(house_id).await
    }

    /// Deletes one of the house's own posts. Posts of other houses read as absent.
    pub async fn delete_owned(&self, house_id: Uuid, id: Uuid) -> AppResult<()> {
        if !self.posts.delete_owned(house_id, id).await? {
            return Err(AppError::not_found("JobPost", "id", id));
        }
        tracing::info!(job_id = %id, software_house_id = %house_id, "Job post deleted by owner");
        Ok(())
    }

    pub async fn admin_list(&self, view: AdminView, now: Timestamp) -> AppResult<Vec<JobPostWithHouse>> {
        self.posts.list_for_admin(view, now).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.posts.delete(id).await? {
            return Err(AppError::not_found("JobPost", "id", id));
        }
        tracing::info!(job_id = %id, "Job post deleted by admin");
        Ok(())
    }
}
