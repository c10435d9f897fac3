//! In-process store backed by `DashMap`, used for development and tests.
//!
//! Every mutation checks and updates a row while holding its shard lock,
//! which gives the same per-row atomicity the PostgreSQL backend relies on.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use jiff::Timestamp;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    AdminView, JobPost, JobPostStatus, JobPostWithHouse, NewJobPost, NewSoftwareHouse,
    SoftwareHouse, SoftwareHouseStatus,
};
use crate::repositories::traits::{BrowseFilter, JobPostStore, SoftwareHouseStore, StoreHealth};

#[derive(Debug, Default)]
struct Tables {
    software_houses: DashMap<Uuid, SoftwareHouse>,
    job_posts: DashMap<Uuid, JobPost>,
}

/// Cloning shares the underlying tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn join(&self, post: JobPost) -> Option<JobPostWithHouse> {
        let house = self.tables.software_houses.get(&post.software_house_id)?;
        Some(JobPostWithHouse {
            house_name: house.name.clone(),
            house_display_phone: house.display_phone.clone(),
            house_website: house.website.clone(),
            post,
        })
    }

    fn joined_where<F>(&self, predicate: F) -> Vec<JobPostWithHouse>
    where
        F: Fn(&JobPost, &SoftwareHouse) -> bool,
    {
        let mut rows: Vec<JobPostWithHouse> = self
            .tables
            .job_posts
            .iter()
            .filter_map(|entry| {
                let house = self.tables.software_houses.get(&entry.software_house_id)?;
                predicate(entry.value(), house.value()).then(|| entry.value().clone())
            })
            .filter_map(|post| self.join(post))
            .collect();
        newest_first(&mut rows, |row| &row.post);
        rows
    }
}

fn newest_first<T>(rows: &mut [T], post: impl Fn(&T) -> &JobPost) {
    rows.sort_by(|a, b| {
        let (a, b) = (post(a), post(b));
        b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id))
    });
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl SoftwareHouseStore for MemoryStore {
    async fn create(&self, new_house: NewSoftwareHouse, now: Timestamp) -> AppResult<SoftwareHouse> {
        let house = SoftwareHouse {
            id: Uuid::new_v4(),
            name: new_house.name,
            phone: new_house.phone,
            display_phone: new_house.display_phone,
            website: new_house.website,
            status: SoftwareHouseStatus::Pending,
            created_at: now,
        };
        self.tables.software_houses.insert(house.id, house.clone());
        Ok(house)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SoftwareHouse>> {
        Ok(self.tables.software_houses.get(&id).map(|h| h.clone()))
    }

    async fn list_by_status(&self, status: SoftwareHouseStatus) -> AppResult<Vec<SoftwareHouse>> {
        let mut houses: Vec<SoftwareHouse> = self
            .tables
            .software_houses
            .iter()
            .filter(|h| h.status == status)
            .map(|h| h.clone())
            .collect();
        houses.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(houses)
    }

    async fn update_status(
        &self,
        id: Uuid,
        from: SoftwareHouseStatus,
        to: SoftwareHouseStatus,
    ) -> AppResult<Option<SoftwareHouse>> {
        Ok(self
            .tables
            .software_houses
            .get_mut(&id)
            .filter(|h| h.status == from)
            .map(|mut h| {
                h.status = to;
                h.clone()
            }))
    }
}

#[async_trait]
impl JobPostStore for MemoryStore {
    async fn create(&self, new_post: NewJobPost) -> AppResult<JobPost> {
        if !self
            .tables
            .software_houses
            .contains_key(&new_post.software_house_id)
        {
            return Err(AppError::not_found(
                "software_houses",
                "id",
                new_post.software_house_id,
            ));
        }

        let post = JobPost {
            id: Uuid::new_v4(),
            software_house_id: new_post.software_house_id,
            title: new_post.title,
            image_url: new_post.image_url,
            youtube_url: new_post.youtube_url,
            contact_info: new_post.contact_info,
            status: JobPostStatus::Active,
            created_at: new_post.created_at,
            expires_at: new_post.expires_at,
        };
        self.tables.job_posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<JobPost>> {
        Ok(self.tables.job_posts.get(&id).map(|p| p.clone()))
    }

    async fn find_visible(&self, id: Uuid, now: Timestamp) -> AppResult<Option<JobPostWithHouse>> {
        let post = self
            .tables
            .job_posts
            .get(&id)
            .filter(|p| p.is_visible(now))
            .map(|p| p.clone());
        Ok(post.and_then(|p| self.join(p)))
    }

    async fn browse(
        &self,
        filter: &BrowseFilter,
        now: Timestamp,
    ) -> AppResult<(Vec<JobPostWithHouse>, i64)> {
        let term = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());

        let matches = self.joined_where(|post, house| {
            post.is_visible(now)
                && term.is_none_or(|t| contains_ci(&post.title, t) || contains_ci(&house.name, t))
                && filter.kind.is_none_or(|kind| kind.matches(&post.title))
        });

        let total = matches.len() as i64;
        let page = matches
            .into_iter()
            .skip(filter.offset.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }

    async fn list_for_house(&self, software_house_id: Uuid) -> AppResult<Vec<JobPost>> {
        let mut posts: Vec<JobPost> = self
            .tables
            .job_posts
            .iter()
            .filter(|p| p.software_house_id == software_house_id)
            .map(|p| p.clone())
            .collect();
        newest_first(&mut posts, |p| p);
        Ok(posts)
    }

    async fn list_for_admin(&self, view: AdminView, now: Timestamp) -> AppResult<Vec<JobPostWithHouse>> {
        Ok(self.joined_where(|post, _| view.includes(post, now)))
    }

    async fn expire_overdue(&self, now: Timestamp) -> AppResult<Vec<Uuid>> {
        let mut expired = Vec::new();
        for mut post in self.tables.job_posts.iter_mut() {
            if post.is_overdue(now) {
                post.status = JobPostStatus::Expired;
                expired.push(post.id);
            }
        }
        Ok(expired)
    }

    async fn reactivate(&self, id: Uuid, expires_at: Timestamp) -> AppResult<Option<JobPost>> {
        Ok(self.tables.job_posts.get_mut(&id).map(|mut post| {
            post.status = JobPostStatus::Active;
            post.expires_at = expires_at;
            post.clone()
        }))
    }

    async fn update_status(
        &self,
        id: Uuid,
        from: JobPostStatus,
        to: JobPostStatus,
    ) -> AppResult<Option<JobPost>> {
        Ok(self
            .tables
            .job_posts
            .get_mut(&id)
            .filter(|p| p.status == from)
            .map(|mut p| {
                p.status = to;
                p.clone()
            }))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.tables.job_posts.remove(&id).is_some())
    }

    async fn delete_owned(&self, software_house_id: Uuid, id: Uuid) -> AppResult<bool> {
        Ok(self
            .tables
            .job_posts
            .remove_if(&id, |_, post| post.software_house_id == software_house_id)
            .is_some())
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
