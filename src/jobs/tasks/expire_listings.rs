use async_trait::async_trait;
use jiff::Timestamp;

use crate::error::AppResult;
use crate::jobs::types::{JobContext, JobTask};

/// Daily sweep flipping overdue active listings to expired
#[derive(Debug, Clone, Default)]
pub struct ExpireListingsTask;

impl ExpireListingsTask {
    pub const NAME: &'static str = "expire_listings";
}

#[async_trait]
impl JobTask for ExpireListingsTask {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn execute(&self, ctx: JobContext) -> AppResult<()> {
        let report = ctx.services.lifecycle.sweep_expired(Timestamp::now()).await?;

        tracing::info!(
            execution_id = %ctx.execution_id,
            count = report.count,
            ids = ?report.ids,
            "Scheduled expiry sweep completed"
        );
        Ok(())
    }

    fn description(&self) -> Option<String> {
        Some("Expire active job posts whose display window has ended".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::models::{JobPostStatus, NewJobPost, NewSoftwareHouse};
    use crate::repositories::{JobPostStore, MemoryStore, Repositories, SoftwareHouseStore};
    use crate::services::Services;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_task_expires_overdue_posts() {
        let store = MemoryStore::new();
        let services =
            Services::new(&Repositories::with_memory_store(store.clone()), &Settings::default())
                .unwrap();

        let house = SoftwareHouseStore::create(
            &store,
            NewSoftwareHouse {
                name: "Sweepers".to_string(),
                phone: "+923009998887".to_string(),
                display_phone: "0300 9998887".to_string(),
                website: "https://sweepers.example.com".to_string(),
            },
            "2020-01-01T00:00:00Z".parse().unwrap(),
        )
        .await
        .unwrap();
        let post = JobPostStore::create(
            &store,
            NewJobPost {
                software_house_id: house.id,
                title: "Old listing".to_string(),
                image_url: "https://cdn.example.com/old.png".to_string(),
                youtube_url: None,
                contact_info: "old@example.com".to_string(),
                created_at: "2020-01-01T00:00:00Z".parse().unwrap(),
                expires_at: "2020-01-06T00:00:00Z".parse().unwrap(),
            },
        )
        .await
        .unwrap();

        let ctx = JobContext {
            execution_id: Uuid::new_v4(),
            services,
        };
        ExpireListingsTask.execute(ctx).await.unwrap();

        let swept = JobPostStore::find_by_id(&store, post.id).await.unwrap().unwrap();
        assert_eq!(swept.status, JobPostStatus::Expired);
    }
}
