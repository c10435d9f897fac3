//! Store layer.
//!
//! Services only see the store traits; [`Repositories`] wires them to either
//! PostgreSQL or the in-process [`MemoryStore`].

mod job_post_repo;
mod memory;
mod software_house_repo;
mod traits;

pub use job_post_repo::JobPostRepository;
pub use memory::MemoryStore;
pub use software_house_repo::SoftwareHouseRepository;
pub use traits::{BrowseFilter, JobPostStore, SoftwareHouseStore, StoreHealth};

use std::sync::Arc;

use async_trait::async_trait;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppResult, DatabaseErrorConverter};

/// Aggregates all stores for convenient access.
///
/// Cloning only bumps reference counts.
#[derive(Clone)]
pub struct Repositories {
    pub software_houses: Arc<dyn SoftwareHouseStore>,
    pub job_posts: Arc<dyn JobPostStore>,
    pub health: Arc<dyn StoreHealth>,
}

impl Repositories {
    pub fn postgres(pool: AsyncDbPool) -> Self {
        Self {
            software_houses: Arc::new(SoftwareHouseRepository::new(pool.clone())),
            job_posts: Arc::new(JobPostRepository::new(pool.clone())),
            health: Arc::new(PgHealth { pool }),
        }
    }

    pub fn memory() -> Self {
        Self::with_memory_store(MemoryStore::new())
    }

    pub fn with_memory_store(store: MemoryStore) -> Self {
        Self {
            software_houses: Arc::new(store.clone()),
            job_posts: Arc::new(store.clone()),
            health: Arc::new(store),
        }
    }
}

struct PgHealth {
    pool: AsyncDbPool,
}

#[async_trait]
impl StoreHealth for PgHealth {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.pool.get().await?;
        diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "ping database"))
    }
}
