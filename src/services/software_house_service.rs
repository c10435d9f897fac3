//! Software house registration and approval.

use std::sync::Arc;

use jiff::Timestamp;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{NewSoftwareHouse, SoftwareHouse, SoftwareHouseStatus};
use crate::repositories::SoftwareHouseStore;

const MAX_STATUS_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct SoftwareHouseService {
    houses: Arc<dyn SoftwareHouseStore>,
}

impl SoftwareHouseService {
    pub fn new(houses: Arc<dyn SoftwareHouseStore>) -> Self {
        Self { houses }
    }

    /// Registers a house; it stays `pending` until an admin decides.
    pub async fn register(&self, new_house: NewSoftwareHouse, now: Timestamp) -> AppResult<SoftwareHouse> {
        let house = self.houses.create(new_house, now).await?;
        tracing::info!(software_house_id = %house.id, name = %house.name, "Software house registered");
        Ok(house)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<SoftwareHouse> {
        self.houses
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("SoftwareHouse", "id", id))
    }

    pub async fn list_by_status(&self, status: SoftwareHouseStatus) -> AppResult<Vec<SoftwareHouse>> {
        self.houses.list_by_status(status).await
    }

    pub async fn approve(&self, id: Uuid) -> AppResult<SoftwareHouse> {
        self.transition(id, "approve", SoftwareHouseStatus::approve).await
    }

    pub async fn reject(&self, id: Uuid) -> AppResult<SoftwareHouse> {
        self.transition(id, "reject", SoftwareHouseStatus::reject).await
    }

    /// Applies `rule` with a compare-and-set on the status it was computed from.
    async fn transition(
        &self,
        id: Uuid,
        action: &str,
        rule: fn(SoftwareHouseStatus) -> AppResult<Option<SoftwareHouseStatus>>,
    ) -> AppResult<SoftwareHouse> {
        for _ in 0..MAX_STATUS_ATTEMPTS {
            let house = self.get(id).await?;
            let Some(target) = rule(house.status)? else {
                return Ok(house);
            };

            if let Some(updated) = self.houses.update_status(id, house.status, target).await? {
                tracing::info!(
                    software_house_id = %id,
                    from = %house.status,
                    to = %target,
                    "Software house {}d", action
                );
                return Ok(updated);
            }
        }

        Err(AppError::Internal {
            source: anyhow::anyhow!("software house {} kept changing during {}", id, action),
        })
    }
}
