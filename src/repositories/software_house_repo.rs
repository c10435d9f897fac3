//! PostgreSQL software house repository.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff::Timestamp;
use jiff_diesel::ToDiesel;
use uuid::Uuid;

use crate::db::AsyncDbPool;
use crate::error::{AppResult, DatabaseErrorConverter};
use crate::models::{NewSoftwareHouse, SoftwareHouse, SoftwareHouseStatus};
use crate::repositories::traits::SoftwareHouseStore;
use crate::schema::software_houses;

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = software_houses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct SoftwareHouseRow {
    id: Uuid,
    name: String,
    phone: String,
    display_phone: String,
    website: String,
    status: SoftwareHouseStatus,
    created_at: jiff_diesel::Timestamp,
}

impl From<SoftwareHouseRow> for SoftwareHouse {
    fn from(row: SoftwareHouseRow) -> Self {
        SoftwareHouse {
            id: row.id,
            name: row.name,
            phone: row.phone,
            display_phone: row.display_phone,
            website: row.website,
            status: row.status,
            created_at: row.created_at.to_jiff(),
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = software_houses)]
struct NewSoftwareHouseRow<'a> {
    name: &'a str,
    phone: &'a str,
    display_phone: &'a str,
    website: &'a str,
    status: SoftwareHouseStatus,
    created_at: jiff_diesel::Timestamp,
}

/// bb8::Pool is reference counted, so cloning the repository is cheap.
#[derive(Clone)]
pub struct SoftwareHouseRepository {
    pool: AsyncDbPool,
}

impl SoftwareHouseRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SoftwareHouseStore for SoftwareHouseRepository {
    async fn create(&self, new_house: NewSoftwareHouse, now: Timestamp) -> AppResult<SoftwareHouse> {
        let mut conn = self.pool.get().await?;

        let row = NewSoftwareHouseRow {
            name: &new_house.name,
            phone: &new_house.phone,
            display_phone: &new_house.display_phone,
            website: &new_house.website,
            status: SoftwareHouseStatus::Pending,
            created_at: now.to_diesel(),
        };

        diesel::insert_into(software_houses::table)
            .values(&row)
            .returning(SoftwareHouseRow::as_returning())
            .get_result(&mut conn)
            .await
            .map(SoftwareHouse::from)
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "create software house"))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SoftwareHouse>> {
        let mut conn = self.pool.get().await?;

        software_houses::table
            .find(id)
            .select(SoftwareHouseRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|row| row.map(SoftwareHouse::from))
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "find software house"))
    }

    async fn list_by_status(&self, status: SoftwareHouseStatus) -> AppResult<Vec<SoftwareHouse>> {
        let mut conn = self.pool.get().await?;

        software_houses::table
            .filter(software_houses::status.eq(status))
            .order(software_houses::created_at.desc())
            .select(SoftwareHouseRow::as_select())
            .load(&mut conn)
            .await
            .map(|rows| rows.into_iter().map(SoftwareHouse::from).collect())
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "list software houses"))
    }

    async fn update_status(
        &self,
        id: Uuid,
        from: SoftwareHouseStatus,
        to: SoftwareHouseStatus,
    ) -> AppResult<Option<SoftwareHouse>> {
        let mut conn = self.pool.get().await?;

        diesel::update(
            software_houses::table
                .filter(software_houses::id.eq(id))
                .filter(software_houses::status.eq(from)),
        )
        .set(software_houses::status.eq(to))
        .returning(SoftwareHouseRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map(|row| row.map(SoftwareHouse::from))
        .map_err(|e| {
            DatabaseErrorConverter::convert_diesel_error(e, "update software house status")
        })
    }
}
