//! PostgreSQL job post repository.
//!
//! Visibility is evaluated inside each query so pages and counts never
//! include posts whose deadline has passed but which the sweep has not
//! reached yet.

use async_trait::async_trait;
use diesel::dsl::{InnerJoin, IntoBoxed};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff::Timestamp;
use jiff_diesel::ToDiesel;
use uuid::Uuid;

use crate::db::AsyncDbPool;
use crate::error::{AppResult, DatabaseErrorConverter};
use crate::models::{AdminView, JobKind, JobPost, JobPostStatus, JobPostWithHouse, NewJobPost};
use crate::repositories::traits::{BrowseFilter, JobPostStore};
use crate::schema::{job_posts, software_houses};

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = job_posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct JobPostRow {
    id: Uuid,
    software_house_id: Uuid,
    title: String,
    image_url: String,
    youtube_url: Option<String>,
    contact_info: String,
    status: JobPostStatus,
    created_at: jiff_diesel::Timestamp,
    expires_at: jiff_diesel::Timestamp,
}

impl From<JobPostRow> for JobPost {
    fn from(row: JobPostRow) -> Self {
        JobPost {
            id: row.id,
            software_house_id: row.software_house_id,
            title: row.title,
            image_url: row.image_url,
            youtube_url: row.youtube_url,
            contact_info: row.contact_info,
            status: row.status,
            created_at: row.created_at.to_jiff(),
            expires_at: row.expires_at.to_jiff(),
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = job_posts)]
struct NewJobPostRow<'a> {
    software_house_id: Uuid,
    title: &'a str,
    image_url: &'a str,
    youtube_url: Option<&'a str>,
    contact_info: &'a str,
    status: JobPostStatus,
    created_at: jiff_diesel::Timestamp,
    expires_at: jiff_diesel::Timestamp,
}

/// Post row plus house name, display phone and website
type JoinedRow = (JobPostRow, (String, String, String));

type JoinedQuery = IntoBoxed<'static, InnerJoin<job_posts::table, software_houses::table>, Pg>;

fn with_house((row, (name, display_phone, website)): JoinedRow) -> JobPostWithHouse {
    JobPostWithHouse {
        post: row.into(),
        house_name: name,
        house_display_phone: display_phone,
        house_website: website,
    }
}

/// Escapes `%`, `_` and the escape character itself for a Postgres `LIKE` pattern.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn joined() -> JoinedQuery {
    job_posts::table.inner_join(software_houses::table).into_boxed()
}

fn visible(query: JoinedQuery, now: Timestamp) -> JoinedQuery {
    query
        .filter(job_posts::status.eq(JobPostStatus::Active))
        .filter(job_posts::expires_at.gt(now.to_diesel()))
}

fn browse_query(filter: &BrowseFilter, now: Timestamp) -> JoinedQuery {
    let mut query = visible(joined(), now);

    if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        let pattern = like_pattern(term);
        query = query.filter(
            job_posts::title
                .ilike(pattern.clone())
                .or(software_houses::name.ilike(pattern)),
        );
    }

    match filter.kind {
        Some(JobKind::Internship) => query.filter(job_posts::title.ilike(JobKind::title_pattern())),
        Some(JobKind::FullTime) => {
            query.filter(job_posts::title.not_ilike(JobKind::title_pattern()))
        }
        None => query,
    }
}

fn admin_query(view: AdminView, now: Timestamp) -> JoinedQuery {
    match view {
        AdminView::Active => visible(joined(), now),
        AdminView::Expired => joined().filter(
            job_posts::status.eq(JobPostStatus::Expired).or(job_posts::status
                .eq(JobPostStatus::Active)
                .and(job_posts::expires_at.le(now.to_diesel()))),
        ),
        AdminView::Hidden => joined().filter(job_posts::status.eq(JobPostStatus::Hidden)),
    }
}

#[derive(Clone)]
pub struct JobPostRepository {
    pool: AsyncDbPool,
}

impl JobPostRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobPostStore for JobPostRepository {
    async fn create(&self, new_post: NewJobPost) -> AppResult<JobPost> {
        let mut conn = self.pool.get().await?;

        let row = NewJobPostRow {
            software_house_id: new_post.software_house_id,
            title: &new_post.title,
            image_url: &new_post.image_url,
            youtube_url: new_post.youtube_url.as_deref(),
            contact_info: &new_post.contact_info,
            status: JobPostStatus::Active,
            created_at: new_post.created_at.to_diesel(),
            expires_at: new_post.expires_at.to_diesel(),
        };

        diesel::insert_into(job_posts::table)
            .values(&row)
            .returning(JobPostRow::as_returning())
            .get_result(&mut conn)
            .await
            .map(JobPost::from)
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "create job post"))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<JobPost>> {
        let mut conn = self.pool.get().await?;

        job_posts::table
            .find(id)
            .select(JobPostRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|row| row.map(JobPost::from))
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "find job post"))
    }

    async fn find_visible(&self, id: Uuid, now: Timestamp) -> AppResult<Option<JobPostWithHouse>> {
        let mut conn = self.pool.get().await?;

        visible(joined(), now)
            .filter(job_posts::id.eq(id))
            .select((
                JobPostRow::as_select(),
                (
                    software_houses::name,
                    software_houses::display_phone,
                    software_houses::website,
                ),
            ))
            .first::<JoinedRow>(&mut conn)
            .await
            .optional()
            .map(|row| row.map(with_house))
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "find visible job post"))
    }

    async fn browse(
        &self,
        filter: &BrowseFilter,
        now: Timestamp,
    ) -> AppResult<(Vec<JobPostWithHouse>, i64)> {
        let mut conn = self.pool.get().await?;

        let total: i64 = browse_query(filter, now)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "count job posts"))?;

        let rows = browse_query(filter, now)
            .select((
                JobPostRow::as_select(),
                (
                    software_houses::name,
                    software_houses::display_phone,
                    software_houses::website,
                ),
            ))
            .order((job_posts::created_at.desc(), job_posts::id))
            .limit(filter.limit)
            .offset(filter.offset)
            .load::<JoinedRow>(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "browse job posts"))?;

        Ok((rows.into_iter().map(with_house).collect(), total))
    }

    async fn list_for_house(&self, software_house_id: Uuid) -> AppResult<Vec<JobPost>> {
        let mut conn = self.pool.get().await?;

        job_posts::table
            .filter(job_posts::software_house_id.eq(software_house_id))
            .order(job_posts::created_at.desc())
            .select(JobPostRow::as_select())
            .load(&mut conn)
            .await
            .map(|rows| rows.into_iter().map(JobPost::from).collect())
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "list house job posts"))
    }

    async fn list_for_admin(&self, view: AdminView, now: Timestamp) -> AppResult<Vec<JobPostWithHouse>> {
        let mut conn = self.pool.get().await?;

        admin_query(view, now)
            .select((
                JobPostRow::as_select(),
                (
                    software_houses::name,
                    software_houses::display_phone,
                    software_houses::website,
                ),
            ))
            .order(job_posts::created_at.desc())
            .load::<JoinedRow>(&mut conn)
            .await
            .map(|rows| rows.into_iter().map(with_house).collect())
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "list admin job posts"))
    }

    async fn expire_overdue(&self, now: Timestamp) -> AppResult<Vec<Uuid>> {
        let mut conn = self.pool.get().await?;

        // Single statement: Postgres re-checks the predicate per row, so
        // overlapping sweeps never report the same row twice.
        diesel::update(
            job_posts::table
                .filter(job_posts::status.eq(JobPostStatus::Active))
                .filter(job_posts::expires_at.lt(now.to_diesel())),
        )
        .set(job_posts::status.eq(JobPostStatus::Expired))
        .returning(job_posts::id)
        .get_results(&mut conn)
        .await
        .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "expire overdue job posts"))
    }

    async fn reactivate(&self, id: Uuid, expires_at: Timestamp) -> AppResult<Option<JobPost>> {
        let mut conn = self.pool.get().await?;

        diesel::update(job_posts::table.find(id))
            .set((
                job_posts::status.eq(JobPostStatus::Active),
                job_posts::expires_at.eq(expires_at.to_diesel()),
            ))
            .returning(JobPostRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map(|row| row.map(JobPost::from))
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "extend job post"))
    }

    async fn update_status(
        &self,
        id: Uuid,
        from: JobPostStatus,
        to: JobPostStatus,
    ) -> AppResult<Option<JobPost>> {
        let mut conn = self.pool.get().await?;

        diesel::update(
            job_posts::table
                .filter(job_posts::id.eq(id))
                .filter(job_posts::status.eq(from)),
        )
        .set(job_posts::status.eq(to))
        .returning(JobPostRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map(|row| row.map(JobPost::from))
        .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "update job post status"))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut conn = self.pool.get().await?;

        diesel::delete(job_posts::table.find(id))
            .execute(&mut conn)
            .await
            .map(|affected| affected > 0)
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "delete job post"))
    }

    async fn delete_owned(&self, software_house_id: Uuid, id: Uuid) -> AppResult<bool> {
        let mut conn = self.pool.get().await?;

        diesel::delete(
            job_posts::table
                .filter(job_posts::id.eq(id))
                .filter(job_posts::software_house_id.eq(software_house_id)),
        )
        .execute(&mut conn)
        .await
        .map(|affected| affected > 0)
        .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "delete owned job post"))
    }
}
