//! Public job board.

use axum::{
    Json,
    extract::{Path, State},
};
use jiff::Timestamp;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use uuid::Uuid;

use crate::api::doc::JOB_BOARD_TAG;
use crate::api::dto::{BrowseJobsQuery, ErrorResponse, JobListingResponse, PagedResponse};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::ValidatedQuery;

pub fn job_board_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(browse_jobs))
        .routes(routes!(get_job))
}

/// GET /api/jobs - Browse live job posts
///
/// Only posts that are active and not yet past their expiry are listed,
/// newest first.
#[utoipa::path(
    get,
    path = "/",
    tag = JOB_BOARD_TAG,
    params(BrowseJobsQuery),
    responses(
        (status = 200, description = "One page of live posts", body = PagedResponse<JobListingResponse>),
        (status = 400, description = "Invalid query", body = ErrorResponse)
    )
)]
async fn browse_jobs(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<BrowseJobsQuery>,
) -> AppResult<Json<PagedResponse<JobListingResponse>>> {
    let now = Timestamp::now();
    let page = state.services.job_posts.browse(query.into(), now).await?;

    let items = page
        .items
        .into_iter()
        .map(|listing| JobListingResponse::from_listing(listing, now))
        .collect();
    Ok(Json(PagedResponse::new(
        items,
        page.page,
        page.page_size,
        page.total,
    )))
}

/// GET /api/jobs/{id} - Live job post detail
#[utoipa::path(
    get,
    path = "/{id}",
    tag = JOB_BOARD_TAG,
    params(("id" = Uuid, Path, description = "Job post id")),
    responses(
        (status = 200, description = "The post", body = JobListingResponse),
        (status = 404, description = "Absent, hidden or expired", body = ErrorResponse)
    )
)]
async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<JobListingResponse>> {
    let now = Timestamp::now();
    let listing = state.services.job_posts.get_visible(id, now).await?;
    Ok(Json(JobListingResponse::from_listing(listing, now)))
}
