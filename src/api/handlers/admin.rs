//! Admin area: software house review, listing management, the manual
//! expiry sweep and runtime listing settings.
//!
//! Every route sits behind [`require_admin`](crate::api::middleware::require_admin).

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use jiff::Timestamp;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use uuid::Uuid;

use crate::api::doc::ADMIN_TAG;
use crate::api::dto::{
    AdminJobsQuery, ErrorResponse, ExtendJobRequest, JobListingResponse, JobPostResponse,
    ListingSettingsResponse, SoftwareHouseStatusQuery, UpdateListingSettingsRequest,
};
use crate::error::AppResult;
use crate::models::SoftwareHouse;
use crate::services::SweepReport;
use crate::state::AppState;
use crate::utils::validate::{ValidatedJson, ValidatedQuery};

/// Creates the admin routes
///
/// # Routes
/// - `GET /software-houses` - Houses in one review status
/// - `POST /software-houses/{id}/approve`, `POST /software-houses/{id}/reject`
/// - `GET /jobs` - Posts in one admin view
/// - `POST /jobs/{id}/hide`, `POST /jobs/{id}/extend`, `DELETE /jobs/{id}`
/// - `POST /sweep` - Run the expiry sweep now
/// - `GET /settings`, `PUT /settings`
pub fn admin_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_software_houses))
        .routes(routes!(approve_software_house))
        .routes(routes!(reject_software_house))
        .routes(routes!(list_jobs))
        .routes(routes!(hide_job))
        .routes(routes!(extend_job))
        .routes(routes!(delete_job))
        .routes(routes!(sweep_expired))
        .routes(routes!(get_settings, update_settings))
}

#[utoipa::path(
    get,
    path = "/software-houses",
    tag = ADMIN_TAG,
    params(SoftwareHouseStatusQuery),
    responses(
        (status = 200, description = "Houses in the requested status, newest first", body = Vec<SoftwareHouse>),
        (status = 401, description = "Missing, invalid or non-admin token", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn list_software_houses(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<SoftwareHouseStatusQuery>,
) -> AppResult<Json<Vec<SoftwareHouse>>> {
    let houses = state
        .services
        .software_houses
        .list_by_status(query.status)
        .await?;
    Ok(Json(houses))
}

#[utoipa::path(
    post,
    path = "/software-houses/{id}/approve",
    tag = ADMIN_TAG,
    params(("id" = Uuid, Path, description = "Software house id")),
    responses(
        (status = 200, description = "House approved (or already approved)", body = SoftwareHouse),
        (status = 401, description = "Missing, invalid or non-admin token", body = ErrorResponse),
        (status = 404, description = "No such software house", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn approve_software_house(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SoftwareHouse>> {
    Ok(Json(state.services.software_houses.approve(id).await?))
}

#[utoipa::path(
    post,
    path = "/software-houses/{id}/reject",
    tag = ADMIN_TAG,
    params(("id" = Uuid, Path, description = "Software house id")),
    responses(
        (status = 200, description = "House rejected (or already rejected)", body = SoftwareHouse),
        (status = 401, description = "Missing, invalid or non-admin token", body = ErrorResponse),
        (status = 404, description = "No such software house", body = ErrorResponse),
        (status = 409, description = "House is already approved", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn reject_software_house(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SoftwareHouse>> {
    Ok(Json(state.services.software_houses.reject(id).await?))
}

#[utoipa::path(
    get,
    path = "/jobs",
    tag = ADMIN_TAG,
    params(AdminJobsQuery),
    responses(
        (status = 200, description = "Posts in the requested view, newest first", body = Vec<JobListingResponse>),
        (status = 401, description = "Missing, invalid or non-admin token", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn list_jobs(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<AdminJobsQuery>,
) -> AppResult<Json<Vec<JobListingResponse>>> {
    let now = Timestamp::now();
    let listings = state.services.job_posts.admin_list(query.view, now).await?;
    Ok(Json(
        listings
            .into_iter()
            .map(|listing| JobListingResponse::from_listing(listing, now))
            .collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/jobs/{id}/hide",
    tag = ADMIN_TAG,
    params(("id" = Uuid, Path, description = "Job post id")),
    responses(
        (status = 200, description = "Post hidden (or already hidden)", body = JobPostResponse),
        (status = 401, description = "Missing, invalid or non-admin token", body = ErrorResponse),
        (status = 404, description = "No such post", body = ErrorResponse),
        (status = 409, description = "Post is expired", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn hide_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<JobPostResponse>> {
    let post = state.services.lifecycle.hide(id).await?;
    Ok(Json(JobPostResponse::new(post, Timestamp::now())))
}

/// POST /api/admin/jobs/{id}/extend - Extend or relist a post
///
/// Sets the expiry to now plus `days` (the default display days when the
/// body is absent or `days` is null) and makes the post active again, also
/// when it was hidden or expired.
#[utoipa::path(
    post,
    path = "/jobs/{id}/extend",
    tag = ADMIN_TAG,
    params(("id" = Uuid, Path, description = "Job post id")),
    request_body(
        content = ExtendJobRequest,
        description = "Optional; omit it for the default display days",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Post active with its new expiry", body = JobPostResponse),
        (status = 400, description = "Days out of range", body = ErrorResponse),
        (status = 401, description = "Missing, invalid or non-admin token", body = ErrorResponse),
        (status = 404, description = "No such post", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn extend_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Option<ValidatedJson<ExtendJobRequest>>,
) -> AppResult<Json<JobPostResponse>> {
    let now = Timestamp::now();
    let days = body.and_then(|ValidatedJson(req)| req.days);

    let post = match days {
        Some(days) => state.services.lifecycle.extend(id, days, now).await?,
        None => state.services.lifecycle.extend_by_default(id, now).await?,
    };
    Ok(Json(JobPostResponse::new(post, now)))
}

#[utoipa::path(
    delete,
    path = "/jobs/{id}",
    tag = ADMIN_TAG,
    params(("id" = Uuid, Path, description = "Job post id")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 401, description = "Missing, invalid or non-admin token", body = ErrorResponse),
        (status = 404, description = "No such post", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn delete_job(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    state.services.job_posts.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/admin/sweep - Expire overdue posts now
///
/// Same operation as the scheduled daily sweep.
#[utoipa::path(
    post,
    path = "/sweep",
    tag = ADMIN_TAG,
    responses(
        (status = 200, description = "Posts flipped to expired by this run", body = SweepReport),
        (status = 401, description = "Missing, invalid or non-admin token", body = ErrorResponse),
        (status = 503, description = "Store unavailable", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn sweep_expired(State(state): State<AppState>) -> AppResult<Json<SweepReport>> {
    let report = state.services.lifecycle.sweep_expired(Timestamp::now()).await?;
    Ok(Json(report))
}

#[utoipa::path(
    get,
    path = "/settings",
    tag = ADMIN_TAG,
    responses(
        (status = 200, description = "Current listing settings", body = ListingSettingsResponse),
        (status = 401, description = "Missing, invalid or non-admin token", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn get_settings(State(state): State<AppState>) -> Json<ListingSettingsResponse> {
    Json(ListingSettingsResponse {
        default_display_days: state.services.policy.display_days(),
    })
}

/// PUT /api/admin/settings - Change the default display days
///
/// Applies to posts created and default extensions made afterwards, until
/// the process restarts.
#[utoipa::path(
    put,
    path = "/settings",
    tag = ADMIN_TAG,
    request_body = UpdateListingSettingsRequest,
    responses(
        (status = 200, description = "Updated listing settings", body = ListingSettingsResponse),
        (status = 400, description = "Value out of range", body = ErrorResponse),
        (status = 401, description = "Missing, invalid or non-admin token", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn update_settings(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UpdateListingSettingsRequest>,
) -> AppResult<Json<ListingSettingsResponse>> {
    let previous = state
        .services
        .policy
        .set_display_days(payload.default_display_days)?;
    tracing::info!(
        previous,
        default_display_days = payload.default_display_days,
        "Default display days changed"
    );

    Ok(Json(ListingSettingsResponse {
        default_display_days: payload.default_display_days,
    }))
}
