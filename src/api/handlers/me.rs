//! Owner area for the authenticated software house.
//!
//! Every route sits behind [`require_software_house`](crate::api::middleware::require_software_house),
//! so the verified [`Claims`] are always present.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use jiff::Timestamp;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use uuid::Uuid;

use crate::api::doc::OWNER_TAG;
use crate::api::dto::{CreateJobPostRequest, ErrorResponse, JobPostResponse};
use crate::error::AppResult;
use crate::models::SoftwareHouse;
use crate::services::house_id;
use crate::state::AppState;
use crate::utils::jwt::Claims;
use crate::utils::validate::ValidatedJson;

/// Creates the owner routes
///
/// # Routes
/// - `GET /` - The house itself, including its review status
/// - `GET /jobs` - All of the house's posts
/// - `POST /jobs` - Publish a post (approved houses only)
/// - `DELETE /jobs/{id}` - Remove one of the house's posts
pub fn me_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(get_me))
        .routes(routes!(list_my_jobs, create_job))
        .routes(routes!(delete_my_job))
}

#[utoipa::path(
    get,
    path = "/",
    tag = OWNER_TAG,
    responses(
        (status = 200, description = "The authenticated software house", body = SoftwareHouse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn get_me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<SoftwareHouse>> {
    let house = state.services.software_houses.get(house_id(&claims)?).await?;
    Ok(Json(house))
}

#[utoipa::path(
    get,
    path = "/jobs",
    tag = OWNER_TAG,
    responses(
        (status = 200, description = "The house's posts, newest first, in any status", body = Vec<JobPostResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn list_my_jobs(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<Vec<JobPostResponse>>> {
    let now = Timestamp::now();
    let posts = state
        .services
        .job_posts
        .list_for_house(house_id(&claims)?)
        .await?;
    Ok(Json(
        posts
            .into_iter()
            .map(|post| JobPostResponse::new(post, now))
            .collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/jobs",
    tag = OWNER_TAG,
    request_body = CreateJobPostRequest,
    responses(
        (status = 201, description = "Post published", body = JobPostResponse),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Software house is not approved", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn create_job(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ValidatedJson(payload): ValidatedJson<CreateJobPostRequest>,
) -> AppResult<(StatusCode, Json<JobPostResponse>)> {
    let now = Timestamp::now();
    let post = state
        .services
        .job_posts
        .post_job(house_id(&claims)?, payload.into(), now)
        .await?;
    Ok((StatusCode::CREATED, Json(JobPostResponse::new(post, now))))
}

#[utoipa::path(
    delete,
    path = "/jobs/{id}",
    tag = OWNER_TAG,
    params(("id" = Uuid, Path, description = "Job post id")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "No such post owned by this house", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn delete_my_job(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state
        .services
        .job_posts
        .delete_owned(house_id(&claims)?, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
