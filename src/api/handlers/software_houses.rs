//! Public software house registration.

use axum::{Json, extract::State, http::StatusCode};
use jiff::Timestamp;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::SOFTWARE_HOUSE_TAG;
use crate::api::dto::{ErrorResponse, RegisterSoftwareHouseRequest, RegisterSoftwareHouseResponse};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

pub fn software_house_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(register))
}

/// POST /api/software-houses - Register a software house
///
/// The house starts out `pending` and cannot post jobs until an admin
/// approves it. The returned tokens identify the house in the owner area.
#[utoipa::path(
    post,
    path = "/",
    tag = SOFTWARE_HOUSE_TAG,
    request_body = RegisterSoftwareHouseRequest,
    responses(
        (status = 201, description = "Registered, awaiting approval", body = RegisterSoftwareHouseResponse),
        (status = 400, description = "Invalid request data", body = ErrorResponse)
    )
)]
async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterSoftwareHouseRequest>,
) -> AppResult<(StatusCode, Json<RegisterSoftwareHouseResponse>)> {
    let software_house = state
        .services
        .software_houses
        .register(payload.into(), Timestamp::now())
        .await?;
    let tokens = state.services.auth.issue_house_tokens(software_house.id)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterSoftwareHouseResponse {
            software_house,
            tokens,
        }),
    ))
}
