//! Authentication handlers for admin login and token refresh.

use axum::{Json, extract::State};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::AUTH_TAG;
use crate::api::dto::{AdminLoginRequest, ErrorResponse, RefreshTokenRequest};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::jwt::TokenPair;
use crate::utils::validate::ValidatedJson;

/// Creates the authentication routes
///
/// # Routes
/// - `POST /admin/login` - Exchange the admin password for tokens
/// - `POST /refresh` - Exchange a refresh token for a new pair
pub fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(admin_login))
        .routes(routes!(refresh_token))
}

#[utoipa::path(
    post,
    path = "/admin/login",
    tag = AUTH_TAG,
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenPair),
        (status = 401, description = "Wrong password or admin login disabled", body = ErrorResponse)
    )
)]
async fn admin_login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AdminLoginRequest>,
) -> AppResult<Json<TokenPair>> {
    let tokens = state.services.auth.admin_login(&payload.password).await?;
    Ok(Json(tokens))
}

#[utoipa::path(
    post,
    path = "/refresh",
    tag = AUTH_TAG,
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Tokens refreshed successfully", body = TokenPair),
        (status = 401, description = "Invalid or expired refresh token", body = ErrorResponse)
    )
)]
async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RefreshTokenRequest>,
) -> AppResult<Json<TokenPair>> {
    let tokens = state.services.auth.refresh(&payload.refresh_token).await?;
    Ok(Json(tokens))
}
