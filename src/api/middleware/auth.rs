//! Bearer-token guards for the admin and software-house areas.
//!
//! Both guards validate the access token through
//! [`AuthService::authenticate`](crate::services::AuthService::authenticate)
//! and leave the verified [`Claims`] in the request extensions.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::utils::jwt::{Claims, Role};

fn bearer_token(request: &Request) -> AppResult<&str> {
    let value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            AppError::unauthorized("Invalid authorization header format. Expected: Bearer <token>")
        })
}

async fn require_role(
    state: &AppState,
    role: Role,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let claims: Claims = state.services.auth.authenticate(bearer_token(&request)?, role)?;
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Requires an admin access token.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> AppResult<Response> {
    require_role(&state, Role::Admin, request, next).await
}

/// Requires a software-house access token.
pub async fn require_software_house(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> AppResult<Response> {
    require_role(&state, Role::SoftwareHouse, request, next).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with(value: Option<&str>) -> Request {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(&request_with(Some("Bearer abc"))).unwrap(), "abc");
        assert!(matches!(
            bearer_token(&request_with(None)),
            Err(AppError::Unauthorized { .. })
        ));
        assert!(matches!(
            bearer_token(&request_with(Some("Basic abc"))),
            Err(AppError::Unauthorized { .. })
        ));
        assert!(matches!(
            bearer_token(&request_with(Some("Bearer   "))),
            Err(AppError::Unauthorized { .. })
        ));
    }
}
