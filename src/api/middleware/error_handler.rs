//! Error handler for converting AppError to HTTP responses.
//!
//! `AppError` renders itself as an [`ErrorResponse`] body and also leaves a
//! copy in the response extensions; [`error_response_middleware`] uses it to
//! stamp the request id, and turns bodies produced outside our handlers
//! (unknown routes, wrong methods) into the same JSON shape.

use axum::{
    Json,
    extract::Request,
    http::{HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::RequestId;
use crate::api::dto::ErrorResponse;
use crate::error::AppError;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);
        let code = error_to_code(&self);

        if status.is_server_error() {
            tracing::error!(error = ?self, code, "Request failed");
        } else {
            tracing::debug!(error = %self, code, "Request rejected");
        }

        let body = match &self {
            AppError::NotFound {
                entity,
                field,
                value,
            } => ErrorResponse::not_found_error(entity, field, value),
            AppError::Duplicate {
                entity,
                field,
                value,
            } => ErrorResponse::duplicate_error(entity, field, value),
            AppError::InvalidArgument { field, reason } => {
                ErrorResponse::new(code, format!("Invalid {}: {}", field, reason))
                    .with_details(json!({ "field": field, "reason": reason }))
            }
            AppError::ValidationErrors { errors } => {
                ErrorResponse::new(code, "Request validation failed")
                    .with_details(json!({ "errors": errors }))
            }
            AppError::InvalidTransition {
                entity,
                from,
                action,
            } => ErrorResponse::new(code, self.to_string()).with_details(json!({
                "entity": entity,
                "status": from,
                "action": action,
            })),
            AppError::BadRequest { message }
            | AppError::Unauthorized { message }
            | AppError::Forbidden { message } => ErrorResponse::new(code, message.as_str()),
            AppError::StoreUnavailable { .. } => {
                ErrorResponse::new(code, "The store is temporarily unavailable")
            }
            AppError::Database { operation, .. } => {
                ErrorResponse::new(code, format!("Database operation failed: {}", operation))
            }
            AppError::Configuration { .. } | AppError::Internal { .. } => {
                ErrorResponse::new(code, "An internal error occurred")
            }
        };

        let mut response = (status, Json(body.clone())).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response.extensions_mut().insert(body);
        response
    }
}

/// Maps an AppError variant to its corresponding HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Duplicate { .. } => StatusCode::CONFLICT,
        AppError::InvalidArgument { .. } => StatusCode::BAD_REQUEST,
        AppError::ValidationErrors { .. } => StatusCode::BAD_REQUEST,
        AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::InvalidTransition { .. } => StatusCode::CONFLICT,
        AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
        AppError::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        AppError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Maps an AppError variant to its error code string.
pub fn error_to_code(error: &AppError) -> &'static str {
    match error {
        AppError::NotFound { .. } => "NOT_FOUND",
        AppError::Duplicate { .. } => "DUPLICATE_ENTRY",
        AppError::InvalidArgument { .. } => "INVALID_ARGUMENT",
        AppError::ValidationErrors { .. } => "VALIDATION_ERROR",
        AppError::BadRequest { .. } => "BAD_REQUEST",
        AppError::InvalidTransition { .. } => "INVALID_TRANSITION",
        AppError::Unauthorized { .. } => "UNAUTHORIZED",
        AppError::Forbidden { .. } => "FORBIDDEN",
        AppError::Database { .. } => "DATABASE_ERROR",
        AppError::StoreUnavailable { .. } => "STORE_UNAVAILABLE",
        AppError::Configuration { .. } => "CONFIGURATION_ERROR",
        AppError::Internal { .. } => "INTERNAL_ERROR",
    }
}

fn fallback_error(status: StatusCode) -> ErrorResponse {
    let (code, message) = match status {
        StatusCode::NOT_FOUND => ("NOT_FOUND", "The requested resource was not found"),
        StatusCode::METHOD_NOT_ALLOWED => {
            ("METHOD_NOT_ALLOWED", "HTTP method not allowed for this endpoint")
        }
        StatusCode::UNSUPPORTED_MEDIA_TYPE => ("UNSUPPORTED_MEDIA_TYPE", "Unsupported media type"),
        StatusCode::PAYLOAD_TOO_LARGE => ("PAYLOAD_TOO_LARGE", "Request payload too large"),
        StatusCode::REQUEST_TIMEOUT => ("REQUEST_TIMEOUT", "Request timeout"),
        s if s.is_server_error() => ("INTERNAL_ERROR", "An internal error occurred"),
        _ => ("BAD_REQUEST", "Bad request"),
    };
    ErrorResponse::new(code, message)
}

/// Gives every error response the JSON error shape and the request id.
///
/// Must run inside [`super::request_id_middleware`].
pub async fn error_response_middleware(request: Request, next: Next) -> Response {
    let request_id = request.extensions().get::<RequestId>().map(|r| r.0.clone());
    let mut response = next.run(request).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let body = match response.extensions_mut().remove::<ErrorResponse>() {
        Some(body) => body,
        None => {
            let is_json = response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v.starts_with("application/json"));
            if is_json {
                return response;
            }
            fallback_error(status)
        }
    };

    let body = match &request_id {
        Some(id) => body.with_request_id(id),
        None => body,
    };

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.remove(header::CONTENT_TYPE);
    let mut rebuilt = (status, Json(body)).into_response();
    for (name, value) in parts.headers.iter() {
        if !rebuilt.headers().contains_key(name) {
            rebuilt.headers_mut().insert(name.clone(), value.clone());
        }
    }
    rebuilt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationFieldError;
    use axum::body::{Body, to_bytes};

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_and_code_mapping() {
        let cases = [
            (AppError::not_found("JobPost", "id", 1), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (
                AppError::invalid_argument("days", "must be positive"),
                StatusCode::BAD_REQUEST,
                "INVALID_ARGUMENT",
            ),
            (
                AppError::ValidationErrors { errors: vec![] },
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
            ),
            (
                AppError::InvalidTransition {
                    entity: "JobPost".to_string(),
                    from: "expired".to_string(),
                    action: "hide".to_string(),
                },
                StatusCode::CONFLICT,
                "INVALID_TRANSITION",
            ),
            (AppError::unauthorized("no"), StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            (
                AppError::Forbidden {
                    message: "pending".to_string(),
                },
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
            ),
            (
                AppError::StoreUnavailable {
                    source: anyhow::anyhow!("pool timed out"),
                },
                StatusCode::SERVICE_UNAVAILABLE,
                "STORE_UNAVAILABLE",
            ),
            (
                AppError::Database {
                    operation: "sweep".to_string(),
                    source: anyhow::anyhow!("boom"),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
            ),
            (
                AppError::Internal {
                    source: anyhow::anyhow!("boom"),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
        ];

        for (error, status, code) in cases {
            assert_eq!(error_to_status_code(&error), status, "{}", code);
            assert_eq!(error_to_code(&error), code);
        }
    }

    #[tokio::test]
    async fn test_validation_errors_carry_field_details() {
        let error = AppError::ValidationErrors {
            errors: vec![ValidationFieldError {
                field: "days".to_string(),
                code: "range".to_string(),
                message: "Days must be between 1 and 365".to_string(),
            }],
        };
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["details"]["errors"][0]["field"], "days");
    }

    #[tokio::test]
    async fn test_internal_details_are_not_returned() {
        let error = AppError::StoreUnavailable {
            source: anyhow::anyhow!("password=hunter2 host=db"),
        };
        let body = body_json(error.into_response()).await;
        assert_eq!(body["code"], "STORE_UNAVAILABLE");
        assert!(!body.to_string().contains("hunter2"));
    }

    #[tokio::test]
    async fn test_unauthorized_sets_challenge_header() {
        let response = AppError::unauthorized("Missing authorization header").into_response();
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[test]
    fn test_fallback_error_codes() {
        assert_eq!(fallback_error(StatusCode::NOT_FOUND).code, "NOT_FOUND");
        assert_eq!(
            fallback_error(StatusCode::METHOD_NOT_ALLOWED).code,
            "METHOD_NOT_ALLOWED"
        );
        assert_eq!(fallback_error(StatusCode::BAD_GATEWAY).code, "INTERNAL_ERROR");
        assert_eq!(fallback_error(StatusCode::CONFLICT).code, "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_middleware_rewrites_plain_text_errors() {
        use axum::{Router, middleware, routing::get};
        use tower::ServiceExt;

        let app = Router::new()
            .route(
                "/plain",
                get(|| async { (StatusCode::NOT_FOUND, "nothing here") }),
            )
            .route(
                "/typed",
                get(|| async { Err::<(), _>(AppError::not_found("JobPost", "id", 7)) }),
            )
            .layer(middleware::from_fn(error_response_middleware))
            .layer(middleware::from_fn(super::super::request_id_middleware));

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/plain").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["code"], "NOT_FOUND");
        assert!(body["request_id"].is_string());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/typed")
                    .header("x-request-id", "req-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["message"], "JobPost with id=7 not found");
        assert_eq!(body["request_id"], "req-42");
    }
}
