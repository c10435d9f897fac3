//! Extractors that deserialize a request part and run `validator` rules on it.
//!
//! Both reject with [`AppError`], so malformed input and failed rules share
//! the JSON error body of every other failure.

use axum::Json;
use axum::body::{Body, to_bytes};
use axum::extract::{FromRequest, FromRequestParts, OptionalFromRequest, Query, Request};
use axum::http::{header, request::Parts};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> AppResult<Self> {
        let Json(value) = <Json<T> as FromRequest<S>>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest {
                message: rejection.body_text(),
            })?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Matches axum's default request body limit.
const MAX_OPTIONAL_BODY_BYTES: usize = 2 * 1024 * 1024;

/// A request without a `Content-Type`, or with a blank body, yields `None`.
/// Any other body must parse and validate.
impl<T, S> OptionalFromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> AppResult<Option<Self>> {
        if !req.headers().contains_key(header::CONTENT_TYPE) {
            return Ok(None);
        }

        let (parts, body) = req.into_parts();
        let bytes = to_bytes(body, MAX_OPTIONAL_BODY_BYTES)
            .await
            .map_err(|e| AppError::BadRequest {
                message: format!("Failed to read request body: {}", e),
            })?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        let req = Request::from_parts(parts, Body::from(bytes));
        <Self as FromRequest<S>>::from_request(req, state)
            .await
            .map(Some)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> AppResult<Self> {
        let Query(value) = <Query<T> as FromRequestParts<S>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest {
                message: rejection.body_text(),
            })?;
        value.validate()?;
        Ok(ValidatedQuery(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Method;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct ExtendBody {
        #[validate(range(min = 1, max = 365, message = "Days must be between 1 and 365"))]
        days: i64,
    }

    #[derive(Debug, Deserialize, Validate)]
    struct PageQuery {
        #[validate(range(min = 1))]
        page: i64,
    }

    fn json_request(body: &'static str) -> Request {
        Request::builder()
            .method(Method::POST)
            .uri("/test")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_json() {
        let ValidatedJson(body) = <ValidatedJson<ExtendBody> as FromRequest<()>>::from_request(json_request(r#"{"days":7}"#), &())
            .await
            .unwrap();
        assert_eq!(body.days, 7);
    }

    #[tokio::test]
    async fn test_json_rule_violation() {
        let result = <ValidatedJson<ExtendBody> as FromRequest<()>>::from_request(json_request(r#"{"days":0}"#), &()).await;

        match result {
            Err(AppError::ValidationErrors { errors }) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "days");
                assert!(errors[0].message.contains("between 1 and 365"));
            }
            other => panic!("Expected ValidationErrors error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let result = <ValidatedJson<ExtendBody> as FromRequest<()>>::from_request(json_request("{days:"), &()).await;
        assert!(matches!(result, Err(AppError::BadRequest { .. })));
    }

    #[tokio::test]
    async fn test_optional_json_absent_and_present() {
        let empty = Request::builder()
            .method(Method::POST)
            .uri("/test")
            .body(Body::empty())
            .unwrap();
        let result: Option<ValidatedJson<ExtendBody>> =
            <ValidatedJson<ExtendBody> as OptionalFromRequest<()>>::from_request(empty, &())
                .await
                .unwrap();
        assert!(result.is_none());

        let result =
            <ValidatedJson<ExtendBody> as OptionalFromRequest<()>>::from_request(json_request(r#"{"days":0}"#), &())
                .await;
        assert!(matches!(result, Err(AppError::ValidationErrors { .. })));
    }

    #[tokio::test]
    async fn test_optional_json_blank_body_with_content_type() {
        for body in ["", "  \n"] {
            let result =
                <ValidatedJson<ExtendBody> as OptionalFromRequest<()>>::from_request(json_request(body), &())
                    .await
                    .unwrap();
            assert!(result.is_none(), "body {:?}", body);
        }

        let ValidatedJson(body) =
            <ValidatedJson<ExtendBody> as OptionalFromRequest<()>>::from_request(json_request(r#"{"days":9}"#), &())
                .await
                .unwrap()
                .unwrap();
        assert_eq!(body.days, 9);
    }

    #[tokio::test]
    async fn test_query_validation() {
        let request = Request::builder().uri("/jobs?page=0").body(()).unwrap();
        let (mut parts, _) = request.into_parts();
        let result = ValidatedQuery::<PageQuery>::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::ValidationErrors { .. })));

        let request = Request::builder().uri("/jobs?page=abc").body(()).unwrap();
        let (mut parts, _) = request.into_parts();
        let result = ValidatedQuery::<PageQuery>::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::BadRequest { .. })));
    }
}
