//! Router configuration for the API.
//!
//! Routes are collected through `OpenApiRouter` so the OpenAPI document is
//! built from the same handlers that serve requests.

use std::time::Duration;

use axum::{Router, http::Uri, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{
    error_response_middleware, logging_middleware, request_id_middleware, require_admin,
    require_software_house,
};
use crate::error::AppError;
use crate::state::AppState;

pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";
pub const SWAGGER_UI_PATH: &str = "/swagger-ui";

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Layers added last run first:
/// 1. Request ID (outermost) - generates/propagates `x-request-id`
/// 2. Logging - request span and outcome
/// 3. Compression, CORS
/// 4. Request timeout - `408` once `server.request_timeout` elapses
/// 5. Error rendering - JSON error bodies carrying the request id
///
/// Admin and owner routes are additionally guarded by their bearer-token
/// middleware.
pub fn create_router(state: AppState) -> Router {
    let (router, openapi) = api_router(&state).split_for_parts();
    let request_timeout = state.request_timeout;

    router
        .merge(SwaggerUi::new(SWAGGER_UI_PATH).url(OPENAPI_JSON_PATH, openapi))
        .fallback(route_not_found)
        .layer(middleware::from_fn(error_response_middleware))
        .layer(request_timeout_layer(request_timeout))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

fn api_router(state: &AppState) -> OpenApiRouter<AppState> {
    let admin = handlers::admin::admin_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        require_admin,
    ));
    let me = handlers::me::me_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        require_software_house,
    ));

    let api = OpenApiRouter::new()
        .nest(
            "/software-houses",
            handlers::software_houses::software_house_routes(),
        )
        .nest("/jobs", handlers::jobs::job_board_routes())
        .nest("/auth", handlers::auth::auth_routes())
        .nest("/me", me)
        .nest("/admin", admin);

    OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(handlers::health::health_routes())
        .nest("/api", api)
}

/// Answers `408 Request Timeout` when the handler misses the deadline.
fn request_timeout_layer(timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::new(timeout)
}

async fn route_not_found(uri: Uri) -> AppError {
    AppError::not_found("Route", "path", uri.path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AdminConfig, JwtConfig, Settings};
    use crate::models::{JobPostStatus, NewJobPost, NewSoftwareHouse, SoftwareHouseStatus};
    use crate::repositories::{JobPostStore, MemoryStore, Repositories, SoftwareHouseStore};
    use crate::utils::password::hash_password;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode, header};
    use jiff::{SignedDuration, Timestamp};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const ADMIN_PASSWORD: &str = "correct horse battery staple";

    struct TestApp {
        router: Router,
        store: MemoryStore,
    }

    fn test_settings() -> Settings {
        Settings {
            jwt: JwtConfig {
                secret: "router_test_secret_key_at_least_32_chars".to_string(),
                ..Default::default()
            },
            admin: AdminConfig {
                password_hash: hash_password(ADMIN_PASSWORD).unwrap(),
            },
            ..Default::default()
        }
    }

    fn test_app() -> TestApp {
        let store = MemoryStore::new();
        let repos = Repositories::with_memory_store(store.clone());
        let state = AppState::new(repos, &test_settings()).unwrap();
        TestApp {
            router: create_router(state),
            store,
        }
    }

    impl TestApp {
        async fn call(
            &self,
            method: Method,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
            }
            let request = match body {
                Some(body) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };

            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let value = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap_or(Value::Null)
            };
            (status, value)
        }

        async fn admin_token(&self) -> String {
            let (status, body) = self
                .call(
                    Method::POST,
                    "/api/auth/admin/login",
                    None,
                    Some(json!({ "password": ADMIN_PASSWORD })),
                )
                .await;
            assert_eq!(status, StatusCode::OK);
            body["access_token"].as_str().unwrap().to_string()
        }

        /// Registers a house and returns (id, access token).
        async fn register(&self, name: &str) -> (String, String) {
            let (status, body) = self
                .call(
                    Method::POST,
                    "/api/software-houses",
                    None,
                    Some(json!({
                        "name": name,
                        "phone": "+62 812-3456-7890",
                        "display_phone": "021 555 0100",
                        "website": "https://example.com",
                    })),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED, "{}", body);
            (
                body["software_house"]["id"].as_str().unwrap().to_string(),
                body["tokens"]["access_token"].as_str().unwrap().to_string(),
            )
        }

        async fn approved_house(&self, name: &str, admin: &str) -> (String, String) {
            let (id, token) = self.register(name).await;
            let (status, _) = self
                .call(
                    Method::POST,
                    &format!("/api/admin/software-houses/{}/approve", id),
                    Some(admin),
                    None,
                )
                .await;
            assert_eq!(status, StatusCode::OK);
            (id, token)
        }

        async fn post_job(&self, token: &str, title: &str) -> (StatusCode, Value) {
            self.call(
                Method::POST,
                "/api/me/jobs",
                Some(token),
                Some(json!({
                    "title": title,
                    "image_url": "https://cdn.example.com/poster.png",
                    "contact_info": "hr@example.com",
                })),
            )
            .await
        }
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = test_app();
        let (status, _) = app.call(Method::GET, "/health/live", None, None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = app.call(Method::GET, "/health/ready", None, None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = app.call(Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["store"]["status"], "healthy");
        assert_eq!(body["store"]["backend"], "memory");
    }

    #[tokio::test]
    async fn test_registration_starts_pending() {
        let app = test_app();
        let (_, token) = app.register("Acme").await;

        let (status, body) = app.call(Method::GET, "/api/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Acme");
        assert_eq!(body["status"], "pending");
    }

    #[tokio::test]
    async fn test_registration_validation_errors() {
        let app = test_app();
        let (status, body) = app
            .call(
                Method::POST,
                "/api/software-houses",
                None,
                Some(json!({
                    "name": "",
                    "phone": "nope",
                    "display_phone": "021 555 0100",
                    "website": "example",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        let fields: Vec<&str> = body["details"]["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, vec!["name", "phone", "website"]);
    }

    #[tokio::test]
    async fn test_protected_routes_reject_bad_tokens() {
        let app = test_app();
        let (_, house_token) = app.register("Acme").await;

        let (status, body) = app.call(Method::POST, "/api/admin/sweep", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHORIZED");

        let (status, _) = app
            .call(Method::POST, "/api/admin/sweep", Some("not-a-jwt"), None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = app
            .call(Method::GET, "/api/admin/settings", Some(&house_token), None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let admin = app.admin_token().await;
        let (status, _) = app.call(Method::GET, "/api/me", Some(&admin), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = app.call(Method::GET, "/api/me/jobs", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_admin_login_wrong_password() {
        let app = test_app();
        let (status, body) = app
            .call(
                Method::POST,
                "/api/auth/admin/login",
                None,
                Some(json!({ "password": "guess" })),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_refresh_keeps_role() {
        let app = test_app();
        let (status, body) = app
            .call(
                Method::POST,
                "/api/auth/admin/login",
                None,
                Some(json!({ "password": ADMIN_PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        let refresh = body["refresh_token"].as_str().unwrap();

        let (status, body) = app
            .call(
                Method::POST,
                "/api/auth/refresh",
                None,
                Some(json!({ "refresh_token": refresh })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        let access = body["access_token"].as_str().unwrap();

        let (status, _) = app
            .call(Method::GET, "/api/admin/settings", Some(access), None)
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_pending_house_cannot_post() {
        let app = test_app();
        let (_, token) = app.register("Acme").await;
        let (status, body) = app.post_job(&token, "Rust Intern").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "FORBIDDEN");
    }

    #[tokio::test]
    async fn test_listing_lifecycle_over_http() {
        let app = test_app();
        let admin = app.admin_token().await;
        let (_, house) = app.approved_house("Acme", &admin).await;

        let (status, body) = app.post_job(&house, "Rust Intern").await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        assert_eq!(body["status"], "active");
        assert_eq!(body["visible"], true);
        assert_eq!(body["days_left"], 5);
        let job_id = body["id"].as_str().unwrap().to_string();

        let (status, body) = app.call(Method::GET, "/api/jobs", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pagination"]["total_items"], 1);
        assert_eq!(body["data"][0]["software_house"]["name"], "Acme");

        let (status, body) = app
            .call(Method::POST, &format!("/api/admin/jobs/{}/hide", job_id), Some(&admin), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "hidden");

        let (_, body) = app.call(Method::GET, "/api/jobs", None, None).await;
        assert_eq!(body["pagination"]["total_items"], 0);
        let (status, _) = app
            .call(Method::GET, &format!("/api/jobs/{}", job_id), None, None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = app
            .call(Method::GET, "/api/admin/jobs?view=hidden", Some(&admin), None)
            .await;
        assert_eq!(body.as_array().unwrap().len(), 1);

        // relisting clears the hidden override
        let (status, body) = app
            .call(
                Method::POST,
                &format!("/api/admin/jobs/{}/extend", job_id),
                Some(&admin),
                Some(json!({ "days": 10 })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "active");
        assert_eq!(body["days_left"], 10);

        let (status, _) = app
            .call(Method::GET, &format!("/api/jobs/{}", job_id), None, None)
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = app
            .call(Method::DELETE, &format!("/api/admin/jobs/{}", job_id), Some(&admin), None)
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = app
            .call(Method::DELETE, &format!("/api/admin/jobs/{}", job_id), Some(&admin), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_extend_without_body_uses_display_days() {
        let app = test_app();
        let admin = app.admin_token().await;
        let (_, house) = app.approved_house("Acme", &admin).await;
        let (_, body) = app.post_job(&house, "Backend Engineer").await;
        let job_id = body["id"].as_str().unwrap().to_string();

        let (status, _) = app
            .call(
                Method::PUT,
                "/api/admin/settings",
                Some(&admin),
                Some(json!({ "default_display_days": 30 })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = app
            .call(Method::POST, &format!("/api/admin/jobs/{}/extend", job_id), Some(&admin), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["days_left"], 30);

        let (status, body) = app
            .call(
                Method::POST,
                &format!("/api/admin/jobs/{}/extend", job_id),
                Some(&admin),
                Some(json!({ "days": 0 })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_extend_accepts_long_windows_until_out_of_range() {
        let app = test_app();
        let admin = app.admin_token().await;
        let (_, house) = app.approved_house("Acme", &admin).await;
        let (_, body) = app.post_job(&house, "Backend Engineer").await;
        let job_id = body["id"].as_str().unwrap().to_string();
        let uri = format!("/api/admin/jobs/{}/extend", job_id);

        let (status, body) = app
            .call(Method::POST, &uri, Some(&admin), Some(json!({ "days": 400 })))
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        assert_eq!(body["status"], "active");
        assert_eq!(body["days_left"], 400);

        // far beyond year 9999
        let (status, body) = app
            .call(Method::POST, &uri, Some(&admin), Some(json!({ "days": 10_000_000 })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_ARGUMENT");

        // the rejected extension left the 400-day deadline in place
        let (status, body) = app
            .call(Method::GET, &format!("/api/jobs/{}", job_id), None, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["days_left"].as_i64().unwrap() >= 399);
    }

    #[tokio::test]
    async fn test_extend_with_empty_json_body_uses_display_days() {
        let app = test_app();
        let admin = app.admin_token().await;
        let (_, house) = app.approved_house("Acme", &admin).await;
        let (_, body) = app.post_job(&house, "Backend Engineer").await;
        let job_id = body["id"].as_str().unwrap();

        let request = Request::builder()
            .method(Method::POST)
            .uri(format!("/api/admin/jobs/{}/extend", job_id))
            .header(header::AUTHORIZATION, format!("Bearer {}", admin))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::empty())
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["days_left"], 5);
    }

    #[tokio::test]
    async fn test_request_timeout_answers_408() {
        let slow = Router::new()
            .route(
                "/slow",
                axum::routing::get(|| async {
                    tokio::time::sleep(Duration::from_millis(500)).await;
                    "done"
                }),
            )
            .layer(request_timeout_layer(Duration::from_millis(50)));

        let response = slow
            .oneshot(Request::get("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[test]
    fn test_state_carries_configured_request_timeout() {
        let mut settings = test_settings();
        settings.server.request_timeout = 7;
        let state = AppState::new(Repositories::memory(), &settings).unwrap();
        assert_eq!(state.request_timeout, Duration::from_secs(7));
    }

    #[tokio::test]
    async fn test_settings_round_trip_and_range() {
        let app = test_app();
        let admin = app.admin_token().await;

        let (_, body) = app
            .call(Method::GET, "/api/admin/settings", Some(&admin), None)
            .await;
        assert_eq!(body["default_display_days"], 5);

        let (status, _) = app
            .call(
                Method::PUT,
                "/api/admin/settings",
                Some(&admin),
                Some(json!({ "default_display_days": 400 })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = app
            .call(Method::GET, "/api/admin/settings", Some(&admin), None)
            .await;
        assert_eq!(body["default_display_days"], 5);
    }

    #[tokio::test]
    async fn test_manual_sweep_reports_overdue_posts() {
        let app = test_app();
        let admin = app.admin_token().await;
        let now = Timestamp::now();

        let house = SoftwareHouseStore::create(
            &app.store,
            NewSoftwareHouse {
                name: "Acme".to_string(),
                phone: "0812345678".to_string(),
                display_phone: "0212345678".to_string(),
                website: "https://example.com".to_string(),
            },
            now,
        )
        .await
        .unwrap();
        SoftwareHouseStore::update_status(
            &app.store,
            house.id,
            SoftwareHouseStatus::Pending,
            SoftwareHouseStatus::Approved,
        )
        .await
        .unwrap();

        let overdue = JobPostStore::create(
            &app.store,
            NewJobPost {
                software_house_id: house.id,
                title: "Old Intern".to_string(),
                image_url: "https://cdn.example.com/a.png".to_string(),
                youtube_url: None,
                contact_info: "hr@example.com".to_string(),
                created_at: now - SignedDuration::from_hours(24 * 7),
                expires_at: now - SignedDuration::from_hours(24 * 2),
            },
        )
        .await
        .unwrap();

        let (status, body) = app.call(Method::POST, "/api/admin/sweep", Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
        assert_eq!(body["ids"][0], overdue.id.to_string());

        let (_, body) = app.call(Method::POST, "/api/admin/sweep", Some(&admin), None).await;
        assert_eq!(body["count"], 0);

        let stored = JobPostStore::find_by_id(&app.store, overdue.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, JobPostStatus::Expired);

        // expired posts cannot be hidden
        let (status, body) = app
            .call(Method::POST, &format!("/api/admin/jobs/{}/hide", overdue.id), Some(&admin), None)
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "INVALID_TRANSITION");
    }

    #[tokio::test]
    async fn test_owner_delete_is_scoped_to_house() {
        let app = test_app();
        let admin = app.admin_token().await;
        let (_, acme) = app.approved_house("Acme", &admin).await;
        let (_, globex) = app.approved_house("Globex", &admin).await;

        let (_, body) = app.post_job(&acme, "Frontend Intern").await;
        let job_id = body["id"].as_str().unwrap().to_string();

        let (status, _) = app
            .call(Method::DELETE, &format!("/api/me/jobs/{}", job_id), Some(&globex), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = app.call(Method::GET, "/api/me/jobs", Some(&acme), None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, _) = app
            .call(Method::DELETE, &format!("/api/me/jobs/{}", job_id), Some(&acme), None)
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_browse_filters() {
        let app = test_app();
        let admin = app.admin_token().await;
        let (_, acme) = app.approved_house("Acme Labs", &admin).await;
        let (_, globex) = app.approved_house("Globex", &admin).await;

        app.post_job(&acme, "Backend Internship").await;
        app.post_job(&acme, "Senior Engineer").await;
        app.post_job(&globex, "QA Intern").await;

        let (_, body) = app
            .call(Method::GET, "/api/jobs?kind=internship", None, None)
            .await;
        assert_eq!(body["pagination"]["total_items"], 2);

        let (_, body) = app
            .call(Method::GET, "/api/jobs?kind=full-time", None, None)
            .await;
        assert_eq!(body["pagination"]["total_items"], 1);

        let (_, body) = app
            .call(Method::GET, "/api/jobs?search=acme", None, None)
            .await;
        assert_eq!(body["pagination"]["total_items"], 2);

        let (_, body) = app
            .call(Method::GET, "/api/jobs?page=2&page_size=2", None, None)
            .await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["pagination"]["has_prev"], true);

        let (status, body) = app
            .call(Method::GET, "/api/jobs?page_size=500", None, None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_route_has_json_error_with_request_id() {
        let app = test_app();
        let request = Request::builder()
            .uri("/api/nope")
            .header("x-request-id", "req-404")
            .body(Body::empty())
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers().get("x-request-id").unwrap(), "req-404");

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "NOT_FOUND");
        assert_eq!(body["request_id"], "req-404");
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let app = test_app();
        let (status, body) = app.call(Method::GET, OPENAPI_JSON_PATH, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["info"]["title"], "InternHub");
        assert!(body["components"]["securitySchemes"]["bearerAuth"].is_object());
    }
}
