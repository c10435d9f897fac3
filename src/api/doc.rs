use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub const HEALTH_TAG: &str = "Health";
pub const AUTH_TAG: &str = "Auth";
pub const JOB_BOARD_TAG: &str = "Job board";
pub const SOFTWARE_HOUSE_TAG: &str = "Software houses";
pub const OWNER_TAG: &str = "Owner";
pub const ADMIN_TAG: &str = "Admin";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "InternHub",
        description = "Job board API: software houses register, post internships and jobs, and an admin curates the listings",
    ),
    modifiers(&SecurityAddon),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::error::ValidationFieldError,
        )
    ),
    tags(
        (name = HEALTH_TAG, description = "Health check endpoints"),
        (name = AUTH_TAG, description = "Admin login and token refresh"),
        (name = JOB_BOARD_TAG, description = "Public listing of live job posts"),
        (name = SOFTWARE_HOUSE_TAG, description = "Software house registration"),
        (name = OWNER_TAG, description = "Endpoints for the authenticated software house"),
        (name = ADMIN_TAG, description = "Review, listing management, sweep and settings"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token from registration or admin login"))
                        .build(),
                ),
            )
        }
    }
}
