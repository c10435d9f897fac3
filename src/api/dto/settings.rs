//! Runtime listing settings DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, ToSchema)]
pub struct ListingSettingsResponse {
    /// Days a new listing stays visible and the default extension length
    #[schema(example = 5)]
    pub default_display_days: i64,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateListingSettingsRequest {
    #[validate(range(min = 1, max = 365, message = "Display days must be between 1 and 365"))]
    #[schema(example = 7, minimum = 1, maximum = 365)]
    pub default_display_days: i64,
}
