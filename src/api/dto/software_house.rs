//! Software house registration DTOs

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::models::{NewSoftwareHouse, SoftwareHouse, SoftwareHouseStatus};
use crate::utils::jwt::TokenPair;

/// Digits with optional leading `+` or `(`, spaces, dashes and parentheses.
static PHONE_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\+?\(?[0-9][0-9 ()\-]{5,24}$").ok());

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    match PHONE_RE.as_ref() {
        Some(re) if re.is_match(phone) => Ok(()),
        _ => Err(ValidationError::new("phone")
            .with_message("Phone must be 6 to 25 digits, spaces, dashes or parentheses".into())),
    }
}

/// Registration request payload
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RegisterSoftwareHouseRequest {
    #[validate(length(min = 1, max = 120, message = "Name must be between 1 and 120 characters"))]
    #[schema(example = "Acme Software", min_length = 1, max_length = 120)]
    pub name: String,
    /// Private contact number, visible to the admin only
    #[validate(custom(function = "validate_phone"))]
    #[schema(example = "+62 812-3456-7890")]
    pub phone: String,
    /// Number shown next to the house's listings
    #[validate(custom(function = "validate_phone"))]
    #[schema(example = "+62 21 555 0100")]
    pub display_phone: String,
    #[validate(url(message = "Website must be a valid URL"), length(max = 2048))]
    #[schema(example = "https://acme.example", format = "uri")]
    pub website: String,
}

impl From<RegisterSoftwareHouseRequest> for NewSoftwareHouse {
    fn from(req: RegisterSoftwareHouseRequest) -> Self {
        Self {
            name: req.name,
            phone: req.phone,
            display_phone: req.display_phone,
            website: req.website,
        }
    }
}

/// Registration response: the pending house and its session tokens
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterSoftwareHouseResponse {
    pub software_house: SoftwareHouse,
    pub tokens: TokenPair,
}

/// Admin listing filter
#[derive(Debug, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct SoftwareHouseStatusQuery {
    /// Defaults to `pending`
    #[serde(default = "default_status")]
    #[param(inline)]
    pub status: SoftwareHouseStatus,
}

fn default_status() -> SoftwareHouseStatus {
    SoftwareHouseStatus::Pending
}
