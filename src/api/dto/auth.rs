//! Authentication-related Data Transfer Objects

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

/// Admin login request payload
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AdminLoginRequest {
    #[validate(length(min = 1, max = 128, message = "Password must be between 1 and 128 characters"))]
    #[schema(example = "correct horse battery staple", format = "password")]
    pub password: String,
}

/// Refresh token request payload
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token cannot be empty"))]
    #[schema(example = "eyJ0eXAiOiJKV1QiLCJhbGc...")]
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fields_are_rejected() {
        let login = AdminLoginRequest {
            password: String::new(),
        };
        assert!(login.validate().is_err());

        let refresh = RefreshTokenRequest {
            refresh_token: String::new(),
        };
        assert!(refresh.validate().is_err());
    }
}
