//! Server-issued session tokens for the admin and for software houses.

use std::sync::Arc;

use uuid::Uuid;

use crate::config::{AdminConfig, JwtConfig};
use crate::error::{AppError, AppResult};
use crate::repositories::SoftwareHouseStore;
use crate::utils::jwt::{
    Claims, Role, TokenPair, generate_token_pair, validate_access_token, validate_refresh_token,
};
use crate::utils::password::verify_password;

/// Subject of every admin token
pub const ADMIN_SUBJECT: &str = "admin";

#[derive(Clone)]
pub struct AuthService {
    jwt: Arc<JwtConfig>,
    admin: Arc<AdminConfig>,
    houses: Arc<dyn SoftwareHouseStore>,
}

impl AuthService {
    pub fn new(jwt: JwtConfig, admin: AdminConfig, houses: Arc<dyn SoftwareHouseStore>) -> Self {
        Self {
            jwt: Arc::new(jwt),
            admin: Arc::new(admin),
            houses,
        }
    }

    pub fn admin_login_enabled(&self) -> bool {
        !self.admin.password_hash.is_empty()
    }

    /// Verifies the admin password against the configured argon2 hash.
    pub async fn admin_login(&self, password: &str) -> AppResult<TokenPair> {
        if !self.admin_login_enabled() {
            return Err(AppError::unauthorized("Admin login is disabled"));
        }

        let hash = self.admin.password_hash.clone();
        let password = password.to_string();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| AppError::Internal {
                source: anyhow::Error::from(e),
            })??;

        if !matches {
            tracing::warn!("Rejected admin login attempt");
            return Err(AppError::unauthorized("Invalid credentials"));
        }

        tracing::info!("Admin logged in");
        self.issue(ADMIN_SUBJECT, Role::Admin)
    }

    /// Session for a freshly registered house.
    pub fn issue_house_tokens(&self, house_id: Uuid) -> AppResult<TokenPair> {
        self.issue(&house_id.to_string(), Role::SoftwareHouse)
    }

    /// Exchanges a refresh token for a new pair with the same subject and role.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair> {
        let claims = validate_refresh_token(refresh_token, &self.jwt.secret)?;

        match claims.role {
            Role::Admin => {
                if !self.admin_login_enabled() {
                    return Err(AppError::unauthorized("Admin login is disabled"));
                }
                self.issue(ADMIN_SUBJECT, Role::Admin)
            }
            Role::SoftwareHouse => {
                let house_id = house_id(&claims)?;
                if self.houses.find_by_id(house_id).await?.is_none() {
                    return Err(AppError::unauthorized("Software house no longer exists"));
                }
                self.issue_house_tokens(house_id)
            }
        }
    }

    /// Validates an access token and requires `role`.
    pub fn authenticate(&self, access_token: &str, role: Role) -> AppResult<Claims> {
        let claims = validate_access_token(access_token, &self.jwt.secret)?;
        if claims.role != role {
            return Err(AppError::unauthorized(format!(
                "This endpoint requires the {} role",
                role.as_str()
            )));
        }
        Ok(claims)
    }

    fn issue(&self, subject: &str, role: Role) -> AppResult<TokenPair> {
        generate_token_pair(
            subject,
            role,
            &self.jwt.secret,
            self.jwt.access_token_expiration,
            self.jwt.refresh_token_expiration,
        )
    }
}

/// House id carried in the `sub` claim of a software-house token.
pub fn house_id(claims: &Claims) -> AppResult<Uuid> {
    Uuid::parse_str(&claims.sub).map_err(|_| AppError::unauthorized("Malformed token subject"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewSoftwareHouse;
    use crate::repositories::MemoryStore;
    use crate::utils::password::hash_password;

    const SECRET: &str = "auth_service_test_secret_0123456789abcdef";

    fn jwt() -> JwtConfig {
        JwtConfig {
            secret: SECRET.to_string(),
            access_token_expiration: 1,
            refresh_token_expiration: 24,
        }
    }

    fn service(store: &MemoryStore, password_hash: String) -> AuthService {
        AuthService::new(jwt(), AdminConfig { password_hash }, Arc::new(store.clone()))
    }

    #[tokio::test]
    async fn test_admin_login() {
        let store = MemoryStore::new();
        let auth = service(&store, hash_password("s3cret-admin").unwrap());

        let pair = auth.admin_login("s3cret-admin").await.unwrap();
        let claims = auth.authenticate(&pair.access_token, Role::Admin).unwrap();
        assert_eq!(claims.sub, ADMIN_SUBJECT);

        assert!(matches!(
            auth.admin_login("guess").await,
            Err(AppError::Unauthorized { .. })
        ));
    }

    #[tokio::test]
    async fn test_admin_login_disabled_without_hash() {
        let auth = service(&MemoryStore::new(), String::new());
        assert!(matches!(
            auth.admin_login("").await,
            Err(AppError::Unauthorized { .. })
        ));
    }

    #[tokio::test]
    async fn test_house_token_cannot_reach_admin_role() {
        let store = MemoryStore::new();
        let auth = service(&store, String::new());
        let pair = auth.issue_house_tokens(Uuid::new_v4()).unwrap();

        assert!(auth.authenticate(&pair.access_token, Role::SoftwareHouse).is_ok());
        assert!(matches!(
            auth.authenticate(&pair.access_token, Role::Admin),
            Err(AppError::Unauthorized { .. })
        ));
        // Refresh tokens are not accepted as access tokens
        assert!(auth.authenticate(&pair.refresh_token, Role::SoftwareHouse).is_err());
    }

    #[tokio::test]
    async fn test_refresh_requires_existing_house() {
        let store = MemoryStore::new();
        let auth = service(&store, String::new());
        let house = SoftwareHouseStore::create(
            &store,
            NewSoftwareHouse {
                name: "Refreshers".to_string(),
                phone: "+923001231234".to_string(),
                display_phone: "0300 1231234".to_string(),
                website: "https://refreshers.example.com".to_string(),
            },
            jiff::Timestamp::now(),
        )
        .await
        .unwrap();

        let pair = auth.issue_house_tokens(house.id).unwrap();
        let renewed = auth.refresh(&pair.refresh_token).await.unwrap();
        let claims = auth.authenticate(&renewed.access_token, Role::SoftwareHouse).unwrap();
        assert_eq!(house_id(&claims).unwrap(), house.id);

        let ghost = auth.issue_house_tokens(Uuid::new_v4()).unwrap();
        assert!(matches!(
            auth.refresh(&ghost.refresh_token).await,
            Err(AppError::Unauthorized { .. })
        ));
        assert!(auth.refresh(&pair.access_token).await.is_err());
    }
}
