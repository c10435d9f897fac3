//! Health report bodies.

use jiff::Timestamp;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl HealthStatus {
    pub fn is_healthy(self) -> bool {
        self == HealthStatus::Healthy
    }
}

/// Result of pinging the configured store.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StoreCheck {
    /// `postgres` or `memory`
    #[schema(example = "postgres")]
    pub backend: String,
    pub status: HealthStatus,
    #[schema(example = 3)]
    pub latency_ms: u64,
    /// Set when the ping failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `GET /health` body. The overall status follows the store check.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: HealthStatus,
    #[schema(example = "0.1.0")]
    pub version: String,
    #[schema(value_type = String, format = DateTime)]
    pub checked_at: Timestamp,
    pub store: StoreCheck,
}

impl HealthResponse {
    pub fn new(version: impl Into<String>, store: StoreCheck, checked_at: Timestamp) -> Self {
        Self {
            status: store.status,
            version: version.into(),
            checked_at,
            store,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_store_makes_report_unhealthy() {
        let store = StoreCheck {
            backend: "postgres".to_string(),
            status: HealthStatus::Unhealthy,
            latency_ms: 5000,
            error: Some("Store unavailable".to_string()),
        };
        let response =
            HealthResponse::new("0.1.0", store, "2026-01-01T12:00:00Z".parse().unwrap());

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "unhealthy");
        assert_eq!(json["checked_at"], "2026-01-01T12:00:00Z");
        assert_eq!(json["store"]["backend"], "postgres");
        assert_eq!(json["store"]["latency_ms"], 5000);
    }

    #[test]
    fn test_healthy_store_omits_error() {
        let store = StoreCheck {
            backend: "memory".to_string(),
            status: HealthStatus::Healthy,
            latency_ms: 0,
            error: None,
        };
        assert!(store.status.is_healthy());
        let json = serde_json::to_value(&store).unwrap();
        assert!(json.get("error").is_none());
    }
}
