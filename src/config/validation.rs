//! Validation rules for loaded settings

use crate::config::environment::Environment;
use crate::config::error::ConfigError;
use crate::config::settings::{
    AdminConfig, DatabaseConfig, JobsConfig, ListingsConfig, LoggerSettings, ServerConfig,
    Settings, StoreBackend,
};

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

/// Inclusive bounds for the display window of a listing, in days
pub const DISPLAY_DAYS_RANGE: std::ops::RangeInclusive<i64> = 1..=365;

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535.",
            ));
        }
        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "server.request_timeout",
                "Request timeout must be greater than 0 seconds.",
            ));
        }
        Ok(())
    }
}

impl DatabaseConfig {
    /// Pool limits always apply; the URL is only required for the postgres backend.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend == StoreBackend::Postgres {
            if self.url.is_empty() {
                return Err(ConfigError::validation(
                    "database.url",
                    "Database URL is required for the postgres backend.",
                ));
            }
            if !["postgres://", "postgresql://"]
                .iter()
                .any(|scheme| self.url.starts_with(scheme))
            {
                return Err(ConfigError::validation(
                    "database.url",
                    "Invalid database URL format. Expected postgres://[user:password@]host[:port]/database",
                ));
            }
        }

        if self.max_connections == 0 {
            return Err(ConfigError::validation(
                "database.max_connections",
                "Max connections must be greater than 0.",
            ));
        }
        if self.min_connections == 0 {
            return Err(ConfigError::validation(
                "database.min_connections",
                "Min connections must be greater than 0.",
            ));
        }
        if self.min_connections > self.max_connections {
            return Err(ConfigError::validation(
                "database.min_connections",
                format!(
                    "Min connections ({}) cannot exceed max connections ({}).",
                    self.min_connections, self.max_connections
                ),
            ));
        }
        if self.connection_timeout == 0 {
            return Err(ConfigError::validation(
                "database.connection_timeout",
                "Connection timeout must be greater than 0 seconds.",
            ));
        }
        Ok(())
    }
}

impl AdminConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.password_hash.is_empty() && !self.password_hash.starts_with("$argon2") {
            return Err(ConfigError::validation(
                "admin.password_hash",
                "Expected an argon2 PHC string; generate one with `internhub-rs hash-password`.",
            ));
        }
        Ok(())
    }
}

impl ListingsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !DISPLAY_DAYS_RANGE.contains(&self.default_display_days) {
            return Err(ConfigError::validation(
                "listings.default_display_days",
                format!(
                    "Display days must be between {} and {}, got {}.",
                    DISPLAY_DAYS_RANGE.start(),
                    DISPLAY_DAYS_RANGE.end(),
                    self.default_display_days
                ),
            ));
        }
        Ok(())
    }
}

impl JobsConfig {
    /// Only the shape of the cron expression is checked here; the scheduler
    /// parses it fully when the job is registered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = self.expire_cron.split_whitespace().count();
        if !(6..=7).contains(&fields) {
            return Err(ConfigError::validation(
                "jobs.expire_cron",
                format!(
                    "Cron expression '{}' must have 6 or 7 fields (seconds first).",
                    self.expire_cron
                ),
            ));
        }
        if self.job_timeout == 0 {
            return Err(ConfigError::validation(
                "jobs.job_timeout",
                "Job timeout must be greater than 0 seconds.",
            ));
        }
        Ok(())
    }
}

impl LoggerSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let head = self.level.split(',').next().unwrap_or_default().trim();
        if !VALID_LOG_LEVELS.contains(&head.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.level",
                format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            ));
        }

        if self.file.enabled && self.file.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.file.format.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.file.format",
                format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.file.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            ));
        }

        Ok(())
    }
}

impl Settings {
    /// Validates every section and returns the first error.
    ///
    /// JWT settings are checked when the server starts, so offline commands
    /// such as `migrate` and `hash-password` work without a signing key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        self.admin.validate()?;
        self.listings.validate()?;
        self.jobs.validate()?;
        self.logger.validate()?;
        Ok(())
    }

    pub fn validate_for(&self, environment: Environment) -> Result<(), ConfigError> {
        self.validate()?;
        if environment.is_production() && self.database.backend == StoreBackend::Memory {
            return Err(ConfigError::validation(
                "database.backend",
                "The memory backend is not allowed in production.",
            ));
        }
        Ok(())
    }
}
