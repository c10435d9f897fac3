//! Layered configuration: TOML files plus `INTERNHUB_*` environment variables.
//!
//! Priority, lowest to highest: `default.toml`, `{environment}.toml`,
//! `local.toml`, environment variables, then CLI flags applied by the
//! `cli` module.

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use environment::Environment;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{
    AdminConfig, DatabaseConfig, JobsConfig, JwtConfig, ListingsConfig, Settings, StoreBackend,
};
pub use validation::DISPLAY_DAYS_RANGE;
