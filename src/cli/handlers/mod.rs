//! Command handlers, one per subcommand.

pub mod hash_password;
pub mod migrate;
pub mod serve;
pub mod sweep;

pub use migrate::MigrateCommandHandler;
pub use serve::ServeCommandHandler;
pub use sweep::SweepCommandHandler;
