//! CLI argument parsing with clap
//!
//! Defines the command-line interface: global flags and the subcommands
//! that run the server, manage migrations, sweep expired listings and hash
//! the admin password.

use clap::{Parser, Subcommand, ValueEnum};
use jiff::Timestamp;
use std::path::PathBuf;

/// Job board backend for software houses and intern candidates
#[derive(Parser, Debug)]
#[command(name = "internhub-rs")]
#[command(about = "Job board backend for software houses and intern candidates")]
#[command(long_about = "
internhub-rs serves the InternHub job board: software houses register and
post openings, an administrator approves them, and listings expire after
their display window.

EXAMPLES:
    # Start the server with the layered configuration in ./config
    internhub-rs serve

    # Start server on custom host and port
    internhub-rs serve --host 0.0.0.0 --port 8080

    # Use a single configuration file
    internhub-rs --config /etc/internhub/production.toml serve

    # Check configuration without starting the server
    internhub-rs serve --dry-run

    # Apply or preview database migrations
    internhub-rs migrate
    internhub-rs migrate --dry-run

    # Expire overdue listings once, as the daily job would
    internhub-rs sweep

    # Produce a value for admin.password_hash
    internhub-rs hash-password
")]
#[command(version = crate::clap_long_version())]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    ///
    /// Reads only this TOML file (plus INTERNHUB_* environment variables)
    /// instead of the layered files in the configuration directory.
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Takes precedence over INTERNHUB_APP_ENV and selects the
    /// environment-specific configuration file.
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web server (default)
    ///
    /// Examples:
    ///   internhub-rs serve                           # Start with defaults
    ///   internhub-rs serve --host 0.0.0.0 --port 80  # Bind to all interfaces
    ///   internhub-rs serve --dry-run                 # Validate config without starting
    Serve {
        /// Host address to bind to
        #[arg(long, value_name = "ADDRESS", value_parser = super::validation::validate_host_address)]
        host: Option<String>,

        /// Port number to listen on
        #[arg(short, long, value_name = "PORT", value_parser = super::validation::validate_port)]
        port: Option<u16>,

        /// Log level override, taking precedence over --verbose and --quiet
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,

        /// Validate configuration and exit
        #[arg(long)]
        dry_run: bool,
    },
    /// Database migration operations
    ///
    /// Examples:
    ///   internhub-rs migrate                    # Apply all pending migrations
    ///   internhub-rs migrate --dry-run          # Show pending migrations
    ///   internhub-rs migrate --rollback 1       # Revert the newest migration
    Migrate {
        /// Show pending migrations without applying
        #[arg(long, conflicts_with = "rollback")]
        dry_run: bool,

        /// Number of migrations to revert, between 1 and 100
        #[arg(long, value_name = "STEPS", conflicts_with = "dry_run", value_parser = super::validation::validate_rollback_steps)]
        rollback: Option<u32>,
    },
    /// Expire overdue listings once and print the report as JSON
    ///
    /// Examples:
    ///   internhub-rs sweep
    ///   internhub-rs sweep --at 2026-03-01T00:00:00Z
    Sweep {
        /// Instant to sweep at, RFC 3339. Defaults to now.
        #[arg(long, value_name = "TIMESTAMP", value_parser = super::validation::validate_timestamp)]
        at: Option<Timestamp>,
    },
    /// Print an argon2 hash for admin.password_hash
    ///
    /// Reads the password from standard input when --password is omitted.
    HashPassword {
        #[arg(long, value_name = "PASSWORD")]
        password: Option<String>,
    },
}

/// Environment options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "test")]
    Test,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
}

/// Log level options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum LogLevel {
    #[value(name = "error")]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warn,
    #[value(name = "info")]
    Info,
    #[value(name = "debug")]
    Debug,
    #[value(name = "trace")]
    Trace,
}

impl Cli {
    /// Checks combinations clap cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(Commands::HashPassword {
            password: Some(password),
        }) = &self.command
            && password.is_empty()
        {
            return Err("Password cannot be empty".to_string());
        }

        Ok(())
    }

    /// Whether the process should end up running the HTTP server.
    pub fn should_start_server(&self) -> bool {
        matches!(
            self.command,
            None | Some(Commands::Serve { dry_run: false, .. })
        )
    }

    /// Commands that never touch configuration or the store.
    pub fn needs_config(&self) -> bool {
        !matches!(self.command, Some(Commands::HashPassword { .. }))
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => "error".to_string(),
            LogLevel::Warn => "warn".to_string(),
            LogLevel::Info => "info".to_string(),
            LogLevel::Debug => "debug".to_string(),
            LogLevel::Trace => "trace".to_string(),
        }
    }
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Test => crate::config::Environment::Test,
            Environment::Staging => crate::config::Environment::Staging,
            Environment::Production => crate::config::Environment::Production,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_help_flag() {
        let err = Cli::try_parse_from(["internhub-rs", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_flag() {
        let err = Cli::try_parse_from(["internhub-rs", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_default_behavior() {
        let cli = Cli::try_parse_from(["internhub-rs"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert!(!cli.quiet);
        assert!(cli.config.is_none());
        assert!(cli.env.is_none());
        assert!(cli.should_start_server());
        assert!(cli.needs_config());
    }

    #[test]
    fn test_serve_command() {
        let cli =
            Cli::try_parse_from(["internhub-rs", "serve", "--host", "0.0.0.0", "--port", "8080"])
                .unwrap();
        match cli.command {
            Some(Commands::Serve {
                host,
                port,
                dry_run,
                ..
            }) => {
                assert_eq!(host, Some("0.0.0.0".to_string()));
                assert_eq!(port, Some(8080));
                assert!(!dry_run);
            }
            other => panic!("Expected Serve command, got {:?}", other),
        }
    }

    #[test]
    fn test_serve_dry_run_does_not_start_server() {
        let cli = Cli::try_parse_from(["internhub-rs", "serve", "--dry-run"]).unwrap();
        assert!(!cli.should_start_server());
    }

    #[test]
    fn test_migrate_command() {
        let cli = Cli::try_parse_from(["internhub-rs", "migrate", "--dry-run"]).unwrap();
        match cli.command {
            Some(Commands::Migrate { dry_run, rollback }) => {
                assert!(dry_run);
                assert!(rollback.is_none());
            }
            other => panic!("Expected Migrate command, got {:?}", other),
        }
    }

    #[test]
    fn test_migrate_dry_run_conflicts_with_rollback() {
        let err = Cli::try_parse_from(["internhub-rs", "migrate", "--dry-run", "--rollback", "1"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_sweep_command_parses_timestamp() {
        let cli =
            Cli::try_parse_from(["internhub-rs", "sweep", "--at", "2026-03-01T00:00:00Z"]).unwrap();
        match cli.command {
            Some(Commands::Sweep { at }) => {
                assert_eq!(at, Some("2026-03-01T00:00:00Z".parse().unwrap()));
            }
            other => panic!("Expected Sweep command, got {:?}", other),
        }
        assert!(!cli.should_start_server());
    }

    #[test]
    fn test_sweep_rejects_bad_timestamp() {
        assert!(Cli::try_parse_from(["internhub-rs", "sweep", "--at", "yesterday"]).is_err());
    }

    #[test]
    fn test_hash_password_skips_config() {
        let cli =
            Cli::try_parse_from(["internhub-rs", "hash-password", "--password", "hunter2"]).unwrap();
        assert!(!cli.needs_config());
        assert!(cli.validate().is_ok());

        let empty = Cli::try_parse_from(["internhub-rs", "hash-password", "--password", ""]).unwrap();
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_env_aliases() {
        let cli = Cli::try_parse_from(["internhub-rs", "--env", "stage"]).unwrap();
        assert!(matches!(cli.env, Some(Environment::Staging)));
        assert_eq!(
            crate::config::Environment::from(Environment::Staging),
            crate::config::Environment::Staging
        );
    }

    #[test]
    fn test_conflicting_verbose_quiet() {
        let err = Cli::try_parse_from(["internhub-rs", "--verbose", "--quiet"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
