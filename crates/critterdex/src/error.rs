//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use critterdex_config::ConfigError;
use critterdex_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to overlay server at {url}")]
    #[diagnostic(
        code(critterdex::connection_failed),
        help(
            "Check that the overlay server is running and reachable.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Lookups ──────────────────────────────────────────────────────
    #[error("Unknown mode '{mode}'")]
    #[diagnostic(
        code(critterdex::unknown_mode),
        help("Run: critterdex modes to see registered modes")
    )]
    UnknownMode { mode: String },

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(critterdex::not_found),
        help("Run: critterdex {list_command} to see what is available")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Provider configuration ───────────────────────────────────────
    #[error("Server provider configuration is missing: {missing}")]
    #[diagnostic(
        code(critterdex::config_mismatch),
        help("Run: critterdex providers sync")
    )]
    ConfigMismatch { missing: String },

    #[error("At least one provider must stay enabled")]
    #[diagnostic(
        code(critterdex::no_provider_enabled),
        help("Pass at least one registered mode to --enable")
    )]
    NoProviderEnabled,

    // ── API ──────────────────────────────────────────────────────────
    #[error("Server rejected the request: {message}")]
    #[diagnostic(code(critterdex::rejected))]
    Rejected { message: String },

    #[error("API error: {message}")]
    #[diagnostic(code(critterdex::api_error))]
    ApiError {
        message: String,
        status: Option<u16>,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(critterdex::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(critterdex::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: critterdex config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No overlay server configured")]
    #[diagnostic(
        code(critterdex::no_config),
        help(
            "Pass --server <URL>, set CRITTERDEX_SERVER, or run: critterdex config init\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(critterdex::config))]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("'{action}' requires confirmation")]
    #[diagnostic(
        code(critterdex::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Internal / IO ────────────────────────────────────────────────
    #[error("Internal error: {0}")]
    #[diagnostic(code(critterdex::internal))]
    Internal(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::UnknownMode { .. } | Self::NotFound { .. } | Self::ProfileNotFound { .. } => {
                exit_code::NOT_FOUND
            }
            Self::ConfigMismatch { .. } => exit_code::CONFLICT,
            Self::Validation { .. }
            | Self::NoProviderEnabled
            | Self::NoConfig { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnknownMode { mode } => CliError::UnknownMode { mode },
            CoreError::ConfigMismatch { missing } => CliError::ConfigMismatch {
                missing: missing.join(", "),
            },
            CoreError::NoProviderEnabled => CliError::NoProviderEnabled,
            CoreError::Rejected { message } => CliError::Rejected { message },
            CoreError::ServerUnavailable { url, reason } => {
                CliError::ConnectionFailed { url, reason }
            }
            CoreError::Api { message, status } => CliError::ApiError { message, status },
            CoreError::Config { message } => CliError::Config { message },
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: "(none)".into(),
            },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}
