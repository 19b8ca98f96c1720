// ── Core error types ──
//
// User-facing errors from critterdex-core. Provider lookups never produce
// these (they collapse to "absent"); everything else -- dispatch, provider
// sync, session actions -- reports through `CoreError`. The
// `From<critterdex_api::Error>` impl translates transport-layer errors.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Dispatch ─────────────────────────────────────────────────────
    #[error("Unknown mode: {mode}")]
    UnknownMode { mode: String },

    // ── Provider configuration ───────────────────────────────────────
    #[error("Provider configuration mismatch: server is missing {}", missing.join(", "))]
    ConfigMismatch { missing: Vec<String> },

    #[error("At least one provider must be enabled")]
    NoProviderEnabled,

    #[error("Server rejected the request: {message}")]
    Rejected { message: String },

    // ── Server ───────────────────────────────────────────────────────
    #[error("Cannot reach server at {url}: {reason}")]
    ServerUnavailable { url: String, reason: String },

    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<critterdex_api::Error> for CoreError {
    fn from(err: critterdex_api::Error) -> Self {
        use critterdex_api::Error as ApiError;

        let unreachable = err.is_unreachable();
        let status = err.status();

        match err {
            ApiError::Transport(e) if unreachable => CoreError::ServerUnavailable {
                url: e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string),
                reason: e.to_string(),
            },
            ApiError::Transport(e) => CoreError::Api {
                message: e.to_string(),
                status,
            },
            ApiError::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            ApiError::CannotBeABase(url) => CoreError::Config {
                message: format!("URL cannot be used as a base: {url}"),
            },
            e @ ApiError::DotSegment(_) => CoreError::Config {
                message: e.to_string(),
            },
            ApiError::Tls(msg) => CoreError::Config {
                message: format!("HTTP client setup failed: {msg}"),
            },
            ApiError::Status { url, .. } => CoreError::Api {
                message: format!("HTTP {} from {url}", status.unwrap_or_default()),
                status,
            },
            ApiError::Rejected { message, .. } => CoreError::Rejected { message },
            ApiError::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            ApiError::Stream(reason) => CoreError::ServerUnavailable {
                url: "/stream".into(),
                reason,
            },
        }
    }
}
