use thiserror::Error;

/// Top-level error type for the `critterdex-api` crate.
///
/// Covers transport failures against both the upstream creature APIs and
/// the control server, plus push-stream failures. Providers in
/// `critterdex-core` collapse all of these into "absent"; the sync and
/// session layers map them into `CoreError`.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A URL that cannot carry path segments (e.g. `data:` URLs).
    #[error("URL cannot be used as a base: {0}")]
    CannotBeABase(String),

    /// A `.` or `..` path segment, which URL normalization would resolve
    /// against the base instead of appending.
    #[error("Path segment {0:?} would escape its base URL")]
    DotSegment(String),

    /// TLS or client-builder error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Responses ───────────────────────────────────────────────────
    /// Non-success HTTP status with no structured error body.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The control server refused a request and explained why
    /// (`{ "status": "error", "message": "..." }`).
    #[error("Server rejected request (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Push stream ─────────────────────────────────────────────────
    /// The push channel could not be opened or dropped mid-read.
    #[error("Push stream error: {0}")]
    Stream(String),
}

impl Error {
    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Status { status: 404, .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if the failure happened before any response arrived.
    pub fn is_unreachable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Stream(_) => true,
            _ => false,
        }
    }

    /// HTTP status attached to this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Status { status, .. } | Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}
