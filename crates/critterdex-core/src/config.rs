// ── Runtime connection configuration ──
//
// Describes *where* the control server lives and how patient to be with
// it. Never touches disk: the CLI resolves profiles and flags into a
// `ClientConfig` and hands it in.

use std::time::Duration;

use critterdex_api::TransportConfig;
use url::Url;

/// Mode assumed until the first push snapshot says otherwise.
pub const DEFAULT_MODE: &str = "pokemon";

/// Configuration for talking to one control server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server root, e.g. `http://localhost:5000`.
    pub server: Url,
    /// Request timeout for server and provider calls.
    pub timeout: Duration,
    /// Mode used for name validation before any snapshot arrives.
    pub default_mode: String,
}

impl ClientConfig {
    pub fn new(server: Url) -> Self {
        Self {
            server,
            timeout: TransportConfig::default().timeout,
            default_mode: DEFAULT_MODE.into(),
        }
    }

    /// Transport settings derived from this configuration.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig::default().with_timeout(self.timeout)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn transport_carries_timeout() {
        let mut config = ClientConfig::new("http://localhost:5000".parse().unwrap());
        assert_eq!(config.default_mode, "pokemon");
        config.timeout = Duration::from_secs(5);
        assert_eq!(config.transport().timeout, Duration::from_secs(5));
    }
}
