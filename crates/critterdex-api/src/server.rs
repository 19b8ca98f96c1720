// Control-server HTTP client
//
// Wraps `reqwest::Client` with the overlay server's endpoint layout:
// `/update` for actions, `/names` for autocomplete, `/api/providers` for
// provider configuration and `/stream` for the push channel.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{Action, ProviderConfig, ServerErrorBody};
use crate::transport::TransportConfig;

/// HTTP client for the overlay control server.
///
/// The server owns all session state; this client only requests changes
/// and reads configuration. Responses to `/update` carry nothing the
/// client relies on, so `send_action` only checks the status.
#[derive(Debug, Clone)]
pub struct ServerClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ServerClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the server root, e.g. `http://localhost:5000`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url: directory_url(base_url),
        }
    }

    /// The server root this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Resolve an endpoint path relative to the server root.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    /// URL of the Server-Sent Events push channel.
    pub fn stream_url(&self) -> Result<Url, Error> {
        self.endpoint("stream")
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// `POST /update` with an action body.
    pub async fn send_action(&self, action: &Action) -> Result<(), Error> {
        let url = self.endpoint("update")?;
        debug!(action = action.name(), "POST {}", url);

        let resp = self.http.post(url.clone()).json(action).send().await?;
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::Status {
                status: status.as_u16(),
                url: url.to_string(),
            })
        }
    }

    /// `GET /names` -- autocomplete names for the server's current mode.
    pub async fn names(&self) -> Result<Vec<String>, Error> {
        self.get("names").await
    }

    /// `GET /api/providers` -- the server's provider configuration.
    pub async fn providers(&self) -> Result<ProviderConfig, Error> {
        self.get("api/providers").await
    }

    /// `POST /api/providers` with the full replacement map.
    pub async fn save_providers(&self, config: &ProviderConfig) -> Result<(), Error> {
        self.post("api/providers", config).await
    }

    // ── Request helpers ──────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.endpoint(path)?;
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await?;
        Self::parse_body(resp).await
    }

    async fn post(&self, path: &str, body: &impl Serialize) -> Result<(), Error> {
        let url = self.endpoint(path)?;
        debug!("POST {}", url);

        let resp = self.http.post(url).json(body).send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        Err(Self::rejection(resp).await)
    }

    async fn parse_body<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        if !resp.status().is_success() {
            return Err(Self::rejection(resp).await);
        }
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    /// Turn a non-2xx response into `Rejected` when the server explained
    /// itself, or a bare `Status` otherwise.
    async fn rejection(resp: reqwest::Response) -> Error {
        let status = resp.status().as_u16();
        let url = resp.url().to_string();
        let body = resp.text().await.unwrap_or_default();
        match serde_json::from_str::<ServerErrorBody>(&body) {
            Ok(err) => Error::Rejected {
                status,
                message: err.message,
            },
            Err(_) => Error::Status { status, url },
        }
    }
}

/// Make sure the base path ends in `/` so relative joins append instead of
/// replacing the last segment.
fn directory_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ServerClient {
        ServerClient::with_client(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn endpoints_resolve_from_bare_host() {
        let c = client("http://localhost:5000");
        assert_eq!(c.endpoint("update").unwrap().as_str(), "http://localhost:5000/update");
        assert_eq!(c.stream_url().unwrap().as_str(), "http://localhost:5000/stream");
    }

    #[test]
    fn endpoints_keep_mounted_prefix() {
        let c = client("https://overlay.example/counter");
        assert_eq!(
            c.endpoint("api/providers").unwrap().as_str(),
            "https://overlay.example/counter/api/providers"
        );
    }
}
