use async_trait::async_trait;
use critterdex_api::{Error, fetch_json};
use serde::Deserialize;
use url::Url;

use crate::validation::checked_url;

use super::{CreatureProvider, ProviderDescriptor, SpriteOptions, endpoint, non_blank, or_absent};

const TEMTEM_LIST: &str = "https://temtem-api.mael.tech/api/temtems";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Temtem {
    name: String,
    #[serde(default)]
    portrait_wiki_url: Option<String>,
}

/// Temtem API. The upstream has no per-name query, so both operations
/// download the full species list and scan it case-insensitively.
pub struct TemtemProvider {
    descriptor: ProviderDescriptor,
    http: reqwest::Client,
    api: Url,
}

impl TemtemProvider {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Built-in public endpoints over a shared `http` client.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self::with_endpoints(http, endpoint(TEMTEM_LIST))
    }

    /// `api` is the full species listing endpoint.
    pub fn with_endpoints(http: reqwest::Client, api: Url) -> Self {
        Self {
            descriptor: ProviderDescriptor::new("temtem", "Temtem"),
            http,
            api,
        }
    }

    async fn find(&self, name: &str) -> Result<Option<Temtem>, Error> {
        let species: Vec<Temtem> = fetch_json(&self.http, self.api.clone(), &[]).await?;
        let wanted = name.to_lowercase();
        Ok(species.into_iter().find(|t| t.name.to_lowercase() == wanted))
    }
}

impl Default for TemtemProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CreatureProvider for TemtemProvider {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    async fn validate(&self, name: &str) -> bool {
        let Some(name) = non_blank(name) else {
            return false;
        };
        let found = self.find(name).await.map(|t| t.is_some());
        or_absent(self.mode(), "validate", found)
    }

    async fn sprite(&self, name: &str, _options: &SpriteOptions) -> Option<Url> {
        let name = non_blank(name)?;
        let temtem = or_absent(self.mode(), "sprite", self.find(name).await)?;
        checked_url(&temtem.portrait_wiki_url?)
    }
}
