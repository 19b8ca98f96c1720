use async_trait::async_trait;
use critterdex_api::fetch::join_segment;
use critterdex_api::{Error, fetch_json, fetch_status};
use serde::Deserialize;
use url::Url;

use crate::validation::checked_url;

use super::{CreatureProvider, ProviderDescriptor, SpriteOptions, endpoint, non_blank, or_absent};

const DIGIMON_BY_NAME: &str = "https://digimon-api.vercel.app/api/digimon/name/";

#[derive(Debug, Deserialize)]
struct DigimonRecord {
    #[serde(default)]
    img: Option<String>,
}

/// Digimon API: a successful name lookup means the Digimon exists.
pub struct DigimonProvider {
    descriptor: ProviderDescriptor,
    http: reqwest::Client,
    api: Url,
}

impl DigimonProvider {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Built-in public endpoints over a shared `http` client.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self::with_endpoints(http, endpoint(DIGIMON_BY_NAME))
    }

    /// `api` is the `/digimon/name/` lookup collection.
    pub fn with_endpoints(http: reqwest::Client, api: Url) -> Self {
        Self {
            descriptor: ProviderDescriptor::new("digimon", "Digimon"),
            http,
            api,
        }
    }

    fn lookup_url(&self, name: &str) -> Result<Url, Error> {
        join_segment(self.api.clone(), name)
    }

    async fn first_image(&self, name: &str) -> Result<Option<String>, Error> {
        let records: Vec<DigimonRecord> = fetch_json(&self.http, self.lookup_url(name)?, &[]).await?;
        Ok(records.into_iter().next().and_then(|r| r.img))
    }
}

impl Default for DigimonProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CreatureProvider for DigimonProvider {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    async fn validate(&self, name: &str) -> bool {
        let Some(name) = non_blank(name) else {
            return false;
        };
        let result = match self.lookup_url(name) {
            Ok(url) => fetch_status(&self.http, url).await,
            Err(e) => Err(e),
        };
        or_absent(self.mode(), "validate", result)
    }

    async fn sprite(&self, name: &str, _options: &SpriteOptions) -> Option<Url> {
        let name = non_blank(name)?;
        let img = or_absent(self.mode(), "sprite", self.first_image(name).await)?;
        checked_url(&img)
    }
}
