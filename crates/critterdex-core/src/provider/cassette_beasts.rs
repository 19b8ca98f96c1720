use async_trait::async_trait;
use critterdex_api::Error;
use serde::Deserialize;
use url::Url;

use crate::validation::checked_url;

use super::wiki::{file_url, page_wikitext};
use super::{CreatureProvider, ProviderDescriptor, SpriteOptions, endpoint, non_blank, or_absent};

const CASSETTE_BEASTS_API: &str = "https://wiki.cassettebeasts.com/api.php";

/// Page whose wikitext is a JSON array of every species.
const SPECIES_PAGE: &str = "Data:Species";

#[derive(Debug, Deserialize)]
struct Species {
    name: String,
}

/// Cassette Beasts wiki. Names are matched exactly against the species
/// data page; sprites are the `File:<name>.png` upload.
pub struct CassetteBeastsProvider {
    descriptor: ProviderDescriptor,
    http: reqwest::Client,
    api: Url,
}

impl CassetteBeastsProvider {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Built-in public endpoints over a shared `http` client.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self::with_endpoints(http, endpoint(CASSETTE_BEASTS_API))
    }

    pub fn with_endpoints(http: reqwest::Client, api: Url) -> Self {
        Self {
            descriptor: ProviderDescriptor::new("cassettebeasts", "Cassette Beasts"),
            http,
            api,
        }
    }

    async fn is_species(&self, name: &str) -> Result<bool, Error> {
        let Some(wikitext) = page_wikitext(&self.http, &self.api, SPECIES_PAGE).await? else {
            return Ok(false);
        };
        let species: Vec<Species> =
            serde_json::from_str(&wikitext).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: wikitext.clone(),
            })?;
        Ok(species.iter().any(|s| s.name == name))
    }
}

impl Default for CassetteBeastsProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CreatureProvider for CassetteBeastsProvider {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    async fn validate(&self, name: &str) -> bool {
        let Some(name) = non_blank(name) else {
            return false;
        };
        or_absent(self.mode(), "validate", self.is_species(name).await)
    }

    async fn sprite(&self, name: &str, _options: &SpriteOptions) -> Option<Url> {
        let name = non_blank(name)?;
        let file = format!("{name}.png");
        let raw = or_absent(self.mode(), "sprite", file_url(&self.http, &self.api, &file).await)?;
        checked_url(&raw)
    }
}
