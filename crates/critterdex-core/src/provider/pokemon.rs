use async_trait::async_trait;
use critterdex_api::fetch::join_segment;
use critterdex_api::{Error, fetch_json, fetch_status};
use indexmap::IndexMap;
use serde::Deserialize;
use url::Url;

use crate::validation::web_only;

use super::{
    CreatureProvider, ProviderDescriptor, SpriteOptions, as_directory, endpoint, non_blank,
    or_absent,
};

const POKEAPI_POKEMON: &str = "https://pokeapi.co/api/v2/pokemon/";
const HOME_ARTWORK: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/home/";

#[derive(Debug, Deserialize)]
struct PokemonRecord {
    id: u32,
    #[serde(default)]
    sprites: Option<SpriteSet>,
}

#[derive(Debug, Default, Deserialize)]
struct SpriteSet {
    #[serde(default)]
    versions: IndexMap<String, serde_json::Value>,
}

/// PokéAPI lookups with sprites taken from the PokeAPI "home" artwork set.
///
/// The sprite URL is templated from the numeric id, so only the lookup
/// touches the network. `SpriteOptions::generation` does not change the
/// artwork; see [`generations`](Self::generations) for what is available.
pub struct PokemonProvider {
    descriptor: ProviderDescriptor,
    http: reqwest::Client,
    api: Url,
    artwork: Url,
}

impl PokemonProvider {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Built-in public endpoints over a shared `http` client.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self::with_endpoints(http, endpoint(POKEAPI_POKEMON), endpoint(HOME_ARTWORK))
    }

    /// `api` is the `/pokemon/` collection, `artwork` the sprite directory.
    pub fn with_endpoints(http: reqwest::Client, api: Url, artwork: Url) -> Self {
        Self {
            descriptor: ProviderDescriptor::new("pokemon", "Pokémon"),
            http,
            api,
            artwork: as_directory(artwork),
        }
    }

    fn record_url(&self, name: &str) -> Result<Url, Error> {
        join_segment(self.api.clone(), &name.to_lowercase())
    }

    async fn lookup(&self, name: &str) -> Result<PokemonRecord, Error> {
        fetch_json(&self.http, self.record_url(name)?, &[]).await
    }

    fn artwork_url(&self, id: u32, shiny: bool) -> Option<Url> {
        let file = if shiny {
            format!("shiny/{id}.png")
        } else {
            format!("{id}.png")
        };
        self.artwork.join(&file).ok().and_then(web_only)
    }

    /// Sprite generations PokéAPI lists for `name` (`generation-i`, ...).
    ///
    /// Empty for blank or unknown names.
    pub async fn generations(&self, name: &str) -> Vec<String> {
        let Some(name) = non_blank(name) else {
            return Vec::new();
        };
        let result = self.lookup(name).await.map(|record| {
            record
                .sprites
                .unwrap_or_default()
                .versions
                .into_keys()
                .collect()
        });
        or_absent(self.mode(), "generations", result)
    }
}

impl Default for PokemonProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CreatureProvider for PokemonProvider {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    fn supports_shiny(&self) -> bool {
        true
    }

    fn shiny_toggle(&self) -> bool {
        true
    }

    async fn validate(&self, name: &str) -> bool {
        let Some(name) = non_blank(name) else {
            return false;
        };
        let result = match self.record_url(name) {
            Ok(url) => fetch_status(&self.http, url).await,
            Err(e) => Err(e),
        };
        or_absent(self.mode(), "validate", result)
    }

    async fn sprite(&self, name: &str, options: &SpriteOptions) -> Option<Url> {
        let name = non_blank(name)?;
        let record = or_absent(self.mode(), "sprite", self.lookup(name).await.map(Some))?;
        self.artwork_url(record.id, options.shiny)
    }
}
