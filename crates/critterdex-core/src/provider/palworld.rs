use async_trait::async_trait;
use url::Url;

use super::wiki::ThumbnailWiki;
use super::{CreatureProvider, ProviderDescriptor, SpriteOptions, endpoint};

const PALWORLD_API: &str = "https://palworld.wiki.gg/api.php";
const PALWORLD_IMAGES: &str = "https://palworld.wiki.gg/images/";

/// Palworld wiki, same page-property layout as the Coromon wiki.
pub struct PalworldProvider {
    descriptor: ProviderDescriptor,
    wiki: ThumbnailWiki,
}

impl PalworldProvider {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Built-in public endpoints over a shared `http` client.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self::with_endpoints(http, endpoint(PALWORLD_API), endpoint(PALWORLD_IMAGES))
    }

    /// `api` is the wiki's `api.php`, `images` the CDN directory thumbnails live in.
    pub fn with_endpoints(http: reqwest::Client, api: Url, images: Url) -> Self {
        Self {
            descriptor: ProviderDescriptor::new("palworld", "Palworld"),
            wiki: ThumbnailWiki::new(http, api, images),
        }
    }
}

impl Default for PalworldProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CreatureProvider for PalworldProvider {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    async fn validate(&self, name: &str) -> bool {
        self.wiki.validate(self.mode(), name).await
    }

    async fn sprite(&self, name: &str, _options: &SpriteOptions) -> Option<Url> {
        self.wiki.sprite(self.mode(), name).await
    }
}
