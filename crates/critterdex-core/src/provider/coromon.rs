use async_trait::async_trait;
use url::Url;

use super::wiki::ThumbnailWiki;
use super::{CreatureProvider, ProviderDescriptor, SpriteOptions, endpoint};

const COROMON_API: &str = "https://coromon.wiki.gg/api.php";
const COROMON_IMAGES: &str = "https://coromon.wiki.gg/images/";

/// Coromon wiki: a page with a `thumb` property is a Coromon.
pub struct CoromonProvider {
    descriptor: ProviderDescriptor,
    wiki: ThumbnailWiki,
}

impl CoromonProvider {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Built-in public endpoints over a shared `http` client.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self::with_endpoints(http, endpoint(COROMON_API), endpoint(COROMON_IMAGES))
    }

    /// `api` is the wiki's `api.php`, `images` the CDN directory thumbnails live in.
    pub fn with_endpoints(http: reqwest::Client, api: Url, images: Url) -> Self {
        Self {
            descriptor: ProviderDescriptor::new("coromon", "Coromon"),
            wiki: ThumbnailWiki::new(http, api, images),
        }
    }
}

impl Default for CoromonProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CreatureProvider for CoromonProvider {
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
