use async_trait::async_trait;
use critterdex_api::Error;
use serde::Deserialize;
use url::Url;

use crate::validation::checked_url;

use super::wiki::{cargo_query, file_url};
use super::{CreatureProvider, ProviderDescriptor, SpriteOptions, endpoint, non_blank, or_absent};

const KINDRED_FATES_API: &str = "https://www.kindredfateswiki.com/api.php";

/// One row of the wiki's `Kinfolk` Cargo table. Values are `File:` names.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KinfolkImages {
    #[serde(default)]
    image_normal: Option<String>,
    #[serde(default)]
    image_phantom: Option<String>,
    #[serde(default)]
    image_variant: Option<String>,
}

/// Kindred Fates wiki, backed by the `Kinfolk` Cargo table.
///
/// Phantom art stands in for shiny. Variant art is resolved alongside the
/// other two but not offered as a choice yet.
pub struct KindredFatesProvider {
    descriptor: ProviderDescriptor,
    http: reqwest::Client,
    api: Url,
}

impl KindredFatesProvider {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Built-in public endpoints over a shared `http` client.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self::with_endpoints(http, endpoint(KINDRED_FATES_API))
    }

    pub fn with_endpoints(http: reqwest::Client, api: Url) -> Self {
        Self {
            descriptor: ProviderDescriptor::new("kindredfates", "Kindred Fates"),
            http,
            api,
        }
    }

    async fn images(&self, name: &str) -> Result<Option<KinfolkImages>, Error> {
        // The name is interpolated into a quoted `where` literal.
        if name.contains('"') {
            tracing::debug!(mode = self.mode(), name, "name cannot be quoted for cargo query");
            return Ok(None);
        }
        let rows: Vec<KinfolkImages> = cargo_query(
            &self.http,
            &self.api,
            "Kinfolk",
            "imageNormal,imagePhantom,imageVariant",
            &format!("name=\"{name}\""),
        )
        .await?;
        Ok(rows.into_iter().next())
    }

    async fn resolve_file(&self, file_name: Option<&str>) -> Option<Url> {
        let file_name = file_name.and_then(non_blank)?;
        let raw = or_absent(
            self.mode(),
            "sprite",
            file_url(&self.http, &self.api, file_name).await,
        )?;
        checked_url(&raw)
    }
}

impl Default for KindredFatesProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CreatureProvider for KindredFatesProvider {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    fn supports_shiny(&self) -> bool {
        true
    }

    async fn validate(&self, name: &str) -> bool {
        let Some(name) = non_blank(name) else {
            return false;
        };
        let found = self.images(name).await.map(|row| row.is_some());
        or_absent(self.mode(), "validate", found)
    }

    async fn sprite(&self, name: &str, options: &SpriteOptions) -> Option<Url> {
        let name = non_blank(name)?;
        let images = or_absent(self.mode(), "sprite", self.images(name).await)?;

        let (normal, phantom, _variant) = tokio::join!(
            self.resolve_file(images.image_normal.as_deref()),
            self.resolve_file(images.image_phantom.as_deref()),
            self.resolve_file(images.image_variant.as_deref()),
        );

        if options.shiny {
            phantom.or(normal)
        } else {
            normal
        }
    }
}
