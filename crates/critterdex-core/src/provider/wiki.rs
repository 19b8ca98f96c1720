// MediaWiki API shapes shared by the wiki-backed providers.
//
// Coromon, Palworld, Kindred Fates and Cassette Beasts all sit on MediaWiki
// installs. They differ only in which of these queries they chain together.

use critterdex_api::{Error, fetch_json};
use indexmap::IndexMap;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::validation::{is_valid_thumbnail, web_only};

use super::{as_directory, non_blank, or_absent};

/// MediaWiki only sends CORS headers when asked; harmless outside a browser.
const ORIGIN: (&str, &str) = ("origin", "*");

// ── action=parse ────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct ParseResponse {
    #[serde(default)]
    parse: Option<ParsedPage>,
}

#[derive(Debug, Default, Deserialize)]
struct ParsedPage {
    #[serde(default)]
    properties: Option<PageProperties>,
    #[serde(default)]
    wikitext: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PageProperties {
    #[serde(default)]
    thumb: Option<String>,
}

/// The `thumb` page property of `page`, if the page exists and sets one.
pub(crate) async fn page_thumb(
    http: &reqwest::Client,
    api: &Url,
    page: &str,
) -> Result<Option<String>, Error> {
    let resp: ParseResponse = fetch_json(
        http,
        api.clone(),
        &[
            ("action", "parse"),
            ("format", "json"),
            ("page", page),
            ("prop", "properties|parsewarnings"),
            ("formatversion", "2"),
            ORIGIN,
        ],
    )
    .await?;

    Ok(resp
        .parse
        .and_then(|p| p.properties)
        .and_then(|p| p.thumb)
        .filter(|thumb| !thumb.is_empty()))
}

/// Raw wikitext of `page`.
pub(crate) async fn page_wikitext(
    http: &reqwest::Client,
    api: &Url,
    page: &str,
) -> Result<Option<String>, Error> {
    let resp: ParseResponse = fetch_json(
        http,
        api.clone(),
        &[
            ("action", "parse"),
            ("format", "json"),
            ("page", page),
            ("prop", "wikitext"),
            ("formatversion", "2"),
            ORIGIN,
        ],
    )
    .await?;

    Ok(resp.parse.and_then(|p| p.wikitext))
}

// ── Page-thumbnail wikis ────────────────────────────────────────────

/// A wiki whose creature pages carry a `thumb` page property naming an
/// image under a fixed CDN directory (Coromon and Palworld).
pub(crate) struct ThumbnailWiki {
    http: reqwest::Client,
    api: Url,
    cdn: Url,
}

impl ThumbnailWiki {
    pub(crate) fn new(http: reqwest::Client, api: Url, cdn: Url) -> Self {
        Self {
            http,
            api,
            cdn: as_directory(cdn),
        }
    }

    pub(crate) async fn validate(&self, mode: &str, name: &str) -> bool {
        let Some(name) = non_blank(name) else {
            return false;
        };
        let thumb = page_thumb(&self.http, &self.api, name).await;
        or_absent(mode, "validate", thumb.map(|t| t.is_some()))
    }

    pub(crate) async fn sprite(&self, mode: &str, name: &str) -> Option<Url> {
        let name = non_blank(name)?;
        let thumb = or_absent(mode, "sprite", page_thumb(&self.http, &self.api, name).await)?;
        if !is_valid_thumbnail(&thumb) {
            tracing::debug!(mode, thumb, "rejecting unsafe thumbnail filename");
            return None;
        }
        self.cdn.join(&thumb).ok().and_then(web_only)
    }
}

// ── action=query&prop=imageinfo ─────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    query: Option<QueryBody>,
}

#[derive(Debug, Deserialize)]
struct QueryBody {
    pages: Pages,
}

/// `formatversion=2` returns pages as a list, version 1 as a map keyed by page id.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Pages {
    List(Vec<ImagePage>),
    Map(IndexMap<String, ImagePage>),
}

impl Pages {
    fn into_first(self) -> Option<ImagePage> {
        match self {
            Self::List(pages) => pages.into_iter().next(),
            Self::Map(pages) => pages.into_values().next(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ImagePage {
    #[serde(default)]
    imageinfo: Vec<ImageInfo>,
}

#[derive(Debug, Deserialize)]
struct ImageInfo {
    url: String,
}

/// Resolve `File:<file_name>` to the URL of its current revision.
pub(crate) async fn file_url(
    http: &reqwest::Client,
    api: &Url,
    file_name: &str,
) -> Result<Option<String>, Error> {
    let title = format!("File:{file_name}");
    let resp: QueryResponse = fetch_json(
        http,
        api.clone(),
        &[
            ("action", "query"),
            ("format", "json"),
            ("titles", title.as_str()),
            ("prop", "imageinfo"),
            ("iiprop", "url"),
            ("formatversion", "2"),
            ORIGIN,
        ],
    )
    .await?;

    Ok(resp
        .query
        .and_then(|q| q.pages.into_first())
        .and_then(|page| page.imageinfo.into_iter().next())
        .map(|info| info.url))
}

// ── action=cargoquery ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(bound = "T: DeserializeOwned")]
struct CargoResponse<T> {
    #[serde(default = "Vec::new")]
    cargoquery: Vec<CargoRow<T>>,
}

#[derive(Debug, Deserialize)]
struct CargoRow<T> {
    title: T,
}

/// Run a Cargo table query and return the rows.
pub(crate) async fn cargo_query<T: DeserializeOwned>(
    http: &reqwest::Client,
    api: &Url,
    table: &str,
    fields: &str,
    filter: &str,
) -> Result<Vec<T>, Error> {
    let resp: CargoResponse<T> = fetch_json(
        http,
        api.clone(),
        &[
            ("action", "cargoquery"),
            ("format", "json"),
            ("tables", table),
            ("fields", fields),
            ("where", filter),
            ORIGIN,
        ],
    )
    .await?;

    Ok(resp.cargoquery.into_iter().map(|row| row.title).collect())
}
