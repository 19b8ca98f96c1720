//! GET-with-query helper used by every upstream creature provider.
//!
//! Builds the request URL from a base plus query parameters, issues a GET,
//! and deserializes the body. Any non-success status is an error; callers
//! in `critterdex-core` decide whether that means "not found" or "absent".

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;

/// Append `params` to `base` as query pairs, preserving any existing query.
pub fn with_query(mut base: Url, params: &[(&str, &str)]) -> Url {
    if !params.is_empty() {
        let mut pairs = base.query_pairs_mut();
        for (key, value) in params {
            pairs.append_pair(key, value);
        }
    }
    base
}

/// Append one path segment to `base`, percent-encoding it.
///
/// A trailing empty segment (from a base ending in `/`) is replaced rather
/// than kept, so `https://host/api/` + `pikachu` yields `https://host/api/pikachu`.
/// `.` and `..` are refused: `url` would drop them silently and the request
/// would hit the parent collection instead.
pub fn join_segment(mut base: Url, segment: &str) -> Result<Url, Error> {
    if base.cannot_be_a_base() {
        return Err(Error::CannotBeABase(base.to_string()));
    }
    if matches!(segment, "." | "..") {
        return Err(Error::DotSegment(segment.to_owned()));
    }
    if let Ok(mut segments) = base.path_segments_mut() {
        segments.pop_if_empty().push(segment);
    }
    Ok(base)
}

/// GET `url` with `params` and deserialize the JSON body.
pub async fn fetch_json<T: DeserializeOwned>(
    http: &reqwest::Client,
    url: Url,
    params: &[(&str, &str)],
) -> Result<T, Error> {
    let url = with_query(url, params);
    debug!("GET {}", url);

    let resp = http.get(url.clone()).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(Error::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body,
    })
}

/// GET `url` and report only whether the server answered with a 2xx status.
///
/// Used by providers whose existence check is "the lookup endpoint
/// answered successfully" and never reads the body.
pub async fn fetch_status(http: &reqwest::Client, url: Url) -> Result<bool, Error> {
    debug!("GET {} (status only)", url);
    let resp = http.get(url).send().await?;
    Ok(resp.status().is_success())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn with_query_appends_pairs_in_order() {
        let base = Url::parse("https://wiki.example/api.php").unwrap();
        let url = with_query(base, &[("action", "parse"), ("page", "Swurmy")]);
        assert_eq!(
            url.as_str(),
            "https://wiki.example/api.php?action=parse&page=Swurmy"
        );
    }

    #[test]
    fn with_query_encodes_special_characters() {
        let base = Url::parse("https://wiki.example/api.php").unwrap();
        let url = with_query(base, &[("where", "name=\"Bulbear\""), ("titles", "File:A b.png")]);
        assert_eq!(
            url.query(),
            Some("where=name%3D%22Bulbear%22&titles=File%3AA+b.png")
        );
    }

    #[test]
    fn join_segment_replaces_trailing_slash() {
        let base = Url::parse("https://pokeapi.example/api/v2/pokemon/").unwrap();
        let url = join_segment(base, "pikachu").unwrap();
        assert_eq!(url.as_str(), "https://pokeapi.example/api/v2/pokemon/pikachu");
    }

    #[test]
    fn join_segment_escapes_path_separators() {
        let base = Url::parse("https://digimon.example/api/digimon/name").unwrap();
        let url = join_segment(base, "../admin").unwrap();
        assert_eq!(url.path(), "/api/digimon/name/..%2Fadmin");
    }

    #[test]
    fn join_segment_refuses_dot_segments() {
        let base = Url::parse("https://pokeapi.example/api/v2/pokemon/").unwrap();
        for dots in [".", ".."] {
            assert!(matches!(
                join_segment(base.clone(), dots),
                Err(Error::DotSegment(ref s)) if s == dots
            ));
        }
        let url = join_segment(base, "...").unwrap();
        assert_eq!(url.path(), "/api/v2/pokemon/...");
    }

    #[test]
    fn join_segment_rejects_opaque_base() {
        let base = Url::parse("data:text/plain,hello").unwrap();
        assert!(matches!(
            join_segment(base, "x"),
            Err(Error::CannotBeABase(_))
        ));
    }
}
