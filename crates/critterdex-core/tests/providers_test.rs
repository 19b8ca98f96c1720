#![allow(clippy::unwrap_used)]
// Integration tests for the seven creature providers against wiremock upstreams.

use serde_json::json;
use url::Url;
use wiremock::matchers::{any, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use critterdex_core::{
    CassetteBeastsProvider, CoromonProvider, CreatureProvider, DigimonProvider,
    KindredFatesProvider, PalworldProvider, PokemonProvider, SpriteOptions, TemtemProvider,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn at(server: &MockServer, suffix: &str) -> Url {
    Url::parse(&format!("{}{suffix}", server.uri())).unwrap()
}

/// Fail the test if the provider touches the network at all.
async fn forbid_requests(server: &MockServer) {
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

fn pokemon(server: &MockServer) -> PokemonProvider {
    PokemonProvider::with_endpoints(
        reqwest::Client::new(),
        at(server, "/api/v2/pokemon/"),
        at(server, "/sprites/home/"),
    )
}

async fn mount_pikachu(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v2/pokemon/pikachu"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 25,
            "name": "pikachu",
            "sprites": { "versions": { "generation-i": {}, "generation-ii": {} } }
        })))
        .mount(server)
        .await;
}

fn wiki_thumb(thumb: &str) -> serde_json::Value {
    json!({ "parse": { "title": "Page", "pageid": 1, "properties": { "thumb": thumb } } })
}

fn file_page(url: &str) -> serde_json::Value {
    json!({ "query": { "pages": [{ "title": "File:x.png", "imageinfo": [{ "url": url }] }] } })
}

// ── Common contract ─────────────────────────────────────────────────

#[tokio::test]
async fn test_blank_names_never_hit_the_network() {
    let server = MockServer::start().await;
    forbid_requests(&server).await;
    let http = reqwest::Client::new();

    let providers: Vec<Box<dyn CreatureProvider>> = vec![
        Box::new(pokemon(&server)),
        Box::new(DigimonProvider::with_endpoints(http.clone(), at(&server, "/name/"))),
        Box::new(TemtemProvider::with_endpoints(http.clone(), at(&server, "/temtems"))),
        Box::new(CoromonProvider::with_endpoints(
            http.clone(),
            at(&server, "/api.php"),
            at(&server, "/images/"),
        )),
        Box::new(KindredFatesProvider::with_endpoints(http.clone(), at(&server, "/api.php"))),
        Box::new(PalworldProvider::with_endpoints(
            http.clone(),
            at(&server, "/api.php"),
            at(&server, "/images/"),
        )),
        Box::new(CassetteBeastsProvider::with_endpoints(http, at(&server, "/api.php"))),
    ];

    for provider in &providers {
        for blank in ["", "   "] {
            assert!(!provider.validate(blank).await, "{} validated blank", provider.mode());
            assert!(
                provider.sprite(blank, &SpriteOptions::shiny(true)).await.is_none(),
                "{} returned a sprite for blank",
                provider.mode()
            );
        }
    }
}

#[tokio::test]
async fn test_dot_names_never_reach_the_parent_collection() {
    let server = MockServer::start().await;
    forbid_requests(&server).await;
    let pokemon = pokemon(&server);
    let digimon = DigimonProvider::with_endpoints(reqwest::Client::new(), at(&server, "/name/"));

    for dots in [".", "..", " .. "] {
        assert!(!pokemon.validate(dots).await, "pokemon validated {dots:?}");
        assert!(pokemon.sprite(dots, &SpriteOptions::default()).await.is_none());
        assert!(pokemon.generations(dots).await.is_empty());
        assert!(!digimon.validate(dots).await, "digimon validated {dots:?}");
        assert!(digimon.sprite(dots, &SpriteOptions::default()).await.is_none());
    }
}

// ── Pokémon ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_pokemon_validate_and_shiny_sprite() {
    let server = MockServer::start().await;
    mount_pikachu(&server).await;
    let provider = pokemon(&server);

    assert!(provider.validate("pikachu").await);
    assert!(provider.validate("Pikachu").await, "lookup is lowercased");

    let shiny = provider.sprite("pikachu", &SpriteOptions::shiny(true)).await.unwrap();
    assert!(shiny.as_str().ends_with("/sprites/home/shiny/25.png"), "{shiny}");

    let plain = provider.sprite("pikachu", &SpriteOptions::default()).await.unwrap();
    assert!(plain.as_str().ends_with("/sprites/home/25.png"), "{plain}");
}

#[tokio::test]
async fn test_pokemon_generation_does_not_change_sprite() {
    let server = MockServer::start().await;
    mount_pikachu(&server).await;
    let provider = pokemon(&server);

    let options = SpriteOptions {
        shiny: false,
        generation: "generation-i".into(),
    };
    let sprite = provider.sprite("pikachu", &options).await.unwrap();
    assert!(sprite.as_str().ends_with("/sprites/home/25.png"));
}

#[tokio::test]
async fn test_pokemon_unknown_is_invalid() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/pokemon/notamon"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;
    let provider = pokemon(&server);

    assert!(!provider.validate("notamon").await);
    assert!(provider.sprite("notamon", &SpriteOptions::default()).await.is_none());
}

#[tokio::test]
async fn test_pokemon_generations() {
    let server = MockServer::start().await;
    mount_pikachu(&server).await;
    let provider = pokemon(&server);

    assert_eq!(
        provider.generations("pikachu").await,
        ["generation-i", "generation-ii"]
    );
    assert!(provider.generations("").await.is_empty());
}

#[tokio::test]
async fn test_unreachable_upstream_is_absent() {
    // Nothing listens on port 9 locally; the connection is refused.
    let provider = PokemonProvider::with_endpoints(
        reqwest::Client::new(),
        Url::parse("http://127.0.0.1:9/pokemon/").unwrap(),
        Url::parse("http://127.0.0.1:9/art/").unwrap(),
    );
    assert!(!provider.validate("pikachu").await);
    assert!(provider.sprite("pikachu", &SpriteOptions::default()).await.is_none());
}

// ── Digimon ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_digimon_sprite_from_first_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/digimon/name/Agumon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "Agumon", "img": "https://digimon.example/img/agumon.jpg", "level": "Rookie" }
        ])))
        .mount(&server)
        .await;
    let provider =
        DigimonProvider::with_endpoints(reqwest::Client::new(), at(&server, "/api/digimon/name/"));

    assert!(provider.validate("Agumon").await);
    assert_eq!(
        provider.sprite("Agumon", &SpriteOptions::default()).await.unwrap().as_str(),
        "https://digimon.example/img/agumon.jpg"
    );
}

#[tokio::test]
async fn test_digimon_rejects_script_urls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/digimon/name/Evilmon"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "name": "Evilmon", "img": "javascript:alert(1)" }])),
        )
        .mount(&server)
        .await;
    let provider =
        DigimonProvider::with_endpoints(reqwest::Client::new(), at(&server, "/api/digimon/name/"));

    assert!(provider.validate("Evilmon").await);
    assert!(provider.sprite("Evilmon", &SpriteOptions::default()).await.is_none());
}

#[tokio::test]
async fn test_digimon_error_status_is_invalid() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "ErrorMsg": "nope" })))
        .mount(&server)
        .await;
    let provider =
        DigimonProvider::with_endpoints(reqwest::Client::new(), at(&server, "/api/digimon/name/"));

    assert!(!provider.validate("Nomon").await);
    assert!(provider.sprite("Nomon", &SpriteOptions::default()).await.is_none());
}

// ── Temtem ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_temtem_case_insensitive_scan() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/temtems"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "number": 1, "name": "Mimit", "portraitWikiUrl": "https://temtem.example/Mimit.png" },
            { "number": 2, "name": "Oree", "portraitWikiUrl": "data:image/png;base64,AAAA" }
        ])))
        .expect(4)
        .mount(&server)
        .await;
    let provider = TemtemProvider::with_endpoints(reqwest::Client::new(), at(&server, "/api/temtems"));

    assert!(provider.validate("mimit").await);
    assert!(!provider.validate("Platypet").await);
    assert_eq!(
        provider.sprite("MIMIT", &SpriteOptions::default()).await.unwrap().as_str(),
        "https://temtem.example/Mimit.png"
    );
    assert!(provider.sprite("Oree", &SpriteOptions::default()).await.is_none());
}

#[tokio::test]
async fn test_temtem_validate_is_repeatable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/temtems"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "number": 1, "name": "Mimit", "portraitWikiUrl": "https://temtem.example/Mimit.png" }
        ])))
        .expect(4)
        .mount(&server)
        .await;
    let provider = TemtemProvider::with_endpoints(reqwest::Client::new(), at(&server, "/api/temtems"));

    // No cache: every call re-fetches the list and reaches the same answer.
    let first = provider.validate("Mimit").await;
    assert_eq!(first, provider.validate("Mimit").await);
    assert!(first);
    let unknown = provider.validate("Platypet").await;
    assert_eq!(unknown, provider.validate("Platypet").await);
    assert!(!unknown);
}

// ── Coromon / Palworld ──────────────────────────────────────────────

#[tokio::test]
async fn test_coromon_thumb_resolves_under_cdn() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api.php"))
        .and(query_param("action", "parse"))
        .and(query_param("page", "Swurmy"))
        .and(query_param("prop", "properties|parsewarnings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(wiki_thumb("Swurmy_front.gif")))
        .mount(&server)
        .await;
    let provider = CoromonProvider::with_endpoints(
        reqwest::Client::new(),
        at(&server, "/api.php"),
        at(&server, "/images"),
    );

    assert!(provider.validate("Swurmy").await);
    let sprite = provider.sprite("Swurmy", &SpriteOptions::default()).await.unwrap();
    assert_eq!(sprite.as_str(), format!("{}/images/Swurmy_front.gif", server.uri()));
}

#[tokio::test]
async fn test_coromon_rejects_traversal_thumb() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(wiki_thumb("../x")))
        .mount(&server)
        .await;
    let provider = CoromonProvider::with_endpoints(
        reqwest::Client::new(),
        at(&server, "/api.php"),
        at(&server, "/images/"),
    );

    assert!(provider.sprite("Swurmy", &SpriteOptions::default()).await.is_none());
}

#[tokio::test]
async fn test_coromon_missing_page_is_invalid() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": { "code": "missingtitle", "info": "The page you specified doesn't exist." }
        })))
        .mount(&server)
        .await;
    let provider = CoromonProvider::with_endpoints(
        reqwest::Client::new(),
        at(&server, "/api.php"),
        at(&server, "/images/"),
    );

    assert!(!provider.validate("Nothing").await);
    assert!(provider.sprite("Nothing", &SpriteOptions::default()).await.is_none());
}

#[tokio::test]
async fn test_palworld_shares_thumbnail_rules() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api.php"))
        .and(query_param("page", "Lamball"))
        .respond_with(ResponseTemplate::new(200).set_body_json(wiki_thumb("Lamball_icon.png")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api.php"))
        .and(query_param("page", "Sneaky"))
        .respond_with(ResponseTemplate::new(200).set_body_json(wiki_thumb("a%2Fb.png")))
        .mount(&server)
        .await;
    let provider = PalworldProvider::with_endpoints(
        reqwest::Client::new(),
        at(&server, "/api.php"),
        at(&server, "/images/"),
    );

    assert_eq!(provider.mode(), "palworld");
    assert!(provider.validate("Lamball").await);
    assert!(
        provider
            .sprite("Lamball", &SpriteOptions::default())
            .await
            .unwrap()
            .as_str()
            .ends_with("/images/Lamball_icon.png")
    );
    assert!(provider.validate("Sneaky").await);
    assert!(provider.sprite("Sneaky", &SpriteOptions::default()).await.is_none());
}

// ── Kindred Fates ───────────────────────────────────────────────────

async fn mount_kinfolk(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api.php"))
        .and(query_param("action", "cargoquery"))
        .and(query_param("tables", "Kinfolk"))
        .and(query_param("where", "name=\"Bloomie\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cargoquery": [{ "title": {
                "imageNormal": "Bloomie.png",
                "imagePhantom": "Bloomie_Phantom.png",
                "imageVariant": "Bloomie_Variant.png"
            }}]
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api.php"))
        .and(query_param("action", "cargoquery"))
        .and(query_param("where", "name=\"Nobody\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "cargoquery": [] })))
        .mount(server)
        .await;
    for (file, url) in [
        ("File:Bloomie.png", "https://kf.example/Bloomie.png"),
        ("File:Bloomie_Phantom.png", "https://kf.example/Bloomie_Phantom.png"),
        ("File:Bloomie_Variant.png", "https://kf.example/Bloomie_Variant.png"),
    ] {
        Mock::given(method("GET"))
            .and(path("/api.php"))
            .and(query_param("action", "query"))
            .and(query_param("titles", file))
            .respond_with(ResponseTemplate::new(200).set_body_json(file_page(url)))
            .mount(server)
            .await;
    }
}

#[tokio::test]
async fn test_kindred_fates_phantom_is_shiny() {
    let server = MockServer::start().await;
    mount_kinfolk(&server).await;
    let provider = KindredFatesProvider::with_endpoints(reqwest::Client::new(), at(&server, "/api.php"));

    assert!(provider.supports_shiny());
    assert!(provider.validate("Bloomie").await);
    assert!(!provider.validate("Nobody").await);

    let normal = provider.sprite("Bloomie", &SpriteOptions::default()).await.unwrap();
    assert_eq!(normal.as_str(), "https://kf.example/Bloomie.png");
    let shiny = provider.sprite("Bloomie", &SpriteOptions::shiny(true)).await.unwrap();
    assert_eq!(shiny.as_str(), "https://kf.example/Bloomie_Phantom.png");
}

#[tokio::test]
async fn test_kindred_fates_quote_in_name_is_absent() {
    let server = MockServer::start().await;
    forbid_requests(&server).await;
    let provider = KindredFatesProvider::with_endpoints(reqwest::Client::new(), at(&server, "/api.php"));

    assert!(!provider.validate("x\" OR \"1\"=\"1").await);
    assert!(provider.sprite("a\"b", &SpriteOptions::default()).await.is_none());
}

// ── Cassette Beasts ─────────────────────────────────────────────────

#[tokio::test]
async fn test_cassette_beasts_exact_membership() {
    let server = MockServer::start().await;
    let species = json!([{ "name": "Bansheep" }, { "name": "Traffikrab" }]).to_string();
    Mock::given(method("GET"))
        .and(path("/api.php"))
        .and(query_param("page", "Data:Species"))
        .and(query_param("prop", "wikitext"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "parse": { "title": "Data:Species", "wikitext": species } })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api.php"))
        .and(query_param("titles", "File:Bansheep.png"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(file_page("https://cb.example/Bansheep.png")),
        )
        .mount(&server)
        .await;
    let provider =
        CassetteBeastsProvider::with_endpoints(reqwest::Client::new(), at(&server, "/api.php"));

    assert!(provider.validate("Bansheep").await);
    assert!(!provider.validate("bansheep").await);
    assert_eq!(
        provider.sprite("Bansheep", &SpriteOptions::default()).await.unwrap().as_str(),
        "https://cb.example/Bansheep.png"
    );
}

#[tokio::test]
async fn test_cassette_beasts_malformed_species_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api.php"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "parse": { "wikitext": "{{Species list}}" } })),
        )
        .mount(&server)
        .await;
    let provider =
        CassetteBeastsProvider::with_endpoints(reqwest::Client::new(), at(&server, "/api.php"));

    assert!(!provider.validate("Bansheep").await);
}

#[tokio::test]
async fn test_cassette_beasts_validate_is_repeatable() {
    let server = MockServer::start().await;
    let species = json!([{ "name": "Bansheep" }]).to_string();
    Mock::given(method("GET"))
        .and(path("/api.php"))
        .and(query_param("page", "Data:Species"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "parse": { "title": "Data:Species", "wikitext": species } })),
        )
        .expect(2)
        .mount(&server)
        .await;
    let provider =
        CassetteBeastsProvider::with_endpoints(reqwest::Client::new(), at(&server, "/api.php"));

    let first = provider.validate("Bansheep").await;
    let second = provider.validate("Bansheep").await;
    assert!(first);
    assert_eq!(first, second);
}
