#![allow(clippy::unwrap_used)]
// Integration tests for `Session`: outbound actions and frame rendering.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use critterdex_api::ServerClient;
use critterdex_core::{
    Action, CoreError, CreatureProvider, KindredFatesProvider, NameSubmission, PokemonProvider,
    ProviderRegistry, Session, SessionState, TransportConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

/// A session whose server and Pokémon upstream are both the mock server.
async fn setup() -> (MockServer, Session) {
    let server = MockServer::start().await;
    let base = Url::parse(&server.uri()).unwrap();
    let client = ServerClient::with_client(reqwest::Client::new(), base.clone());
    let pokemon = PokemonProvider::with_endpoints(
        reqwest::Client::new(),
        base.join("pokeapi/pokemon/").unwrap(),
        base.join("art/").unwrap(),
    );
    let providers: Vec<Box<dyn CreatureProvider>> = vec![Box::new(pokemon)];
    let registry = ProviderRegistry::from_providers(providers);
    let session = Session::new(Arc::new(client), Arc::new(registry), "pokemon");
    (server, session)
}

async fn mount_pikachu(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/pokeapi/pokemon/pikachu"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 25 })))
        .mount(server)
        .await;
}

async fn mount_names(server: &MockServer, names: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/names"))
        .respond_with(ResponseTemplate::new(200).set_body_json(names))
        .mount(server)
        .await;
}

fn expect_action(body: serde_json::Value, times: u64) -> Mock {
    Mock::given(method("POST"))
        .and(path("/update"))
        .and(body_json(body))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(times)
}

async fn mount_stream(server: &MockServer, snapshot: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/stream"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(format!("data: {snapshot}\n\n")),
        )
        .mount(server)
        .await;
}

// ── Outbound actions ────────────────────────────────────────────────

#[tokio::test]
async fn test_send_is_fire_and_forget() {
    let (server, session) = setup().await;
    expect_action(json!({ "action": "inc" }), 1).mount(&server).await;

    session.send(Action::Inc).await.unwrap();
}

#[tokio::test]
async fn test_send_failure_is_logged_not_raised() {
    let (server, session) = setup().await;
    Mock::given(method("POST"))
        .and(path("/update"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    // The task completes normally even though the server refused.
    session.send(Action::Reset).await.unwrap();
}

#[tokio::test]
async fn test_submit_valid_name_sends_set_name() {
    let (server, session) = setup().await;
    mount_pikachu(&server).await;
    expect_action(json!({ "action": "set_name", "name": "pikachu" }), 1)
        .mount(&server)
        .await;

    match session.submit_name("pikachu").await.unwrap() {
        NameSubmission::Sent(handle) => handle.await.unwrap(),
        NameSubmission::Rejected => panic!("pikachu was rejected"),
    }
}

#[tokio::test]
async fn test_submit_invalid_name_is_never_sent() {
    let (server, session) = setup().await;
    Mock::given(method("GET"))
        .and(path("/pokeapi/pokemon/notamon"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/update"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = session.submit_name("notamon").await.unwrap();
    assert!(matches!(outcome, NameSubmission::Rejected));
}

#[tokio::test]
async fn test_select_mode_sets_mode_then_resets() {
    let (server, mut session) = setup().await;
    expect_action(json!({ "action": "set_mode", "mode": "pokemon" }), 1)
        .mount(&server)
        .await;
    expect_action(json!({ "action": "reset" }), 1).mount(&server).await;
    mount_names(&server, json!(["bulbasaur", "pikachu"])).await;

    let names = session.select_mode("pokemon").await.unwrap();
    assert_eq!(names, ["bulbasaur", "pikachu"]);
    assert_eq!(session.current_mode(), "pokemon");

    let requests = server.received_requests().await.unwrap();
    let order: Vec<_> = requests
        .iter()
        .map(|r| format!("{} {}", r.method, r.url.path()))
        .collect();
    assert_eq!(order, ["POST /update", "GET /names", "POST /update"]);
}

#[tokio::test]
async fn test_select_unknown_mode_sends_nothing() {
    let (server, mut session) = setup().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = session.select_mode("yokai").await.unwrap_err();
    assert!(matches!(err, CoreError::UnknownMode { ref mode } if mode == "yokai"));
    assert_eq!(session.current_mode(), "pokemon");
}

// ── Server state ────────────────────────────────────────────────────

#[tokio::test]
async fn test_current_state_adopts_server_mode() {
    let (server, mut session) = setup().await;
    mount_stream(&server, json!({ "mode": "yokai", "name": "jibanyan", "counter": 2 })).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let state = session
        .current_state(&TransportConfig::default(), Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(state.counter, 2);
    assert_eq!(session.current_mode(), "yokai");

    // Names are now checked against the server's mode, not the initial one.
    let err = session.submit_name("pikachu").await.unwrap_err();
    assert!(matches!(err, CoreError::UnknownMode { ref mode } if mode == "yokai"));
}

#[tokio::test]
async fn test_current_state_keeps_mode_when_stream_fails() {
    let (server, mut session) = setup().await;
    Mock::given(method("GET"))
        .and(path("/stream"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = session
        .current_state(&TransportConfig::default(), Duration::from_secs(5))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::ServerUnavailable { .. }));
    assert_eq!(session.current_mode(), "pokemon");
}

// ── Rendering ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_render_builds_full_frame() {
    let (server, mut session) = setup().await;
    mount_pikachu(&server).await;
    mount_names(&server, json!(["pikachu", "raichu"])).await;

    let state = SessionState {
        mode: "pokemon".into(),
        counter: 7,
        name: "pikachu".into(),
        shiny: true,
        scale: 1.5,
        show_counter: true,
        ..SessionState::default()
    };
    let frame = session.render(&state).await;

    assert_eq!(frame.counter, 7);
    assert!(frame.counter_visible);
    assert_eq!(frame.shiny_label().as_deref(), Some("Toggle Shiny (On)"));
    assert_eq!(frame.names, ["pikachu", "raichu"]);
    assert_eq!(frame.sprite.unwrap().path(), "/art/shiny/25.png");
    assert!((frame.scale - 1.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_render_unknown_mode_has_no_sprite() {
    let (server, mut session) = setup().await;
    Mock::given(method("GET"))
        .and(path("/names"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let state = SessionState {
        mode: "yokai".into(),
        name: "jibanyan".into(),
        ..SessionState::default()
    };
    let frame = session.render(&state).await;

    assert_eq!(session.current_mode(), "yokai");
    assert!(frame.sprite.is_none());
    assert!(frame.shiny.is_none());
    assert!(frame.names.is_empty());
    assert!(!frame.counter_visible);
}

#[tokio::test]
async fn test_render_hides_toggle_the_server_ignores() {
    let server = MockServer::start().await;
    let base = Url::parse(&server.uri()).unwrap();
    let client = ServerClient::with_client(reqwest::Client::new(), base.clone());
    let kindred = KindredFatesProvider::with_endpoints(
        reqwest::Client::new(),
        base.join("kf/api.php").unwrap(),
    );
    let providers: Vec<Box<dyn CreatureProvider>> = vec![Box::new(kindred)];
    let registry = ProviderRegistry::from_providers(providers);
    let mut session = Session::new(Arc::new(client), Arc::new(registry), "kindredfates");
    mount_names(&server, json!([])).await;

    let state = SessionState {
        mode: "kindredfates".into(),
        shiny: true,
        ..SessionState::default()
    };
    let frame = session.render(&state).await;

    // Phantom art exists, but the server never flips `shiny` outside Pokémon.
    assert!(frame.shiny.is_none());
    assert!(frame.shiny_label().is_none());
}
