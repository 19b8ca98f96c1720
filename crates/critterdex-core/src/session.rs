// ── Operator session ──
//
// Client-side half of the overlay control panel. The server owns the
// session state; a `Session` only sends actions and turns each pushed
// snapshot into a `Frame` describing everything the panel shows.

use std::sync::Arc;
use std::time::Duration;

use critterdex_api::{
    Action, PushStream, ReconnectConfig, ServerClient, SessionState, TransportConfig,
};
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::provider::SpriteOptions;
use crate::registry::ProviderRegistry;

/// Everything the control panel displays for one snapshot.
///
/// Frames are complete: a later frame replaces an earlier one outright.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub mode: String,
    pub name: String,
    pub counter: i64,
    pub counter_visible: bool,
    /// Current shiny state, present only when the server honours the toggle
    /// in this mode.
    pub shiny: Option<bool>,
    pub generation: String,
    /// Autocomplete candidates for the name field.
    pub names: Vec<String>,
    pub sprite: Option<Url>,
    pub scale: f64,
}

impl Frame {
    /// Label for the shiny toggle, e.g. `Toggle Shiny (On)`.
    pub fn shiny_label(&self) -> Option<String> {
        self.shiny
            .map(|on| format!("Toggle Shiny ({})", if on { "On" } else { "Off" }))
    }
}

/// Outcome of [`Session::submit_name`].
#[derive(Debug)]
pub enum NameSubmission {
    /// The active provider does not know the name; nothing was sent.
    Rejected,
    /// `set_name` is in flight.
    Sent(JoinHandle<()>),
}

/// One operator's view of the control server.
#[derive(Debug, Clone)]
pub struct Session {
    server: Arc<ServerClient>,
    registry: Arc<ProviderRegistry>,
    current_mode: String,
}

impl Session {
    pub fn new(
        server: Arc<ServerClient>,
        registry: Arc<ProviderRegistry>,
        initial_mode: impl Into<String>,
    ) -> Self {
        Self {
            server,
            registry,
            current_mode: initial_mode.into(),
        }
    }

    /// Build the server client and the built-in registry from `config`.
    pub fn connect(config: &ClientConfig) -> Result<Self, CoreError> {
        let transport = config.transport();
        let server = ServerClient::new(config.server.clone(), &transport)?;
        let registry = ProviderRegistry::builtin(&transport)?;
        Ok(Self::new(
            Arc::new(server),
            Arc::new(registry),
            config.default_mode.clone(),
        ))
    }

    /// Subscribe to the server's push channel.
    pub fn watch(
        &self,
        transport: &TransportConfig,
        reconnect: ReconnectConfig,
        cancel: CancellationToken,
    ) -> Result<PushStream, CoreError> {
        let http = transport.build_streaming_client()?;
        let url = self.server.stream_url()?;
        Ok(PushStream::connect(http, url, reconnect, cancel))
    }

    /// Read the server's state from the first push snapshot and adopt its mode.
    ///
    /// The server sends its full state as soon as a stream opens, which is
    /// how a one-shot command learns the mode the overlay is actually in.
    /// Fails if no snapshot arrives within `wait`.
    pub async fn current_state(
        &mut self,
        transport: &TransportConfig,
        wait: Duration,
    ) -> Result<Arc<SessionState>, CoreError> {
        let url = self.server.stream_url()?;
        let cancel = CancellationToken::new();
        let reconnect = ReconnectConfig {
            max_retries: Some(0),
            ..ReconnectConfig::default()
        };
        let mut rx = self
            .watch(transport, reconnect, cancel.clone())?
            .into_receiver();

        let first = tokio::time::timeout(wait, rx.recv()).await;
        cancel.cancel();

        let state = match first {
            Ok(Ok(state)) => state,
            Ok(Err(e)) => {
                return Err(CoreError::ServerUnavailable {
                    url: url.to_string(),
                    reason: e.to_string(),
                });
            }
            Err(_) => {
                return Err(CoreError::ServerUnavailable {
                    url: url.to_string(),
                    reason: format!("no state received within {}s", wait.as_secs()),
                });
            }
        };

        if !state.mode.is_empty() {
            self.current_mode.clone_from(&state.mode);
        }
        Ok(state)
    }

    pub fn current_mode(&self) -> &str {
        &self.current_mode
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn server(&self) -> &ServerClient {
        &self.server
    }

    /// Fire-and-forget `POST /update`. Failures are logged, not returned.
    pub fn send(&self, action: Action) -> JoinHandle<()> {
        let server = Arc::clone(&self.server);
        tokio::spawn(async move {
            if let Err(e) = server.send_action(&action).await {
                tracing::warn!(action = action.name(), error = %e, "action failed");
            }
        })
    }

    /// Validate `name` against the current mode and send it only if it exists.
    pub async fn submit_name(&self, name: &str) -> Result<NameSubmission, CoreError> {
        if !self.registry.validate_name(&self.current_mode, name).await? {
            tracing::info!(mode = %self.current_mode, name, "name not recognised, not sending");
            return Ok(NameSubmission::Rejected);
        }
        Ok(NameSubmission::Sent(self.send(Action::SetName {
            name: name.to_owned(),
        })))
    }

    /// Switch the server to `mode`: `set_mode`, reload names, then `reset`.
    ///
    /// Returns the new mode's autocomplete names.
    pub async fn select_mode(&mut self, mode: &str) -> Result<Vec<String>, CoreError> {
        self.registry.resolve(mode)?;

        self.server
            .send_action(&Action::SetMode {
                mode: mode.to_owned(),
            })
            .await?;
        self.current_mode = mode.to_owned();

        let names = self.names().await;
        self.server.send_action(&Action::Reset).await?;
        Ok(names)
    }

    /// Autocomplete names from the server; empty if they cannot be fetched.
    pub async fn names(&self) -> Vec<String> {
        self.server.names().await.unwrap_or_else(|e| {
            tracing::debug!(error = %e, "could not load names");
            Vec::new()
        })
    }

    /// Adopt `state` and compute the full frame for it.
    pub async fn render(&mut self, state: &SessionState) -> Frame {
        self.current_mode.clone_from(&state.mode);

        let shiny = match self.registry.resolve(&state.mode) {
            Ok(provider) => provider.shiny_toggle().then_some(state.shiny),
            Err(_) => None,
        };

        let names = self.names().await;

        let options = SpriteOptions {
            shiny: state.shiny,
            generation: state.generation.clone(),
        };
        let sprite = match self
            .registry
            .load_sprite(&state.mode, &state.name, &options)
            .await
        {
            Ok(sprite) => sprite,
            Err(e) => {
                tracing::warn!(error = %e, "cannot load sprite");
                None
            }
        };

        Frame {
            mode: state.mode.clone(),
            name: state.name.clone(),
            counter: state.counter,
            counter_visible: state.show_counter,
            shiny,
            generation: state.generation.clone(),
            names,
            sprite,
            scale: state.scale,
        }
    }
}
