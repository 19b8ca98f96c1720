//! Server-Sent Events push channel with auto-reconnect.
//!
//! Connects to the control server's `/stream` endpoint and broadcasts each
//! parsed [`SessionState`] snapshot through a [`tokio::sync::broadcast`]
//! channel. Reconnects with exponential backoff + jitter, the way a browser
//! `EventSource` would.
//!
//! # Example
//!
//! ```rust,ignore
//! use critterdex_api::{PushStream, ReconnectConfig, ServerClient};
//! use tokio_util::sync::CancellationToken;
//!
//! let cancel = CancellationToken::new();
//! let stream = PushStream::connect(http, server.stream_url()?, ReconnectConfig::default(), cancel.clone());
//! let mut rx = stream.subscribe();
//!
//! while let Ok(state) = rx.recv().await {
//!     println!("{} x{}", state.name, state.counter);
//! }
//!
//! stream.shutdown();
//! ```

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::ACCEPT;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::Error;
use crate::models::SessionState;

// ── Broadcast channel capacity ───────────────────────────────────────

const EVENT_CHANNEL_CAPACITY: usize = 256;

// ── ReconnectConfig ──────────────────────────────────────────────────

/// Exponential backoff configuration for push-stream reconnection.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Delay before the first reconnection attempt, and after a clean
    /// disconnect. Default: 1s.
    pub initial_delay: Duration,

    /// Upper bound on backoff delay. Default: 30s.
    pub max_delay: Duration,

    /// Maximum consecutive failed attempts before giving up.
    /// `None` means retry forever.
    pub max_retries: Option<u32>,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            max_retries: None,
        }
    }
}

// ── PushStream ───────────────────────────────────────────────────────

/// Handle to a running push-stream task.
pub struct PushStream {
    state_rx: broadcast::Receiver<Arc<SessionState>>,
    cancel: CancellationToken,
}

impl PushStream {
    /// Spawn the read/reconnect loop against `url`.
    ///
    /// Returns immediately; the first connection attempt happens in the
    /// background. Use [`into_receiver`](Self::into_receiver) to keep every
    /// snapshot since connect, or [`subscribe`](Self::subscribe) for
    /// additional consumers that only need snapshots from now on.
    pub fn connect(
        http: reqwest::Client,
        url: Url,
        reconnect: ReconnectConfig,
        cancel: CancellationToken,
    ) -> Self {
        let (state_tx, state_rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            stream_loop(http, url, state_tx, reconnect, task_cancel).await;
        });

        Self { state_rx, cancel }
    }

    /// Get a new receiver that sees snapshots broadcast from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<SessionState>> {
        self.state_rx.resubscribe()
    }

    /// Consume the handle, returning the receiver created at connect time.
    ///
    /// Cancellation still works through any clone of the token passed to
    /// [`connect`](Self::connect).
    pub fn into_receiver(self) -> broadcast::Receiver<Arc<SessionState>> {
        self.state_rx
    }

    /// Signal the background task to shut down.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

// ── Background reconnection loop ─────────────────────────────────────

async fn stream_loop(
    http: reqwest::Client,
    url: Url,
    state_tx: broadcast::Sender<Arc<SessionState>>,
    reconnect: ReconnectConfig,
    cancel: CancellationToken,
) {
    let mut attempt: u32 = 0;

    loop {
        let delay = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            result = connect_and_read(&http, &url, &state_tx, &cancel) => {
                match result {
                    Ok(()) => {
                        tracing::info!("Push stream disconnected, reconnecting");
                        attempt = 0;
                        reconnect.initial_delay
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, attempt, "Push stream error");

                        if reconnect.max_retries.is_some_and(|max| attempt >= max) {
                            tracing::error!("Push stream reconnection limit reached, giving up");
                            break;
                        }

                        let delay = calculate_backoff(attempt, &reconnect);
                        attempt = attempt.saturating_add(1);
                        delay
                    }
                }
            }
        };

        tracing::debug!(delay_ms = delay.as_millis(), "Waiting before reconnect");
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(delay) => {}
        }
    }

    tracing::debug!("Push stream loop exiting");
}

// ── Single connection lifecycle ──────────────────────────────────────

/// Open one SSE response and read frames until it ends or errors.
async fn connect_and_read(
    http: &reqwest::Client,
    url: &Url,
    state_tx: &broadcast::Sender<Arc<SessionState>>,
    cancel: &CancellationToken,
) -> Result<(), Error> {
    tracing::info!(url = %url, "Connecting to push stream");

    let resp = http
        .get(url.clone())
        .header(ACCEPT, "text/event-stream")
        .send()
        .await
        .map_err(|e| Error::Stream(e.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(Error::Stream(format!("HTTP {status}")));
    }

    tracing::info!("Push stream connected");

    let mut body = resp.bytes_stream();
    let mut decoder = SseDecoder::default();

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => return Ok(()),
            chunk = body.next() => match chunk {
                Some(Ok(bytes)) => {
                    for data in decoder.feed(&bytes) {
                        parse_and_broadcast(&data, state_tx);
                    }
                }
                Some(Err(e)) => return Err(Error::Stream(e.to_string())),
                None => return Ok(()),
            }
        }
    }
}

// ── SSE framing ──────────────────────────────────────────────────────

/// Incremental `text/event-stream` decoder.
///
/// Only `data:` fields matter to us; `event:`, `id:`, `retry:` and comment
/// lines are skipped. Multi-line data is joined with `\n`, as EventSource does.
#[derive(Debug, Default)]
struct SseDecoder {
    pending: Vec<u8>,
    data: Vec<String>,
}

impl SseDecoder {
    /// Feed raw bytes, returning the data payload of every completed event.
    fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);
        let mut events = Vec::new();

        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim_end_matches(['\n', '\r']);

            if line.is_empty() {
                if !self.data.is_empty() {
                    events.push(self.data.join("\n"));
                    self.data.clear();
                }
            } else if let Some(value) = line.strip_prefix("data:") {
                self.data
                    .push(value.strip_prefix(' ').unwrap_or(value).to_owned());
            }
        }

        events
    }
}

/// Parse one event payload and broadcast it; malformed payloads are skipped.
fn parse_and_broadcast(data: &str, state_tx: &broadcast::Sender<Arc<SessionState>>) {
    match serde_json::from_str::<SessionState>(data) {
        Ok(state) => {
            // Ignore send errors -- just means no active subscribers right now
            let _ = state_tx.send(Arc::new(state));
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to parse push event");
        }
    }
}

// ── Backoff calculation ──────────────────────────────────────────────

/// Exponential backoff with jitter.
///
/// `delay = min(initial * 2^attempt, max) * (1 ± 0.25)`
fn calculate_backoff(attempt: u32, config: &ReconnectConfig) -> Duration {
    let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
    let base = config.initial_delay.as_secs_f64() * 2.0_f64.powi(exponent);
    let capped = base.min(config.max_delay.as_secs_f64());

    // Deterministic jitter seeded from the attempt number.
    let jitter_factor = 1.0 + 0.25 * (f64::from(attempt) * 7.3).sin();
    Duration::from_secs_f64((capped * jitter_factor).max(0.0))
}

// ── Tests ────────────────────────────────────────────────────────────
