// ── Control-server wire models ──
//
// Shapes exchanged with the overlay's control server: the `/update` action
// body, the `/stream` state snapshot, and the `/api/providers` map.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

// ── Outbound actions ────────────────────────────────────────────────

/// Body of `POST /update`.
///
/// Serializes as `{"action": "<snake_case name>", ...fields}`, e.g.
/// `{"action": "set_name", "name": "pikachu"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Display, IntoStaticStr)]
#[serde(tag = "action", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    Inc,
    Dec,
    Reset,
    ToggleShiny,
    ToggleCounter,
    SetName { name: String },
    SetMode { mode: String },
    SetGeneration { generation: String },
    SetScale { scale: f64 },
}

impl Action {
    /// The wire name of this action (`"inc"`, `"set_name"`, ...).
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

// ── Push snapshot ───────────────────────────────────────────────────

/// Full session snapshot broadcast on every server-side change.
///
/// Every push event carries the whole state, so consumers can re-render
/// from scratch and never need to merge events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
    pub mode: String,
    pub counter: i64,
    pub name: String,
    pub shiny: bool,
    pub generation: String,
    pub scale: f64,
    pub show_counter: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            mode: String::new(),
            counter: 0,
            name: String::new(),
            shiny: false,
            generation: "default".into(),
            scale: 1.0,
            show_counter: false,
        }
    }
}

// ── Provider configuration ──────────────────────────────────────────

/// Server-side settings for one mode in `GET/POST /api/providers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSetting {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ProviderSetting {
    pub fn new(enabled: bool, label: impl Into<String>) -> Self {
        Self {
            enabled,
            label: Some(label.into()),
        }
    }
}

/// `mode -> setting`, in the order the server lists them.
pub type ProviderConfig = IndexMap<String, ProviderSetting>;

/// Error body the server returns alongside a non-2xx status.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ServerErrorBody {
    #[serde(default)]
    #[allow(dead_code)]
    pub status: Option<String>,
    pub message: String,
}
