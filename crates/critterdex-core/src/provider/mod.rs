//! The creature-provider capability and its seven franchise adapters.
//!
//! Every provider answers two questions about a name in its franchise's
//! namespace -- "does it exist?" and "where is its sprite?" -- and never
//! fails: blank input, network trouble, bad status codes and unexpected
//! payloads all come back as `false` / `None`.

mod cassette_beasts;
mod coromon;
mod digimon;
mod kindred_fates;
mod palworld;
mod pokemon;
mod temtem;
pub(crate) mod wiki;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

pub use cassette_beasts::CassetteBeastsProvider;
pub use coromon::CoromonProvider;
pub use digimon::DigimonProvider;
pub use kindred_fates::KindredFatesProvider;
pub use palworld::PalworldProvider;
pub use pokemon::PokemonProvider;
pub use temtem::TemtemProvider;

// ── Descriptor ──────────────────────────────────────────────────────

/// Identity and display data for one provider. `mode` is unique per registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    pub mode: String,
    pub label: String,
    pub enabled: bool,
}

impl ProviderDescriptor {
    pub fn new(mode: &str, label: &str) -> Self {
        Self {
            mode: mode.to_owned(),
            label: label.to_owned(),
            enabled: true,
        }
    }
}

// ── Options ─────────────────────────────────────────────────────────

/// Sprite lookup options. Unknown keys are ignored when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteOptions {
    /// Ask for alternate-palette art where the franchise has it.
    pub shiny: bool,
    /// Historical art revision. Accepted by every provider, applied by none.
    pub generation: String,
}

impl Default for SpriteOptions {
    fn default() -> Self {
        Self {
            shiny: false,
            generation: "default".into(),
        }
    }
}

impl SpriteOptions {
    pub fn shiny(shiny: bool) -> Self {
        Self {
            shiny,
            ..Self::default()
        }
    }
}

// ── Capability ──────────────────────────────────────────────────────

/// A creature franchise's lookup adapter.
#[async_trait]
pub trait CreatureProvider: Send + Sync {
    fn descriptor(&self) -> &ProviderDescriptor;

    /// Whether `SpriteOptions::shiny` changes the result for this provider.
    fn supports_shiny(&self) -> bool {
        false
    }

    /// Whether the control server honours `toggle_shiny` in this mode.
    ///
    /// The server only flips `shiny` for Pokémon, so other shiny-capable
    /// providers still hide the toggle.
    fn shiny_toggle(&self) -> bool {
        false
    }

    /// `true` iff `name` exists upstream. Never errors.
    async fn validate(&self, name: &str) -> bool;

    /// Sprite URL for `name`, always `http`/`https` when present. Never errors.
    async fn sprite(&self, name: &str, options: &SpriteOptions) -> Option<Url>;

    fn mode(&self) -> &str {
        &self.descriptor().mode
    }

    fn label(&self) -> &str {
        &self.descriptor().label
    }
}

// ── Shared helpers ──────────────────────────────────────────────────

/// Trim `name`, returning `None` for blank input so callers skip the network.
pub(crate) fn non_blank(name: &str) -> Option<&str> {
    let trimmed = name.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Collapse a lookup result into the provider's "absent" value, logging why.
pub(crate) fn or_absent<T: Default>(
    mode: &str,
    operation: &str,
    result: Result<T, critterdex_api::Error>,
) -> T {
    result.unwrap_or_else(|e| {
        tracing::debug!(mode, operation, error = %e, "lookup failed, treating as absent");
        T::default()
    })
}

/// Ensure `url` ends in `/` so `Url::join` appends below it.
pub(crate) fn as_directory(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Parse a built-in endpoint constant.
pub(crate) fn endpoint(raw: &str) -> Url {
    Url::parse(raw).unwrap_or_else(|e| unreachable!("built-in endpoint {raw}: {e}"))
}
