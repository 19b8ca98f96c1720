// ── Provider registry and dispatch ──
//
// A fixed, ordered `mode -> provider` map. Every lookup the UI makes goes
// through `resolve`, so an unknown mode is reported exactly once, here.

use std::fmt;

use critterdex_api::TransportConfig;
use indexmap::IndexMap;
use url::Url;

use crate::error::CoreError;
use crate::provider::{
    CassetteBeastsProvider, CoromonProvider, CreatureProvider, DigimonProvider,
    KindredFatesProvider, PalworldProvider, PokemonProvider, ProviderDescriptor, SpriteOptions,
    TemtemProvider,
};

/// Registered providers, keyed by mode, in registration order.
pub struct ProviderRegistry {
    providers: IndexMap<String, Box<dyn CreatureProvider>>,
}

impl ProviderRegistry {
    /// The seven built-in providers, sharing one HTTP client.
    pub fn builtin(transport: &TransportConfig) -> Result<Self, CoreError> {
        let http = transport.build_client()?;
        let providers: Vec<Box<dyn CreatureProvider>> = vec![
            Box::new(PokemonProvider::with_client(http.clone())),
            Box::new(DigimonProvider::with_client(http.clone())),
            Box::new(TemtemProvider::with_client(http.clone())),
            Box::new(CoromonProvider::with_client(http.clone())),
            Box::new(KindredFatesProvider::with_client(http.clone())),
            Box::new(PalworldProvider::with_client(http.clone())),
            Box::new(CassetteBeastsProvider::with_client(http)),
        ];
        Ok(Self::from_providers(providers))
    }

    /// Build a registry from arbitrary providers.
    ///
    /// A later provider with an already-registered mode replaces the earlier
    /// one in place.
    pub fn from_providers<I>(providers: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn CreatureProvider>>,
    {
        let providers = providers
            .into_iter()
            .map(|p| (p.mode().to_owned(), p))
            .collect();
        Self { providers }
    }

    /// Look up the provider for `mode`.
    pub fn resolve(&self, mode: &str) -> Result<&dyn CreatureProvider, CoreError> {
        self.providers
            .get(mode)
            .map(AsRef::as_ref)
            .ok_or_else(|| CoreError::UnknownMode {
                mode: mode.to_owned(),
            })
    }

    /// Ask the provider for `mode` whether `name` exists.
    pub async fn validate_name(&self, mode: &str, name: &str) -> Result<bool, CoreError> {
        let provider = self.resolve(mode)?;
        Ok(provider.validate(name).await)
    }

    /// Ask the provider for `mode` for the sprite of `name`.
    pub async fn load_sprite(
        &self,
        mode: &str,
        name: &str,
        options: &SpriteOptions,
    ) -> Result<Option<Url>, CoreError> {
        let provider = self.resolve(mode)?;
        Ok(provider.sprite(name, options).await)
    }

    pub fn modes(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &ProviderDescriptor> {
        self.providers.values().map(|p| p.descriptor())
    }

    pub fn contains(&self, mode: &str) -> bool {
        self.providers.contains_key(mode)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("modes", &self.providers.keys().collect::<Vec<_>>())
            .finish()
    }
}
