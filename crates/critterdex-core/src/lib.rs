// critterdex-core: creature providers, dispatch, provider sync and the operator session.

pub mod config;
pub mod error;
pub mod provider;
pub mod registry;
pub mod session;
pub mod sync;
pub mod validation;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ClientConfig, DEFAULT_MODE};
pub use error::CoreError;
pub use provider::{
    CassetteBeastsProvider, CoromonProvider, CreatureProvider, DigimonProvider,
    KindredFatesProvider, PalworldProvider, PokemonProvider, ProviderDescriptor, SpriteOptions,
    TemtemProvider,
};
pub use registry::ProviderRegistry;
pub use session::{Frame, NameSubmission, Session};
pub use sync::{Drift, ProviderSync, SyncOutcome};

// Wire types callers need alongside the core API.
pub use critterdex_api::{
    Action, ProviderConfig, ProviderSetting, PushStream, ReconnectConfig, SessionState,
    TransportConfig,
};
