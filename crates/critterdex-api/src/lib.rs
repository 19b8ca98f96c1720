// critterdex-api: HTTP plumbing shared by providers and the control-server client

pub mod error;
pub mod fetch;
pub mod models;
pub mod server;
pub mod stream;
pub mod transport;

pub use error::Error;
pub use fetch::{fetch_json, fetch_status};
pub use models::{Action, ProviderConfig, ProviderSetting, SessionState};
pub use server::ServerClient;
pub use stream::{PushStream, ReconnectConfig};
pub use transport::TransportConfig;
