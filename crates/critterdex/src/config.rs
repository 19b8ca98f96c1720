//! CLI configuration -- thin wrapper around `critterdex_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--server, --mode, --timeout).

use std::time::Duration;

use url::Url;

use critterdex_core::{ClientConfig, TransportConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use critterdex_config::{Config, Profile, config_path, load_config_or_default, save_config};

// ── Resolved settings ───────────────────────────────────────────────

/// Flags, environment, profile and defaults folded into one view.
#[derive(Debug, Clone)]
pub struct Settings {
    pub profile_name: String,
    pub server: Option<Url>,
    pub timeout: Duration,
    pub mode: String,
}

impl Settings {
    pub fn transport(&self) -> TransportConfig {
        TransportConfig::default().with_timeout(self.timeout)
    }

    /// Connection settings for commands that talk to the overlay server.
    pub fn client_config(&self) -> Result<ClientConfig, CliError> {
        let server = self.server.clone().ok_or_else(|| CliError::NoConfig {
            path: config_path().display().to_string(),
        })?;
        Ok(ClientConfig {
            server,
            timeout: self.timeout,
            default_mode: self.mode.clone(),
        })
    }
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Fold flags over the active profile over the config defaults.
///
/// An explicitly requested `--profile` must exist; a missing default
/// profile just means there is nothing to fold in.
pub fn resolve_settings(global: &GlobalOpts, config: &Config) -> Result<Settings, CliError> {
    let profile_name = active_profile_name(global, config);
    let profile = match config.profile(global.profile.as_deref()) {
        Ok(found) => found.map(|(_, profile)| profile),
        Err(_) => {
            let mut available: Vec<_> = config.profiles.keys().cloned().collect();
            available.sort();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            });
        }
    };

    let server = match global
        .server
        .as_deref()
        .or(profile.map(|p| p.server.as_str()))
    {
        Some(raw) => Some(critterdex_config::parse_server_url("server", raw)?),
        None => None,
    };

    let timeout_secs = global
        .timeout
        .or(profile.and_then(|p| p.timeout))
        .unwrap_or(config.defaults.timeout);

    let mode = global
        .mode
        .clone()
        .or_else(|| profile.and_then(|p| p.mode.clone()))
        .unwrap_or_else(|| config.defaults.mode.clone());

    Ok(Settings {
        profile_name,
        server,
        timeout: Duration::from_secs(timeout_secs),
        mode,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["critterdex"];
        argv.extend_from_slice(args);
        argv.push("modes");
        Cli::parse_from(argv).global
    }

    fn config_with_profile() -> Config {
        let mut config = Config::default();
        config.profiles.insert(
            "default".into(),
            Profile {
                server: "http://overlay.local:5000".into(),
                timeout: Some(10),
                mode: Some("temtem".into()),
            },
        );
        config
    }

    #[test]
    fn profile_values_fill_gaps() {
        let settings = resolve_settings(&global(&[]), &config_with_profile()).unwrap();
        assert_eq!(settings.server.unwrap().as_str(), "http://overlay.local:5000/");
        assert_eq!(settings.timeout, Duration::from_secs(10));
        assert_eq!(settings.mode, "temtem");
    }

    #[test]
    fn flags_override_profile() {
        let args = ["--server", "https://stream.example", "--mode", "digimon", "--timeout", "3"];
        let settings = resolve_settings(&global(&args), &config_with_profile()).unwrap();
        assert_eq!(settings.server.unwrap().host_str(), Some("stream.example"));
        assert_eq!(settings.timeout, Duration::from_secs(3));
        assert_eq!(settings.mode, "digimon");
    }

    #[test]
    fn no_profile_no_server() {
        let settings = resolve_settings(&global(&[]), &Config::default()).unwrap();
        assert!(settings.server.is_none());
        assert_eq!(settings.mode, "pokemon");
        assert!(matches!(settings.client_config(), Err(CliError::NoConfig { .. })));
    }

    #[test]
    fn default_profile_names_the_active_profile() {
        let mut config = config_with_profile();
        config.default_profile = Some("studio".into());
        config.profiles.insert(
            "studio".into(),
            Profile {
                server: "http://studio.local:5000".into(),
                timeout: None,
                mode: Some("palworld".into()),
            },
        );

        let settings = resolve_settings(&global(&[]), &config).unwrap();
        assert_eq!(settings.profile_name, "studio");
        assert_eq!(settings.server.unwrap().host_str(), Some("studio.local"));
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert_eq!(settings.mode, "palworld");
    }

    #[test]
    fn explicit_missing_profile_is_an_error() {
        let err = resolve_settings(&global(&["--profile", "studio"]), &config_with_profile())
            .unwrap_err();
        assert!(matches!(err, CliError::ProfileNotFound { ref available, .. } if available == "default"));
    }
}
