//! Shared helpers for command handlers.

use std::io::IsTerminal;

use critterdex_core::{ProviderRegistry, Session};

use crate::cli::GlobalOpts;
use crate::config::Settings;
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Refuses to guess when stdin is not a terminal.
pub fn confirm(action: &str, message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// The built-in providers, configured from `settings`.
pub fn registry(settings: &Settings) -> Result<ProviderRegistry, CliError> {
    Ok(ProviderRegistry::builtin(&settings.transport())?)
}

/// A session against the configured overlay server.
pub fn session(settings: &Settings) -> Result<Session, CliError> {
    Ok(Session::connect(&settings.client_config()?)?)
}

/// Follow the overlay's live mode unless `--mode` pinned one.
///
/// Falls back to the configured mode when the push stream yields nothing.
pub async fn adopt_server_mode(session: &mut Session, settings: &Settings, global: &GlobalOpts) {
    if global.mode.is_some() {
        return;
    }
    if let Err(e) = session
        .current_state(&settings.transport(), settings.timeout)
        .await
    {
        tracing::warn!(
            error = %e,
            mode = session.current_mode(),
            "could not read the overlay's mode, using the configured one"
        );
    }
}
