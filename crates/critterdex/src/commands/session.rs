//! Overlay control handlers: actions, name, mode, generation, scale, names.

use critterdex_core::{Action, CoreError, NameSubmission, Session};

use crate::cli::{ActionKind, GlobalOpts};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::util;

impl From<ActionKind> for Action {
    fn from(kind: ActionKind) -> Self {
        match kind {
            ActionKind::Inc => Action::Inc,
            ActionKind::Dec => Action::Dec,
            ActionKind::Reset => Action::Reset,
            ActionKind::Shiny => Action::ToggleShiny,
            ActionKind::Counter => Action::ToggleCounter,
        }
    }
}

/// Send one action and wait for the server to accept it.
async fn send(session: &Session, action: Action, global: &GlobalOpts) -> Result<(), CliError> {
    session
        .server()
        .send_action(&action)
        .await
        .map_err(CoreError::from)?;
    if !global.quiet {
        eprintln!("Sent {}", action.name());
    }
    Ok(())
}

pub async fn action(
    settings: &Settings,
    kind: ActionKind,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let session = util::session(settings)?;
    send(&session, kind.into(), global).await
}

pub async fn name(settings: &Settings, name: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let mut session = util::session(settings)?;
    util::adopt_server_mode(&mut session, settings, global).await;
    match session.submit_name(name).await? {
        NameSubmission::Rejected => Err(CliError::NotFound {
            resource_type: format!("{} creature", session.current_mode()),
            identifier: name.into(),
            list_command: "names".into(),
        }),
        NameSubmission::Sent(handle) => {
            handle
                .await
                .map_err(|e| CliError::Internal(format!("set_name task failed: {e}")))?;
            if !global.quiet {
                eprintln!("Name set to {name}");
            }
            Ok(())
        }
    }
}

pub async fn mode(settings: &Settings, mode: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let mut session = util::session(settings)?;
    let names = session.select_mode(mode).await?;
    if !global.quiet {
        eprintln!("Mode set to {mode} ({} names available)", names.len());
    }
    Ok(())
}

pub async fn generation(
    settings: &Settings,
    generation: String,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if generation.trim().is_empty() {
        return Err(CliError::Validation {
            field: "generation".into(),
            reason: "must not be empty".into(),
        });
    }
    let session = util::session(settings)?;
    send(&session, Action::SetGeneration { generation }, global).await
}

pub async fn scale(settings: &Settings, scale: f64, global: &GlobalOpts) -> Result<(), CliError> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(CliError::Validation {
            field: "scale".into(),
            reason: format!("expected a positive number, got {scale}"),
        });
    }
    let session = util::session(settings)?;
    send(&session, Action::SetScale { scale }, global).await
}

pub async fn names(settings: &Settings, global: &GlobalOpts) -> Result<(), CliError> {
    let session = util::session(settings)?;
    let names = session.server().names().await.map_err(CoreError::from)?;
    let out = output::render_single(
        &global.output,
        &names,
        |n| n.join("\n"),
        |n| n.join("\n"),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
