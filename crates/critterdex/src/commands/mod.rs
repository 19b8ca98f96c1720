//! Command dispatch: bridges CLI args -> core operations -> output formatting.

pub mod config_cmd;
pub mod creature;
pub mod providers;
pub mod session;
pub mod util;
pub mod watch;

use crate::cli::{Command, GlobalOpts};
use crate::config::Settings;
use crate::error::CliError;

/// Dispatch a command that needs resolved settings to its handler.
pub async fn dispatch(
    cmd: Command,
    settings: &Settings,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Modes => creature::modes(settings, global),
        Command::Validate { name } => creature::validate(settings, &name, global).await,
        Command::Sprite(args) => creature::sprite(settings, args, global).await,
        Command::Generations { name } => creature::generations(settings, &name, global).await,
        Command::Providers(args) => providers::handle(settings, args, global).await,
        Command::Action { kind } => session::action(settings, kind, global).await,
        Command::Name { name } => session::name(settings, &name, global).await,
        Command::SetMode { mode } => session::mode(settings, &mode, global).await,
        Command::Generation { generation } => {
            session::generation(settings, generation, global).await
        }
        Command::Scale { scale } => session::scale(settings, scale, global).await,
        Command::Names => session::names(settings, global).await,
        Command::Watch(args) => watch::handle(settings, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "config and completions are handled before dispatch".into(),
        )),
    }
}
