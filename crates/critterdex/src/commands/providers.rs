//! Provider configuration handlers: list, check, sync, save.

use serde::Serialize;
use tabled::Tabled;

use critterdex_core::sync::derive_label;
use critterdex_core::{Drift, ProviderConfig, ProviderSync, SyncOutcome};

use crate::cli::{GlobalOpts, ProvidersArgs, ProvidersCommand};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

/// One mode as seen from both sides.
#[derive(Serialize)]
struct ProviderStatus {
    mode: String,
    label: String,
    registered: bool,
    on_server: bool,
    enabled: bool,
}

#[derive(Tabled)]
struct ProviderRow {
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Registered")]
    registered: String,
    #[tabled(rename = "On Server")]
    on_server: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
}

fn mark(flag: bool) -> String {
    if flag { "✓".into() } else { String::new() }
}

impl From<&ProviderStatus> for ProviderRow {
    fn from(s: &ProviderStatus) -> Self {
        Self {
            mode: s.mode.clone(),
            label: s.label.clone(),
            registered: mark(s.registered),
            on_server: mark(s.on_server),
            enabled: mark(s.enabled),
        }
    }
}

#[derive(Serialize)]
struct Selectable {
    mode: String,
    label: String,
}

#[derive(Tabled)]
struct SelectableRow {
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Label")]
    label: String,
}

/// Registry modes first, in registration order, then server-only modes.
fn statuses(sync: &ProviderSync<'_>, config: &ProviderConfig) -> Vec<ProviderStatus> {
    let mut rows: Vec<ProviderStatus> = sync
        .registry
        .descriptors()
        .map(|d| {
            let setting = config.get(&d.mode);
            ProviderStatus {
                mode: d.mode.clone(),
                label: setting
                    .and_then(|s| s.label.clone())
                    .unwrap_or_else(|| d.label.clone()),
                registered: true,
                on_server: setting.is_some(),
                enabled: setting.is_some_and(|s| s.enabled),
            }
        })
        .collect();

    rows.extend(
        config
            .iter()
            .filter(|(mode, _)| !sync.registry.contains(mode))
            .map(|(mode, setting)| ProviderStatus {
                mode: mode.clone(),
                label: setting.label.clone().unwrap_or_else(|| derive_label(mode)),
                registered: false,
                on_server: true,
                enabled: setting.enabled,
            }),
    );
    rows
}

fn print_config(config: &ProviderConfig, sync: &ProviderSync<'_>, global: &GlobalOpts) {
    let rows = statuses(sync, config);
    let out = output::render_list(
        &global.output,
        &rows,
        |s| ProviderRow::from(s),
        |s| s.mode.clone(),
    );
    output::print_output(&out, global.quiet);
}

fn describe(drift: &Drift) -> String {
    let join = |set: &std::collections::BTreeSet<String>| {
        if set.is_empty() {
            "none".to_owned()
        } else {
            set.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
        }
    };
    format!(
        "Server provider list differs (missing: {}; unknown: {}). Update the server?",
        join(&drift.missing),
        join(&drift.extra)
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    settings: &Settings,
    args: ProvidersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let session = util::session(settings)?;
    let sync = ProviderSync::new(session.server(), session.registry());

    match args.command {
        ProvidersCommand::List => {
            let config = sync.fetch_config().await?;
            print_config(&config, &sync, global);
            Ok(())
        }

        ProvidersCommand::Check => {
            let modes: Vec<Selectable> = sync
                .selectable_modes()
                .await?
                .into_iter()
                .map(|(mode, label)| Selectable { mode, label })
                .collect();
            let out = output::render_list(
                &global.output,
                &modes,
                |s| SelectableRow {
                    mode: s.mode.clone(),
                    label: s.label.clone(),
                },
                |s| s.mode.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProvidersCommand::Sync => {
            let mut prompt_failure = None;
            let outcome = sync
                .synchronize(|drift| {
                    match util::confirm("providers sync", &describe(drift), global.yes) {
                        Ok(answer) => answer,
                        Err(e) => {
                            prompt_failure = Some(e);
                            false
                        }
                    }
                })
                .await?;
            if let Some(e) = prompt_failure {
                return Err(e);
            }

            match outcome {
                SyncOutcome::InSync => {
                    if !global.quiet {
                        eprintln!("Server provider list is in sync");
                    }
                }
                SyncOutcome::Declined(_) => {
                    if !global.quiet {
                        eprintln!("Left server provider list unchanged");
                    }
                }
                SyncOutcome::Synchronized(config) => {
                    if !global.quiet {
                        eprintln!("Server provider list updated");
                    }
                    print_config(&config, &sync, global);
                }
            }
            Ok(())
        }

        ProvidersCommand::Save { enable } => {
            let config = sync.save_settings(&enable).await?;
            if !global.quiet {
                eprintln!("Provider settings saved");
            }
            print_config(&config, &sync, global);
            Ok(())
        }
    }
}
