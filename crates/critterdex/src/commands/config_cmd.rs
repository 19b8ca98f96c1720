//! Config subcommand handlers.

use dialoguer::{Input, Select};
use serde::Serialize;

use critterdex_core::{ProviderRegistry, TransportConfig};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

/// What `config show` prints: the file plus what the flags resolve to.
#[derive(Serialize)]
struct ShowView<'a> {
    path: String,
    active_profile: &'a str,
    server: Option<String>,
    timeout_secs: u64,
    mode: &'a str,
    config: &'a Config,
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("critterdex configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            // 1. Profile name
            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            // 2. Server URL
            let server: String = Input::new()
                .with_prompt("Overlay server URL")
                .default("http://localhost:5000".into())
                .validate_with(|raw: &String| {
                    critterdex_config::parse_server_url("server", raw)
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                })
                .interact_text()
                .map_err(prompt_err)?;

            // 3. Starting mode
            let registry = ProviderRegistry::builtin(&TransportConfig::default())?;
            let modes: Vec<&str> = registry.modes().collect();
            let labels: Vec<&str> = registry.descriptors().map(|d| d.label.as_str()).collect();
            let selection = Select::new()
                .with_prompt("Default mode")
                .items(&labels)
                .default(0)
                .interact()
                .map_err(prompt_err)?;
            let mode = modes.get(selection).map(|m| (*m).to_owned());

            // 4. Build and write
            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(
                profile_name.clone(),
                Profile {
                    server,
                    timeout: None,
                    mode,
                },
            );
            cfg.default_profile = Some(profile_name.clone());
            let written = config::save_config(&cfg)?;

            eprintln!("\nConfiguration written to {}", written.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: critterdex providers check");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let settings = config::resolve_settings(global, &cfg)?;
            let view = ShowView {
                path: config::config_path().display().to_string(),
                active_profile: &settings.profile_name,
                server: settings.server.as_ref().map(ToString::to_string),
                timeout_secs: settings.timeout.as_secs(),
                mode: &settings.mode,
                config: &cfg,
            };
            let out = output::render_single(
                &global.output,
                &view,
                |v| {
                    format!(
                        "path     {}\nprofile  {}\nserver   {}\ntimeout  {}s\nmode     {}",
                        v.path,
                        v.active_profile,
                        v.server.as_deref().unwrap_or("(not set)"),
                        v.timeout_secs,
                        v.mode
                    )
                },
                |v| v.active_profile.to_owned(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }
    }
}
