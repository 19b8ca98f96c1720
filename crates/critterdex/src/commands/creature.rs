//! Offline creature lookups: modes, validate, sprite, generations.
//!
//! These talk to the upstream franchise APIs only, never the overlay server.

use serde::Serialize;
use tabled::Tabled;
use url::Url;

use critterdex_core::{
    CoreError, CreatureProvider, PokemonProvider, ProviderDescriptor, SpriteOptions,
};

use crate::cli::{GlobalOpts, SpriteArgs};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Serialize)]
struct ModeInfo {
    mode: String,
    label: String,
    shiny: bool,
}

#[derive(Tabled)]
struct ModeRow {
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Shiny")]
    shiny: String,
}

impl From<&ModeInfo> for ModeRow {
    fn from(m: &ModeInfo) -> Self {
        Self {
            mode: m.mode.clone(),
            label: m.label.clone(),
            shiny: if m.shiny { "yes".into() } else { String::new() },
        }
    }
}

#[derive(Serialize)]
struct Validation<'a> {
    mode: &'a str,
    name: &'a str,
    valid: bool,
}

#[derive(Serialize)]
struct Sprite<'a> {
    mode: &'a str,
    name: &'a str,
    shiny: bool,
    url: Url,
}

// ── Handlers ────────────────────────────────────────────────────────

pub fn modes(settings: &Settings, global: &GlobalOpts) -> Result<(), CliError> {
    let registry = util::registry(settings)?;
    let infos: Vec<ModeInfo> = registry
        .descriptors()
        .map(|ProviderDescriptor { mode, label, .. }| ModeInfo {
            mode: mode.clone(),
            label: label.clone(),
            shiny: registry
                .resolve(mode)
                .is_ok_and(|p| p.supports_shiny()),
        })
        .collect();

    let out = output::render_list(
        &global.output,
        &infos,
        |m| ModeRow::from(m),
        |m| m.mode.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn validate(
    settings: &Settings,
    name: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let registry = util::registry(settings)?;
    let valid = registry.validate_name(&settings.mode, name).await?;

    let result = Validation {
        mode: &settings.mode,
        name,
        valid,
    };
    let out = output::render_single(
        &global.output,
        &result,
        |v| {
            let verdict = if v.valid { "valid" } else { "not found" };
            format!("{} ({}): {verdict}", v.name, v.mode)
        },
        |v| v.valid.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn sprite(
    settings: &Settings,
    args: SpriteArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let registry = util::registry(settings)?;
    let options = SpriteOptions {
        shiny: args.shiny,
        generation: args.generation,
    };
    let url = registry
        .load_sprite(&settings.mode, &args.name, &options)
        .await?
        .ok_or_else(|| CliError::NotFound {
            resource_type: "sprite".into(),
            identifier: args.name.clone(),
            list_command: format!("validate {} --mode {}", args.name, settings.mode),
        })?;

    let result = Sprite {
        mode: &settings.mode,
        name: &args.name,
        shiny: args.shiny,
        url,
    };
    let out = output::render_single(
        &global.output,
        &result,
        |s| s.url.to_string(),
        |s| s.url.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn generations(
    settings: &Settings,
    name: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let http = settings.transport().build_client().map_err(CoreError::from)?;
    let pokemon = PokemonProvider::with_client(http);
    let generations = pokemon.generations(name).await;
    if generations.is_empty() && !pokemon.validate(name).await {
        return Err(CliError::NotFound {
            resource_type: "Pokémon".into(),
            identifier: name.into(),
            list_command: "names --mode pokemon".into(),
        });
    }

    let out = output::render_single(
        &global.output,
        &generations,
        |g| g.join("\n"),
        |g| g.join("\n"),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
