//! Clap derive structures for the `critterdex` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// critterdex -- control panel for the creature overlay
#[derive(Debug, Parser)]
#[command(
    name = "critterdex",
    version,
    about = "Drive the creature overlay from the command line",
    long_about = "Look up creatures across seven franchises and control a running\n\
        overlay server: counter, creature name, mode, shiny toggle and scale.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Server profile to use
    #[arg(long, short = 'p', env = "CRITTERDEX_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Overlay server URL (overrides profile)
    #[arg(long, short = 's', env = "CRITTERDEX_SERVER", global = true)]
    pub server: Option<String>,

    /// Creature mode (pokemon, digimon, temtem, ...)
    #[arg(long, short = 'm', env = "CRITTERDEX_MODE", global = true)]
    pub mode: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "CRITTERDEX_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "CRITTERDEX_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List registered creature providers
    Modes,

    /// Check whether a creature exists in the current mode
    Validate {
        /// Creature name
        name: String,
    },

    /// Print the sprite URL for a creature
    Sprite(SpriteArgs),

    /// List Pokémon sprite generations for a creature
    Generations {
        /// Pokémon name
        name: String,
    },

    /// Inspect and reconcile the server's provider configuration
    #[command(alias = "prov")]
    Providers(ProvidersArgs),

    /// Send a counter or toggle action to the overlay
    Action {
        #[arg(value_enum)]
        kind: ActionKind,
    },

    /// Validate a creature name and show it on the overlay
    Name {
        /// Creature name
        name: String,
    },

    /// Switch the overlay to another mode and reset the counter
    #[command(name = "mode")]
    SetMode {
        /// Mode to switch to
        mode: String,
    },

    /// Set the sprite generation
    Generation {
        /// Generation key, e.g. generation-iv or default
        generation: String,
    },

    /// Set the sprite scale factor
    Scale {
        /// Positive scale factor, e.g. 1.5
        scale: f64,
    },

    /// List autocomplete names for the overlay's current mode
    Names,

    /// Follow the overlay's push stream and print each frame
    Watch(WatchArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Creature lookups ─────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SpriteArgs {
    /// Creature name
    pub name: String,

    /// Ask for the alternate palette where supported
    #[arg(long)]
    pub shiny: bool,

    /// Sprite generation
    #[arg(long, default_value = "default")]
    pub generation: String,
}

// ── Providers ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ProvidersArgs {
    #[command(subcommand)]
    pub command: ProvidersCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProvidersCommand {
    /// Show registered providers next to the server's settings
    #[command(alias = "ls")]
    List,

    /// List the modes the server lets operators pick
    Check,

    /// Add missing modes to the server and drop unknown ones
    Sync,

    /// Enable exactly the given modes on the server
    Save {
        /// Modes to enable (comma-separated)
        #[arg(long, value_delimiter = ',', required = true)]
        enable: Vec<String>,
    },
}

// ── Actions ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ActionKind {
    /// Increment the counter
    Inc,
    /// Decrement the counter
    Dec,
    /// Reset the counter to zero
    Reset,
    /// Toggle shiny art
    Shiny,
    /// Toggle counter visibility
    Counter,
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Stop after this many frames
    #[arg(long, short = 'n')]
    pub count: Option<usize>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
