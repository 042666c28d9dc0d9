//! Clap derive structures for the `fortiform` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// fortiform -- declarative FortiOS configuration objects
#[derive(Debug, Parser)]
#[command(
    name = "fortiform",
    version,
    about = "Manage FortiOS configuration objects declaratively",
    long_about = "Read, import, plan and apply FortiGate configuration objects\n\
        (firewall addresses, RADIUS servers, IPsec phase 2 selectors, static routes)\n\
        through the FortiOS REST API.",
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
    /// Appliance profile to use
    #[arg(long, short = 'p', env = "FORTIFORM_PROFILE", global = true)]
    pub profile: Option<String>,

    /// FortiGate address (overrides profile)
    #[arg(long, short = 'H', env = "FORTIOS_ACCESS_HOSTNAME", global = true)]
    pub host: Option<String>,

    /// REST API token
    #[arg(long, env = "FORTIOS_ACCESS_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Virtual domain (overrides profile)
    #[arg(long, env = "FORTIOS_VDOM", global = true)]
    pub vdom: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "FORTIFORM_OUTPUT",
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

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "FORTIOS_INSECURE", global = true)]
    pub insecure: bool,

    /// PEM CA bundle for TLS verification
    #[arg(long, env = "FORTIOS_CA_CABUNDLE", global = true)]
    pub ca_cert: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, env = "FORTIFORM_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Subtable ordering in state
    #[arg(long, env = "FORTIFORM_SORT_SUBTABLE", global = true)]
    pub sort_subtable: Option<SortArg>,
}

// ── Value Enums ──────────────────────────────────────────────────────

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

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    /// Keep the appliance's order, aligned with prior state
    False,
    /// Lexicographic by entry key
    True,
    /// Digit runs compared numerically (port2 before port10)
    Natural,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Inspect supported resource types
    #[command(alias = "res")]
    Resources(ResourcesArgs),

    /// Read one object into resource state
    Get(ObjectArgs),

    /// List every object of a resource type
    #[command(alias = "ls")]
    List(ListArgs),

    /// Import an existing object as resource state
    Import(ObjectArgs),

    /// Show what apply would change
    Plan(FileArgs),

    /// Create or update an object from a JSON attribute file
    Apply(FileArgs),

    /// Delete an object
    #[command(alias = "rm")]
    Delete(TargetArgs),

    /// Reset every writable field of an object to its default
    Reset(TargetArgs),

    /// Show appliance identity and firmware version
    Status,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Resource Arguments ───────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ResourcesArgs {
    #[command(subcommand)]
    pub command: ResourcesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ResourcesCommand {
    /// List resource types
    #[command(alias = "ls")]
    List,

    /// Show the attribute schema of a resource type
    Schema {
        /// Resource type (e.g. fortios_firewall_address or firewall_address)
        resource_type: String,
    },
}

/// A resource type and object key.
#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Resource type (e.g. fortios_firewall_address or firewall_address)
    pub resource_type: String,

    /// Object key (name, or sequence number for router_static)
    pub mkey: String,
}

#[derive(Debug, Args)]
pub struct ObjectArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Populate every subtable, not only those already tracked
    #[arg(long)]
    pub all_tables: bool,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Resource type (e.g. fortios_firewall_address or firewall_address)
    pub resource_type: String,

    /// Populate subtables
    #[arg(long)]
    pub all_tables: bool,
}

#[derive(Debug, Args)]
pub struct FileArgs {
    /// Resource type (e.g. fortios_firewall_address or firewall_address)
    pub resource_type: String,

    /// JSON file with the desired attributes (`-` for stdin)
    #[arg(long, short = 'f')]
    pub from_file: PathBuf,
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

    /// Display current configuration (secrets masked)
    Show,

    /// Set a profile value
    Set {
        /// Profile key (host, vdom, token_env, ca_cert, insecure, timeout, retries, sort_subtable, import_table)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store an API token in the system keyring
    SetToken {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
