//! Clap derive structures for the `panel` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// panel -- admin console from the command line
#[derive(Debug, Parser)]
#[command(
    name = "panel",
    version,
    about = "Manage your admin console from the command line",
    long_about = "Sign in to the admin console backend and list, create, update,\n\
        or delete funnels, products, campaigns, contacts, and workflows.\n\
        Analytics, subscriptions, and orders are available read-only.",
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
    /// Backend profile to use
    #[arg(long, short = 'p', env = "PANEL_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend base URL (overrides profile)
    #[arg(long, env = "PANEL_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Where the session token is kept (overrides profile)
    #[arg(long, env = "PANEL_CREDENTIAL_STORE", global = true, value_enum)]
    pub credential_store: Option<StoreBackend>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "PANEL_OUTPUT",
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
    #[arg(long, short = 'k', env = "PANEL_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (default: none)
    #[arg(long, env = "PANEL_TIMEOUT", global = true)]
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
    /// Plain text, one id per line (scripting)
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
pub enum StoreBackend {
    /// JSON file in the user data directory
    File,
    /// System keyring
    Keyring,
    /// Process memory (nothing persists)
    Memory,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in with a session token
    Login(LoginArgs),

    /// Sign out and forget the stored session
    Logout,

    /// Show the signed-in user
    #[command(alias = "status")]
    Whoami,

    /// Manage sales funnels
    #[command(alias = "f")]
    Funnels(WritableArgs),

    /// Manage products
    Products(WritableArgs),

    /// Manage email campaigns
    Campaigns(WritableArgs),

    /// Manage CRM contacts
    Contacts(WritableArgs),

    /// Manage automation workflows
    #[command(alias = "wf")]
    Workflows(WritableArgs),

    /// View analytics
    Analytics(AnalyticsArgs),

    /// View subscriptions
    Subscriptions(ReadOnlyArgs),

    /// View orders
    Orders(ReadOnlyArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SESSION
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Session token issued by the console (prompted if omitted)
    #[arg(long, env = "PANEL_SESSION_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  RESOURCES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct WritableArgs {
    #[command(subcommand)]
    pub command: WritableCommand,
}

#[derive(Debug, Subcommand)]
pub enum WritableCommand {
    /// List all records
    #[command(alias = "ls")]
    List,

    /// Create a record
    Create {
        #[command(flatten)]
        payload: PayloadArgs,
    },

    /// Update a record
    Update {
        /// Record id
        id: u64,

        #[command(flatten)]
        payload: PayloadArgs,
    },

    /// Delete a record
    #[command(alias = "rm")]
    Delete {
        /// Record id
        id: u64,
    },
}

/// JSON body for create/update.
#[derive(Debug, Args)]
pub struct PayloadArgs {
    /// Inline JSON object
    #[arg(long, short = 'd', required_unless_present = "from_file", conflicts_with = "from_file")]
    pub data: Option<String>,

    /// Read the JSON object from a file
    #[arg(long, short = 'F')]
    pub from_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ReadOnlyArgs {
    #[command(subcommand)]
    pub command: ReadOnlyCommand,
}

#[derive(Debug, Subcommand)]
pub enum ReadOnlyCommand {
    /// List all records
    #[command(alias = "ls")]
    List,
}

#[derive(Debug, Args)]
pub struct AnalyticsArgs {
    #[command(subcommand)]
    pub command: AnalyticsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AnalyticsCommand {
    /// List analytics data points
    #[command(alias = "ls")]
    List {
        /// Only data points for this funnel
        #[arg(long)]
        funnel: Option<u64>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

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

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
