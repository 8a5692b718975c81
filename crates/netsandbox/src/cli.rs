//! Clap derive structures for the `netsandbox` CLI.
//!
//! Kept free of engine types: `build.rs` includes this file directly to
//! render man pages, so only clap and clap_complete may appear here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-level CLI ───────────────────────────────────────────────────

/// netsandbox: simulate store networks from the command line
#[derive(Debug, Parser)]
#[command(
    name = "netsandbox",
    version,
    about = "Simulate, plan, and synthesize small-store networks",
    long_about = "Build store network sandboxes from endpoint counts or device lists,\n\
        then power devices, move cables, and join Wi-Fi to see how every\n\
        device's state changes.",
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

/// Global flags shared by every subcommand.
#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Store preset from the config file
    #[arg(long, short = 's', env = "NETSANDBOX_STORE", global = true)]
    pub store: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "NETSANDBOX_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color
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
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    JsonCompact,
    Yaml,
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

// ── Command tree ────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Size switches, outlets, and wireless gear for a store
    #[command(alias = "p")]
    Plan(PlanArgs),

    /// Synthesize a fully wired sandbox document
    #[command(alias = "b")]
    Build(BuildArgs),

    /// Load a document, recompute every device state, and print it
    #[command(alias = "sim")]
    Simulate(SimulateArgs),

    /// Inspect and control devices in a document
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Plug and unplug cables
    Ports(PortsArgs),

    /// Wireless client and access point settings
    #[command(alias = "w")]
    Wifi(WifiArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared arguments ────────────────────────────────────────────────

/// Endpoint counts for the capacity planner. Unset counts fall back to the
/// selected store preset, then to zero.
#[derive(Debug, Default, Args)]
pub struct CountArgs {
    /// POS terminals
    #[arg(long)]
    pub pos: Option<u32>,

    /// Receipt printers
    #[arg(long)]
    pub printers: Option<u32>,

    /// Kitchen display screens
    #[arg(long)]
    pub kds: Option<u32>,

    /// Wireless handhelds
    #[arg(long)]
    pub handhelds: Option<u32>,
}

/// A sandbox document and where to write it after a change.
#[derive(Debug, Args)]
pub struct DocumentArgs {
    /// Sandbox document (.json, .yaml, or .yml)
    #[arg(value_name = "DOCUMENT")]
    pub document: PathBuf,

    /// Write the result here instead of rewriting DOCUMENT
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

// ── Plan ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub counts: CountArgs,
}

// ── Build ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Build request file (JSON or YAML) listing role-tagged devices
    #[arg(
        long,
        short = 'f',
        value_name = "PATH",
        conflicts_with_all = ["pos", "printers", "kds", "handhelds"]
    )]
    pub from_file: Option<PathBuf>,

    #[command(flatten)]
    pub counts: CountArgs,

    /// Router model (router, router_pro, wifi_router)
    #[arg(long)]
    pub router: Option<String>,

    /// SSID hosted by generated access points
    #[arg(long)]
    pub ssid: Option<String>,

    /// Password for --ssid
    #[arg(long, requires = "ssid")]
    pub password: Option<String>,

    /// Write the document here (format follows the extension)
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

// ── Simulate ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// Sandbox document (.json, .yaml, or .yml)
    #[arg(value_name = "DOCUMENT")]
    pub document: PathBuf,

    /// Write the recomputed document to PATH
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Rewrite DOCUMENT with the recomputed states
    #[arg(long, conflicts_with = "out")]
    pub write: bool,
}

// ── Devices ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List devices with their simulated state
    #[command(alias = "ls")]
    List {
        /// Sandbox document
        document: PathBuf,

        /// Only devices in this room
        #[arg(long)]
        room: Option<String>,

        /// Only devices of this type
        #[arg(long = "type", value_name = "TYPE")]
        device_type: Option<String>,
    },

    /// Show one device and its ports
    Get {
        /// Sandbox document
        document: PathBuf,

        /// Device id or name
        device: String,
    },

    /// Add an unwired device
    Add {
        #[command(flatten)]
        doc: DocumentArgs,

        /// Device type (e.g. pos_terminal, poe_switch)
        #[arg(long = "type", value_name = "TYPE")]
        device_type: String,

        /// Display name
        #[arg(long)]
        name: String,

        /// Stable id (a UUID is generated when omitted)
        #[arg(long)]
        id: Option<String>,

        /// Room the device is placed in
        #[arg(long)]
        room: Option<String>,
    },

    /// Remove a device and unplug its cables
    #[command(alias = "rm")]
    Remove {
        #[command(flatten)]
        doc: DocumentArgs,

        /// Device id or name
        device: String,
    },

    /// Power a device on, off, or cycle it
    Power {
        #[command(flatten)]
        doc: DocumentArgs,

        /// Device id or name
        device: String,

        /// Power action
        action: PowerArg,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PowerArg {
    On,
    Off,
    Cycle,
}

// ── Ports ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PortsArgs {
    #[command(subcommand)]
    pub command: PortsCommand,
}

#[derive(Debug, Subcommand)]
pub enum PortsCommand {
    /// Run a cable between two ports
    Connect {
        #[command(flatten)]
        doc: DocumentArgs,

        /// First port as DEVICE/PORT (e.g. sw-1/port-1)
        a: String,

        /// Second port as DEVICE/PORT
        b: String,
    },

    /// Unplug the cable at a port
    Disconnect {
        #[command(flatten)]
        doc: DocumentArgs,

        /// Port as DEVICE/PORT
        port: String,
    },
}

// ── Wifi ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WifiArgs {
    #[command(subcommand)]
    pub command: WifiCommand,
}

#[derive(Debug, Subcommand)]
pub enum WifiCommand {
    /// Set the network a wireless client tries to join
    Join {
        #[command(flatten)]
        doc: DocumentArgs,

        /// Client device id or name
        device: String,

        /// Network name; omit together with --clear to stop joining
        #[arg(long, required_unless_present = "clear")]
        ssid: Option<String>,

        /// Network password
        #[arg(long, default_value = "")]
        password: String,

        /// Forget the configured network
        #[arg(long, conflicts_with = "ssid")]
        clear: bool,
    },

    /// Replace the networks an access point or wifi router broadcasts
    Host {
        #[command(flatten)]
        doc: DocumentArgs,

        /// Host device id or name
        device: String,

        /// Network as SSID or SSID:PASSWORD (repeatable; none stops broadcasting)
        #[arg(long = "network", short = 'n', value_name = "SSID[:PASSWORD]")]
        networks: Vec<String>,
    },
}

// ── Config ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create a config file with a first store preset
    Init,

    /// Display the resolved configuration
    Show,

    /// Print the config file location
    Path,
}

// ── Completions ─────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
