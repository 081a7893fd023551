//! Command line interface.

pub mod commands;
pub mod render;
pub mod session;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "carddeskctl", version)]
#[command(
    about = "Card dispatch desk: scan bank cards into a batch and dispatch them with a messenger"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Path to carddesk.toml (also CARDDESK_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Alternate .env file to load before reading the environment
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    /// Backend base URL (overrides config)
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// Per-request timeout, e.g. "10s" (overrides config)
    #[arg(long, global = true, value_parser = humantime::parse_duration)]
    pub timeout: Option<Duration>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start an interactive dispatch session
    Dispatch(DispatchArgs),
    /// Manage messengers
    #[command(subcommand)]
    Messengers(MessengersCommand),
    /// List today's dispatches
    Today,
    /// List dispatches, optionally filtered
    Dispatches(DispatchesArgs),
    /// Show the daily report
    Report(DateArgs),
    /// Download the daily report as a spreadsheet
    Export(ExportArgs),
    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args, Debug, Clone, Default)]
pub struct DispatchArgs {
    /// Messenger id to preselect
    #[arg(long)]
    pub messenger: Option<String>,

    /// Line feed written by an external barcode recognizer (overrides config)
    #[arg(long)]
    pub camera_feed: Option<PathBuf>,

    /// Do not ring the terminal bell for accepted cards
    #[arg(long)]
    pub quiet: bool,
}

#[derive(Debug, Subcommand)]
pub enum MessengersCommand {
    /// List registered messengers
    List,
    /// Show one messenger
    Show { id: String },
    /// Register a messenger
    Add {
        /// Full name
        #[arg(long)]
        name: String,
        /// Contact phone number
        #[arg(long)]
        contact: String,
    },
    /// Delete a messenger
    Remove { id: String },
}

#[derive(Args, Debug, Clone, Default)]
pub struct DateArgs {
    /// Day to report on, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct DispatchesArgs {
    #[command(flatten)]
    pub date: DateArgs,

    /// Only dispatches of this messenger id
    #[arg(long)]
    pub messenger: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ExportArgs {
    #[command(flatten)]
    pub date: DateArgs,

    /// Output file (defaults to dispatch_report_<date>.xlsx)
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration as TOML
    Show,
}

pub use commands::run;
