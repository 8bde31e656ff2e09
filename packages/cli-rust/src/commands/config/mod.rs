//! Config subcommand implementations
//!
//! Provides `nsai config show` for inspecting the local context.

mod show;

use anyhow::Result;
use clap::{Args, Subcommand};
use nsai_core::config::ConfigStore;

pub use show::cmd_config_show;

/// Configuration command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Output as JSON instead of table format
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Option<ConfigSubcommands>,
}

/// Configuration subcommands
#[derive(Subcommand)]
pub enum ConfigSubcommands {
    /// Show the current user and cluster context
    Show {
        /// Output as JSON instead of table format
        #[arg(long)]
        json: bool,
    },
}

/// Handle config command
///
/// If no subcommand is given, defaults to Show.
pub fn cmd_config(args: &ConfigArgs, store: &ConfigStore) -> Result<()> {
    match &args.command {
        Some(ConfigSubcommands::Show { json }) => cmd_config_show(store, *json || args.json),
        None => cmd_config_show(store, args.json),
    }
}
