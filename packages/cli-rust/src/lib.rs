//! nsai CLI - Provision and switch NStream AI clusters
//!
//! This module contains the CLI implementation used by the `nsai` binary.

mod commands;
mod output;
mod prompt;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use nsai_core::config::ConfigStore;
use nsai_core::remote::{DEFAULT_ENDPOINT, ENDPOINT_ENV, HttpControlPlane, TransportSettings};
use nsai_core::get_version;
use tracing_subscriber::EnvFilter;

use crate::commands::CommandEnv;
use crate::prompt::TermPrompter;

/// Provision and switch NStream AI clusters
#[derive(Parser)]
#[command(name = "nsai")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Provision and switch NStream AI clusters", long_about = None)]
#[command(after_help = get_banner())]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file to use instead of ~/.nstreamconfig
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Control plane endpoint
    #[arg(long, global = true, env = ENDPOINT_ENV, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Extra PEM root certificate to trust for the control plane
    #[arg(long, global = true, env = "NSAI_CA_CERT", value_name = "PATH")]
    ca_cert: Option<PathBuf>,

    /// Increase verbosity level
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in or create an account
    Auth(commands::AuthArgs),
    /// Create a cluster or bucket
    Create(commands::CreateArgs),
    /// Switch the current cluster or bucket
    #[command(name = "use")]
    Use(commands::UseArgs),
    /// Sign in if needed and set up a cluster
    Init(commands::InitArgs),
    /// List clusters or buckets
    Get(commands::GetArgs),
    /// Show the local config
    Config(commands::ConfigArgs),
}

/// Get the ASCII banner for help display
fn get_banner() -> &'static str {
    r#"
             _
  _ __  ___ | |_ _ __ ___  __ _ _ __ ___
 | '_ \/ __|| __| '__/ _ \/ _` | '_ ` _ \
 | | | \__ \| |_| | |  __/ (_| | | | | | |
 |_| |_|___/ \__|_|  \___|\__,_|_| |_| |_|
                                       ai
"#
}

/// Route tracing to stderr; `RUST_LOG` overrides the `-v` level
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Print a failed command's error, with a tip when one applies
pub fn report_error(err: &anyhow::Error) {
    eprintln!("{} {}", style("Error:").red().bold(), output::format_error(err));
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Configure color output
    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }
    init_tracing(cli.verbose);

    let Some(command) = cli.command else {
        println!("nsai {}", get_version());
        println!("Run '{}' for usage.", style("nsai --help").cyan());
        return Ok(());
    };

    let store = ConfigStore::locate(cli.config)?;
    if cli.verbose > 0 {
        eprintln!(
            "{} Config: {}",
            style("[info]").cyan(),
            store.path().display()
        );
    }

    if let Commands::Config(args) = &command {
        return commands::cmd_config(args, &store);
    }

    let settings = TransportSettings {
        endpoint: cli.endpoint,
        ca_cert: cli.ca_cert,
        ..TransportSettings::default()
    };
    let remote = HttpControlPlane::new(&settings).context("Failed to set up the HTTP client")?;
    let mut prompt = TermPrompter;
    let mut env = CommandEnv {
        remote: &remote,
        store: &store,
        prompt: &mut prompt,
        quiet: cli.quiet,
    };

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        match &command {
            Commands::Auth(args) => commands::cmd_auth(&mut env, args).await,
            Commands::Create(args) => commands::cmd_create(&mut env, args).await,
            Commands::Use(args) => commands::cmd_use(&mut env, args).await,
            Commands::Init(args) => commands::cmd_init(&mut env, args).await.map(|_| ()),
            Commands::Get(args) => commands::cmd_get(&mut env, args).await,
            Commands::Config(args) => commands::cmd_config(args, &store),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn use_is_a_top_level_verb() {
        let cli = Cli::try_parse_from(["nsai", "use", "cluster", "prod"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Use(_))));
    }

    #[test]
    fn endpoint_defaults_to_production() {
        let cli = Cli::try_parse_from(["nsai", "get", "cluster"]).unwrap();
        if std::env::var_os(ENDPOINT_ENV).is_none() {
            assert_eq!(cli.endpoint, DEFAULT_ENDPOINT);
        }
    }

    #[test]
    fn init_cluster_flags_require_create() {
        assert!(Cli::try_parse_from(["nsai", "init", "--cloud", "aws"]).is_err());
        assert!(Cli::try_parse_from(["nsai", "init", "--create-cluster", "--cloud", "aws"]).is_ok());
    }

    #[test]
    fn get_output_flag_is_global() {
        assert!(Cli::try_parse_from(["nsai", "get", "bucket", "-o", "json"]).is_ok());
    }
}
