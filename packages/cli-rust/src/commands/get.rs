//! Read-only listings
//!
//! Provides `nsai get cluster` and `nsai get bucket`. Both validate the
//! session first and never write the config, except for the cluster-token
//! cleanup that session validation itself may do.

use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use nsai_core::CloudProvider;
use nsai_core::remote::{Bucket, ClusterSummary, ControlPlane};

use super::CommandEnv;
use crate::output::{bucket_table, cluster_table, spin};
use crate::prompt::Prompter;

/// Listing format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Get command arguments
#[derive(Args)]
pub struct GetArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: GetCommands,
}

/// Get subcommands
#[derive(Subcommand)]
pub enum GetCommands {
    /// List clusters, or show one
    Cluster {
        /// Only this cluster
        #[arg(long)]
        name: Option<String>,
    },
    /// List buckets
    Bucket {
        /// Only this provider (defaults to the current cluster's, else all)
        #[arg(long, value_enum)]
        provider: Option<CloudProvider>,
    },
}

pub async fn cmd_get<C: ControlPlane, P: Prompter>(
    env: &mut CommandEnv<'_, C, P>,
    args: &GetArgs,
) -> Result<()> {
    match &args.command {
        GetCommands::Cluster { name } => {
            let clusters = get_clusters(env, name.as_deref()).await?;
            let current = env
                .store
                .load_optional()?
                .and_then(|c| c.cluster)
                .map(|c| c.name);
            render(args.output, &clusters, || {
                cluster_table(&clusters, current.as_deref()).to_string()
            })
        }
        GetCommands::Bucket { provider } => {
            let buckets = get_buckets(env, *provider).await?;
            render(args.output, &buckets, || bucket_table(&buckets).to_string())
        }
    }
}

fn render<T: serde::Serialize>(
    format: OutputFormat,
    items: &[T],
    table: impl FnOnce() -> String,
) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(items)?),
        OutputFormat::Table if items.is_empty() => println!("Nothing found."),
        OutputFormat::Table => println!("{}", table()),
    }
    Ok(())
}

pub async fn get_clusters<C: ControlPlane, P: Prompter>(
    env: &mut CommandEnv<'_, C, P>,
    name: Option<&str>,
) -> Result<Vec<ClusterSummary>> {
    let config = env.require_session().await?;
    let token = &config.user.auth_token;
    match name {
        Some(name) => {
            let details = spin(
                "Fetching cluster details...",
                env.quiet,
                env.remote.get_cluster_details(name, token),
            )
            .await?;
            Ok(vec![ClusterSummary::from(&details)])
        }
        None => Ok(spin(
            "Fetching clusters...",
            env.quiet,
            env.remote.list_clusters(token),
        )
        .await?),
    }
}

pub async fn get_buckets<C: ControlPlane, P: Prompter>(
    env: &mut CommandEnv<'_, C, P>,
    provider: Option<CloudProvider>,
) -> Result<Vec<Bucket>> {
    let config = env.require_session().await?;
    let providers: Vec<CloudProvider> = match (provider, &config.cluster) {
        (Some(provider), _) => vec![provider],
        (None, Some(cluster)) => vec![cluster.cloud_provider],
        (None, None) => CloudProvider::ALL.to_vec(),
    };

    let mut buckets = Vec::new();
    for provider in providers {
        let listed = spin(
            &format!("Fetching {} buckets...", provider.label()),
            env.quiet,
            env.remote.list_buckets(provider),
        )
        .await?;
        buckets.extend(listed);
    }
    Ok(buckets)
}
