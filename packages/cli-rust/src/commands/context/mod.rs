//! Context switching subcommands
//!
//! Provides `nsai use cluster` and `nsai use bucket`, which change what the
//! config records as the current cluster and bucket.

mod bucket;
mod cluster;

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use nsai_core::remote::{ClusterSummary, ControlPlane};

use super::CommandEnv;
use crate::output::{cluster_table, spin};
use crate::prompt::Prompter;

pub use bucket::{UseBucketArgs, cmd_use_bucket};
pub use cluster::{UseClusterArgs, cmd_use_cluster};

/// Use command arguments
#[derive(Args)]
pub struct UseArgs {
    #[command(subcommand)]
    pub command: UseCommands,
}

/// Use subcommands
#[derive(Subcommand)]
pub enum UseCommands {
    /// Make a cluster the current context
    Cluster(UseClusterArgs),
    /// Point the current cluster at a bucket
    Bucket(UseBucketArgs),
}

pub async fn cmd_use<C: ControlPlane, P: Prompter>(
    env: &mut CommandEnv<'_, C, P>,
    args: &UseArgs,
) -> Result<()> {
    match &args.command {
        UseCommands::Cluster(cluster_args) => cmd_use_cluster(env, cluster_args).await.map(|_| ()),
        UseCommands::Bucket(bucket_args) => cmd_use_bucket(env, bucket_args).await.map(|_| ()),
    }
}

/// List the user's clusters, failing if there are none
async fn fetch_clusters<C: ControlPlane, P: Prompter>(
    env: &mut CommandEnv<'_, C, P>,
    token: &str,
    current: Option<&str>,
) -> Result<Vec<ClusterSummary>> {
    let clusters = spin("Fetching clusters...", env.quiet, env.remote.list_clusters(token))
        .await?;
    if clusters.is_empty() {
        bail!("no clusters available; create one with 'nsai create cluster'");
    }
    if !env.quiet {
        println!("{}", cluster_table(&clusters, current));
    }
    Ok(clusters)
}
