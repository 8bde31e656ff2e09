//! Create subcommands
//!
//! Provides `nsai create cluster` and `nsai create bucket`, plus the provider
//! and region pickers they share.

mod bucket;
mod cluster;

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use nsai_core::CloudProvider;
use nsai_core::remote::ControlPlane;

use super::CommandEnv;
use crate::prompt::Prompter;

pub use bucket::{CreateBucketArgs, cmd_create_bucket};
pub use cluster::{CreateClusterArgs, cmd_create_cluster};

/// Create command arguments
#[derive(Args)]
pub struct CreateArgs {
    #[command(subcommand)]
    pub command: CreateCommands,
}

/// Create subcommands
#[derive(Subcommand)]
pub enum CreateCommands {
    /// Provision a new cluster and make it current
    Cluster(CreateClusterArgs),
    /// Create a bucket, or pick an existing one, for the current cluster
    Bucket(CreateBucketArgs),
}

pub async fn cmd_create<C: ControlPlane, P: Prompter>(
    env: &mut CommandEnv<'_, C, P>,
    args: &CreateArgs,
) -> Result<()> {
    match &args.command {
        CreateCommands::Cluster(cluster_args) => {
            cmd_create_cluster(env, cluster_args).await.map(|_| ())
        }
        CreateCommands::Bucket(bucket_args) => cmd_create_bucket(env, bucket_args).await.map(|_| ()),
    }
}

/// Provider from the flag, or a menu
pub(crate) fn pick_provider<P: Prompter>(
    prompt: &mut P,
    flag: Option<CloudProvider>,
) -> Result<CloudProvider> {
    if let Some(provider) = flag {
        return Ok(provider);
    }
    let options: Vec<String> = CloudProvider::ALL
        .iter()
        .map(|p| p.label().to_string())
        .collect();
    let index = prompt.choice("Cloud provider", &options)?;
    Ok(CloudProvider::ALL[index])
}

/// Region from the flag (checked against the provider), or a menu
pub(crate) fn pick_region<P: Prompter>(
    prompt: &mut P,
    provider: CloudProvider,
    flag: Option<&str>,
) -> Result<String> {
    let regions = provider.regions();
    if regions.is_empty() {
        bail!("no regions available for {provider}");
    }
    if let Some(region) = flag {
        if !provider.has_region(region) {
            bail!(
                "region '{region}' is not available on {provider} (choose one of: {})",
                regions.join(", ")
            );
        }
        return Ok(region.to_string());
    }
    let options: Vec<String> = regions.iter().map(|r| r.to_string()).collect();
    let index = prompt.choice(&format!("{} region", provider.label()), &options)?;
    Ok(provider.region_at(index + 1)?.to_string())
}
