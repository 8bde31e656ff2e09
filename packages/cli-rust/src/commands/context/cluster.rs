//! nsai use cluster - Select the current cluster

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use nsai_core::config::ClusterContext;
use nsai_core::remote::ControlPlane;

use super::fetch_clusters;
use crate::commands::CommandEnv;
use crate::output::{self, spin};
use crate::prompt::Prompter;

/// Arguments for use cluster command
#[derive(Args, Debug, Default, Clone)]
pub struct UseClusterArgs {
    /// Cluster name (a menu is shown if omitted)
    pub name: Option<String>,
}

pub async fn cmd_use_cluster<C: ControlPlane, P: Prompter>(
    env: &mut CommandEnv<'_, C, P>,
    args: &UseClusterArgs,
) -> Result<ClusterContext> {
    let mut config = env.require_session().await?;
    let token = config.user.auth_token.clone();

    let name = match &args.name {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => {
            let current = config.cluster.as_ref().map(|c| c.name.clone());
            let clusters = fetch_clusters(env, &token, current.as_deref()).await?;
            let options: Vec<String> = clusters.iter().map(|c| c.id.clone()).collect();
            let index = env.prompt.choice("Clusters", &options)?;
            options[index].clone()
        }
    };

    let details = spin(
        "Fetching cluster details...",
        env.quiet,
        env.remote.get_cluster_details(&name, &token),
    )
    .await?;

    config.cluster = Some(details.clone());
    env.store.save(&config).context("Failed to save config")?;
    output::success(
        env.quiet,
        &format!("Switched to cluster {}", style(&details.name).cyan()),
    );
    Ok(details)
}
