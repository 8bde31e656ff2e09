//! nsai init - First-run setup
//!
//! Makes sure the user has a valid session, signing in or up if needed,
//! then leaves them with a current cluster, either newly created or picked
//! from the existing ones.

use anyhow::{Context, Result};
use clap::Args;
use nsai_core::config::ClusterContext;
use nsai_core::remote::ControlPlane;
use nsai_core::session::authenticate;
use nsai_core::{CloudProvider, ClusterType};
use tracing::debug;

use super::{
    CommandEnv, CreateClusterArgs, SigninArgs, SignupArgs, UseClusterArgs, cmd_create_cluster,
    cmd_signin, cmd_signup, cmd_use_cluster,
};
use crate::output;
use crate::prompt::Prompter;

/// Arguments for init command
#[derive(Args, Debug, Default, Clone)]
pub struct InitArgs {
    /// Create a new cluster instead of selecting one
    #[arg(long)]
    pub create_cluster: bool,

    /// Name of the cluster to create
    #[arg(long, requires = "create_cluster")]
    pub name: Option<String>,

    /// Tier of the cluster to create
    #[arg(long = "type", value_enum, requires = "create_cluster")]
    pub cluster_type: Option<ClusterType>,

    /// Cloud provider of the cluster to create
    #[arg(long, value_enum, requires = "create_cluster")]
    pub cloud: Option<CloudProvider>,

    /// Region of the cluster to create
    #[arg(long, requires = "create_cluster")]
    pub region: Option<String>,

    /// Bucket for the cluster to create
    #[arg(long, requires = "create_cluster")]
    pub bucket: Option<String>,

    /// Access role for the cluster to create
    #[arg(long, requires = "create_cluster")]
    pub role: Option<String>,

    /// Existing cluster to make current
    #[arg(long)]
    pub cluster: Option<String>,
}

impl InitArgs {
    fn create_args(&self) -> CreateClusterArgs {
        CreateClusterArgs {
            name: self.name.clone(),
            cluster_type: self.cluster_type,
            cloud: self.cloud,
            region: self.region.clone(),
            bucket: self.bucket.clone(),
            role: self.role.clone(),
        }
    }
}

const AUTH_OPTIONS: [&str; 2] = ["Sign in", "Sign up"];
const CLUSTER_OPTIONS: [&str; 2] = ["Create a new cluster", "Use an existing cluster"];

pub async fn cmd_init<C: ControlPlane, P: Prompter>(
    env: &mut CommandEnv<'_, C, P>,
    args: &InitArgs,
) -> Result<ClusterContext> {
    ensure_signed_in(env).await?;

    let create = if args.create_cluster {
        true
    } else if args.cluster.is_some() {
        false
    } else {
        let options: Vec<String> = CLUSTER_OPTIONS.iter().map(|s| s.to_string()).collect();
        env.prompt.choice("Cluster setup", &options)? == 0
    };

    if create {
        cmd_create_cluster(env, &args.create_args()).await
    } else {
        let use_args = UseClusterArgs {
            name: args.cluster.clone(),
        };
        cmd_use_cluster(env, &use_args).await
    }
}

/// Reuse a valid session, or run sign-in/sign-up in-process
///
/// Only a missing or rejected session leads to the menu. Transport and
/// config errors are returned as they are.
async fn ensure_signed_in<C: ControlPlane, P: Prompter>(
    env: &mut CommandEnv<'_, C, P>,
) -> Result<()> {
    match authenticate(env.remote, env.store).await {
        Ok((config, _)) => {
            debug!("Reusing session for {}", config.user.email);
            output::info(
                env.quiet,
                &format!("Already signed in as {}", config.user.email),
            );
            return Ok(());
        }
        Err(err) if err.is_unauthenticated() => debug!("No usable session: {err}"),
        Err(err) => return Err(err).context("Failed to check the existing session"),
    }

    let options: Vec<String> = AUTH_OPTIONS.iter().map(|s| s.to_string()).collect();
    match env.prompt.choice("You are not signed in", &options)? {
        0 => {
            let signin = SigninArgs {
                email: None,
                skip_cluster: true,
            };
            cmd_signin(env, &signin).await?;
        }
        _ => {
            cmd_signup(env, &SignupArgs::default()).await?;
        }
    }
    Ok(())
}
