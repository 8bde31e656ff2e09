//! CLI command implementations
//!
//! Every workflow is generic over the control plane and the prompter, and
//! receives its options as an explicit args struct.

mod auth;
mod config;
mod context;
mod create;
mod get;
mod init;
mod verify;

#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use nsai_core::config::{ConfigStore, LocalConfig};
use nsai_core::remote::ControlPlane;
use nsai_core::session::authenticate;

use crate::output;
use crate::prompt::Prompter;

pub use auth::{AuthArgs, SigninArgs, SignupArgs, cmd_auth, cmd_signin, cmd_signup};
pub use config::{ConfigArgs, cmd_config};
pub use context::{UseArgs, UseClusterArgs, cmd_use, cmd_use_cluster};
pub use create::{CreateArgs, CreateClusterArgs, cmd_create, cmd_create_cluster};
pub use get::{GetArgs, cmd_get};
pub use init::{InitArgs, cmd_init};

/// What a single command invocation works against
pub struct CommandEnv<'a, C, P> {
    pub remote: &'a C,
    pub store: &'a ConfigStore,
    pub prompt: &'a mut P,
    pub quiet: bool,
}

impl<C: ControlPlane, P: Prompter> CommandEnv<'_, C, P> {
    /// Load the config and validate the session, warning if the cluster
    /// token had to be dropped
    pub async fn require_session(&self) -> Result<LocalConfig> {
        let (config, check) = authenticate(self.remote, self.store)
            .await
            .context("Please authenticate first")?;
        if let Some(reason) = check.cluster_token_cleared {
            output::warning(&format!(
                "Cluster token is no longer valid ({reason}); it was removed from your config. \
                 Run 'nsai use cluster' to select a cluster again."
            ));
        }
        Ok(config)
    }
}
