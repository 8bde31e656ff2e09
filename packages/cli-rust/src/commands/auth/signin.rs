//! nsai auth signin - Sign in with an emailed OTP

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use nsai_core::config::{LocalConfig, UserIdentity};
use nsai_core::remote::ControlPlane;
use tracing::debug;

use crate::commands::CommandEnv;
use crate::output::{self, cluster_table, spin};
use crate::prompt::Prompter;

/// Arguments for auth signin command
#[derive(Args, Debug, Default, Clone)]
pub struct SigninArgs {
    /// Account email (prompted if omitted)
    #[arg(long)]
    pub email: Option<String>,

    /// Do not offer to select a cluster after signing in
    #[arg(long)]
    pub skip_cluster: bool,
}

/// Sign in and persist the new identity
///
/// Nothing is written until the OTP is verified and the optional cluster
/// selection has finished, so any failure leaves the previous config intact.
pub async fn cmd_signin<C: ControlPlane, P: Prompter>(
    env: &mut CommandEnv<'_, C, P>,
    args: &SigninArgs,
) -> Result<LocalConfig> {
    let email = match &args.email {
        Some(email) => email.trim().to_string(),
        None => env.prompt.required_line("Email")?,
    };

    spin("Requesting sign-in code...", env.quiet, async {
        env.remote.sign_in(&email).await?.into_result("sign-in")
    })
    .await?;
    output::info(env.quiet, &format!("A one-time password was sent to {email}"));

    let otp = env.prompt.required_line("One-time password")?;
    let session = spin("Verifying code...", env.quiet, env.remote.verify_sign_in(&email, &otp))
        .await?;
    debug!("Signed in as {email}");

    let mut config = LocalConfig::for_user(UserIdentity {
        email,
        org_name: session.user.organization,
        role: session.user.role,
        auth_token: session.auth_token,
    });

    if !args.skip_cluster {
        select_initial_cluster(env, &mut config).await?;
    }

    env.store.save(&config).context("Failed to save config")?;
    output::success(
        env.quiet,
        &format!("Signed in as {}", style(&config.user.email).cyan()),
    );
    Ok(config)
}

/// Offer the user's clusters and make the chosen one current
async fn select_initial_cluster<C: ControlPlane, P: Prompter>(
    env: &mut CommandEnv<'_, C, P>,
    config: &mut LocalConfig,
) -> Result<()> {
    let token = config.user.auth_token.clone();
    let clusters = spin("Fetching clusters...", env.quiet, env.remote.list_clusters(&token))
        .await?;
    if clusters.is_empty() {
        output::info(
            env.quiet,
            "No clusters yet. Create one with 'nsai create cluster'.",
        );
        return Ok(());
    }

    if !env.quiet {
        println!("{}", cluster_table(&clusters, None));
    }
    if !env.prompt.confirm("Select a cluster as your current context?", true)? {
        return Ok(());
    }

    let options: Vec<String> = clusters.iter().map(|c| c.id.clone()).collect();
    let index = env.prompt.choice("Clusters", &options)?;
    let name = &clusters[index].id;
    let details = spin(
        "Fetching cluster details...",
        env.quiet,
        env.remote.get_cluster_details(name, &token),
    )
    .await?;
    config.cluster = Some(details);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{EMAIL, TestBed, cluster, platform, user};
    use crate::prompt::ScriptedPrompter;
    use nsai_core::CloudProvider;
    use nsai_core::remote::RemoteError;

    #[tokio::test]
    async fn signin_without_clusters_persists_user_only() {
        let bed = TestBed::new(platform());
        let mut prompt = ScriptedPrompter::new([EMAIL, "000000"]);
        let config = cmd_signin(&mut bed.env(&mut prompt), &SigninArgs::default())
            .await
            .unwrap();

        assert_eq!(config.user.email, EMAIL);
        assert_eq!(config.user.auth_token, "tok1");
        assert!(config.cluster.is_none());
        assert_eq!(bed.config(), config);
    }

    #[tokio::test]
    async fn signin_can_select_a_cluster() {
        let platform = platform()
            .with_cluster(cluster("dev", CloudProvider::Gcp))
            .with_cluster(cluster("prod", CloudProvider::Aws));
        let bed = TestBed::new(platform);
        let mut prompt = ScriptedPrompter::new([EMAIL, "000000", "y", "2"]);
        cmd_signin(&mut bed.env(&mut prompt), &SigninArgs::default())
            .await
            .unwrap();

        let stored = bed.config().cluster.unwrap();
        assert_eq!(stored.name, "prod");
        assert_eq!(stored.cluster_token, "ctok-prod");
    }

    #[tokio::test]
    async fn declining_cluster_selection_keeps_context_empty() {
        let bed = TestBed::new(platform().with_cluster(cluster("prod", CloudProvider::Aws)));
        let mut prompt = ScriptedPrompter::new([EMAIL, "000000", "n"]);
        cmd_signin(&mut bed.env(&mut prompt), &SigninArgs::default())
            .await
            .unwrap();
        assert!(bed.config().cluster.is_none());
    }

    #[tokio::test]
    async fn wrong_otp_writes_nothing() {
        let bed = TestBed::new(platform());
        let mut prompt = ScriptedPrompter::new([EMAIL, "999999"]);
        let err = cmd_signin(&mut bed.env(&mut prompt), &SigninArgs::default())
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<RemoteError>().and_then(RemoteError::reason),
            Some("invalid OTP")
        );
        assert!(!bed.store.exists());
    }

    #[tokio::test]
    async fn unknown_email_aborts_before_otp_prompt() {
        let bed = TestBed::new(platform());
        let mut prompt = ScriptedPrompter::new(["nobody@b.com"]);
        let err = cmd_signin(&mut bed.env(&mut prompt), &SigninArgs::default())
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("no account found"));
        assert_eq!(prompt.asked, vec!["Email"]);
    }

    #[tokio::test]
    async fn invalid_cluster_choice_aborts_without_saving() {
        let bed = TestBed::new(platform().with_cluster(cluster("prod", CloudProvider::Aws)));
        let mut prompt = ScriptedPrompter::new([EMAIL, "000000", "y", "5"]);
        let err = cmd_signin(&mut bed.env(&mut prompt), &SigninArgs::default())
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<nsai_core::SelectionError>().is_some());
        assert!(!bed.store.exists());
    }

    #[tokio::test]
    async fn signin_overwrites_previous_identity() {
        let bed = TestBed::signed_in(platform(), Some(cluster("old", CloudProvider::Aws)));
        let mut prompt = ScriptedPrompter::new(["000000"]);
        let args = SigninArgs {
            email: Some(user().email),
            skip_cluster: true,
        };
        cmd_signin(&mut bed.env(&mut prompt), &args).await.unwrap();
        assert!(bed.config().cluster.is_none());
    }
}
