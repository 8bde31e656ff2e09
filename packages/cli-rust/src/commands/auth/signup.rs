//! nsai auth signup - Create an account

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use nsai_core::config::{LocalConfig, UserIdentity};
use nsai_core::remote::ControlPlane;
use tracing::debug;

use crate::commands::CommandEnv;
use crate::output::{self, spin};
use crate::prompt::Prompter;

/// Arguments for auth signup command
#[derive(Args, Debug, Default, Clone)]
pub struct SignupArgs {
    /// Account email
    #[arg(long)]
    pub email: Option<String>,

    /// Your full name
    #[arg(long)]
    pub name: Option<String>,

    /// Organization name
    #[arg(long)]
    pub org: Option<String>,

    /// Your role in the organization
    #[arg(long)]
    pub role: Option<String>,
}

fn arg_or_prompt<P: Prompter>(prompt: &mut P, value: &Option<String>, label: &str) -> Result<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => prompt.required_line(label),
    }
}

/// Register, verify the OTP, and persist the new identity with no cluster
pub async fn cmd_signup<C: ControlPlane, P: Prompter>(
    env: &mut CommandEnv<'_, C, P>,
    args: &SignupArgs,
) -> Result<LocalConfig> {
    let email = arg_or_prompt(&mut *env.prompt, &args.email, "Email")?;
    let name = arg_or_prompt(&mut *env.prompt, &args.name, "Full name")?;
    let org = arg_or_prompt(&mut *env.prompt, &args.org, "Organization")?;
    let role = arg_or_prompt(&mut *env.prompt, &args.role, "Role")?;

    spin("Creating account...", env.quiet, async {
        env.remote
            .sign_up(&email, &name, &org, &role)
            .await?
            .into_result("sign-up")
    })
    .await?;
    output::info(env.quiet, &format!("A one-time password was sent to {email}"));

    let otp = env.prompt.required_line("One-time password")?;
    let session = spin("Verifying code...", env.quiet, env.remote.verify_sign_up(&email, &otp))
        .await?;
    debug!("Signed up as {email}");

    // Prefer what the platform recorded over what was typed
    let org_name = if session.user.organization.is_empty() {
        org
    } else {
        session.user.organization
    };
    let role = if session.user.role.is_empty() {
        role
    } else {
        session.user.role
    };

    let config = LocalConfig::for_user(UserIdentity {
        email,
        org_name,
        role,
        auth_token: session.auth_token,
    });
    env.store.save(&config).context("Failed to save config")?;

    output::success(
        env.quiet,
        &format!(
            "Account created for {}. Next, run {}",
            style(&config.user.email).cyan(),
            style("nsai create cluster").cyan()
        ),
    );
    Ok(config)
}
