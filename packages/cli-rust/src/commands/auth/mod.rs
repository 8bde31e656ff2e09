//! Authentication subcommands
//!
//! Provides `nsai auth signin` and `nsai auth signup`. Both end with an OTP
//! exchange and write a fresh user identity to the config.

mod signin;
mod signup;

use anyhow::Result;
use clap::{Args, Subcommand};
use nsai_core::remote::ControlPlane;

use super::CommandEnv;
use crate::prompt::Prompter;

pub use signin::{SigninArgs, cmd_signin};
pub use signup::{SignupArgs, cmd_signup};

/// Authentication command arguments
#[derive(Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommands,
}

/// Authentication subcommands
#[derive(Subcommand)]
pub enum AuthCommands {
    /// Sign in with an emailed one-time password
    Signin(SigninArgs),
    /// Create an account
    Signup(SignupArgs),
}

pub async fn cmd_auth<C: ControlPlane, P: Prompter>(
    env: &mut CommandEnv<'_, C, P>,
    args: &AuthArgs,
) -> Result<()> {
    match &args.command {
        AuthCommands::Signin(signin_args) => cmd_signin(env, signin_args).await.map(|_| ()),
        AuthCommands::Signup(signup_args) => cmd_signup(env, signup_args).await.map(|_| ()),
    }
}
