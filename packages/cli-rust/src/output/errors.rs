//! Centralized error formatting
//!
//! Turns the typed errors raised by workflows into a message plus, where
//! there is an obvious next step, a `Tip:` line naming the command to run.

use console::style;
use nsai_core::config::ConfigError;
use nsai_core::remote::RemoteError;
use nsai_core::selection::SelectionError;
use nsai_core::session::SessionError;

/// Next step for a failed command, if there is an obvious one
pub fn tip_for(err: &anyhow::Error) -> Option<String> {
    for cause in err.chain() {
        if let Some(remote) = cause.downcast_ref::<RemoteError>() {
            return remote_tip(remote);
        }
        match cause.downcast_ref::<SessionError>() {
            Some(SessionError::Remote(remote)) => return remote_tip(remote),
            Some(SessionError::Config(config)) => return config_tip(config),
            None => {}
        }
        if let Some(config) = cause.downcast_ref::<ConfigError>() {
            return config_tip(config);
        }
        if cause.downcast_ref::<SelectionError>().is_some() {
            return Some("Re-run the command and pick one of the listed numbers".to_string());
        }
    }
    None
}

fn remote_tip(err: &RemoteError) -> Option<String> {
    match err {
        RemoteError::Unauthenticated(_) => {
            Some(format!("Run {} to authenticate", style("nsai auth signin").cyan()))
        }
        RemoteError::Transport(_) => Some(format!(
            "Check your network connection, or point {} at a reachable control plane",
            style("--endpoint").cyan()
        )),
        RemoteError::ValidationFailed { .. } | RemoteError::Protocol(_) => None,
    }
}

fn config_tip(err: &ConfigError) -> Option<String> {
    match err {
        ConfigError::NotFound(_) => {
            Some(format!("Run {} to get started", style("nsai init").cyan()))
        }
        ConfigError::Decode { path, .. } => Some(format!(
            "Remove {} and sign in again with {}",
            path.display(),
            style("nsai auth signin").cyan()
        )),
        ConfigError::NoClusterContext => Some(format!(
            "Select a cluster with {} or create one with {}",
            style("nsai use cluster").cyan(),
            style("nsai create cluster").cyan()
        )),
        ConfigError::ProviderMismatch {
            cluster_provider, ..
        } => Some(format!(
            "Pick a bucket on {cluster_provider}, or create one with {}",
            style("nsai create bucket").cyan()
        )),
        ConfigError::NoHomeDirectory => Some(format!(
            "Pass {} or set NSAI_CONFIG",
            style("--config <PATH>").cyan()
        )),
        ConfigError::Encode(_) | ConfigError::Io(_) => None,
    }
}

/// Full error text for stderr: the error chain, then an optional tip
pub fn format_error(err: &anyhow::Error) -> String {
    let mut msg = format!("{err:#}");
    if let Some(tip) = tip_for(err) {
        msg.push_str(&format!("\n\n{} {tip}", style("Tip:").yellow()));
    }
    msg
}
