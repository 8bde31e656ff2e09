//! Session validation
//!
//! Runs before every command that needs an authenticated user: checks the
//! account, then the auth token, then the cluster token. A dead cluster
//! token is not fatal; it is dropped from the config so the user is nudged
//! to reselect a cluster.

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{ConfigError, ConfigStore, LocalConfig};
use crate::remote::{ControlPlane, RemoteError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SessionError {
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, SessionError::Remote(e) if e.is_unauthenticated())
    }
}

/// Outcome of a successful [`validate_all`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCheck {
    /// Reason the cluster token was dropped, if it was
    pub cluster_token_cleared: Option<String>,
}

/// Load the config, mapping "no file" to an authentication error
pub fn load_session(store: &ConfigStore) -> Result<LocalConfig, SessionError> {
    match store.load() {
        Ok(config) => Ok(config),
        Err(ConfigError::NotFound(_)) => Err(RemoteError::Unauthenticated(
            "no configuration found, please sign in first".to_string(),
        )
        .into()),
        Err(e) => Err(e.into()),
    }
}

/// Validate the user, auth token and cluster token in that order
///
/// An invalid cluster token is cleared from `config` and saved. Running this
/// again right after a success makes the same remote checks and leaves the
/// config as it is.
pub async fn validate_all<C: ControlPlane>(
    remote: &C,
    store: &ConfigStore,
    config: &mut LocalConfig,
) -> Result<SessionCheck, SessionError> {
    if config.user.email.is_empty() || !config.user.is_authenticated() {
        return Err(RemoteError::Unauthenticated(
            "no authentication token found, please sign in first".to_string(),
        )
        .into());
    }

    debug!("Validating user {}", config.user.email);
    if !remote.validate_user(&config.user.email).await? {
        return Err(RemoteError::Unauthenticated(format!(
            "user {} could not be validated",
            config.user.email
        ))
        .into());
    }

    let verdict = remote.validate_token(&config.user.auth_token).await?;
    if !verdict.ok {
        return Err(RemoteError::Unauthenticated(format!(
            "authentication token is invalid: {}",
            verdict.reason
        ))
        .into());
    }

    let mut check = SessionCheck::default();
    if let Some(cluster_token) = config.cluster_token().map(str::to_string) {
        let verdict = remote.validate_cluster_token(&cluster_token).await?;
        if !verdict.ok {
            warn!("Cluster token rejected: {}", verdict.reason);
            config.clear_cluster_token();
            store.save(config)?;
            check.cluster_token_cleared = Some(verdict.reason);
        }
    }

    Ok(check)
}

/// [`load_session`] followed by [`validate_all`]
pub async fn authenticate<C: ControlPlane>(
    remote: &C,
    store: &ConfigStore,
) -> Result<(LocalConfig, SessionCheck), SessionError> {
    let mut config = load_session(store)?;
    let check = validate_all(remote, store, &mut config).await?;
    Ok((config, check))
}
