//! Configuration schema for nsai
//!
//! Defines the single persisted document: the signed-in user plus the
//! current cluster context.

use crate::cloud::CloudProvider;
use crate::remote::Bucket;
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Identity of the signed-in user
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct UserIdentity {
    /// Email address, the stable account identifier
    pub email: String,

    #[serde(default)]
    pub org_name: String,

    #[serde(default)]
    pub role: String,

    /// Bearer credential; empty means unauthenticated
    #[serde(default)]
    pub auth_token: String,
}

impl UserIdentity {
    pub fn is_authenticated(&self) -> bool {
        !self.auth_token.is_empty()
    }
}

/// The cluster/bucket/role the CLI currently operates against
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ClusterContext {
    pub name: String,

    pub cloud_provider: CloudProvider,

    pub region: String,

    /// Bucket name, always of the same provider as the cluster
    #[serde(default)]
    pub bucket: String,

    /// Provider-specific access role/principal
    #[serde(default)]
    pub role: String,

    /// Bearer credential scoped to this cluster
    #[serde(default)]
    pub cluster_token: String,
}

/// Main configuration structure for nsai
///
/// Serialized to/from `~/.nstreamconfig`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LocalConfig {
    pub user: UserIdentity,

    /// Current cluster context, absent until one is created or selected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<ClusterContext>,
}

impl LocalConfig {
    /// Config for a freshly verified user with no cluster context
    pub fn for_user(user: UserIdentity) -> Self {
        Self {
            user,
            cluster: None,
        }
    }

    pub fn cluster_token(&self) -> Option<&str> {
        self.cluster
            .as_ref()
            .map(|cluster| cluster.cluster_token.as_str())
            .filter(|token| !token.is_empty())
    }

    /// Drop the cluster token while keeping the rest of the context
    ///
    /// Returns true if a token was present.
    pub fn clear_cluster_token(&mut self) -> bool {
        match self.cluster.as_mut() {
            Some(cluster) if !cluster.cluster_token.is_empty() => {
                cluster.cluster_token.clear();
                true
            }
            _ => false,
        }
    }

    /// Point the current cluster context at `bucket`
    ///
    /// Fails without touching the config if the bucket lives on a different
    /// provider than the cluster, or if there is no cluster context.
    pub fn bind_bucket(&mut self, bucket: &Bucket) -> Result<(), ConfigError> {
        let Some(cluster) = self.cluster.as_mut() else {
            return Err(ConfigError::NoClusterContext);
        };
        ensure_same_provider(&cluster.name, cluster.cloud_provider, bucket)?;
        cluster.bucket = bucket.name.clone();
        Ok(())
    }
}

/// Reject a cluster/bucket pairing across providers
pub fn ensure_same_provider(
    cluster: &str,
    cluster_provider: CloudProvider,
    bucket: &Bucket,
) -> Result<(), ConfigError> {
    if bucket.provider != cluster_provider {
        return Err(ConfigError::ProviderMismatch {
            cluster: cluster.to_string(),
            cluster_provider,
            bucket: bucket.name.clone(),
            bucket_provider: bucket.provider,
        });
    }
    Ok(())
}
