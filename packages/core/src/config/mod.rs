//! Local configuration
//!
//! The config file is the client-side source of truth for "who am I" and
//! "which cluster am I working on".

pub mod paths;
mod schema;
mod store;
pub mod validation;

use crate::cloud::CloudProvider;
use std::path::PathBuf;
use thiserror::Error;

pub use schema::{ClusterContext, LocalConfig, UserIdentity, ensure_same_provider};
pub use store::ConfigStore;

/// Errors from reading, writing, or mutating the local config
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No config file yet; the user has never authenticated
    #[error("no configuration found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("config file {} is corrupt: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode config: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not determine home directory for the config file")]
    NoHomeDirectory,

    #[error("no cluster context selected")]
    NoClusterContext,

    #[error(
        "cloud provider mismatch: cluster '{cluster}' uses '{cluster_provider}' but bucket '{bucket}' uses '{bucket_provider}'"
    )]
    ProviderMismatch {
        cluster: String,
        cluster_provider: CloudProvider,
        bucket: String,
        bucket_provider: CloudProvider,
    },
}
