//! nsai-core - Core library for nsai
//!
//! This library provides the pieces shared by the CLI workflows:
//! - Local config store (who is signed in, which cluster is current)
//! - Cloud provider catalog (regions, access setup instructions)
//! - Control plane facade with an HTTPS client
//! - Session validation run before authenticated commands

pub mod cloud;
pub mod config;
pub mod remote;
pub mod selection;
pub mod session;

pub use cloud::{CloudProvider, ClusterType};
pub use config::{ClusterContext, ConfigError, ConfigStore, LocalConfig, UserIdentity};
pub use remote::{
    Bucket, ClusterSpec, ClusterSummary, ControlPlane, HttpControlPlane, RemoteError,
    TransportSettings, Verdict,
};
pub use selection::SelectionError;
pub use session::{SessionCheck, SessionError, authenticate, validate_all};

/// Get the version of the nsai-core library
pub fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
