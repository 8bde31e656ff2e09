//! Control plane facade
//!
//! One trait describes every remote operation the CLI uses. Workflows are
//! generic over it, so the HTTP client and the in-memory fake are
//! interchangeable.
//!
//! Every operation that takes a token fails with
//! [`RemoteError::Unauthenticated`] on an empty token before any call is made.

mod error;
mod http;
#[cfg(any(test, feature = "testing"))]
mod memory;
mod types;

pub use error::{RemoteError, require_token};
pub use http::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT, ENDPOINT_ENV, HttpControlPlane, TransportSettings};
#[cfg(any(test, feature = "testing"))]
pub use memory::{FakePlatform, InMemoryControlPlane};
pub use types::{Bucket, ClusterSpec, ClusterSummary, Session, UserInfo, Verdict};

use crate::cloud::CloudProvider;
use crate::config::ClusterContext;

/// Remote operations of the managed platform
#[allow(async_fn_in_trait)]
pub trait ControlPlane {
    /// Ask for a sign-in OTP to be sent to `email`
    async fn sign_in(&self, email: &str) -> Result<Verdict, RemoteError>;

    /// Exchange a sign-in OTP for a session
    async fn verify_sign_in(&self, email: &str, otp: &str) -> Result<Session, RemoteError>;

    /// Register an account; an OTP is sent on success
    async fn sign_up(
        &self,
        email: &str,
        name: &str,
        organization: &str,
        role: &str,
    ) -> Result<Verdict, RemoteError>;

    /// Exchange a sign-up OTP for a session
    async fn verify_sign_up(&self, email: &str, otp: &str) -> Result<Session, RemoteError>;

    /// Whether an account exists for `email`
    async fn validate_user(&self, email: &str) -> Result<bool, RemoteError>;

    async fn validate_token(&self, token: &str) -> Result<Verdict, RemoteError>;

    async fn validate_cluster_token(&self, token: &str) -> Result<Verdict, RemoteError>;

    async fn list_clusters(&self, token: &str) -> Result<Vec<ClusterSummary>, RemoteError>;

    async fn get_cluster_details(
        &self,
        name: &str,
        token: &str,
    ) -> Result<ClusterContext, RemoteError>;

    /// Provision a cluster; the returned context carries the cluster token
    async fn create_cluster(
        &self,
        spec: &ClusterSpec,
        token: &str,
    ) -> Result<ClusterContext, RemoteError>;

    /// Buckets visible to the platform on `provider`
    async fn list_buckets(&self, provider: CloudProvider) -> Result<Vec<Bucket>, RemoteError>;

    async fn create_bucket(
        &self,
        name: &str,
        provider: CloudProvider,
        region: &str,
        token: &str,
    ) -> Result<Bucket, RemoteError>;

    /// Whether the platform can reach `bucket` through `role`
    async fn verify_bucket_access(
        &self,
        provider: CloudProvider,
        bucket: &str,
        role: &str,
        token: &str,
    ) -> Result<Verdict, RemoteError>;

    /// Whether the cluster-side resources for `bucket` and `role` are in place
    async fn check_resource_readiness(
        &self,
        provider: CloudProvider,
        bucket: &str,
        role: &str,
        token: &str,
    ) -> Result<Verdict, RemoteError>;

    /// The platform's own identity on `provider`, to be trusted by the user's role
    async fn get_service_identity(
        &self,
        provider: CloudProvider,
        token: &str,
    ) -> Result<String, RemoteError>;
}
