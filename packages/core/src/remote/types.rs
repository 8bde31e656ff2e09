//! Control plane messages
//!
//! Request bodies are sent as JSON with snake_case field names. Response
//! fields all default so that a partial answer decodes and is then judged
//! by the caller.

use crate::cloud::{CloudProvider, ClusterType};
use crate::config::ClusterContext;
use serde::{Deserialize, Serialize};

/// A storage bucket as listed by the control plane
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub name: String,
    #[serde(default)]
    pub region: String,
    pub provider: CloudProvider,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub created_at: String,
}

/// One entry of the cluster listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub id: String,
    #[serde(default)]
    pub region: String,
    pub cloud_provider: CloudProvider,
    #[serde(default)]
    pub bucket: String,
    #[serde(default)]
    pub role: String,
}

impl From<&ClusterContext> for ClusterSummary {
    fn from(cluster: &ClusterContext) -> Self {
        Self {
            id: cluster.name.clone(),
            region: cluster.region.clone(),
            cloud_provider: cluster.cloud_provider,
            bucket: cluster.bucket.clone(),
            role: cluster.role.clone(),
        }
    }
}

/// Organization and role attached to a verified account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub role: String,
}

/// Result of a successful OTP verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub auth_token: String,
    pub user: UserInfo,
}

/// Yes/no answer with the control plane's reason on "no"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub reason: String,
}

impl Verdict {
    pub fn pass() -> Self {
        Self {
            ok: true,
            reason: String::new(),
        }
    }

    pub fn fail(reason: impl Into<String>) -> Self {
        Self {
            ok: false,
            reason: reason.into(),
        }
    }

    /// Turn a negative verdict into [`RemoteError::ValidationFailed`]
    ///
    /// [`RemoteError::ValidationFailed`]: super::RemoteError::ValidationFailed
    pub fn into_result(self, operation: &'static str) -> Result<(), super::RemoteError> {
        if self.ok {
            Ok(())
        } else {
            Err(super::RemoteError::rejected(
                operation,
                non_empty_or(self.reason, "no reason given"),
            ))
        }
    }
}

/// Everything needed to provision a cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSpec {
    pub name: String,
    pub cluster_type: ClusterType,
    pub cloud_provider: CloudProvider,
    pub region: String,
    pub bucket: String,
    pub role: String,
}

pub(crate) fn non_empty_or(value: String, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

// Wire messages, one request/response pair per RPC.

#[derive(Debug, Serialize)]
pub(crate) struct EmailRequest<'a> {
    pub email: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct OtpRequest<'a> {
    pub email: &'a str,
    pub otp: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct SignUpRequest<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub organization: &'a str,
    pub role: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AckResponse {
    pub success: bool,
    pub error: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct VerifyResponse {
    pub auth_token: String,
    pub user_info: UserInfo,
    pub error: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ValidateUserResponse {
    pub valid: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct TokenRequest<'a> {
    pub token: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct TokenValidationResponse {
    pub valid: bool,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct EmptyRequest {}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ListClustersResponse {
    pub clusters: Vec<ClusterSummary>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ClusterNameRequest<'a> {
    pub cluster_name: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ClusterResponse {
    pub config: Option<ClusterContext>,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProviderRequest {
    pub cloud_provider: CloudProvider,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ListBucketsResponse {
    pub buckets: Vec<Bucket>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateBucketRequest<'a> {
    pub name: &'a str,
    pub cloud_provider: CloudProvider,
    pub region: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct CreateBucketResponse {
    pub bucket: Option<Bucket>,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct BucketAccessRequest<'a> {
    pub cloud_provider: CloudProvider,
    pub bucket_name: &'a str,
    pub role: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct BucketAccessResponse {
    pub has_access: bool,
    pub error: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ReadinessResponse {
    pub ready: bool,
    pub error: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ServiceIdentityResponse {
    pub identity: String,
    pub error: String,
}
