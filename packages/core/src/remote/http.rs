//! HTTPS JSON client for the control plane
//!
//! Each RPC is a `POST {endpoint}/{service}/{method}` with a JSON body.
//! Authenticated calls carry the token as a bearer header.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use super::error::{RemoteError, require_token};
use super::types::*;
use super::ControlPlane;
use crate::cloud::CloudProvider;
use crate::config::ClusterContext;

/// Production control plane endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.nstream.ai/v1";

/// Environment variable overriding the endpoint
pub const ENDPOINT_ENV: &str = "NSAI_ENDPOINT";

/// Upper bound on a single call, connection included
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

const AUTH_SERVICE: &str = "auth";
const CLUSTER_SERVICE: &str = "cluster";
const BUCKET_SERVICE: &str = "bucket";

/// Where and how to reach the control plane
#[derive(Debug, Clone)]
pub struct TransportSettings {
    pub endpoint: String,
    /// Extra PEM root certificate, for private deployments
    pub ca_cert: Option<PathBuf>,
    pub timeout: Duration,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            ca_cert: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// [`ControlPlane`] over HTTPS
#[derive(Debug, Clone)]
pub struct HttpControlPlane {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpControlPlane {
    pub fn new(settings: &TransportSettings) -> Result<Self, RemoteError> {
        let mut builder = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("nsai/", env!("CARGO_PKG_VERSION")));

        if let Some(path) = &settings.ca_cert {
            let pem = std::fs::read(path).map_err(|e| {
                RemoteError::Transport(format!(
                    "failed to read CA certificate {}: {e}",
                    path.display()
                ))
            })?;
            let cert = reqwest::Certificate::from_pem(&pem).map_err(|e| {
                RemoteError::Transport(format!("invalid CA certificate {}: {e}", path.display()))
            })?;
            builder = builder.add_root_certificate(cert);
        }

        let client = builder
            .build()
            .map_err(|e| RemoteError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn call<Req, Resp>(
        &self,
        service: &str,
        method: &str,
        token: Option<&str>,
        body: &Req,
    ) -> Result<Resp, RemoteError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let url = format!("{}/{service}/{method}", self.endpoint);
        debug!("Calling {service}.{method}");

        let mut request = self.client.post(&url).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            RemoteError::Transport(format!("{service}.{method}: {e}"))
        })?;

        let status = response.status();
        trace!("{service}.{method} returned HTTP {status}");
        if status == StatusCode::UNAUTHORIZED {
            return Err(RemoteError::Unauthenticated(format!(
                "{service}.{method} rejected the credentials"
            )));
        }
        if !status.is_success() {
            return Err(RemoteError::Protocol(format!(
                "{service}.{method} returned HTTP {status}"
            )));
        }

        response.json().await.map_err(|e| {
            if e.is_decode() {
                RemoteError::Protocol(format!("{service}.{method}: {e}"))
            } else {
                RemoteError::Transport(format!("{service}.{method}: {e}"))
            }
        })
    }

    async fn authed<Req, Resp>(
        &self,
        service: &str,
        method: &str,
        token: &str,
        body: &Req,
    ) -> Result<Resp, RemoteError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        require_token(token)?;
        self.call(service, method, Some(token), body).await
    }
}

fn session_from(resp: VerifyResponse, operation: &'static str) -> Result<Session, RemoteError> {
    if !resp.error.is_empty() {
        return Err(RemoteError::rejected(operation, resp.error));
    }
    if resp.auth_token.is_empty() {
        return Err(RemoteError::Protocol(format!(
            "{operation} succeeded without an auth token"
        )));
    }
    Ok(Session {
        auth_token: resp.auth_token,
        user: resp.user_info,
    })
}

fn cluster_from(resp: ClusterResponse, operation: &'static str) -> Result<ClusterContext, RemoteError> {
    match resp.config {
        Some(config) if resp.error.is_empty() => Ok(config),
        _ => Err(RemoteError::rejected(
            operation,
            non_empty_or(resp.error, "no cluster returned"),
        )),
    }
}

impl ControlPlane for HttpControlPlane {
    async fn sign_in(&self, email: &str) -> Result<Verdict, RemoteError> {
        let resp: AckResponse = self
            .call(AUTH_SERVICE, "SignIn", None, &EmailRequest { email })
            .await?;
        Ok(Verdict {
            ok: resp.success,
            reason: resp.error,
        })
    }

    async fn verify_sign_in(&self, email: &str, otp: &str) -> Result<Session, RemoteError> {
        let resp: VerifyResponse = self
            .call(AUTH_SERVICE, "VerifySignIn", None, &OtpRequest { email, otp })
            .await?;
        session_from(resp, "sign-in verification")
    }

    async fn sign_up(
        &self,
        email: &str,
        name: &str,
        organization: &str,
        role: &str,
    ) -> Result<Verdict, RemoteError> {
        let body = SignUpRequest {
            email,
            name,
            organization,
            role,
        };
        let resp: AckResponse = self.call(AUTH_SERVICE, "SignUp", None, &body).await?;
        Ok(Verdict {
            ok: resp.success,
            reason: resp.error,
        })
    }

    async fn verify_sign_up(&self, email: &str, otp: &str) -> Result<Session, RemoteError> {
        let resp: VerifyResponse = self
            .call(AUTH_SERVICE, "VerifySignUp", None, &OtpRequest { email, otp })
            .await?;
        session_from(resp, "sign-up verification")
    }

    async fn validate_user(&self, email: &str) -> Result<bool, RemoteError> {
        let resp: ValidateUserResponse = self
            .call(AUTH_SERVICE, "ValidateUser", None, &EmailRequest { email })
            .await?;
        Ok(resp.valid)
    }

    async fn validate_token(&self, token: &str) -> Result<Verdict, RemoteError> {
        let resp: TokenValidationResponse = self
            .authed(AUTH_SERVICE, "ValidateToken", token, &TokenRequest { token })
            .await?;
        Ok(Verdict {
            ok: resp.valid,
            reason: resp.error,
        })
    }

    async fn validate_cluster_token(&self, token: &str) -> Result<Verdict, RemoteError> {
        let resp: TokenValidationResponse = self
            .authed(
                CLUSTER_SERVICE,
                "ValidateClusterToken",
                token,
                &TokenRequest { token },
            )
            .await?;
        Ok(Verdict {
            ok: resp.valid,
            reason: resp.error,
        })
    }

    async fn list_clusters(&self, token: &str) -> Result<Vec<ClusterSummary>, RemoteError> {
        let resp: ListClustersResponse = self
            .authed(CLUSTER_SERVICE, "ListClusters", token, &EmptyRequest {})
            .await?;
        Ok(resp.clusters)
    }

    async fn get_cluster_details(
        &self,
        name: &str,
        token: &str,
    ) -> Result<ClusterContext, RemoteError> {
        let resp: ClusterResponse = self
            .authed(
                CLUSTER_SERVICE,
                "GetClusterDetails",
                token,
                &ClusterNameRequest { cluster_name: name },
            )
            .await?;
        cluster_from(resp, "cluster lookup")
    }

    async fn create_cluster(
        &self,
        spec: &ClusterSpec,
        token: &str,
    ) -> Result<ClusterContext, RemoteError> {
        let resp: ClusterResponse = self
            .authed(CLUSTER_SERVICE, "CreateCluster", token, spec)
            .await?;
        cluster_from(resp, "cluster creation")
    }

    async fn list_buckets(&self, provider: CloudProvider) -> Result<Vec<Bucket>, RemoteError> {
        let resp: ListBucketsResponse = self
            .call(
                BUCKET_SERVICE,
                "ListBuckets",
                None,
                &ProviderRequest {
                    cloud_provider: provider,
                },
            )
            .await?;
        Ok(resp.buckets)
    }

    async fn create_bucket(
        &self,
        name: &str,
        provider: CloudProvider,
        region: &str,
        token: &str,
    ) -> Result<Bucket, RemoteError> {
        let body = CreateBucketRequest {
            name,
            cloud_provider: provider,
            region,
        };
        let resp: CreateBucketResponse = self
            .authed(BUCKET_SERVICE, "CreateBucket", token, &body)
            .await?;
        match resp.bucket {
            Some(bucket) if resp.error.is_empty() => Ok(bucket),
            _ => Err(RemoteError::rejected(
                "bucket creation",
                non_empty_or(resp.error, "no bucket returned"),
            )),
        }
    }

    async fn verify_bucket_access(
        &self,
        provider: CloudProvider,
        bucket: &str,
        role: &str,
        token: &str,
    ) -> Result<Verdict, RemoteError> {
        let body = BucketAccessRequest {
            cloud_provider: provider,
            bucket_name: bucket,
            role,
        };
        let resp: BucketAccessResponse = self
            .authed(BUCKET_SERVICE, "VerifyBucketAccess", token, &body)
            .await?;
        Ok(Verdict {
            ok: resp.has_access,
            reason: resp.error,
        })
    }

    async fn check_resource_readiness(
        &self,
        provider: CloudProvider,
        bucket: &str,
        role: &str,
        token: &str,
    ) -> Result<Verdict, RemoteError> {
        let body = BucketAccessRequest {
            cloud_provider: provider,
            bucket_name: bucket,
            role,
        };
        let resp: ReadinessResponse = self
            .authed(CLUSTER_SERVICE, "CheckResourceReadiness", token, &body)
            .await?;
        Ok(Verdict {
            ok: resp.ready,
            reason: resp.error,
        })
    }

    async fn get_service_identity(
        &self,
        provider: CloudProvider,
        token: &str,
    ) -> Result<String, RemoteError> {
        let resp: ServiceIdentityResponse = self
            .authed(
                BUCKET_SERVICE,
                "GetServiceIdentity",
                token,
                &ProviderRequest {
                    cloud_provider: provider,
                },
            )
            .await?;
        if !resp.error.is_empty() {
            return Err(RemoteError::rejected("service identity lookup", resp.error));
        }
        if resp.identity.is_empty() {
            return Err(RemoteError::Protocol(
                "service identity lookup returned an empty identity".to_string(),
            ));
        }
        Ok(resp.identity)
    }
}
