//! In-memory control plane for workflow tests
//!
//! Holds a scripted view of the platform and records the name of every
//! operation that got past the token check.

use std::sync::{Mutex, MutexGuard};

use super::error::{RemoteError, require_token};
use super::types::{Bucket, ClusterSpec, ClusterSummary, Session, UserInfo, Verdict};
use super::ControlPlane;
use crate::cloud::CloudProvider;
use crate::config::ClusterContext;

/// Scripted platform state
#[derive(Debug, Clone)]
pub struct FakePlatform {
    /// Registered account emails
    pub users: Vec<String>,
    /// OTP accepted by both verify calls
    pub otp: String,
    /// Token handed out on successful verification
    pub issued_token: String,
    pub user_info: UserInfo,
    pub valid_tokens: Vec<String>,
    pub valid_cluster_tokens: Vec<String>,
    /// Reason given when a token is rejected
    pub token_error: String,
    pub clusters: Vec<ClusterContext>,
    pub buckets: Vec<Bucket>,
    /// Return every bucket from `list_buckets`, whatever the provider
    pub ignore_provider_filter: bool,
    pub service_identity: String,
    pub bucket_access: Verdict,
    pub readiness: Verdict,
    /// Provider reported back by `create_cluster` instead of the requested one
    pub created_provider: Option<CloudProvider>,
    /// Fail every call as if the network were down
    pub offline: bool,
}

impl Default for FakePlatform {
    fn default() -> Self {
        Self {
            users: Vec::new(),
            otp: "000000".to_string(),
            issued_token: "tok1".to_string(),
            user_info: UserInfo::default(),
            valid_tokens: Vec::new(),
            valid_cluster_tokens: Vec::new(),
            token_error: "token expired".to_string(),
            clusters: Vec::new(),
            buckets: Vec::new(),
            ignore_provider_filter: false,
            service_identity: "nstream-platform@nstream-ai.iam".to_string(),
            bucket_access: Verdict::pass(),
            readiness: Verdict::pass(),
            created_provider: None,
            offline: false,
        }
    }
}

impl FakePlatform {
    /// A platform where `email` is registered and signed in with `token`
    pub fn signed_in(email: &str, token: &str) -> Self {
        Self {
            users: vec![email.to_string()],
            issued_token: token.to_string(),
            valid_tokens: vec![token.to_string()],
            ..Self::default()
        }
    }

    pub fn with_cluster(mut self, cluster: ClusterContext) -> Self {
        if !cluster.cluster_token.is_empty() {
            self.valid_cluster_tokens.push(cluster.cluster_token.clone());
        }
        self.clusters.push(cluster);
        self
    }

    pub fn with_bucket(mut self, bucket: Bucket) -> Self {
        self.buckets.push(bucket);
        self
    }
}

/// [`ControlPlane`] backed by a [`FakePlatform`]
#[derive(Debug, Default)]
pub struct InMemoryControlPlane {
    state: Mutex<FakePlatform>,
    calls: Mutex<Vec<&'static str>>,
}

impl InMemoryControlPlane {
    pub fn new(platform: FakePlatform) -> Self {
        Self {
            state: Mutex::new(platform),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Current platform state, for assertions and mid-test tweaks
    pub fn state(&self) -> MutexGuard<'_, FakePlatform> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Operations performed so far, in order
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn call_count(&self, operation: &str) -> usize {
        self.calls().iter().filter(|call| **call == operation).count()
    }

    fn enter(&self, operation: &'static str) -> Result<MutexGuard<'_, FakePlatform>, RemoteError> {
        let state = self.state();
        if state.offline {
            return Err(RemoteError::Transport(format!(
                "{operation}: connection refused"
            )));
        }
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(operation);
        Ok(state)
    }

    fn enter_authed(
        &self,
        operation: &'static str,
        token: &str,
    ) -> Result<MutexGuard<'_, FakePlatform>, RemoteError> {
        require_token(token)?;
        self.enter(operation)
    }
}

fn issue_session(state: &mut FakePlatform, otp: &str, operation: &'static str) -> Result<Session, RemoteError> {
    if otp != state.otp {
        return Err(RemoteError::rejected(operation, "invalid OTP"));
    }
    let token = state.issued_token.clone();
    if !state.valid_tokens.contains(&token) {
        state.valid_tokens.push(token.clone());
    }
    Ok(Session {
        auth_token: token,
        user: state.user_info.clone(),
    })
}

impl ControlPlane for InMemoryControlPlane {
    async fn sign_in(&self, email: &str) -> Result<Verdict, RemoteError> {
        let state = self.enter("sign_in")?;
        if state.users.iter().any(|user| user == email) {
            Ok(Verdict::pass())
        } else {
            Ok(Verdict::fail(format!("no account found for {email}")))
        }
    }

    async fn verify_sign_in(&self, email: &str, otp: &str) -> Result<Session, RemoteError> {
        let mut state = self.enter("verify_sign_in")?;
        if !state.users.iter().any(|user| user == email) {
            return Err(RemoteError::rejected(
                "sign-in verification",
                format!("no account found for {email}"),
            ));
        }
        issue_session(&mut state, otp, "sign-in verification")
    }

    async fn sign_up(
        &self,
        email: &str,
        _name: &str,
        organization: &str,
        role: &str,
    ) -> Result<Verdict, RemoteError> {
        let mut state = self.enter("sign_up")?;
        if state.users.iter().any(|user| user == email) {
            return Ok(Verdict::fail(format!("an account already exists for {email}")));
        }
        state.users.push(email.to_string());
        state.user_info = UserInfo {
            organization: organization.to_string(),
            role: role.to_string(),
        };
        Ok(Verdict::pass())
    }

    async fn verify_sign_up(&self, email: &str, otp: &str) -> Result<Session, RemoteError> {
        let mut state = self.enter("verify_sign_up")?;
        if !state.users.iter().any(|user| user == email) {
            return Err(RemoteError::rejected(
                "sign-up verification",
                format!("no pending sign-up for {email}"),
            ));
        }
        issue_session(&mut state, otp, "sign-up verification")
    }

    async fn validate_user(&self, email: &str) -> Result<bool, RemoteError> {
        let state = self.enter("validate_user")?;
        Ok(state.users.iter().any(|user| user == email))
    }

    async fn validate_token(&self, token: &str) -> Result<Verdict, RemoteError> {
        let state = self.enter_authed("validate_token", token)?;
        if state.valid_tokens.iter().any(|t| t == token) {
            Ok(Verdict::pass())
        } else {
            Ok(Verdict::fail(state.token_error.clone()))
        }
    }

    async fn validate_cluster_token(&self, token: &str) -> Result<Verdict, RemoteError> {
        let state = self.enter_authed("validate_cluster_token", token)?;
        if state.valid_cluster_tokens.iter().any(|t| t == token) {
            Ok(Verdict::pass())
        } else {
            Ok(Verdict::fail(state.token_error.clone()))
        }
    }

    async fn list_clusters(&self, token: &str) -> Result<Vec<ClusterSummary>, RemoteError> {
        let state = self.enter_authed("list_clusters", token)?;
        Ok(state.clusters.iter().map(ClusterSummary::from).collect())
    }

    async fn get_cluster_details(
        &self,
        name: &str,
        token: &str,
    ) -> Result<ClusterContext, RemoteError> {
        let state = self.enter_authed("get_cluster_details", token)?;
        state
            .clusters
            .iter()
            .find(|cluster| cluster.name == name)
            .cloned()
            .ok_or_else(|| {
                RemoteError::rejected("cluster lookup", format!("cluster '{name}' not found"))
            })
    }

    async fn create_cluster(
        &self,
        spec: &ClusterSpec,
        token: &str,
    ) -> Result<ClusterContext, RemoteError> {
        let mut state = self.enter_authed("create_cluster", token)?;
        if state.clusters.iter().any(|cluster| cluster.name == spec.name) {
            return Err(RemoteError::rejected(
                "cluster creation",
                format!("cluster '{}' already exists", spec.name),
            ));
        }
        let cluster = ClusterContext {
            name: spec.name.clone(),
            cloud_provider: state.created_provider.unwrap_or(spec.cloud_provider),
            region: spec.region.clone(),
            bucket: spec.bucket.clone(),
            role: spec.role.clone(),
            cluster_token: format!("ctok-{}", spec.name),
        };
        state.valid_cluster_tokens.push(cluster.cluster_token.clone());
        state.clusters.push(cluster.clone());
        Ok(cluster)
    }

    async fn list_buckets(&self, provider: CloudProvider) -> Result<Vec<Bucket>, RemoteError> {
        let state = self.enter("list_buckets")?;
        Ok(state
            .buckets
            .iter()
            .filter(|bucket| state.ignore_provider_filter || bucket.provider == provider)
            .cloned()
            .collect())
    }

    async fn create_bucket(
        &self,
        name: &str,
        provider: CloudProvider,
        region: &str,
        token: &str,
    ) -> Result<Bucket, RemoteError> {
        let mut state = self.enter_authed("create_bucket", token)?;
        if state.buckets.iter().any(|bucket| bucket.name == name) {
            return Err(RemoteError::rejected(
                "bucket creation",
                format!("bucket '{name}' already exists"),
            ));
        }
        let bucket = Bucket {
            name: name.to_string(),
            region: region.to_string(),
            provider,
            size: "0B".to_string(),
            created_at: "2026-01-01".to_string(),
        };
        state.buckets.push(bucket.clone());
        Ok(bucket)
    }

    async fn verify_bucket_access(
        &self,
        _provider: CloudProvider,
        _bucket: &str,
        _role: &str,
        token: &str,
    ) -> Result<Verdict, RemoteError> {
        let state = self.enter_authed("verify_bucket_access", token)?;
        Ok(state.bucket_access.clone())
    }

    async fn check_resource_readiness(
        &self,
        _provider: CloudProvider,
        _bucket: &str,
        _role: &str,
        token: &str,
    ) -> Result<Verdict, RemoteError> {
        let state = self.enter_authed("check_resource_readiness", token)?;
        Ok(state.readiness.clone())
    }

    async fn get_service_identity(
        &self,
        _provider: CloudProvider,
        token: &str,
    ) -> Result<String, RemoteError> {
        let state = self.enter_authed("get_service_identity", token)?;
        Ok(state.service_identity.clone())
    }
}
