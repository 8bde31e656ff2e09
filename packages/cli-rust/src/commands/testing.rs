//! Fixtures for workflow tests

use nsai_core::config::{ClusterContext, ConfigStore, LocalConfig, UserIdentity};
use nsai_core::remote::{FakePlatform, InMemoryControlPlane};
use nsai_core::{Bucket, CloudProvider};
use tempfile::TempDir;

use super::CommandEnv;
use crate::prompt::ScriptedPrompter;

pub const EMAIL: &str = "a@b.com";
pub const TOKEN: &str = "tok1";

/// A temporary config file plus an in-memory control plane
pub struct TestBed {
    _dir: TempDir,
    pub store: ConfigStore,
    pub remote: InMemoryControlPlane,
}

impl TestBed {
    pub fn new(platform: FakePlatform) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("nstreamconfig.json"));
        Self {
            _dir: dir,
            store,
            remote: InMemoryControlPlane::new(platform),
        }
    }

    /// Platform and config for a user who is already signed in
    pub fn signed_in(platform: FakePlatform, cluster: Option<ClusterContext>) -> Self {
        let bed = Self::new(platform);
        bed.store
            .save(&LocalConfig {
                user: user(),
                cluster,
            })
            .unwrap();
        bed
    }

    pub fn env<'a>(&'a self, prompt: &'a mut ScriptedPrompter) -> CommandEnv<'a, InMemoryControlPlane, ScriptedPrompter> {
        CommandEnv {
            remote: &self.remote,
            store: &self.store,
            prompt,
            quiet: true,
        }
    }

    pub fn config(&self) -> LocalConfig {
        self.store.load().unwrap()
    }
}

pub fn user() -> UserIdentity {
    UserIdentity {
        email: EMAIL.to_string(),
        org_name: "acme".to_string(),
        role: "admin".to_string(),
        auth_token: TOKEN.to_string(),
    }
}

pub fn cluster(name: &str, provider: CloudProvider) -> ClusterContext {
    ClusterContext {
        name: name.to_string(),
        cloud_provider: provider,
        region: provider.regions()[0].to_string(),
        bucket: String::new(),
        role: "nsai-access".to_string(),
        cluster_token: format!("ctok-{name}"),
    }
}

pub fn bucket(name: &str, provider: CloudProvider) -> Bucket {
    Bucket {
        name: name.to_string(),
        region: provider.regions()[0].to_string(),
        provider,
        size: "10GB".to_string(),
        created_at: "2024-05-01".to_string(),
    }
}

pub fn platform() -> FakePlatform {
    FakePlatform::signed_in(EMAIL, TOKEN)
}
