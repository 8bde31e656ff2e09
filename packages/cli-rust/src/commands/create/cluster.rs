//! nsai create cluster - Provision a cluster
//!
//! Collects the cluster spec, walks the user through granting bucket access,
//! gates on the access and readiness checks, then creates the cluster. The
//! config is written once, after creation succeeds.

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use nsai_core::config::{ClusterContext, ConfigError, ensure_same_provider};
use nsai_core::remote::{ClusterSpec, ControlPlane};
use nsai_core::{CloudProvider, ClusterType};
use tracing::{debug, info};

use super::{pick_provider, pick_region};
use crate::commands::CommandEnv;
use crate::commands::verify::verify_bucket;
use crate::output::{self, bucket_table, spin};
use crate::prompt::Prompter;

/// Arguments for create cluster command
#[derive(Args, Debug, Default, Clone)]
pub struct CreateClusterArgs {
    /// Cluster name (prompted if omitted)
    pub name: Option<String>,

    /// Cluster tier
    #[arg(long = "type", value_enum)]
    pub cluster_type: Option<ClusterType>,

    /// Cloud provider
    #[arg(long, value_enum)]
    pub cloud: Option<CloudProvider>,

    /// Region of the chosen provider
    #[arg(long)]
    pub region: Option<String>,

    /// Bucket to attach (existing or new name)
    #[arg(long)]
    pub bucket: Option<String>,

    /// Access role/principal you created for the platform
    #[arg(long)]
    pub role: Option<String>,
}

pub async fn cmd_create_cluster<C: ControlPlane, P: Prompter>(
    env: &mut CommandEnv<'_, C, P>,
    args: &CreateClusterArgs,
) -> Result<ClusterContext> {
    let mut config = env.require_session().await?;
    let token = config.user.auth_token.clone();

    let name = match &args.name {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => env.prompt.required_line("Cluster name")?,
    };
    let cluster_type = pick_cluster_type(&mut *env.prompt, args.cluster_type)?;
    let provider = pick_provider(&mut *env.prompt, args.cloud)?;
    let region = pick_region(&mut *env.prompt, provider, args.region.as_deref())?;
    let bucket = match &args.bucket {
        Some(bucket) => bucket.trim().to_string(),
        None => pick_bucket(env, &name, provider).await?,
    };
    let role = match &args.role {
        Some(role) => role.trim().to_string(),
        None => env
            .prompt
            .required_line(&format!("{} name", provider.access_role_kind()))?,
    };

    let identity = spin(
        "Fetching platform service identity...",
        env.quiet,
        env.remote.get_service_identity(provider, &token),
    )
    .await?;

    if !env.quiet {
        println!();
        println!("{}", style("Grant the platform access to your bucket").bold());
        println!("{}", provider.setup_instructions(&identity, &role));
        println!();
    }
    env.prompt
        .pause("Press Enter once the setup above is complete")?;

    verify_bucket(env.remote, provider, &bucket, &role, &token, env.quiet).await?;

    let spec = ClusterSpec {
        name,
        cluster_type,
        cloud_provider: provider,
        region,
        bucket,
        role,
    };
    debug!("Creating {} cluster '{}'", spec.cluster_type, spec.name);
    let cluster = spin(
        "Creating cluster...",
        env.quiet,
        env.remote.create_cluster(&spec, &token),
    )
    .await?;
    if cluster.cloud_provider != provider {
        return Err(ConfigError::ProviderMismatch {
            cluster: cluster.name.clone(),
            cluster_provider: cluster.cloud_provider,
            bucket: cluster.bucket.clone(),
            bucket_provider: provider,
        }
        .into());
    }

    config.cluster = Some(cluster.clone());
    env.store.save(&config).context("Failed to save config")?;
    info!("Cluster '{}' is now the current context", cluster.name);

    output::success(
        env.quiet,
        &format!(
            "Cluster {} created on {} ({})",
            style(&cluster.name).cyan(),
            cluster.cloud_provider.label(),
            cluster.region
        ),
    );
    Ok(cluster)
}

fn pick_cluster_type<P: Prompter>(prompt: &mut P, flag: Option<ClusterType>) -> Result<ClusterType> {
    if let Some(cluster_type) = flag {
        return Ok(cluster_type);
    }
    let options: Vec<String> = ClusterType::ALL
        .iter()
        .map(|t| t.label().to_string())
        .collect();
    let index = prompt.choice("Cluster type", &options)?;
    Ok(ClusterType::ALL[index])
}

/// Reuse a listed bucket or name a new one
///
/// A new name is not checked here; the access check is the gate.
async fn pick_bucket<C: ControlPlane, P: Prompter>(
    env: &mut CommandEnv<'_, C, P>,
    cluster: &str,
    provider: CloudProvider,
) -> Result<String> {
    let buckets = spin(
        "Fetching buckets...",
        env.quiet,
        env.remote.list_buckets(provider),
    )
    .await?;

    if buckets.is_empty() {
        output::info(env.quiet, &format!("No existing {} buckets found.", provider.label()));
        return env.prompt.required_line("New bucket name");
    }

    if !env.quiet {
        println!("{}", bucket_table(&buckets));
    }
    let mut options: Vec<String> = buckets.iter().map(|b| b.name.clone()).collect();
    options.push("Use a new bucket".to_string());
    let index = env.prompt.choice("Bucket", &options)?;

    match buckets.get(index) {
        Some(bucket) => {
            ensure_same_provider(cluster, provider, bucket)?;
            Ok(bucket.name.clone())
        }
        None => env.prompt.required_line("New bucket name"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{TestBed, bucket, platform, user};
    use crate::prompt::ScriptedPrompter;
    use nsai_core::config::LocalConfig;
    use nsai_core::remote::{RemoteError, Verdict};

    fn full_args() -> CreateClusterArgs {
        CreateClusterArgs {
            name: Some("prod".to_string()),
            cluster_type: Some(ClusterType::Basic),
            cloud: Some(CloudProvider::Aws),
            region: Some("us-west-2".to_string()),
            bucket: Some("s3-data".to_string()),
            role: Some("nsai-access".to_string()),
        }
    }

    #[tokio::test]
    async fn creates_and_persists_cluster() {
        let bed = TestBed::signed_in(platform(), None);
        let mut prompt = ScriptedPrompter::new([""]);
        let cluster = cmd_create_cluster(&mut bed.env(&mut prompt), &full_args())
            .await
            .unwrap();

        assert_eq!(cluster.cluster_token, "ctok-prod");
        let stored = bed.config().cluster.unwrap();
        assert_eq!(stored, cluster);
        assert_eq!(stored.region, "us-west-2");
        assert_eq!(stored.bucket, "s3-data");
        assert_eq!(
            bed.remote.calls(),
            vec![
                "validate_user",
                "validate_token",
                "get_service_identity",
                "verify_bucket_access",
                "check_resource_readiness",
                "create_cluster",
            ]
        );
    }

    #[tokio::test]
    async fn readiness_failure_aborts_without_persisting() {
        let mut platform = platform();
        platform.readiness = Verdict::fail("bucket attachment pending");
        let bed = TestBed::signed_in(platform, None);
        let mut prompt = ScriptedPrompter::new([""]);

        let err = cmd_create_cluster(&mut bed.env(&mut prompt), &full_args())
            .await
            .unwrap_err();

        assert_eq!(
            err.downcast_ref::<RemoteError>().and_then(RemoteError::reason),
            Some("bucket attachment pending")
        );
        assert!(format!("{err:#}").contains("bucket attachment pending"));
        assert!(bed.config().cluster.is_none());
        assert_eq!(bed.remote.call_count("create_cluster"), 0);
    }

    #[tokio::test]
    async fn access_failure_aborts_before_readiness() {
        let mut platform = platform();
        platform.bucket_access = Verdict::fail("role cannot be assumed");
        let bed = TestBed::signed_in(platform, None);
        let mut prompt = ScriptedPrompter::new([""]);

        let err = cmd_create_cluster(&mut bed.env(&mut prompt), &full_args())
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("role cannot be assumed"));
        assert_eq!(bed.remote.call_count("check_resource_readiness"), 0);
        assert!(bed.config().cluster.is_none());
    }

    #[tokio::test]
    async fn interactive_flow_reuses_listed_bucket() {
        let platform = platform()
            .with_bucket(bucket("s3-data", CloudProvider::Aws))
            .with_bucket(bucket("gcs-data", CloudProvider::Gcp));
        let bed = TestBed::signed_in(platform, None);
        // name, type, provider, region, bucket, role, pause
        let mut prompt =
            ScriptedPrompter::new(["analytics", "2", "1", "1", "1", "nsai-role", ""]);
        let cluster = cmd_create_cluster(&mut bed.env(&mut prompt), &CreateClusterArgs::default())
            .await
            .unwrap();

        assert_eq!(cluster.name, "analytics");
        assert_eq!(cluster.cloud_provider, CloudProvider::Aws);
        assert_eq!(cluster.region, "us-east-1");
        assert_eq!(cluster.bucket, "s3-data");
        assert_eq!(cluster.role, "nsai-role");
        assert_eq!(prompt.remaining(), 0);
    }

    #[tokio::test]
    async fn new_bucket_name_is_accepted_as_typed() {
        let platform = platform().with_bucket(bucket("s3-data", CloudProvider::Aws));
        let bed = TestBed::signed_in(platform, None);
        let args = CreateClusterArgs {
            bucket: None,
            ..full_args()
        };
        // "Use a new bucket", its name, pause
        let mut prompt = ScriptedPrompter::new(["2", "fresh-bucket", ""]);
        let cluster = cmd_create_cluster(&mut bed.env(&mut prompt), &args).await.unwrap();
        assert_eq!(cluster.bucket, "fresh-bucket");
    }

    #[tokio::test]
    async fn mismatched_listed_bucket_is_rejected() {
        let mut platform = platform().with_bucket(bucket("gcs-data", CloudProvider::Gcp));
        platform.ignore_provider_filter = true;
        let bed = TestBed::signed_in(platform, None);
        let args = CreateClusterArgs {
            bucket: None,
            ..full_args()
        };
        let mut prompt = ScriptedPrompter::new(["1"]);
        let err = cmd_create_cluster(&mut bed.env(&mut prompt), &args)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::ProviderMismatch { .. })
        ));
        assert!(bed.config().cluster.is_none());
    }

    #[tokio::test]
    async fn created_cluster_on_other_cloud_is_not_saved() {
        let mut platform = platform();
        platform.created_provider = Some(CloudProvider::Gcp);
        let bed = TestBed::signed_in(platform, None);
        let mut prompt = ScriptedPrompter::new([""]);

        let err = cmd_create_cluster(&mut bed.env(&mut prompt), &full_args())
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::ProviderMismatch {
                cluster_provider: CloudProvider::Gcp,
                bucket_provider: CloudProvider::Aws,
                ..
            })
        ));
        assert!(bed.config().cluster.is_none());
    }

    #[tokio::test]
    async fn out_of_range_region_aborts() {
        let bed = TestBed::signed_in(platform(), None);
        let args = CreateClusterArgs {
            region: None,
            ..full_args()
        };
        let mut prompt = ScriptedPrompter::new(["9"]);
        let err = cmd_create_cluster(&mut bed.env(&mut prompt), &args)
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<nsai_core::SelectionError>().is_some());
    }

    #[tokio::test]
    async fn unauthenticated_user_is_told_to_sign_in() {
        let bed = TestBed::new(platform());
        bed.store
            .save(&LocalConfig::for_user(nsai_core::UserIdentity {
                auth_token: String::new(),
                ..user()
            }))
            .unwrap();
        let mut prompt = ScriptedPrompter::default();
        let err = cmd_create_cluster(&mut bed.env(&mut prompt), &full_args())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Please authenticate first"));
        assert!(bed.remote.calls().is_empty());
    }

    #[tokio::test]
    async fn creation_replaces_existing_context() {
        let existing = crate::commands::testing::cluster("old", CloudProvider::Gcp);
        let bed = TestBed::signed_in(platform().with_cluster(existing.clone()), Some(existing));
        let mut prompt = ScriptedPrompter::new([""]);
        cmd_create_cluster(&mut bed.env(&mut prompt), &full_args())
            .await
            .unwrap();
        assert_eq!(bed.config().cluster.unwrap().name, "prod");
    }
}
