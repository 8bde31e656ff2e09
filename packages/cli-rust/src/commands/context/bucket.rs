//! nsai use bucket - Point the current cluster at a bucket

use anyhow::{Context, Result, bail};
use clap::Args;
use console::style;
use nsai_core::config::ClusterContext;
use nsai_core::remote::{Bucket, ControlPlane};
use nsai_core::selection::parse_choice_or_default;
use tracing::debug;

use super::fetch_clusters;
use crate::commands::CommandEnv;
use crate::commands::verify::verify_bucket;
use crate::output::{self, bucket_table, spin};
use crate::prompt::Prompter;

/// Arguments for use bucket command
#[derive(Args, Debug, Default, Clone)]
pub struct UseBucketArgs {
    /// Bucket name (a menu is shown if omitted)
    pub name: Option<String>,

    /// Cluster to bind the bucket to (defaults to the current one)
    #[arg(long)]
    pub cluster: Option<String>,
}

/// Bind a bucket to the resolved cluster
///
/// The cluster comes from `--cluster`, else a menu where Enter keeps the
/// current cluster; with no current cluster a number must be chosen. The
/// provider check runs before the access and readiness gates, and the config
/// is only written after all pass.
pub async fn cmd_use_bucket<C: ControlPlane, P: Prompter>(
    env: &mut CommandEnv<'_, C, P>,
    args: &UseBucketArgs,
) -> Result<ClusterContext> {
    let config = env.require_session().await?;
    let token = config.user.auth_token.clone();

    let cluster = resolve_cluster(env, args.cluster.as_deref(), config.cluster.as_ref(), &token)
        .await?;
    let provider = cluster.cloud_provider;

    let buckets = spin(
        "Fetching buckets...",
        env.quiet,
        env.remote.list_buckets(provider),
    )
    .await?;

    let bucket = match &args.name {
        Some(name) => buckets
            .iter()
            .find(|b| b.name == name.trim())
            .cloned()
            .unwrap_or_else(|| Bucket {
                name: name.trim().to_string(),
                region: String::new(),
                provider,
                size: String::new(),
                created_at: String::new(),
            }),
        None => {
            if buckets.is_empty() {
                bail!(
                    "no {} buckets available; create one with 'nsai create bucket'",
                    provider.label()
                );
            }
            if !env.quiet {
                println!("{}", bucket_table(&buckets));
            }
            let options: Vec<String> = buckets.iter().map(|b| b.name.clone()).collect();
            let index = env.prompt.choice("Buckets", &options)?;
            buckets[index].clone()
        }
    };

    let mut updated = config;
    updated.cluster = Some(cluster);
    updated.bind_bucket(&bucket)?;
    debug!("Bucket '{}' passes the provider check", bucket.name);

    let role = updated
        .cluster
        .as_ref()
        .map(|c| c.role.clone())
        .unwrap_or_default();
    verify_bucket(env.remote, provider, &bucket.name, &role, &token, env.quiet).await?;

    env.store.save(&updated).context("Failed to save config")?;
    output::success(
        env.quiet,
        &format!("Now using bucket {}", style(&bucket.name).cyan()),
    );
    updated
        .cluster
        .context("cluster context missing after binding bucket")
}

async fn resolve_cluster<C: ControlPlane, P: Prompter>(
    env: &mut CommandEnv<'_, C, P>,
    flag: Option<&str>,
    current: Option<&ClusterContext>,
    token: &str,
) -> Result<ClusterContext> {
    let name = match (flag, current) {
        (Some(name), _) => name.to_string(),
        (None, Some(current)) => {
            let clusters = fetch_clusters(env, token, Some(&current.name)).await?;
            let options: Vec<String> = clusters.iter().map(|c| c.id.clone()).collect();
            env.prompt.show_menu("Clusters", &options);
            let answer = env.prompt.line(&format!(
                "Select an option (1-{}, Enter for current cluster '{}')",
                options.len(),
                current.name
            ))?;
            match parse_choice_or_default(&answer, options.len())? {
                Some(index) => options[index].clone(),
                None => return Ok(current.clone()),
            }
        }
        (None, None) => {
            let clusters = fetch_clusters(env, token, None).await?;
            let options: Vec<String> = clusters.iter().map(|c| c.id.clone()).collect();
            let index = env.prompt.choice("Clusters", &options)?;
            options[index].clone()
        }
    };
    Ok(spin(
        "Fetching cluster details...",
        env.quiet,
        env.remote.get_cluster_details(&name, token),
    )
    .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{TestBed, bucket, cluster, platform};
    use crate::prompt::ScriptedPrompter;
    use nsai_core::CloudProvider;
    use nsai_core::config::ConfigError;
    use nsai_core::remote::{RemoteError, Verdict};

    #[tokio::test]
    async fn binds_listed_bucket_after_verification() {
        let current = cluster("prod", CloudProvider::Aws);
        let platform = platform()
            .with_cluster(current.clone())
            .with_bucket(bucket("s3-a", CloudProvider::Aws));
        let bed = TestBed::signed_in(platform, Some(current));
        // Enter keeps the current cluster, then the only bucket
        let mut prompt = ScriptedPrompter::new(["", "1"]);

        let updated = cmd_use_bucket(&mut bed.env(&mut prompt), &UseBucketArgs::default())
            .await
            .unwrap();

        assert_eq!(updated.bucket, "s3-a");
        let stored = bed.config().cluster.unwrap();
        assert_eq!(stored.bucket, "s3-a");
        assert_eq!(stored.cloud_provider, CloudProvider::Aws);
        assert_eq!(bed.remote.call_count("get_cluster_details"), 0);
        assert_eq!(bed.remote.call_count("verify_bucket_access"), 1);
        assert_eq!(bed.remote.call_count("check_resource_readiness"), 1);
    }

    #[tokio::test]
    async fn provider_mismatch_is_rejected_before_any_write() {
        let current = cluster("prod", CloudProvider::Aws);
        let mut platform = platform()
            .with_cluster(current.clone())
            .with_bucket(bucket("gcs-data", CloudProvider::Gcp));
        platform.ignore_provider_filter = true;
        let bed = TestBed::signed_in(platform, Some(current));
        let before = bed.config();
        let mut prompt = ScriptedPrompter::new(["", "1"]);

        let err = cmd_use_bucket(&mut bed.env(&mut prompt), &UseBucketArgs::default())
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::ProviderMismatch { .. })
        ));
        assert_eq!(bed.config(), before);
        assert_eq!(bed.remote.call_count("verify_bucket_access"), 0);
    }

    #[tokio::test]
    async fn readiness_failure_keeps_old_bucket() {
        let mut current = cluster("prod", CloudProvider::Aws);
        current.bucket = "old".to_string();
        let mut platform = platform().with_cluster(current.clone());
        platform.readiness = Verdict::fail("bucket attachment pending");
        let bed = TestBed::signed_in(platform, Some(current));
        let mut prompt = ScriptedPrompter::new([""]);
        let args = UseBucketArgs {
            name: Some("typed-by-hand".to_string()),
            cluster: None,
        };

        let err = cmd_use_bucket(&mut bed.env(&mut prompt), &args)
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<RemoteError>().and_then(RemoteError::reason),
            Some("bucket attachment pending")
        );
        assert_eq!(bed.config().cluster.unwrap().bucket, "old");
    }

    #[tokio::test]
    async fn no_current_cluster_requires_a_number() {
        let platform = platform()
            .with_cluster(cluster("dev", CloudProvider::Gcp))
            .with_cluster(cluster("prod", CloudProvider::Aws))
            .with_bucket(bucket("s3-a", CloudProvider::Aws));
        let bed = TestBed::signed_in(platform, None);
        let before = bed.config();

        let mut prompt = ScriptedPrompter::new([""]);
        let err = cmd_use_bucket(&mut bed.env(&mut prompt), &UseBucketArgs::default())
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<nsai_core::SelectionError>().is_some());
        assert_eq!(bed.config(), before);

        let mut prompt = ScriptedPrompter::new(["2", "1"]);
        cmd_use_bucket(&mut bed.env(&mut prompt), &UseBucketArgs::default())
            .await
            .unwrap();
        let stored = bed.config().cluster.unwrap();
        assert_eq!(stored.name, "prod");
        assert_eq!(stored.bucket, "s3-a");
    }

    #[tokio::test]
    async fn current_cluster_can_be_swapped_from_menu() {
        let current = cluster("prod", CloudProvider::Aws);
        let platform = platform()
            .with_cluster(current.clone())
            .with_cluster(cluster("dev", CloudProvider::Gcp))
            .with_bucket(bucket("gcs-a", CloudProvider::Gcp));
        let bed = TestBed::signed_in(platform, Some(current));
        let mut prompt = ScriptedPrompter::new(["2", "1"]);

        cmd_use_bucket(&mut bed.env(&mut prompt), &UseBucketArgs::default())
            .await
            .unwrap();

        let stored = bed.config().cluster.unwrap();
        assert_eq!(stored.name, "dev");
        assert_eq!(stored.bucket, "gcs-a");
        assert_eq!(bed.remote.call_count("get_cluster_details"), 1);
    }

    #[tokio::test]
    async fn cluster_flag_overrides_current() {
        let current = cluster("prod", CloudProvider::Aws);
        let platform = platform()
            .with_cluster(current.clone())
            .with_cluster(cluster("dev", CloudProvider::Gcp))
            .with_bucket(bucket("gcs-a", CloudProvider::Gcp));
        let bed = TestBed::signed_in(platform, Some(current));
        let mut prompt = ScriptedPrompter::default();
        let args = UseBucketArgs {
            name: Some("gcs-a".to_string()),
            cluster: Some("dev".to_string()),
        };

        cmd_use_bucket(&mut bed.env(&mut prompt), &args).await.unwrap();

        let stored = bed.config().cluster.unwrap();
        assert_eq!(stored.name, "dev");
        assert_eq!(stored.bucket, "gcs-a");
    }

    #[tokio::test]
    async fn no_buckets_for_provider_fails() {
        let current = cluster("prod", CloudProvider::Azure);
        let bed = TestBed::signed_in(platform().with_cluster(current.clone()), Some(current));
        let mut prompt = ScriptedPrompter::new([""]);
        let err = cmd_use_bucket(&mut bed.env(&mut prompt), &UseBucketArgs::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no Azure buckets available"));
    }
}
