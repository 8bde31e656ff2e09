//! nsai create bucket - Create or pick a bucket for the current cluster

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use nsai_core::config::ConfigError;
use nsai_core::remote::{Bucket, ControlPlane};
use nsai_core::CloudProvider;
use tracing::debug;

use super::{pick_provider, pick_region};
use crate::commands::CommandEnv;
use crate::output::{self, bucket_table, spin};
use crate::prompt::Prompter;

/// Arguments for create bucket command
#[derive(Args, Debug, Default, Clone)]
pub struct CreateBucketArgs {
    /// Bucket name (prompted if omitted)
    pub name: Option<String>,

    /// Cloud provider (defaults to the current cluster's)
    #[arg(long, value_enum)]
    pub provider: Option<CloudProvider>,

    /// Region for a new bucket
    #[arg(long)]
    pub region: Option<String>,
}

/// Reuse or create a bucket, then bind it to the current cluster if any
///
/// Binding enforces that the bucket and cluster share a provider; a
/// mismatch is rejected before the config is written.
pub async fn cmd_create_bucket<C: ControlPlane, P: Prompter>(
    env: &mut CommandEnv<'_, C, P>,
    args: &CreateBucketArgs,
) -> Result<Bucket> {
    let mut config = env.require_session().await?;
    let token = config.user.auth_token.clone();

    let provider = match (args.provider, &config.cluster) {
        (Some(provider), Some(cluster)) if provider != cluster.cloud_provider => {
            return Err(ConfigError::ProviderMismatch {
                cluster: cluster.name.clone(),
                cluster_provider: cluster.cloud_provider,
                bucket: args.name.clone().unwrap_or_default(),
                bucket_provider: provider,
            }
            .into());
        }
        (Some(provider), _) => provider,
        (None, Some(cluster)) => {
            let details = spin(
                "Fetching cluster details...",
                env.quiet,
                env.remote.get_cluster_details(&cluster.name, &token),
            )
            .await?;
            details.cloud_provider
        }
        (None, None) => pick_provider(&mut *env.prompt, None)?,
    };
    debug!("Using provider {provider} for bucket");

    let existing = spin(
        "Fetching buckets...",
        env.quiet,
        env.remote.list_buckets(provider),
    )
    .await?;

    let bucket = match choose_existing(env, &existing, args.name.as_deref())? {
        Some(bucket) => {
            output::info(env.quiet, &format!("Using existing bucket {}", bucket.name));
            bucket
        }
        None => {
            let name = match &args.name {
                Some(name) if !name.trim().is_empty() => name.trim().to_string(),
                _ => env.prompt.required_line("New bucket name")?,
            };
            let region = pick_region(&mut *env.prompt, provider, args.region.as_deref())?;
            let created = spin(
                "Creating bucket...",
                env.quiet,
                env.remote.create_bucket(&name, provider, &region, &token),
            )
            .await?;
            output::success(
                env.quiet,
                &format!(
                    "Bucket {} created in {}",
                    style(&created.name).cyan(),
                    created.region
                ),
            );
            created
        }
    };

    if config.cluster.is_some() {
        config.bind_bucket(&bucket)?;
        env.store.save(&config).context("Failed to save config")?;
        output::success(
            env.quiet,
            &format!("Bucket {} set on the current cluster", style(&bucket.name).cyan()),
        );
    }
    Ok(bucket)
}

/// Pick a listed bucket, either by the given name or from a menu
///
/// Returns None when a new bucket should be created.
fn choose_existing<C, P: Prompter>(
    env: &mut CommandEnv<'_, C, P>,
    existing: &[Bucket],
    name: Option<&str>,
) -> Result<Option<Bucket>> {
    if let Some(name) = name {
        return Ok(existing.iter().find(|b| b.name == name.trim()).cloned());
    }
    if existing.is_empty() {
        return Ok(None);
    }

    if !env.quiet {
        println!("{}", bucket_table(existing));
    }
    let mut options: Vec<String> = existing.iter().map(|b| b.name.clone()).collect();
    options.push("Create a new bucket".to_string());
    let index = env.prompt.choice("Bucket", &options)?;
    Ok(existing.get(index).cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{TestBed, bucket, cluster, platform};
    use crate::prompt::ScriptedPrompter;

    #[tokio::test]
    async fn creates_bucket_on_current_cluster_provider() {
        let current = cluster("prod", CloudProvider::Gcp);
        let bed = TestBed::signed_in(platform().with_cluster(current.clone()), Some(current));
        let args = CreateBucketArgs {
            name: Some("gcs-new".to_string()),
            provider: None,
            region: Some("europe-west1".to_string()),
        };
        let mut prompt = ScriptedPrompter::default();
        let created = cmd_create_bucket(&mut bed.env(&mut prompt), &args)
            .await
            .unwrap();

        assert_eq!(created.provider, CloudProvider::Gcp);
        assert_eq!(created.region, "europe-west1");
        assert_eq!(bed.config().cluster.unwrap().bucket, "gcs-new");
        assert_eq!(bed.remote.call_count("get_cluster_details"), 1);
    }

    #[tokio::test]
    async fn reuses_listed_bucket_from_menu() {
        let current = cluster("prod", CloudProvider::Aws);
        let platform = platform()
            .with_cluster(current.clone())
            .with_bucket(bucket("s3-a", CloudProvider::Aws))
            .with_bucket(bucket("s3-b", CloudProvider::Aws));
        let bed = TestBed::signed_in(platform, Some(current));
        let mut prompt = ScriptedPrompter::new(["2"]);
        let chosen = cmd_create_bucket(&mut bed.env(&mut prompt), &CreateBucketArgs::default())
            .await
            .unwrap();

        assert_eq!(chosen.name, "s3-b");
        assert_eq!(bed.remote.call_count("create_bucket"), 0);
        assert_eq!(bed.config().cluster.unwrap().bucket, "s3-b");
    }

    #[tokio::test]
    async fn without_cluster_provider_comes_from_menu_and_config_is_untouched() {
        let bed = TestBed::signed_in(platform(), None);
        let before = bed.config();
        // provider, name, region
        let mut prompt = ScriptedPrompter::new(["3", "blobs", "2"]);
        let created = cmd_create_bucket(&mut bed.env(&mut prompt), &CreateBucketArgs::default())
            .await
            .unwrap();

        assert_eq!(created.provider, CloudProvider::Azure);
        assert_eq!(created.region, "westus");
        assert_eq!(bed.config(), before);
    }

    #[tokio::test]
    async fn provider_flag_for_other_cloud_is_rejected_before_creation() {
        let current = cluster("prod", CloudProvider::Aws);
        let bed = TestBed::signed_in(platform().with_cluster(current.clone()), Some(current));
        let before = bed.config();
        let args = CreateBucketArgs {
            name: Some("gcs-new".to_string()),
            provider: Some(CloudProvider::Gcp),
            region: Some("us-east1".to_string()),
        };
        let mut prompt = ScriptedPrompter::default();
        let err = cmd_create_bucket(&mut bed.env(&mut prompt), &args)
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::ProviderMismatch { .. })
        ));
        assert_eq!(bed.config(), before);
        assert_eq!(bed.remote.call_count("list_buckets"), 0);
        assert_eq!(bed.remote.call_count("create_bucket"), 0);
        assert!(bed.remote.state().buckets.is_empty());
    }

    #[tokio::test]
    async fn matching_provider_flag_is_accepted() {
        let current = cluster("prod", CloudProvider::Aws);
        let bed = TestBed::signed_in(platform().with_cluster(current.clone()), Some(current));
        let args = CreateBucketArgs {
            name: Some("s3-new".to_string()),
            provider: Some(CloudProvider::Aws),
            region: Some("us-west-2".to_string()),
        };
        let mut prompt = ScriptedPrompter::default();
        cmd_create_bucket(&mut bed.env(&mut prompt), &args)
            .await
            .unwrap();

        assert_eq!(bed.remote.call_count("get_cluster_details"), 0);
        assert_eq!(bed.config().cluster.unwrap().bucket, "s3-new");
    }
}
