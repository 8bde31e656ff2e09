//! Bucket access and readiness gates
//!
//! Shared by `create cluster` and `use bucket`. Both are single checks; a
//! negative answer aborts with the control plane's reason.

use anyhow::Result;
use nsai_core::CloudProvider;
use nsai_core::remote::ControlPlane;

use crate::output::spin;

pub async fn verify_bucket<C: ControlPlane>(
    remote: &C,
    provider: CloudProvider,
    bucket: &str,
    role: &str,
    token: &str,
    quiet: bool,
) -> Result<()> {
    spin(
        "Verifying bucket access...",
        quiet,
        async {
            remote
                .verify_bucket_access(provider, bucket, role, token)
                .await?
                .into_result("bucket access check")
        },
    )
    .await?;

    spin(
        "Checking resource readiness...",
        quiet,
        async {
            remote
                .check_resource_readiness(provider, bucket, role, token)
                .await?
                .into_result("resource readiness check")
        },
    )
    .await?;

    Ok(())
}
