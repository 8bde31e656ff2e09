//! Cloud provider catalog
//!
//! Supported providers, their region lists, and the out-of-band access setup
//! each one needs before a bucket can be attached to a cluster.

use crate::selection::{SelectionError, select_one};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Cloud provider hosting a cluster or bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CloudProvider {
    Aws,
    Gcp,
    Azure,
}

const AWS_REGIONS: &[&str] = &["us-east-1", "us-west-2", "eu-west-1", "ap-southeast-1"];
const GCP_REGIONS: &[&str] = &["us-central1", "us-east1", "europe-west1", "asia-east1"];
const AZURE_REGIONS: &[&str] = &["eastus", "westus", "northeurope", "southeastasia"];

impl CloudProvider {
    /// Menu order used by every provider prompt
    pub const ALL: [CloudProvider; 3] = [CloudProvider::Aws, CloudProvider::Gcp, CloudProvider::Azure];

    pub fn as_str(self) -> &'static str {
        match self {
            CloudProvider::Aws => "aws",
            CloudProvider::Gcp => "gcp",
            CloudProvider::Azure => "azure",
        }
    }

    /// Human-readable label for menus
    pub fn label(self) -> &'static str {
        match self {
            CloudProvider::Aws => "AWS",
            CloudProvider::Gcp => "GCP",
            CloudProvider::Azure => "Azure",
        }
    }

    /// Fixed, ordered region list
    pub fn regions(self) -> &'static [&'static str] {
        match self {
            CloudProvider::Aws => AWS_REGIONS,
            CloudProvider::Gcp => GCP_REGIONS,
            CloudProvider::Azure => AZURE_REGIONS,
        }
    }

    pub fn has_region(self, region: &str) -> bool {
        self.regions().contains(&region)
    }

    /// Pick a region by 1-based menu index
    pub fn region_at(self, index: usize) -> Result<&'static str, SelectionError> {
        select_one(self.regions(), index).copied()
    }

    /// What the provider calls the identity that grants bucket access
    pub fn access_role_kind(self) -> &'static str {
        match self {
            CloudProvider::Aws => "IAM Role",
            CloudProvider::Gcp => "Service Account",
            CloudProvider::Azure => "Service Principal",
        }
    }

    /// Copy-paste instructions for granting the platform access to a bucket
    ///
    /// `service_identity` is the platform's own role/account, `access_role`
    /// is the one the user creates.
    pub fn setup_instructions(self, service_identity: &str, access_role: &str) -> String {
        match self {
            CloudProvider::Aws => format!(
                r#"AWS S3 Bucket Access Setup:
1. Create an IAM role named '{access_role}' for S3 bucket access with the following trust policy:
{{
    "Version": "2012-10-17",
    "Statement": [
        {{
            "Effect": "Allow",
            "Principal": {{
                "AWS": "{service_identity}"
            }},
            "Action": "sts:AssumeRole"
        }}
    ]
}}

2. Add the following S3 bucket permissions to the role:
- s3:ListBucket
- s3:GetObject
- s3:PutObject
- s3:DeleteObject

3. Allow the NStream service role to assume your role:
aws iam update-assume-role-policy --role-name {access_role} --policy-document '{{
    "Version": "2012-10-17",
    "Statement": [
        {{
            "Effect": "Allow",
            "Principal": {{
                "AWS": "{service_identity}"
            }},
            "Action": "sts:AssumeRole"
        }}
    ]
}}'"#
            ),
            CloudProvider::Gcp => format!(
                r#"GCP Cloud Storage Bucket Access Setup:
1. Create a service account named '{access_role}' for bucket access with the following roles:
- Storage Object Viewer
- Storage Object Creator
- Storage Object Admin

2. Grant the NStream service account permission to act as your service account:
gcloud iam service-accounts add-iam-policy-binding {access_role} \
    --member="serviceAccount:{service_identity}" \
    --role="roles/iam.serviceAccountUser"

3. Grant both service accounts access to your bucket:
gsutil iam ch serviceAccount:{access_role}:objectViewer,objectCreator gs://YOUR_BUCKET_NAME
gsutil iam ch serviceAccount:{service_identity}:objectViewer,objectCreator gs://YOUR_BUCKET_NAME"#
            ),
            CloudProvider::Azure => format!(
                r#"Azure Blob Storage Access Setup:
1. Create a service principal named '{access_role}' for blob storage access:
az ad sp create-for-rbac --name {access_role}

2. Assign the Storage Blob Data Contributor role to your service principal:
az role assignment create --assignee {access_role} \
    --role "Storage Blob Data Contributor" \
    --scope "/subscriptions/YOUR_SUBSCRIPTION_ID/resourceGroups/YOUR_RESOURCE_GROUP/providers/Microsoft.Storage/storageAccounts/YOUR_STORAGE_ACCOUNT"

3. Grant the NStream service principal access to your blob storage:
az role assignment create --assignee {service_identity} \
    --role "Storage Blob Data Contributor" \
    --scope "/subscriptions/YOUR_SUBSCRIPTION_ID/resourceGroups/YOUR_RESOURCE_GROUP/providers/Microsoft.Storage/storageAccounts/YOUR_STORAGE_ACCOUNT""#
            ),
        }
    }
}

impl fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CloudProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "aws" => Ok(CloudProvider::Aws),
            "gcp" => Ok(CloudProvider::Gcp),
            "azure" => Ok(CloudProvider::Azure),
            other => Err(format!(
                "unsupported cloud provider '{other}' (expected aws, gcp, or azure)"
            )),
        }
    }
}

/// Cluster tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ClusterType {
    Basic,
    Standard,
    Enterprise,
}

impl ClusterType {
    pub const ALL: [ClusterType; 3] = [
        ClusterType::Basic,
        ClusterType::Standard,
        ClusterType::Enterprise,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ClusterType::Basic => "basic",
            ClusterType::Standard => "standard",
            ClusterType::Enterprise => "enterprise",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ClusterType::Basic => "Basic (Free)",
            ClusterType::Standard => "Standard (Requires credits)",
            ClusterType::Enterprise => "Enterprise (Requires credits)",
        }
    }
}

impl fmt::Display for ClusterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
