//! Configuration validation with actionable error messages
//!
//! Validates a loaded config and names the exact command that fixes it.

use super::schema::LocalConfig;
use console::style;

/// A configuration validation error with an actionable fix command
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The config field that has an error
    pub field: String,
    /// Description of what's wrong
    pub message: String,
    /// Exact nsai command to fix the issue
    pub fix_command: String,
}

/// A configuration validation warning (non-fatal)
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The config field with a potential issue
    pub field: String,
    /// Description of the warning
    pub message: String,
    /// Suggested nsai command to address the warning
    pub fix_command: String,
}

/// Validate configuration and return warnings or first error
///
/// Returns Ok(warnings) if validation passes (possibly with non-fatal warnings).
/// Returns Err(error) on the first fatal validation error encountered.
pub fn validate_config(config: &LocalConfig) -> Result<Vec<ValidationWarning>, ValidationError> {
    let mut warnings = Vec::new();

    if config.user.email.trim().is_empty() {
        return Err(ValidationError {
            field: "user.email".to_string(),
            message: "No signed-in user recorded".to_string(),
            fix_command: "nsai auth signin".to_string(),
        });
    }

    if let Some(cluster) = &config.cluster {
        if cluster.name.trim().is_empty() {
            return Err(ValidationError {
                field: "cluster.name".to_string(),
                message: "Cluster context has no name".to_string(),
                fix_command: "nsai use cluster".to_string(),
            });
        }

        if !cluster.cloud_provider.has_region(&cluster.region) {
            return Err(ValidationError {
                field: "cluster.region".to_string(),
                message: format!(
                    "Region '{}' is not a known {} region",
                    cluster.region, cluster.cloud_provider
                ),
                fix_command: format!("nsai use cluster {}", cluster.name),
            });
        }
    }

    // Warnings (non-fatal)

    if !config.user.is_authenticated() {
        warnings.push(ValidationWarning {
            field: "user.auth_token".to_string(),
            message: "Not authenticated".to_string(),
            fix_command: "nsai auth signin".to_string(),
        });
    }

    if let Some(cluster) = &config.cluster {
        if cluster.cluster_token.is_empty() {
            warnings.push(ValidationWarning {
                field: "cluster.cluster_token".to_string(),
                message: "Cluster token missing or expired".to_string(),
                fix_command: format!("nsai use cluster {}", cluster.name),
            });
        }
        if cluster.bucket.is_empty() {
            warnings.push(ValidationWarning {
                field: "cluster.bucket".to_string(),
                message: "No bucket bound to the current cluster".to_string(),
                fix_command: "nsai use bucket".to_string(),
            });
        }
    }

    Ok(warnings)
}

/// Display a validation error with styled formatting
pub fn display_validation_error(error: &ValidationError) {
    eprintln!();
    eprintln!("{}", style("Error: Configuration error").red().bold());
    eprintln!();
    eprintln!("  {}  {}", style("Field:").dim(), error.field);
    eprintln!("  {}  {}", style("Problem:").dim(), error.message);
    eprintln!();
    eprintln!("{}:", style("To fix, run").dim());
    eprintln!("  {}", style(&error.fix_command).cyan());
    eprintln!();
}

/// Display a validation warning with styled formatting
pub fn display_validation_warning(warning: &ValidationWarning) {
    eprintln!();
    eprintln!(
        "{}",
        style("Warning: Configuration warning").yellow().bold()
    );
    eprintln!();
    eprintln!("  {}  {}", style("Field:").dim(), warning.field);
    eprintln!("  {}  {}", style("Issue:").dim(), warning.message);
    eprintln!();
    eprintln!("{}:", style("To address, run").dim());
    eprintln!("  {}", style(&warning.fix_command).cyan());
    eprintln!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::CloudProvider;
    use crate::config::{ClusterContext, UserIdentity};

    fn signed_in() -> LocalConfig {
        LocalConfig::for_user(UserIdentity {
            email: "a@b.com".to_string(),
            org_name: "acme".to_string(),
            role: "admin".to_string(),
            auth_token: "tok1".to_string(),
        })
    }

    fn with_cluster(region: &str) -> LocalConfig {
        LocalConfig {
            cluster: Some(ClusterContext {
                name: "prod".to_string(),
                cloud_provider: CloudProvider::Gcp,
                region: region.to_string(),
                bucket: "data".to_string(),
                role: "sa-reader".to_string(),
                cluster_token: "ctok".to_string(),
            }),
            ..signed_in()
        }
    }

    #[test]
    fn test_valid_config_passes_without_warnings() {
        let warnings = validate_config(&with_cluster("us-central1")).unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_missing_email_is_error() {
        let err = validate_config(&LocalConfig::default()).unwrap_err();
        assert_eq!(err.field, "user.email");
        assert_eq!(err.fix_command, "nsai auth signin");
    }

    #[test]
    fn test_region_outside_provider_is_error() {
        let err = validate_config(&with_cluster("us-east-1")).unwrap_err();
        assert_eq!(err.field, "cluster.region");
        assert!(err.message.contains("gcp"));
        assert_eq!(err.fix_command, "nsai use cluster prod");
    }

    #[test]
    fn test_missing_token_warning() {
        let mut config = signed_in();
        config.user.auth_token.clear();
        let warnings = validate_config(&config).unwrap();
        assert!(warnings.iter().any(|w| w.field == "user.auth_token"));
    }

    #[test]
    fn test_cleared_cluster_token_and_bucket_warnings() {
        let mut config = with_cluster("europe-west1");
        if let Some(cluster) = config.cluster.as_mut() {
            cluster.cluster_token.clear();
            cluster.bucket.clear();
        }
        let warnings = validate_config(&config).unwrap();
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().any(|w| w.field == "cluster.cluster_token"));
        assert!(warnings.iter().any(|w| w.fix_command == "nsai use bucket"));
    }
}
