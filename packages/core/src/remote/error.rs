//! Control plane error types

use thiserror::Error;

/// Errors from control plane calls
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// Missing or rejected credentials; recoverable by signing in again
    #[error("authentication required: {0}")]
    Unauthenticated(String),

    /// The control plane answered but refused the request
    #[error("{operation} failed: {reason}")]
    ValidationFailed {
        operation: &'static str,
        reason: String,
    },

    /// The control plane could not be reached (includes timeouts)
    #[error("failed to reach control plane: {0}")]
    Transport(String),

    /// The control plane answered with something we could not understand
    #[error("unexpected control plane response: {0}")]
    Protocol(String),
}

impl RemoteError {
    pub fn rejected(operation: &'static str, reason: impl Into<String>) -> Self {
        RemoteError::ValidationFailed {
            operation,
            reason: reason.into(),
        }
    }

    /// Reason text for business-level rejections, as sent by the control plane
    pub fn reason(&self) -> Option<&str> {
        match self {
            RemoteError::ValidationFailed { reason, .. } => Some(reason),
            _ => None,
        }
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, RemoteError::Unauthenticated(_))
    }
}

/// Fail fast on an empty bearer token, before any request is built
pub fn require_token(token: &str) -> Result<(), RemoteError> {
    if token.trim().is_empty() {
        return Err(RemoteError::Unauthenticated(
            "authentication token is missing, please sign in first".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_token_is_unauthenticated() {
        assert!(require_token("").unwrap_err().is_unauthenticated());
        assert!(require_token("   ").unwrap_err().is_unauthenticated());
        assert!(require_token("tok").is_ok());
    }

    #[test]
    fn rejection_message_keeps_reason_verbatim() {
        let err = RemoteError::rejected("resource readiness check", "bucket attachment pending");
        assert_eq!(err.reason(), Some("bucket attachment pending"));
        assert_eq!(
            err.to_string(),
            "resource readiness check failed: bucket attachment pending"
        );
    }
}
