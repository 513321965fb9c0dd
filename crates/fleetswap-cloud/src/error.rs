//! Error types for provider-facing operations.

use thiserror::Error;

/// Result type alias for provider-facing operations.
pub type CloudResult<T> = Result<T, CloudError>;

/// Errors that can occur while discovering or tearing down provider resources.
#[derive(Debug, Error)]
pub enum CloudError {
    /// A lookup returned zero results, or an ambiguous result set where
    /// exactly one was required.
    #[error("not found: {0}")]
    NotFound(String),

    /// More than one scaling group from a different release occupies the
    /// same service slot.
    #[error("duplicate previous scaling group for service {service:?}: {groups:?}")]
    DuplicatePrevious {
        service: String,
        groups: Vec<String>,
    },

    /// The provider call itself failed. Passed through unmodified.
    #[error("provider transport error: {0}")]
    Transport(String),
}

impl CloudError {
    /// Build a `NotFound` for a resource kind and the name that was requested.
    pub fn not_found(kind: &str, name: &str) -> Self {
        CloudError::NotFound(format!("{kind} {name:?}"))
    }
}
