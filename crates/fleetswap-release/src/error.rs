//! Error types for release resolution, validation, and halting.
//!
//! Validation errors carry both the actual and the expected value; an
//! operator debugging a stuck release has no other diagnostic surface.

use std::fmt;

use fleetswap_cloud::CloudError;
use thiserror::Error;

/// Result type alias for release operations.
pub type ReleaseResult<T> = Result<T, ReleaseError>;

/// The resource kind a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    ScalingGroup,
    TargetGroup,
    LoadBalancer,
    SecurityGroup,
    Subnet,
    Image,
    Profile,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ResourceKind::ScalingGroup => "scaling group",
            ResourceKind::TargetGroup => "target group",
            ResourceKind::LoadBalancer => "load balancer",
            ResourceKind::SecurityGroup => "security group",
            ResourceKind::Subnet => "subnet",
            ResourceKind::Image => "image",
            ResourceKind::Profile => "instance profile",
        };
        f.write_str(label)
    }
}

/// The identity field a mismatch refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityField {
    Project,
    Config,
    Service,
}

impl fmt::Display for IdentityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            IdentityField::Project => "project name",
            IdentityField::Config => "config name",
            IdentityField::Service => "service name",
        };
        f.write_str(label)
    }
}

/// Errors that can occur while resolving, validating, or halting a release.
#[derive(Debug, Error)]
pub enum ReleaseError {
    /// A provider-facing discovery or teardown call failed.
    #[error(transparent)]
    Cloud(#[from] CloudError),

    /// The release descriptor itself is unusable.
    #[error("invalid release descriptor: {0}")]
    InvalidDescriptor(String),

    /// The resolved bundle has no image.
    #[error("image {image:?} missing from resolved resources")]
    MissingImage { image: String },

    /// Discovered resource count differs from the declared count. Fewer
    /// means a missing dependency, more means ambiguous tag assignment.
    #[error("{kind} count mismatch: actual {actual:?} expected {expected:?}")]
    CountMismatch {
        kind: ResourceKind,
        actual: Vec<String>,
        expected: Vec<String>,
    },

    /// A resource does not carry the managed-by convention tag.
    #[error("{kind} {id} ManagedBy tag expected {expected:?} actual {actual:?}")]
    Unmanaged {
        kind: ResourceKind,
        id: String,
        expected: String,
        actual: Option<String>,
    },

    /// The instance profile path does not encode the service identity.
    #[error("instance profile path is {actual:?} and requires {expected:?}")]
    ProfilePath { actual: String, expected: String },

    /// A resource's identity tag differs from the service's identity.
    #[error("{kind} {id} incorrect {field}: requires {requires:?} has {has:?}")]
    IdentityMismatch {
        kind: ResourceKind,
        id: String,
        field: IdentityField,
        requires: String,
        has: Option<String>,
    },

    /// The previous scaling group carries no release id tag at all.
    #[error("previous scaling group {group} has no release id tag")]
    UntaggedPrevious { group: String },

    /// The previous scaling group carries the target release id. A group
    /// cannot be its own predecessor.
    #[error("previous scaling group {group} carries the target release id {release_id:?}")]
    ReleaseCollision { group: String, release_id: String },

    /// No orchestration run matched the release's naming prefix.
    #[error("no orchestration run found with prefix {0:?}")]
    RunNotFound(String),

    /// The halt poll budget ran out with the run still active.
    #[error("orchestration run {prefix:?} still active after {polls} polls")]
    RunStillActive { prefix: String, polls: u32 },
}
