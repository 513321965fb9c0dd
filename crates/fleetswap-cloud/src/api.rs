//! Provider capability contract.
//!
//! One narrow trait per provider service, each method a single describe,
//! list, tag-fetch, or delete round-trip. The raw client implementations
//! live outside this workspace; everything here treats a call as either
//! failing with [`CloudError::Transport`](crate::CloudError::Transport) or
//! succeeding with zero, one, or many results, classified by the finders.
//!
//! Calls are awaited to completion one at a time. No trait method spawns
//! work or holds state across calls.

use crate::error::CloudResult;
use crate::tags::Tag;

/// A scaling group as listed by the provider, tags inline.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalingGroupData {
    pub name: String,
    pub instance_ids: Vec<String>,
    pub tags: Vec<Tag>,
}

/// A target group as described by the provider. Tags are fetched separately.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetGroupData {
    pub arn: String,
    pub name: String,
}

/// A load balancer as described by the provider. Tags are fetched separately.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadBalancerData {
    pub name: String,
}

/// A security group as described by the provider, tags inline.
#[derive(Debug, Clone, PartialEq)]
pub struct SecurityGroupData {
    pub id: String,
    pub tags: Vec<Tag>,
}

/// A subnet as described by the provider, tags inline.
#[derive(Debug, Clone, PartialEq)]
pub struct SubnetData {
    pub id: String,
    pub tags: Vec<Tag>,
}

/// A machine image as described by the provider, tags inline.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub id: String,
    pub tags: Vec<Tag>,
}

/// An instance profile as reported by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceProfileData {
    pub arn: String,
    /// Hierarchical path, `"/{project}/{config}/{service}/"` by convention.
    pub path: String,
}

/// Tag set fetched for a single resource identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct TagDescription {
    /// The identifier the tags belong to, echoed back by the provider.
    pub resource_id: String,
    pub tags: Vec<Tag>,
}

/// Provider-reported health of one instance behind a target group.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetHealthData {
    pub instance_id: String,
    /// Raw provider state, e.g. `"healthy"`, `"initial"`, `"unhealthy"`.
    pub state: String,
}

/// An orchestration run as listed by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub name: String,
    pub id: String,
}

/// Terminal-or-not status of an orchestration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Succeeded,
    Failed,
    Halted,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RunStatus::Running)
    }
}

/// Scaling-group service: listing, instance termination, group deletion.
#[allow(async_fn_in_trait)]
pub trait ScalingApi {
    /// List every scaling group visible to the caller, tags inline.
    async fn describe_scaling_groups(&self) -> CloudResult<Vec<ScalingGroupData>>;

    /// Detach and terminate the given member instances.
    async fn terminate_instances(&self, instance_ids: &[String]) -> CloudResult<()>;

    /// Delete a scaling group by name.
    async fn delete_scaling_group(&self, name: &str) -> CloudResult<()>;
}

/// Target-group service: describe, tag fetch, live target health.
#[allow(async_fn_in_trait)]
pub trait TargetApi {
    async fn describe_target_groups(&self, names: &[String]) -> CloudResult<Vec<TargetGroupData>>;

    async fn describe_target_group_tags(
        &self,
        arns: &[String],
    ) -> CloudResult<Vec<TagDescription>>;

    /// Report health for the given instances. The call is issued even for an
    /// empty instance list; callers rely on that.
    async fn describe_target_health(
        &self,
        arn: &str,
        instance_ids: &[String],
    ) -> CloudResult<Vec<TargetHealthData>>;
}

/// Load-balancer service: describe and tag fetch.
#[allow(async_fn_in_trait)]
pub trait BalancerApi {
    async fn describe_load_balancers(
        &self,
        names: &[String],
    ) -> CloudResult<Vec<LoadBalancerData>>;

    async fn describe_load_balancer_tags(
        &self,
        names: &[String],
    ) -> CloudResult<Vec<TagDescription>>;
}

/// Network/compute service: filter-style lookups by name, tags inline.
#[allow(async_fn_in_trait)]
pub trait ComputeApi {
    /// Security groups whose name filter matches `name`.
    async fn describe_security_groups(&self, name: &str) -> CloudResult<Vec<SecurityGroupData>>;

    /// Subnets whose `Name` tag matches `name`.
    async fn describe_subnets(&self, name: &str) -> CloudResult<Vec<SubnetData>>;

    /// Images whose `Name` tag matches `name`.
    async fn describe_images(&self, name: &str) -> CloudResult<Vec<ImageData>>;
}

/// Identity service: instance profile lookup.
#[allow(async_fn_in_trait)]
pub trait IdentityApi {
    /// Fetch an instance profile by name, `None` if the provider has none.
    async fn find_instance_profile(
        &self,
        name: &str,
    ) -> CloudResult<Option<InstanceProfileData>>;
}

/// Monitoring service: alarm discovery and deletion.
#[allow(async_fn_in_trait)]
pub trait AlarmApi {
    /// Names of the alarms associated with a scaling group.
    async fn alarm_names_for_group(&self, group: &str) -> CloudResult<Vec<String>>;

    async fn delete_alarms(&self, names: &[String]) -> CloudResult<()>;
}

/// Orchestration engine: run history and run status.
#[allow(async_fn_in_trait)]
pub trait OrchestrationApi {
    /// List runs recorded by the named engine, most recent first.
    async fn list_runs(&self, engine: &str) -> CloudResult<Vec<RunSummary>>;

    async fn describe_run(&self, run_id: &str) -> CloudResult<RunStatus>;
}

/// Durable object storage for release state.
#[allow(async_fn_in_trait)]
pub trait StorageApi {
    async fn put_object(&self, key: &str, body: &[u8]) -> CloudResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_status_terminality() {
        assert!(!RunStatus::Running.is_terminal());
        assert!(RunStatus::Succeeded.is_terminal());
        assert!(RunStatus::Failed.is_terminal());
        assert!(RunStatus::Halted.is_terminal());
    }
}
