//! Target group finder and live target health.

use tracing::debug;

use crate::api::{TargetApi, TargetGroupData, TargetHealthData};
use crate::error::CloudResult;
use crate::finder::{Named, single_named, single_tag_set};
use crate::identity::{ConfigTagged, ProjectTagged, ServiceTagged};
use crate::tags;

const KIND: &str = "target group";

/// A target group with its identity derived from tags.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetGroup {
    arn: String,
    project_name: Option<String>,
    config_name: Option<String>,
    service_name: Option<String>,
}

impl TargetGroup {
    /// Provider-assigned ARN.
    pub fn arn(&self) -> &str {
        &self.arn
    }
}

impl ProjectTagged for TargetGroup {
    fn project_name(&self) -> Option<&str> {
        self.project_name.as_deref()
    }
}

impl ConfigTagged for TargetGroup {
    fn config_name(&self) -> Option<&str> {
        self.config_name.as_deref()
    }
}

impl ServiceTagged for TargetGroup {
    fn service_name(&self) -> Option<&str> {
        self.service_name.as_deref()
    }
}

impl Named for TargetGroupData {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Find every named target group, preserving input order, failing fast.
pub async fn find_all(api: &impl TargetApi, names: &[String]) -> CloudResult<Vec<TargetGroup>> {
    let mut found = Vec::with_capacity(names.len());
    for name in names {
        found.push(find_by_name(api, name).await?);
    }
    Ok(found)
}

/// Find one target group by name and fetch its identity tags.
pub async fn find_by_name(api: &impl TargetApi, name: &str) -> CloudResult<TargetGroup> {
    let described = api.describe_target_groups(&[name.to_string()]).await?;
    let data = single_named(described, name, KIND)?;

    let tag_sets = api
        .describe_target_group_tags(&[data.arn.clone()])
        .await?;
    let group_tags = single_tag_set(tag_sets, &data.arn, KIND)?;

    debug!(name, arn = %data.arn, "target group found");
    Ok(TargetGroup {
        arn: data.arn,
        project_name: tags::lookup_owned(&group_tags, tags::PROJECT_NAME),
        config_name: tags::lookup_owned(&group_tags, tags::CONFIG_NAME),
        service_name: tags::lookup_owned(&group_tags, tags::SERVICE_NAME),
    })
}

/// Provider-reported health for each given instance behind a target group.
///
/// The provider call is issued even when `instance_ids` is empty, so the
/// contract can be validated identically to the non-empty case. Intentional,
/// not an optimization target.
pub async fn instance_health(
    api: &impl TargetApi,
    arn: &str,
    instance_ids: &[String],
) -> CloudResult<Vec<TargetHealthData>> {
    api.describe_target_health(arn, instance_ids).await
}
