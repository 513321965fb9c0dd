//! Scaling groups: release index and teardown.
//!
//! A scaling group is the only resource tagged with a release id, so the
//! blue/green bookkeeping lives here: classifying a project/config scope's
//! groups into "this release" and "a previous release", and deleting a
//! superseded group's compute and alarms.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::api::{AlarmApi, ScalingApi, ScalingGroupData};
use crate::error::{CloudError, CloudResult};
use crate::identity::{
    ConfigTagged, ProjectTagged, ReleaseTagged, ServiceTagged, has_config_name, has_project_name,
    has_release_id,
};
use crate::tags;

/// A scaling group with its identity derived from tags.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalingGroup {
    name: String,
    instance_ids: Vec<String>,
    project_name: Option<String>,
    config_name: Option<String>,
    service_name: Option<String>,
    release_id: Option<String>,
}

impl ScalingGroup {
    fn from_data(data: ScalingGroupData) -> Self {
        let project_name = tags::lookup_owned(&data.tags, tags::PROJECT_NAME);
        let config_name = tags::lookup_owned(&data.tags, tags::CONFIG_NAME);
        let service_name = tags::lookup_owned(&data.tags, tags::SERVICE_NAME);
        let release_id = tags::lookup_owned(&data.tags, tags::RELEASE_ID);
        Self {
            name: data.name,
            instance_ids: data.instance_ids,
            project_name,
            config_name,
            service_name,
            release_id,
        }
    }

    /// Provider-assigned group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Member instance ids at listing time.
    pub fn instance_ids(&self) -> &[String] {
        &self.instance_ids
    }

    /// Delete this group's compute, then its alarms.
    ///
    /// Member instances are terminated before the group itself is deleted.
    /// Alarms are removed only after the group deletion succeeds; they may
    /// reference the group, and removing them first would orphan alerts on a
    /// resource that still exists.
    ///
    /// Caller contract: only ever invoked on a validated *previous* group,
    /// never one still serving the current release.
    pub async fn teardown(
        &self,
        scaling: &impl ScalingApi,
        alarms: &impl AlarmApi,
    ) -> CloudResult<()> {
        if !self.instance_ids.is_empty() {
            debug!(
                group = %self.name,
                instances = self.instance_ids.len(),
                "terminating member instances"
            );
            scaling.terminate_instances(&self.instance_ids).await?;
        }

        scaling.delete_scaling_group(&self.name).await?;
        info!(group = %self.name, "scaling group deleted");

        let alarm_names = alarms.alarm_names_for_group(&self.name).await?;
        if !alarm_names.is_empty() {
            alarms.delete_alarms(&alarm_names).await?;
            info!(group = %self.name, alarms = alarm_names.len(), "alarms deleted");
        }

        Ok(())
    }
}

impl ProjectTagged for ScalingGroup {
    fn project_name(&self) -> Option<&str> {
        self.project_name.as_deref()
    }
}

impl ConfigTagged for ScalingGroup {
    fn config_name(&self) -> Option<&str> {
        self.config_name.as_deref()
    }
}

impl ServiceTagged for ScalingGroup {
    fn service_name(&self) -> Option<&str> {
        self.service_name.as_deref()
    }
}

impl ReleaseTagged for ScalingGroup {
    fn release_id(&self) -> Option<&str> {
        self.release_id.as_deref()
    }
}

/// Member instance ids of the named group.
pub async fn get_instances(api: &impl ScalingApi, name: &str) -> CloudResult<Vec<String>> {
    let group = scoped(api, |g| g.name == name)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| CloudError::not_found("scaling group", name))?;
    Ok(group.instance_ids)
}

/// All groups whose tags exactly match the full identity tuple.
///
/// Zero or many results are both valid; multiple services may share a
/// release.
pub async fn for_release_id(
    api: &impl ScalingApi,
    project: &str,
    config: &str,
    release: &str,
) -> CloudResult<Vec<ScalingGroup>> {
    scoped(api, |g| {
        in_project_config(g, project, config) && has_release_id(g, release)
    })
    .await
}

/// All groups matching project and config but carrying a different release.
///
/// A group with no release tag at all also lands here; it cannot belong to
/// the target release, and validation rejects it with a descriptive error.
pub async fn for_not_release_id(
    api: &impl ScalingApi,
    project: &str,
    config: &str,
    release: &str,
) -> CloudResult<Vec<ScalingGroup>> {
    scoped(api, |g| {
        in_project_config(g, project, config) && !has_release_id(g, release)
    })
    .await
}

/// Same as [`for_not_release_id`], keyed by service name.
///
/// At most one previous group may occupy a service slot. Two groups mapping
/// to the same service is a hard inconsistency, not a retryable condition:
/// the caller gets [`CloudError::DuplicatePrevious`], never a best-effort
/// map. Groups with no service tag cannot occupy a slot and are skipped.
pub async fn for_not_release_id_service_map(
    api: &impl ScalingApi,
    project: &str,
    config: &str,
    release: &str,
) -> CloudResult<HashMap<String, ScalingGroup>> {
    let groups = for_not_release_id(api, project, config, release).await?;

    let mut map: HashMap<String, ScalingGroup> = HashMap::new();
    for group in groups {
        let Some(service) = group.service_name() else {
            continue;
        };
        if let Some(existing) = map.get(service) {
            return Err(CloudError::DuplicatePrevious {
                service: service.to_string(),
                groups: vec![existing.name().to_string(), group.name().to_string()],
            });
        }
        map.insert(service.to_string(), group);
    }

    Ok(map)
}

fn in_project_config(group: &ScalingGroup, project: &str, config: &str) -> bool {
    has_project_name(group, project) && has_config_name(group, config)
}

/// One listing snapshot, filtered. Discovery by tag is racy against
/// concurrent provider-side mutation; callers re-run the whole pass rather
/// than retrying here.
async fn scoped(
    api: &impl ScalingApi,
    keep: impl Fn(&ScalingGroup) -> bool,
) -> CloudResult<Vec<ScalingGroup>> {
    let listed = api.describe_scaling_groups().await?;
    Ok(listed
        .into_iter()
        .map(ScalingGroup::from_data)
        .filter(keep)
        .collect())
}
